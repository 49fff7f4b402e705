//! Result mapper - raw engine hits to typed jobs / 结果映射
//!
//! A hit whose source cannot be decoded is dropped and logged; the rest of the
//! result set is kept in engine order.

use super::error::{Result, SearchError};
use super::schema::RawHit;
use crate::models::Job;

/// Decode one stored source document / 解析单个文档
pub fn decode_source(source: serde_json::Value) -> Result<Job> {
    serde_json::from_value(source).map_err(|e| SearchError::Decode(e.to_string()))
}

/// Decode engine hits, attaching relevance scores / 解析命中列表
pub fn decode(hits: Vec<RawHit>) -> Vec<Job> {
    hits.into_iter()
        .map(|hit| {
            let score = hit.score.unwrap_or(0.0);
            let id = hit.id;
            decode_source(hit.source)
                .map(|mut job| {
                    job.score = Some(score);
                    job
                })
                .map_err(|e| (id, e))
        })
        .fold(Vec::new(), |mut jobs, decoded| {
            match decoded {
                Ok(job) => jobs.push(job),
                Err((id, e)) => {
                    tracing::warn!("Skipping undecodable hit {}: {}", id.as_deref().unwrap_or("<unknown>"), e);
                }
            }
            jobs
        })
}
