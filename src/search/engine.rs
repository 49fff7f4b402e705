//! Search engine seam - primitive operations only / 搜索引擎接口
//!
//! Backends expose index / get / delete / search primitives and report
//! "not found" as a value, leaving error classification and flow to the gateway.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::elastic::ElasticEngine;
use super::error::Result;
use super::memory::MemoryEngine;
use super::query::Query;
use super::schema::RawHit;
use crate::config::{EngineBackend, EngineConfig};

/// Search request body / 搜索请求体
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: Query,
    pub size: usize,
    pub track_total_hits: bool,
}

impl SearchRequest {
    pub fn new(query: Query, size: usize) -> Self {
        Self { query, size, track_total_hits: true }
    }
}

/// Backing full-text engine / 全文检索引擎
///
/// Writes must be visible to the very next read.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Backend name for logs / 后端名称
    fn name(&self) -> &'static str;

    /// Connectivity check / 连通性检查
    async fn ping(&self) -> Result<()>;

    /// Store `source` under `id`, replacing any previous version
    async fn index(&self, id: &str, source: Value) -> Result<()>;

    /// Stored source for `id`, `None` when absent
    async fn get(&self, id: &str) -> Result<Option<Value>>;

    /// Remove `id`; `false` when there was nothing to remove
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Run a query, hits in relevance order
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawHit>>;
}

/// Create the configured backend and verify it answers / 连接搜索引擎
pub async fn connect(config: &EngineConfig) -> anyhow::Result<Arc<dyn SearchEngine>> {
    let engine: Arc<dyn SearchEngine> = match config.backend {
        EngineBackend::Elasticsearch => Arc::new(ElasticEngine::new(
            &config.url,
            &config.index,
            Duration::from_secs(config.timeout_secs),
        )?),
        EngineBackend::Memory => Arc::new(MemoryEngine::new()),
    };

    engine
        .ping()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to reach {} at {}: {}", engine.name(), config.url, e))?;

    tracing::info!("Successfully connected to {}", engine.name());
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_request_body() {
        let body = serde_json::to_value(SearchRequest::new(Query::MatchAll, 25)).unwrap();
        assert_eq!(
            body,
            json!({"query": {"match_all": {}}, "size": 25, "track_total_hits": true})
        );
    }

    #[tokio::test]
    async fn test_connect_memory_backend() {
        let config = EngineConfig {
            backend: EngineBackend::Memory,
            ..EngineConfig::default()
        };
        let engine = connect(&config).await.unwrap();
        assert_eq!(engine.name(), "memory");
    }
}
