//! Elasticsearch REST backend / Elasticsearch 后端

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::engine::{SearchEngine, SearchRequest};
use super::error::{Result, SearchError};
use super::schema::RawHit;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(rename = "_source")]
    source: Value,
}

/// Elasticsearch client bound to one index / 绑定单个索引的客户端
pub struct ElasticEngine {
    client: Client,
    base: Url,
    index: String,
}

impl ElasticEngine {
    pub fn new(url: &str, index: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(url)
            .map_err(|e| SearchError::Engine(format!("invalid engine url {}: {}", url, e)))?;
        if base.cannot_be_a_base() {
            return Err(SearchError::Engine(format!("invalid engine url {}", url)));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base,
            index: index.to_string(),
        })
    }

    /// `{base}/{index}/{segments...}`, each segment percent-encoded / 构建请求地址
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| SearchError::Engine(format!("invalid engine url {}", self.base)))?
            .pop_if_empty()
            .push(&self.index)
            .extend(segments);
        Ok(url)
    }

    /// Turn a non-success response into an engine error / 检查响应状态
    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(SearchError::Engine(format!("{}: {}", status, body)))
    }
}

#[async_trait]
impl SearchEngine for ElasticEngine {
    fn name(&self) -> &'static str {
        "elasticsearch"
    }

    async fn ping(&self) -> Result<()> {
        let resp = self.client.get(self.base.clone()).send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn index(&self, id: &str, source: Value) -> Result<()> {
        let resp = self
            .client
            .put(self.endpoint(&["_doc", id])?)
            .query(&[("refresh", "true")])
            .json(&source)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Value>> {
        let resp = self.client.get(self.endpoint(&["_doc", id])?).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let doc: GetResponse = Self::check(resp).await?.json().await?;
        Ok(Some(doc.source))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let resp = self
            .client
            .delete(self.endpoint(&["_doc", id])?)
            .query(&[("refresh", "true")])
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::check(resp).await?;
        Ok(true)
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawHit>> {
        let resp = self
            .client
            .post(self.endpoint(&["_search"])?)
            .json(request)
            .send()
            .await?;
        let body: SearchResponse = Self::check(resp).await?.json().await?;
        Ok(body.hits.hits)
    }
}
