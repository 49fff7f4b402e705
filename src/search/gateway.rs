//! Search gateway - query builder, engine call and result mapper in one place / 搜索网关

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::engine::{SearchEngine, SearchRequest};
use super::error::{Result, SearchError};
use super::mapper;
use super::query::QueryBuilder;
use crate::models::{Job, SearchCriteria, SearchResult};

/// Default cap on hits per search / 默认最大结果数
pub const DEFAULT_MAX_RESULTS: usize = 1000;

/// Default bound on a single engine call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Job operations against the search engine / 职位检索网关
///
/// One engine call per operation, no retries. Every call is bounded by the
/// configured timeout; dropping the returned future cancels the engine call.
pub struct SearchGateway {
    engine: Arc<dyn SearchEngine>,
    builder: QueryBuilder,
    max_results: usize,
    timeout: Duration,
}

impl SearchGateway {
    pub fn new(engine: Arc<dyn SearchEngine>) -> Self {
        Self {
            engine,
            builder: QueryBuilder::new(),
            max_results: DEFAULT_MAX_RESULTS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_builder(mut self, builder: QueryBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| SearchError::Timeout(self.timeout))?
    }

    /// Search jobs; empty criteria lists everything / 搜索职位
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResult> {
        let query = self.builder.build(criteria);
        if let Ok(body) = serde_json::to_string(&query) {
            tracing::debug!("Search query: {}", body);
        }

        let request = SearchRequest::new(query, self.max_results);
        let hits = self.bounded(self.engine.search(&request)).await?;
        let received = hits.len();

        let jobs = mapper::decode(hits);
        if jobs.len() < received {
            tracing::warn!("Dropped {} of {} hits that failed to decode", received - jobs.len(), received);
        }

        let total = jobs.len();
        Ok(SearchResult { jobs, total })
    }

    /// Fetch one job by id / 获取职位
    pub async fn get_by_id(&self, id: &str) -> Result<Job> {
        let source = self
            .bounded(self.engine.get(id))
            .await?
            .ok_or_else(|| SearchError::NotFound(id.to_string()))?;

        let mut job = mapper::decode_source(source)?;
        job.score = None;
        Ok(job)
    }

    /// Store a job, visible to the next read / 创建职位
    pub async fn create(&self, job: &Job) -> Result<()> {
        let mut source = serde_json::to_value(job)
            .map_err(|e| SearchError::Engine(format!("failed to encode job: {}", e)))?;
        if let Some(fields) = source.as_object_mut() {
            fields.remove("score");
        }

        self.bounded(self.engine.index(&job.id, source)).await
    }

    /// Delete a job by id / 删除职位
    pub async fn delete(&self, id: &str) -> Result<()> {
        if self.bounded(self.engine.delete(id)).await? {
            Ok(())
        } else {
            Err(SearchError::NotFound(id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewJob;
    use crate::search::memory::MemoryEngine;
    use crate::search::schema::RawHit;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    fn new_job(title: &str, location: &str, skills: &[&str]) -> NewJob {
        NewJob {
            title: title.to_string(),
            description: format!("{} role", title),
            company: "Acme".to_string(),
            location: location.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            salary: 120000.0,
        }
    }

    fn gateway() -> (Arc<MemoryEngine>, SearchGateway) {
        let engine = Arc::new(MemoryEngine::new());
        let gateway = SearchGateway::new(engine.clone());
        (engine, gateway)
    }

    async fn create(gateway: &SearchGateway, new: NewJob) -> Job {
        let job = Job::from_new(new);
        gateway.create(&job).await.unwrap();
        job
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (_, gateway) = gateway();
        let job = create(&gateway, new_job("Backend Engineer", "Remote", &["go", "sql"])).await;

        let fetched = gateway.get_by_id(&job.id).await.unwrap();
        assert_eq!(fetched, job);
        assert!(fetched.score.is_none());
    }

    #[tokio::test]
    async fn test_score_is_not_persisted() {
        let (engine, gateway) = gateway();
        let mut job = Job::from_new(new_job("Backend Engineer", "Remote", &[]));
        job.score = Some(9.0);
        gateway.create(&job).await.unwrap();

        let stored = engine.get(&job.id).await.unwrap().unwrap();
        assert!(stored.get("score").is_none());
    }

    #[tokio::test]
    async fn test_example_scenario() {
        let (_, gateway) = gateway();
        let job = create(&gateway, new_job("Backend Engineer", "Remote", &["go", "sql"])).await;

        let by_skill = gateway.search(&SearchCriteria::new().skills(["go"])).await.unwrap();
        assert_eq!(by_skill.total, 1);
        assert_eq!(by_skill.jobs[0].id, job.id);

        let by_text = gateway.search(&SearchCriteria::new().query("Backend")).await.unwrap();
        assert_eq!(by_text.total, 1);
        assert!(by_text.jobs[0].score.unwrap() > 0.0);

        let by_place = gateway.search(&SearchCriteria::new().location("Berlin")).await.unwrap();
        assert_eq!(by_place.total, 0);
        assert!(by_place.jobs.is_empty());
    }

    #[tokio::test]
    async fn test_empty_criteria_returns_everything() {
        let (_, gateway) = gateway();
        for title in ["One", "Two", "Three"] {
            create(&gateway, new_job(title, "Remote", &[])).await;
        }

        let result = gateway.search(&SearchCriteria::new()).await.unwrap();
        assert_eq!(result.total, 3);
        assert!(result.jobs.iter().all(|j| j.score == Some(0.0)));
    }

    #[tokio::test]
    async fn test_skills_results_intersect_request() {
        let (_, gateway) = gateway();
        create(&gateway, new_job("A", "Remote", &["go", "sql"])).await;
        create(&gateway, new_job("B", "Remote", &["rust"])).await;
        create(&gateway, new_job("C", "Remote", &["python", "sql"])).await;
        create(&gateway, new_job("D", "Remote", &[])).await;

        let wanted = ["sql", "rust"];
        let result = gateway.search(&SearchCriteria::new().skills(wanted)).await.unwrap();
        assert_eq!(result.total, 3);
        for job in &result.jobs {
            assert!(job.skills.iter().any(|s| wanted.contains(&s.as_str())));
        }
    }

    #[tokio::test]
    async fn test_delete() {
        let (_, gateway) = gateway();
        let job = create(&gateway, new_job("Backend Engineer", "Remote", &[])).await;

        assert!(matches!(gateway.delete("missing").await, Err(SearchError::NotFound(_))));

        gateway.delete(&job.id).await.unwrap();
        assert!(matches!(gateway.get_by_id(&job.id).await, Err(SearchError::NotFound(_))));
        assert!(matches!(gateway.delete(&job.id).await, Err(SearchError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_search_skips_undecodable_hits() {
        let (engine, gateway) = gateway();
        create(&gateway, new_job("Backend Engineer", "Remote", &[])).await;
        engine
            .index("broken", json!({"id": "broken", "company": "Acme", "location": "Remote"}))
            .await
            .unwrap();

        let result = gateway.search(&SearchCriteria::new()).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.jobs.len(), 1);
        assert_eq!(result.jobs[0].title, "Backend Engineer");

        assert!(matches!(gateway.get_by_id("broken").await, Err(SearchError::Decode(_))));
    }

    struct StallingEngine;

    #[async_trait]
    impl SearchEngine for StallingEngine {
        fn name(&self) -> &'static str {
            "stalling"
        }

        async fn ping(&self) -> Result<()> {
            Ok(())
        }

        async fn index(&self, _id: &str, _source: Value) -> Result<()> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }

        async fn get(&self, _id: &str) -> Result<Option<Value>> {
            Err(SearchError::Engine("503 Service Unavailable".to_string()))
        }

        async fn delete(&self, _id: &str) -> Result<bool> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(true)
        }

        async fn search(&self, _request: &SearchRequest) -> Result<Vec<RawHit>> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_engine_calls_are_bounded() {
        let gateway = SearchGateway::new(Arc::new(StallingEngine)).with_timeout(Duration::from_millis(50));

        assert!(matches!(
            gateway.search(&SearchCriteria::new()).await,
            Err(SearchError::Timeout(_))
        ));
        assert!(matches!(gateway.delete("x").await, Err(SearchError::Timeout(_))));

        let job = Job::from_new(new_job("Backend Engineer", "Remote", &[]));
        assert!(matches!(gateway.create(&job).await, Err(SearchError::Timeout(_))));
    }

    struct FailingEngine;

    #[async_trait]
    impl SearchEngine for FailingEngine {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn ping(&self) -> Result<()> {
            Ok(())
        }

        async fn index(&self, _id: &str, _source: Value) -> Result<()> {
            Err(SearchError::Engine("500 Internal Server Error".to_string()))
        }

        async fn get(&self, _id: &str) -> Result<Option<Value>> {
            Err(SearchError::Engine("503 Service Unavailable".to_string()))
        }

        async fn delete(&self, _id: &str) -> Result<bool> {
            Err(SearchError::Engine("500 Internal Server Error".to_string()))
        }

        async fn search(&self, _request: &SearchRequest) -> Result<Vec<RawHit>> {
            Err(SearchError::Engine("503 Service Unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_engine_errors_propagate() {
        let gateway = SearchGateway::new(Arc::new(FailingEngine));
        assert!(matches!(gateway.get_by_id("x").await, Err(SearchError::Engine(_))));
        assert!(matches!(gateway.delete("x").await, Err(SearchError::Engine(_))));
        assert!(matches!(
            gateway.search(&SearchCriteria::new()).await,
            Err(SearchError::Engine(_))
        ));

        let job = Job::from_new(new_job("Backend Engineer", "Remote", &[]));
        assert!(matches!(gateway.create(&job).await, Err(SearchError::Engine(_))));
    }
}
