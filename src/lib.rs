pub mod api;
pub mod config;
pub mod models;
pub mod search;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use config::AppConfig;
use search::{QueryBuilder, SearchEngine, SearchGateway};

/// Build the gateway from configuration and a connected engine / 根据配置构建搜索网关
pub fn build_gateway(config: &AppConfig, engine: Arc<dyn SearchEngine>) -> SearchGateway {
    SearchGateway::new(engine)
        .with_builder(QueryBuilder::new().escape_wildcards(config.search.escape_wildcards))
        .with_max_results(config.search.max_results)
        .with_timeout(Duration::from_secs(config.engine.timeout_secs))
}
