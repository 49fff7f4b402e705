use std::time::Duration;

/// Search layer error / 搜索层错误
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// No document with this id / 文档不存在
    #[error("job not found: {0}")]
    NotFound(String),
    /// The engine answered with a failure or could not be reached / 引擎错误
    #[error("search engine error: {0}")]
    Engine(String),
    /// The engine call did not finish within the configured bound / 引擎超时
    #[error("search engine call timed out after {0:?}")]
    Timeout(Duration),
    /// A stored document could not be parsed / 文档解析失败
    #[error("failed to decode document: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        SearchError::Engine(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
