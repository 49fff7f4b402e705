//! Search module - query construction and result ranking / 搜索模块
//!
//! Architecture principles / 架构原则：
//! - `query` turns criteria into one boolean query, `mapper` turns hits back into jobs
//! - Engines only expose primitives: index, get, delete, search
//! - `gateway` owns the flow: build → engine call → decode
//!
//! Backends / 后端：
//! - Elasticsearch over REST (production)
//! - In-process engine evaluating the same query tree (development, tests)

pub mod elastic;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod mapper;
pub mod memory;
pub mod query;
pub mod schema;

pub use elastic::ElasticEngine;
pub use engine::{connect, SearchEngine, SearchRequest};
pub use error::SearchError;
pub use gateway::SearchGateway;
pub use memory::MemoryEngine;
pub use query::{Query, QueryBuilder};
pub use schema::{Field, RawHit};
