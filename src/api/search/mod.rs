mod query;

pub use query::search_jobs;
