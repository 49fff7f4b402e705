use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Job listing document / 职位文档
///
/// `score` is only populated on search results and is never written to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub salary: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Create payload (id and timestamp are assigned server-side) / 创建职位请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub salary: f64,
}

impl NewJob {
    /// Check caller-side constraints before anything reaches the engine / 校验请求
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        if self.company.trim().is_empty() {
            return Err("company must not be empty".to_string());
        }
        if !self.salary.is_finite() || self.salary < 0.0 {
            return Err("salary must be a non-negative number".to_string());
        }
        Ok(())
    }
}

impl Job {
    /// Build a new document with a fresh id and creation time / 生成新职位文档
    pub fn from_new(new: NewJob) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            company: new.company,
            location: new.location,
            skills: new.skills,
            salary: new.salary,
            created_at: Utc::now(),
            score: None,
        }
    }
}

/// Search criteria; every dimension is optional / 搜索条件
///
/// A missing key and an explicit `null` both leave the dimension empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default, deserialize_with = "null_as_default")]
    pub query: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    /// Trimmed free-text query, `None` when blank
    pub fn text(&self) -> Option<&str> {
        non_blank(&self.query)
    }

    /// Trimmed location, `None` when blank
    pub fn place(&self) -> Option<&str> {
        non_blank(&self.location)
    }

    /// Non-blank skill terms, trimmed
    pub fn skill_terms(&self) -> Vec<String> {
        self.skills
            .iter()
            .filter_map(|s| non_blank(s))
            .map(str::to_string)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_none() && self.place().is_none() && self.skill_terms().is_empty()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Search result / 搜索结果
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub jobs: Vec<Job>,
    pub total: usize,
}
