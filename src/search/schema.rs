//! Index schema definition / 索引字段定义
//!
//! Documents are stored with the engine's dynamic mapping: every string field is
//! analyzed full text and also carries an un-analyzed `.keyword` sub-field.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Indexed job field / 索引字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
    Company,
    Location,
    Skills,
}

impl Field {
    /// Source field name / 源字段名
    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Company => "company",
            Field::Location => "location",
            Field::Skills => "skills",
        }
    }

    /// Analyzed full-text view of the field
    pub fn text(self) -> FieldPath {
        FieldPath { field: self, exact: false }
    }

    /// Un-analyzed `.keyword` view of the field
    pub fn keyword(self) -> FieldPath {
        FieldPath { field: self, exact: true }
    }
}

/// A field as addressed in a query, either analyzed or exact / 查询字段路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath {
    pub field: Field,
    pub exact: bool,
}

impl FieldPath {
    pub fn path(&self) -> String {
        if self.exact {
            format!("{}.keyword", self.field.name())
        } else {
            self.field.name().to_string()
        }
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}

/// Raw engine hit: stored source plus relevance score / 引擎原始命中
#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "_source", default)]
    pub source: Value,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
}

impl RawHit {
    pub fn new(source: Value, score: Option<f64>) -> Self {
        Self { id: None, source, score }
    }
}
