//! Query builder - turns search criteria into a structured boolean query / 查询构建
//!
//! The query is a small tagged AST that serializes straight into the engine's
//! query DSL. Criteria dimensions combine with AND, sub-clauses inside one
//! dimension combine with OR (at least one must match).

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::borrow::Cow;

use super::schema::{Field, FieldPath};
use crate::models::SearchCriteria;

/// Free-text fields and their weights / 全文字段及权重
const TEXT_FIELDS: [(Field, f32); 3] = [
    (Field::Title, 2.0),
    (Field::Description, 1.0),
    (Field::Company, 1.5),
];

/// Exact fields searched with `*term*` / 子串匹配字段
const CONTAINS_FIELDS: [Field; 3] = [Field::Title, Field::Company, Field::Description];

/// Query AST / 查询语法树
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Every document, unscored
    MatchAll,
    MultiMatch(MultiMatch),
    Match(Match),
    Wildcard(Wildcard),
    Terms(Terms),
    /// All clauses must match (`bool.must`)
    And(Vec<Query>),
    /// At least `minimum_should_match` clauses must match (`bool.should`)
    Or {
        clauses: Vec<Query>,
        minimum_should_match: u32,
    },
}

impl Query {
    pub fn is_match_all(&self) -> bool {
        matches!(self, Query::MatchAll)
    }
}

/// Edit-distance tolerance / 模糊度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Fuzziness {
    /// Scales with term length: 0 edits for 1-2 chars, 1 for 3-5, 2 for 6+
    #[serde(rename = "AUTO")]
    Auto,
}

impl Fuzziness {
    /// Maximum edits allowed for a term of `len` characters
    pub fn max_edits(&self, len: usize) -> usize {
        match self {
            Fuzziness::Auto => match len {
                0..=2 => 0,
                3..=5 => 1,
                _ => 2,
            },
        }
    }
}

/// Field with a relevance weight, rendered as `name^boost`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostedField {
    pub field: FieldPath,
    pub boost: f32,
}

impl Serialize for BoostedField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.boost == 1.0 {
            serializer.serialize_str(&self.field.path())
        } else {
            serializer.serialize_str(&format!("{}^{}", self.field.path(), self.boost))
        }
    }
}

/// Analyzed match across several weighted fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiMatch {
    pub query: String,
    pub fields: Vec<BoostedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzziness: Option<Fuzziness>,
}

/// Analyzed match on a single field
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub field: FieldPath,
    pub query: String,
    pub fuzziness: Option<Fuzziness>,
}

impl Serialize for Match {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            query: &'a str,
            fuzziness: Fuzziness,
        }

        let mut map = serializer.serialize_map(Some(1))?;
        match self.fuzziness {
            Some(fuzziness) => map.serialize_entry(
                &self.field.path(),
                &Body { query: &self.query, fuzziness },
            )?,
            None => map.serialize_entry(&self.field.path(), &self.query)?,
        }
        map.end()
    }
}

/// Pattern match on an exact field (`*` any run, `?` any char, `\` escape)
#[derive(Debug, Clone, PartialEq)]
pub struct Wildcard {
    pub field: FieldPath,
    pub value: String,
    pub case_insensitive: bool,
}

impl Serialize for Wildcard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            value: &'a str,
            case_insensitive: bool,
        }

        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            &self.field.path(),
            &Body { value: &self.value, case_insensitive: self.case_insensitive },
        )?;
        map.end()
    }
}

/// Exact any-of term filter
#[derive(Debug, Clone, PartialEq)]
pub struct Terms {
    pub field: FieldPath,
    pub values: Vec<String>,
}

impl Serialize for Terms {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field.path(), &self.values)?;
        map.end()
    }
}

#[derive(Serialize)]
struct Empty {}

#[derive(Serialize)]
struct BoolBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    must: Option<&'a [Query]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    should: Option<&'a [Query]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum_should_match: Option<u32>,
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Query::MatchAll => map.serialize_entry("match_all", &Empty {})?,
            Query::MultiMatch(q) => map.serialize_entry("multi_match", q)?,
            Query::Match(q) => map.serialize_entry("match", q)?,
            Query::Wildcard(q) => map.serialize_entry("wildcard", q)?,
            Query::Terms(q) => map.serialize_entry("terms", q)?,
            Query::And(clauses) => map.serialize_entry(
                "bool",
                &BoolBody { must: Some(clauses.as_slice()), should: None, minimum_should_match: None },
            )?,
            Query::Or { clauses, minimum_should_match } => map.serialize_entry(
                "bool",
                &BoolBody {
                    must: None,
                    should: Some(clauses.as_slice()),
                    minimum_should_match: Some(*minimum_should_match),
                },
            )?,
        }
        map.end()
    }
}

/// Builds engine queries from search criteria / 查询构建器
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    escape_wildcards: bool,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self { escape_wildcards: true }
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Escape `*`, `?` and `\` in user input before embedding it in patterns.
    /// When disabled the input is passed through and may act as a pattern.
    pub fn escape_wildcards(mut self, enabled: bool) -> Self {
        self.escape_wildcards = enabled;
        self
    }

    /// Build the query for `criteria`; no criteria at all means match everything / 构建查询
    pub fn build(&self, criteria: &SearchCriteria) -> Query {
        if criteria.is_empty() {
            return Query::MatchAll;
        }

        let mut must = Vec::new();

        if let Some(text) = criteria.text() {
            must.push(self.text_clause(text));
        }

        if let Some(place) = criteria.place() {
            must.push(self.location_clause(place));
        }

        let skills = criteria.skill_terms();
        if !skills.is_empty() {
            must.push(Query::Terms(Terms {
                field: Field::Skills.keyword(),
                values: skills,
            }));
        }

        Query::And(must)
    }

    fn text_clause(&self, text: &str) -> Query {
        let mut clauses = vec![Query::MultiMatch(MultiMatch {
            query: text.to_string(),
            fields: TEXT_FIELDS
                .iter()
                .map(|&(field, boost)| BoostedField { field: field.text(), boost })
                .collect(),
            fuzziness: Some(Fuzziness::Auto),
        })];
        clauses.extend(CONTAINS_FIELDS.iter().map(|&field| self.contains(field, text)));

        Query::Or { clauses, minimum_should_match: 1 }
    }

    fn location_clause(&self, place: &str) -> Query {
        Query::Or {
            clauses: vec![
                Query::Match(Match {
                    field: Field::Location.text(),
                    query: place.to_string(),
                    fuzziness: None,
                }),
                self.contains(Field::Location, place),
            ],
            minimum_should_match: 1,
        }
    }

    fn contains(&self, field: Field, term: &str) -> Query {
        let term: Cow<str> = if self.escape_wildcards {
            Cow::Owned(escape_wildcard(term))
        } else {
            Cow::Borrowed(term)
        };
        Query::Wildcard(Wildcard {
            field: field.keyword(),
            value: format!("*{}*", term),
            case_insensitive: true,
        })
    }
}

/// Escape wildcard metacharacters so they match literally / 转义通配符
pub fn escape_wildcard(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '*' | '?' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
