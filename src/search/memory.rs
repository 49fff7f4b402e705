//! In-process search engine / 内存搜索引擎
//!
//! Evaluates the same query AST the Elasticsearch backend ships over the wire:
//! - analyzed matches: lowercase word tokens, AUTO fuzziness via edit distance
//! - multi-field matches: weighted per field, best field wins
//! - wildcard: case-insensitive pattern against the raw field value
//! - terms: exact any-of
//!
//! Writes are visible immediately. Intended for local development and tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use regex::Regex;
use serde_json::Value;

use super::engine::{SearchEngine, SearchRequest};
use super::error::Result;
use super::query::{Fuzziness, Query, Wildcard};
use super::schema::{Field, RawHit};

/// In-memory engine, documents kept in insertion order / 内存引擎
pub struct MemoryEngine {
    documents: RwLock<Vec<(String, Value)>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }

    pub fn document_count(&self) -> usize {
        self.documents.read().len()
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchEngine for MemoryEngine {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn index(&self, id: &str, source: Value) -> Result<()> {
        let mut docs = self.documents.write();
        match docs.iter_mut().find(|(doc_id, _)| doc_id == id) {
            Some(entry) => entry.1 = source,
            None => docs.push((id.to_string(), source)),
        }
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Value>> {
        let docs = self.documents.read();
        Ok(docs
            .iter()
            .find(|(doc_id, _)| doc_id == id)
            .map(|(_, source)| source.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut docs = self.documents.write();
        match docs.iter().position(|(doc_id, _)| doc_id == id) {
            Some(pos) => {
                docs.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawHit>> {
        let docs = self.documents.read();

        // Match-all is unscored and keeps storage order
        if request.query.is_match_all() {
            return Ok(docs
                .iter()
                .take(request.size)
                .map(|(id, source)| RawHit {
                    id: Some(id.clone()),
                    source: source.clone(),
                    score: None,
                })
                .collect());
        }

        let matcher = Matcher::compile(&request.query);
        let mut hits: Vec<RawHit> = docs
            .iter()
            .filter_map(|(id, source)| {
                matcher.score(source).map(|score| RawHit {
                    id: Some(id.clone()),
                    source: source.clone(),
                    score: Some(score),
                })
            })
            .collect();

        // Stable sort: equal scores keep insertion order
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(request.size);

        Ok(hits)
    }
}

/// Query prepared once per search: terms analyzed, wildcard patterns compiled / 预编译查询
enum Matcher<'q> {
    MatchAll,
    Text {
        terms: Vec<String>,
        fields: Vec<(Field, f64)>,
        fuzziness: Option<Fuzziness>,
    },
    /// `None` when the pattern failed to compile; such a clause matches nothing
    Pattern { field: Field, regex: Option<Regex> },
    Exact { field: Field, values: &'q [String] },
    Every(Vec<Matcher<'q>>),
    Any { clauses: Vec<Matcher<'q>>, minimum: usize },
}

impl<'q> Matcher<'q> {
    fn compile(query: &'q Query) -> Self {
        match query {
            Query::MatchAll => Matcher::MatchAll,
            Query::MultiMatch(q) => Matcher::Text {
                terms: analyze(&q.query),
                fields: q
                    .fields
                    .iter()
                    .map(|f| (f.field.field, f64::from(f.boost)))
                    .collect(),
                fuzziness: q.fuzziness,
            },
            Query::Match(q) => Matcher::Text {
                terms: analyze(&q.query),
                fields: vec![(q.field.field, 1.0)],
                fuzziness: q.fuzziness,
            },
            Query::Wildcard(q) => Matcher::Pattern {
                field: q.field.field,
                regex: wildcard_regex(q),
            },
            Query::Terms(q) => Matcher::Exact {
                field: q.field.field,
                values: &q.values,
            },
            Query::And(clauses) => Matcher::Every(clauses.iter().map(Matcher::compile).collect()),
            Query::Or { clauses, minimum_should_match } => Matcher::Any {
                clauses: clauses.iter().map(Matcher::compile).collect(),
                minimum: *minimum_should_match as usize,
            },
        }
    }

    /// Score of `source`, `None` when it does not match / 计算匹配分数
    fn score(&self, source: &Value) -> Option<f64> {
        match self {
            Matcher::MatchAll => Some(1.0),
            // Best field wins, weighted by its boost
            Matcher::Text { terms, fields, fuzziness } => fields
                .iter()
                .filter_map(|&(field, boost)| {
                    text_score(terms, &field_tokens(source, field), *fuzziness).map(|score| score * boost)
                })
                .fold(None, |best: Option<f64>, score| Some(best.map_or(score, |b| b.max(score)))),
            Matcher::Pattern { field, regex } => {
                let regex = regex.as_ref()?;
                field_values(source, *field)
                    .iter()
                    .any(|v| regex.is_match(v))
                    .then_some(1.0)
            }
            Matcher::Exact { field, values } => field_values(source, *field)
                .iter()
                .any(|v| values.contains(v))
                .then_some(1.0),
            Matcher::Every(clauses) => clauses
                .iter()
                .map(|clause| clause.score(source))
                .sum::<Option<f64>>(),
            Matcher::Any { clauses, minimum } => {
                let scores: Vec<f64> = clauses
                    .iter()
                    .filter_map(|clause| clause.score(source))
                    .collect();
                (scores.len() >= *minimum).then(|| scores.iter().sum())
            }
        }
    }
}

/// Fraction of query terms found in `tokens`, `None` when nothing matched
fn text_score(terms: &[String], tokens: &[String], fuzziness: Option<Fuzziness>) -> Option<f64> {
    if terms.is_empty() {
        return None;
    }

    let matched = terms
        .iter()
        .filter(|term| {
            let max_edits = fuzziness.map_or(0, |f| f.max_edits(term.chars().count()));
            tokens.iter().any(|token| fuzzy_match(term, token, max_edits))
        })
        .count();

    (matched > 0).then(|| matched as f64 / terms.len() as f64)
}

/// Raw string values of a field (arrays flattened) / 字段原始值
fn field_values(source: &Value, field: Field) -> Vec<String> {
    match source.get(field.name()) {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn field_tokens(source: &Value, field: Field) -> Vec<String> {
    field_values(source, field)
        .iter()
        .flat_map(|v| analyze(v))
        .collect()
}

/// Lowercase word tokens / 分词
fn analyze(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Translate a wildcard pattern into an anchored regex / 通配符转正则
fn wildcard_regex(q: &Wildcard) -> Option<Regex> {
    let mut pattern = String::from(if q.case_insensitive { "(?is)^" } else { "(?s)^" });
    let mut chars = q.value.chars();
    while let Some(c) = chars.next() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            '\\' => {
                if let Some(next) = chars.next() {
                    pattern.push_str(&regex::escape(&next.to_string()));
                }
            }
            _ => pattern.push_str(&regex::escape(&c.to_string())),
        }
    }
    pattern.push('$');

    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!("Invalid wildcard pattern {:?}: {}", q.value, e);
            None
        }
    }
}

/// Edit-distance match / 编辑距离模糊匹配
fn fuzzy_match(s1: &str, s2: &str, max_distance: usize) -> bool {
    if s1 == s2 {
        return true;
    }
    if max_distance == 0 {
        return false;
    }

    let len1 = s1.chars().count();
    let len2 = s2.chars().count();
    if len1.abs_diff(len2) > max_distance {
        return false;
    }

    edit_distance(s1, s2) <= max_distance
}

/// Edit distance where swapping two adjacent characters counts as one edit
/// (optimal string alignment) / 编辑距离（相邻字符交换计为一次编辑）
fn edit_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    if s1_chars.is_empty() {
        return s2_chars.len();
    }
    if s2_chars.is_empty() {
        return s1_chars.len();
    }

    // Rows i-2, i-1 and i of the DP table
    let mut before: Vec<usize> = vec![0; s2_chars.len() + 1];
    let mut prev: Vec<usize> = (0..=s2_chars.len()).collect();
    let mut curr = vec![0usize; s2_chars.len() + 1];

    for (i, c1) in s1_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, c2) in s2_chars.iter().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            let mut best = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
            if i > 0 && j > 0 && *c1 == s2_chars[j - 1] && s1_chars[i - 1] == *c2 {
                best = best.min(before[j - 1] + 1);
            }
            curr[j + 1] = best;
        }
        std::mem::swap(&mut before, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[s2_chars.len()]
}
