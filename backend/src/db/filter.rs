//! Generic filter building for list endpoints.
//!
//! A [`FilterSet`] is an ordered conjunction of exact-match and LIKE
//! conditions. Both repository backends interpret it the same way: the local
//! repository through [`FilterSet::matches`], Postgres by translating each
//! condition into a JSONB predicate.

use serde_json::{Map, Value};

use super::models::Record;

/// Request parameters after coercion, keyed by field name.
pub type FilterParams = Map<String, Value>;

/// A single filter condition on one record field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `field = value`
    Exact { field: String, value: Value },
    /// `field LIKE pattern` (case-insensitive, `\` escapes)
    Like { field: String, pattern: String },
}

impl Condition {
    pub fn field(&self) -> &str {
        match self {
            Condition::Exact { field, .. } | Condition::Like { field, .. } => field,
        }
    }

    /// Evaluate the condition against a stored record.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Condition::Exact { field, value } => match (record.get(field), value) {
                (Some(stored), Value::Null) => stored.is_null(),
                // A missing key is SQL NULL in JSONB and equals nothing.
                (None, _) => false,
                (Some(stored), expected) => json_eq(stored, expected),
            },
            Condition::Like { field, pattern } => match record.get(field) {
                Some(Value::String(text)) => like_matches(pattern, text),
                Some(Value::Null) | None => false,
                Some(other) => like_matches(pattern, &other.to_string()),
            },
        }
    }
}

/// Numbers compare by value so that `5` and `5.0` match, as in JSONB.
fn json_eq(stored: &Value, expected: &Value) -> bool {
    match (stored, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => stored == expected,
    }
}

/// Ordered conjunction of conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    conditions: Vec<Condition>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exact-match condition.
    pub fn exact(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Exact {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Add a substring condition; `term` is escaped and wrapped in `%`.
    pub fn like(mut self, field: impl Into<String>, term: &str) -> Self {
        self.conditions.push(Condition::Like {
            field: field.into(),
            pattern: like_pattern(term),
        });
        self
    }

    /// Append the conditions of another set.
    pub fn merge(mut self, other: FilterSet) -> Self {
        self.conditions.extend(other.conditions);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// True when every condition holds for the record.
    pub fn matches(&self, record: &Record) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }
}

/// Build exact-match conditions for every key in `keys` present in `params`.
pub fn filtering_hash_for(params: &FilterParams, keys: &[&str]) -> FilterSet {
    keys.iter()
        .filter_map(|key| params.get(*key).map(|value| (*key, value)))
        .fold(FilterSet::new(), |set, (key, value)| {
            set.exact(key, value.clone())
        })
}

/// Build LIKE conditions for every key in `keys` present in `params`.
///
/// Blank terms are skipped; non-string values are matched on their JSON text.
pub fn filtering_like_for(params: &FilterParams, keys: &[&str]) -> FilterSet {
    keys.iter()
        .filter_map(|key| {
            let term = match params.get(*key)? {
                Value::String(s) => s.trim().to_string(),
                Value::Null => return None,
                other => other.to_string(),
            };
            (!term.is_empty()).then_some((*key, term))
        })
        .fold(FilterSet::new(), |set, (key, term)| set.like(key, &term))
}

/// Escape LIKE metacharacters and wrap the term for a substring search.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    AnyRun,
    AnyOne,
    Literal(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        let token = match ch {
            '%' => Token::AnyRun,
            '_' => Token::AnyOne,
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            other => Token::Literal(other),
        };
        tokens.push(token);
    }
    tokens
}

/// Case-insensitive SQL LIKE matching (`%`, `_`, `\` escape).
pub fn like_matches(pattern: &str, text: &str) -> bool {
    let tokens = tokenize(&pattern.to_lowercase());
    let text: Vec<char> = text.to_lowercase().chars().collect();

    // Greedy matcher with single backtrack point on the last `%`.
    let (mut t, mut s) = (0usize, 0usize);
    let mut backtrack: Option<(usize, usize)> = None;
    while s < text.len() {
        match tokens.get(t) {
            Some(Token::AnyRun) => {
                backtrack = Some((t, s));
                t += 1;
            }
            Some(Token::AnyOne) => {
                t += 1;
                s += 1;
            }
            Some(Token::Literal(c)) if *c == text[s] => {
                t += 1;
                s += 1;
            }
            _ => match backtrack {
                Some((bt, bs)) => {
                    t = bt + 1;
                    s = bs + 1;
                    backtrack = Some((bt, bs + 1));
                }
                None => return false,
            },
        }
    }
    tokens[t..].iter().all(|tok| *tok == Token::AnyRun)
}
