use crate::types::RawProduct;
use serde_json::Value;
use std::fmt;

/// `field equals value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub field: String,
    pub value: String,
}

impl FilterClause {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True when the record holds the value in the field, either as the whole
    /// string or as one element of a list.
    pub fn matches(&self, raw: &RawProduct) -> bool {
        match raw.get(&self.field) {
            Some(Value::String(s)) => *s == self.value,
            Some(Value::Array(items)) => items.iter().any(|v| v.as_str() == Some(self.value.as_str())),
            _ => false,
        }
    }
}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "='{}':'{}'", escape(&self.field), escape(&self.value))
    }
}

/// Union of equality clauses. The product API reads back-to-back clauses as OR,
/// so rendering concatenates them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    clauses: Vec<FilterClause>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn or(mut self, clause: FilterClause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// One clause per (field, identifier) pair, fields in the outer loop.
    pub fn any_field_matches<F, I>(fields: F, ids: I) -> Self
    where
        F: IntoIterator,
        F::Item: AsRef<str>,
        I: IntoIterator + Clone,
        I::Item: AsRef<str>,
    {
        fields.into_iter().fold(Self::new(), |filter, field| {
            ids.clone()
                .into_iter()
                .fold(filter, |filter, id| filter.or(FilterClause::new(field.as_ref(), id.as_ref())))
        })
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, raw: &RawProduct) -> bool {
        self.clauses.iter().any(|clause| clause.matches(raw))
    }
}

impl fmt::Display for ProductFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for clause in &self.clauses {
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
