//! Query model: field-equality filters and single-field ordering.

use serde_json::Value;

use crate::document::{Document, Fields};

/// Field-equality filter.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    /// Field name to compare.
    pub field: String,
    /// Value the field must equal.
    pub value: Value,
}

impl Filter {
    /// `field == value`.
    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Check the filter against a field map.
    #[must_use]
    pub fn matches(&self, fields: &Fields) -> bool {
        fields.get(&self.field) == Some(&self.value)
    }
}

/// Sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Single-field ordering for query results.
#[derive(Clone, Debug, PartialEq)]
pub struct Ordering {
    /// Field to sort by.
    pub field: String,
    /// Sort direction.
    pub direction: Direction,
}

impl Ordering {
    /// Ascending order on `field`.
    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }

    /// Descending order on `field`.
    #[must_use]
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }
}

/// A subscription query: a collection plus zero or more filters.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    /// Collection to watch.
    pub collection: String,
    /// All filters must match (conjunction).
    pub filters: Vec<Filter>,
}

impl Query {
    /// Watch every document in a collection.
    #[must_use]
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            filters: Vec::new(),
        }
    }

    /// Add a field-equality filter.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Check whether a document matches this query.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        doc.collection == self.collection && self.filters.iter().all(|f| f.matches(&doc.fields))
    }
}

/// Compare two field maps on an ordering field.
///
/// Documents missing the field sort first in ascending order. JSON values
/// compare numerically when both sides are numbers, lexicographically when
/// both are strings, and are considered equal otherwise.
#[must_use]
pub fn compare_on(ordering: &Ordering, a: &Fields, b: &Fields) -> std::cmp::Ordering {
    let cmp = compare_values(a.get(&ordering.field), b.get(&ordering.field));
    match ordering.direction {
        Direction::Ascending => cmp,
        Direction::Descending => cmp.reverse(),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    use std::cmp::Ordering as O;
    match (a, b) {
        (None, None) => O::Equal,
        (None, Some(_)) => O::Less,
        (Some(_), None) => O::Greater,
        (Some(x), Some(y)) => match (x, y) {
            (Value::Number(m), Value::Number(n)) => m
                .as_f64()
                .partial_cmp(&n.as_f64())
                .unwrap_or(O::Equal),
            (Value::String(s), Value::String(t)) => s.cmp(t),
            _ => O::Equal,
        },
    }
}
