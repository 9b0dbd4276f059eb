//! Column filter terms.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, RawValue};

/// A literal a column value is compared against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterLiteral {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FilterLiteral {
    /// Literal equality against the cell's raw value, falling back to its
    /// display text when the kinds differ.
    pub fn matches(&self, cell: &Cell) -> bool {
        match (self, &cell.value) {
            (Self::Bool(expected), RawValue::Bool(actual)) => expected == actual,
            (Self::Number(expected), RawValue::Number(actual)) => expected == actual,
            (Self::Text(expected), RawValue::Text(actual)) => expected == actual,
            (literal, _) => cell.display_text() == literal.to_string(),
        }
    }
}

impl fmt::Display for FilterLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for FilterLiteral {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for FilterLiteral {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for FilterLiteral {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

type PredicateFn = dyn Fn(&RawValue) -> std::result::Result<bool, String> + Send + Sync;

/// Caller-supplied test on a column's raw value.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&RawValue) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(move |value| Ok(test(value))))
    }

    /// A predicate that can fail; the error message surfaces as an
    /// `InvalidFilter` error.
    pub fn fallible<F>(test: F) -> Self
    where
        F: Fn(&RawValue) -> std::result::Result<bool, String> + Send + Sync + 'static,
    {
        Self(Arc::new(test))
    }

    pub fn evaluate(&self, value: &RawValue) -> std::result::Result<bool, String> {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

/// One entry of a column's filter list.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "FilterLiteral")]
pub enum FilterTerm {
    Literal(FilterLiteral),
    Predicate(Predicate),
}

impl FilterTerm {
    pub fn matches(&self, cell: &Cell) -> std::result::Result<bool, String> {
        match self {
            Self::Literal(literal) => Ok(literal.matches(cell)),
            Self::Predicate(predicate) => predicate.evaluate(&cell.value),
        }
    }
}

impl From<FilterLiteral> for FilterTerm {
    fn from(value: FilterLiteral) -> Self {
        Self::Literal(value)
    }
}

impl From<Predicate> for FilterTerm {
    fn from(value: Predicate) -> Self {
        Self::Predicate(value)
    }
}

/// An active filter on one column. The terms are OR-ed; an empty term list
/// places no constraint on the column.
#[derive(Debug, Clone)]
pub struct ColumnFilter {
    pub column: usize,
    pub terms: Vec<FilterTerm>,
}

impl ColumnFilter {
    pub fn new(column: usize, terms: Vec<FilterTerm>) -> Self {
        Self { column, terms }
    }

    pub fn value(column: usize, literal: impl Into<FilterLiteral>) -> Self {
        Self::new(column, vec![FilterTerm::Literal(literal.into())])
    }

    pub fn any_of<I, L>(column: usize, literals: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<FilterLiteral>,
    {
        Self::new(
            column,
            literals
                .into_iter()
                .map(|literal| FilterTerm::Literal(literal.into()))
                .collect(),
        )
    }

    pub fn predicate<F>(column: usize, test: F) -> Self
    where
        F: Fn(&RawValue) -> bool + Send + Sync + 'static,
    {
        Self::new(column, vec![FilterTerm::Predicate(Predicate::new(test))])
    }

    #[must_use]
    pub fn or(mut self, term: impl Into<FilterTerm>) -> Self {
        self.terms.push(term.into());
        self
    }

    pub fn matches(&self, cell: &Cell) -> std::result::Result<bool, String> {
        if self.terms.is_empty() {
            return Ok(true);
        }
        for term in &self.terms {
            if term.matches(cell)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
