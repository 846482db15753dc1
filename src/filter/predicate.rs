//! Filter predicates
//!
//! Two kinds exist: a search term matched as a substring against attribute
//! keys and values, and a comparison of one attribute against a typed literal.
//! Comparisons only succeed between values of the same kind; anything else is
//! a non-match rather than an error.

use crate::graph::{AttributeValue, Node, ID_KEY};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Filter construction errors
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Unknown comparison operator: {0}")]
    UnknownOperator(String),
}

/// Comparison operator of a [`Filter::Comparison`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl ComparisonOp {
    pub fn name(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "eq",
            ComparisonOp::Ne => "ne",
            ComparisonOp::Gt => "gt",
            ComparisonOp::Lt => "lt",
            ComparisonOp::Ge => "ge",
            ComparisonOp::Le => "le",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Le => "<=",
        }
    }

    /// Whether `lhs.cmp(rhs) == ordering` satisfies this operator
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            ComparisonOp::Eq => ordering == Ordering::Equal,
            ComparisonOp::Ne => ordering != Ordering::Equal,
            ComparisonOp::Gt => ordering == Ordering::Greater,
            ComparisonOp::Lt => ordering == Ordering::Less,
            ComparisonOp::Ge => ordering != Ordering::Less,
            ComparisonOp::Le => ordering != Ordering::Greater,
        }
    }
}

impl FromStr for ComparisonOp {
    type Err = FilterError;

    /// Accepts both symbols (`>=`) and names (`ge`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "==" | "eq" => Ok(ComparisonOp::Eq),
            "!=" | "ne" => Ok(ComparisonOp::Ne),
            ">" | "gt" => Ok(ComparisonOp::Gt),
            "<" | "lt" => Ok(ComparisonOp::Lt),
            ">=" | "ge" => Ok(ComparisonOp::Ge),
            "<=" | "le" => Ok(ComparisonOp::Le),
            other => Err(FilterError::UnknownOperator(other.to_string())),
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A vertex predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Keeps a vertex if `term` occurs in any attribute key or value
    Search { term: String },
    /// Keeps a vertex if it has `attribute` and `op(attribute, value)` holds
    Comparison {
        attribute: String,
        op: ComparisonOp,
        value: AttributeValue,
    },
}

/// Listing shape of a filter: `{attribute, type, value?}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterDescriptor {
    pub attribute: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<AttributeValue>,
}

impl Filter {
    pub fn search(term: impl Into<String>) -> Self {
        Filter::Search { term: term.into() }
    }

    pub fn comparison(
        attribute: impl Into<String>,
        op: ComparisonOp,
        value: impl Into<AttributeValue>,
    ) -> Self {
        Filter::Comparison {
            attribute: attribute.into(),
            op,
            value: value.into(),
        }
    }

    /// Comparison whose literal is typed from text (see
    /// [`AttributeValue::parse_literal`])
    pub fn parse_comparison(
        attribute: impl Into<String>,
        op: &str,
        literal: &str,
    ) -> Result<Self, FilterError> {
        Ok(Filter::Comparison {
            attribute: attribute.into(),
            op: op.parse()?,
            value: AttributeValue::parse_literal(literal),
        })
    }

    /// Evaluate the predicate against one vertex
    pub fn matches(&self, node: &Node) -> bool {
        match self {
            Filter::Search { term } => {
                if ID_KEY.contains(term.as_str()) || node.id().as_str().contains(term.as_str()) {
                    return true;
                }
                node.attributes().iter().any(|(key, value)| {
                    key.contains(term.as_str()) || value.to_string().contains(term.as_str())
                })
            }
            Filter::Comparison {
                attribute,
                op,
                value,
            } => {
                let id_value;
                let actual = if attribute == ID_KEY {
                    id_value = AttributeValue::Text(node.id().as_str().to_string());
                    Some(&id_value)
                } else {
                    node.get_attribute(attribute)
                };
                actual
                    .and_then(|actual| actual.compare(value))
                    .is_some_and(|ordering| op.holds(ordering))
            }
        }
    }

    pub fn describe(&self) -> FilterDescriptor {
        match self {
            Filter::Search { term } => FilterDescriptor {
                attribute: term.clone(),
                kind: "search",
                value: None,
            },
            Filter::Comparison {
                attribute,
                op,
                value,
            } => FilterDescriptor {
                attribute: attribute.clone(),
                kind: op.name(),
                value: Some(value.clone()),
            },
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Search { term } => write!(f, "search '{}'", term),
            Filter::Comparison {
                attribute,
                op,
                value,
            } => write!(f, "{} {} {}", attribute, op, value),
        }
    }
}
