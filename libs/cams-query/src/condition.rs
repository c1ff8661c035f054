//! Structural predicate tree.
//!
//! Nodes serialize to the camelCase form
//! `{ "condition": "EQUALS", "leftOperand": { "name": "id" }, "rightOperand": "123" }` and
//! `{ "conjunction": "AND", "values": [ ... ] }`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::{DocumentField, Field};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("{0} conjunction requires at least one predicate")]
    EmptyConjunction(ConjunctionKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionKind {
    Equals,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    /// Field value is one of the operand values.
    Contains,
    /// Field value is none of the operand values.
    NotContains,
    Regex,
    Exists,
    NotExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConjunctionKind {
    And,
    Or,
    Not,
}

impl std::fmt::Display for ConjunctionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        })
    }
}

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    untagged,
    bound(serialize = "F: DocumentField", deserialize = "F: DocumentField")
)]
pub enum Operand<F: DocumentField> {
    /// Another field of the same record.
    Field(Field<F>),
    Values(Vec<Value>),
    Value(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(serialize = "F: DocumentField", deserialize = "F: DocumentField")
)]
pub struct Condition<F: DocumentField> {
    pub condition: ConditionKind,
    pub left_operand: Field<F>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_operand: Option<Operand<F>>,
}

impl<F: DocumentField> Condition<F> {
    #[must_use]
    pub fn new(condition: ConditionKind, field: F, right_operand: Option<Operand<F>>) -> Self {
        Self {
            condition,
            left_operand: Field(field),
            right_operand,
        }
    }

    #[must_use]
    pub fn field(&self) -> F {
        self.left_operand.field()
    }
}

/// Logical combination of predicates. `values` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawConjunction<F>",
    bound(serialize = "F: DocumentField", deserialize = "F: DocumentField")
)]
pub struct Conjunction<F: DocumentField> {
    conjunction: ConjunctionKind,
    values: Vec<ConditionOrConjunction<F>>,
}

impl<F: DocumentField> Conjunction<F> {
    /// # Errors
    ///
    /// Returns [`QueryError::EmptyConjunction`] when `values` is empty.
    pub fn new(
        conjunction: ConjunctionKind,
        values: Vec<ConditionOrConjunction<F>>,
    ) -> Result<Self, QueryError> {
        if values.is_empty() {
            return Err(QueryError::EmptyConjunction(conjunction));
        }
        Ok(Self {
            conjunction,
            values,
        })
    }

    /// `NOT` over a single predicate.
    pub(crate) fn negate(value: ConditionOrConjunction<F>) -> Self {
        Self {
            conjunction: ConjunctionKind::Not,
            values: vec![value],
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ConjunctionKind {
        self.conjunction
    }

    #[must_use]
    pub fn values(&self) -> &[ConditionOrConjunction<F>] {
        &self.values
    }
}

/// Wire form of [`Conjunction`] before the non-empty check.
#[derive(Deserialize)]
#[serde(bound(deserialize = "F: DocumentField"))]
struct RawConjunction<F: DocumentField> {
    conjunction: ConjunctionKind,
    values: Vec<ConditionOrConjunction<F>>,
}

impl<F: DocumentField> TryFrom<RawConjunction<F>> for Conjunction<F> {
    type Error = QueryError;

    fn try_from(raw: RawConjunction<F>) -> Result<Self, Self::Error> {
        Self::new(raw.conjunction, raw.values)
    }
}

/// A node of the predicate tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    untagged,
    bound(serialize = "F: DocumentField", deserialize = "F: DocumentField")
)]
pub enum ConditionOrConjunction<F: DocumentField> {
    Condition(Condition<F>),
    Conjunction(Conjunction<F>),
}

impl<F: DocumentField> ConditionOrConjunction<F> {
    #[must_use]
    pub const fn is_condition(&self) -> bool {
        matches!(self, Self::Condition(_))
    }

    #[must_use]
    pub const fn is_conjunction(&self) -> bool {
        matches!(self, Self::Conjunction(_))
    }
}

impl<F: DocumentField> From<Condition<F>> for ConditionOrConjunction<F> {
    fn from(c: Condition<F>) -> Self {
        Self::Condition(c)
    }
}

impl<F: DocumentField> From<Conjunction<F>> for ConditionOrConjunction<F> {
    fn from(c: Conjunction<F>) -> Self {
        Self::Conjunction(c)
    }
}
