//! Predicate and sort builders.
//!
//! `using::<F>()` returns a field selector; each operator on the resulting
//! [`FieldQuery`] yields a leaf [`Condition`]. `and`, `or` and `not` combine leaves
//! into [`Conjunction`] nodes while keeping argument order.

use serde::{Deserialize, Serialize};

use crate::condition::{
    Condition, ConditionKind, ConditionOrConjunction, Conjunction, ConjunctionKind, Operand,
    QueryError,
};
use crate::field::{DocumentField, Field};
use crate::value::Value;

/// Return a field selector for records whose fields are `F`.
///
/// ```rust,ignore
/// let doc = using::<TrusteeNoteField>();
/// let cond = doc(TrusteeNoteField::TrusteeId).equals("trustee-1");
/// ```
#[must_use]
pub fn using<F: DocumentField>() -> fn(F) -> FieldQuery<F> {
    FieldQuery::new
}

/// Operators available on a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldQuery<F: DocumentField> {
    field: F,
}

impl<F: DocumentField> FieldQuery<F> {
    #[must_use]
    pub const fn new(field: F) -> Self {
        Self { field }
    }

    fn scalar(self, kind: ConditionKind, value: impl Into<Value>) -> Condition<F> {
        Condition::new(kind, self.field, Some(Operand::Value(value.into())))
    }

    fn list<I>(self, kind: ConditionKind, values: I) -> Condition<F>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        Condition::new(kind, self.field, Some(Operand::Values(values)))
    }

    #[must_use]
    pub fn equals(self, value: impl Into<Value>) -> Condition<F> {
        self.scalar(ConditionKind::Equals, value)
    }

    #[must_use]
    pub fn not_equal(self, value: impl Into<Value>) -> Condition<F> {
        self.scalar(ConditionKind::NotEqual, value)
    }

    #[must_use]
    pub fn greater_than(self, value: impl Into<Value>) -> Condition<F> {
        self.scalar(ConditionKind::GreaterThan, value)
    }

    #[must_use]
    pub fn greater_than_or_equal(self, value: impl Into<Value>) -> Condition<F> {
        self.scalar(ConditionKind::GreaterThanOrEqual, value)
    }

    #[must_use]
    pub fn less_than(self, value: impl Into<Value>) -> Condition<F> {
        self.scalar(ConditionKind::LessThan, value)
    }

    #[must_use]
    pub fn less_than_or_equal(self, value: impl Into<Value>) -> Condition<F> {
        self.scalar(ConditionKind::LessThanOrEqual, value)
    }

    /// Field value is one of `values`.
    #[must_use]
    pub fn contains<I>(self, values: I) -> Condition<F>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.list(ConditionKind::Contains, values)
    }

    /// Field value is none of `values`.
    #[must_use]
    pub fn not_contains<I>(self, values: I) -> Condition<F>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.list(ConditionKind::NotContains, values)
    }

    /// Field value matches `pattern`. The pattern is used as given; escape literal input
    /// with `regex::escape`.
    #[must_use]
    pub fn regex(self, pattern: impl Into<String>) -> Condition<F> {
        self.scalar(ConditionKind::Regex, pattern.into())
    }

    #[must_use]
    pub fn exists(self) -> Condition<F> {
        Condition::new(ConditionKind::Exists, self.field, None)
    }

    #[must_use]
    pub fn not_exists(self) -> Condition<F> {
        Condition::new(ConditionKind::NotExists, self.field, None)
    }

    /// Compare this field with another field of the same record.
    #[must_use]
    pub fn compare_field(self, kind: ConditionKind, other: F) -> Condition<F> {
        Condition::new(kind, self.field, Some(Operand::Field(Field(other))))
    }

    #[must_use]
    pub fn equals_field(self, other: F) -> Condition<F> {
        self.compare_field(ConditionKind::Equals, other)
    }
}

fn conjunction<F, I>(kind: ConjunctionKind, values: I) -> Result<Conjunction<F>, QueryError>
where
    F: DocumentField,
    I: IntoIterator,
    I::Item: Into<ConditionOrConjunction<F>>,
{
    Conjunction::new(kind, values.into_iter().map(Into::into).collect())
}

/// All of `values` must hold.
///
/// # Errors
///
/// Returns [`QueryError::EmptyConjunction`] when `values` is empty.
pub fn and<F, I>(values: I) -> Result<Conjunction<F>, QueryError>
where
    F: DocumentField,
    I: IntoIterator,
    I::Item: Into<ConditionOrConjunction<F>>,
{
    conjunction(ConjunctionKind::And, values)
}

/// At least one of `values` must hold.
///
/// # Errors
///
/// Returns [`QueryError::EmptyConjunction`] when `values` is empty.
pub fn or<F, I>(values: I) -> Result<Conjunction<F>, QueryError>
where
    F: DocumentField,
    I: IntoIterator,
    I::Item: Into<ConditionOrConjunction<F>>,
{
    conjunction(ConjunctionKind::Or, values)
}

/// `value` must not hold.
#[must_use]
pub fn not<F: DocumentField>(value: impl Into<ConditionOrConjunction<F>>) -> Conjunction<F> {
    Conjunction::negate(value.into())
}

/// `AND` of `values`, or `None` when there is nothing to filter on.
#[must_use]
pub fn all_of<F, I>(values: I) -> Option<ConditionOrConjunction<F>>
where
    F: DocumentField,
    I: IntoIterator,
    I::Item: Into<ConditionOrConjunction<F>>,
{
    and(values).ok().map(Into::into)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "F: DocumentField", deserialize = "F: DocumentField"))]
pub struct SortField<F: DocumentField> {
    pub field: Field<F>,
    pub direction: SortDirection,
}

/// Ordered sort keys; earlier keys take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "F: DocumentField", deserialize = "F: DocumentField"))]
pub struct SortSpec<F: DocumentField> {
    pub attributes: Vec<SortField<F>>,
}

impl<F: DocumentField> SortSpec<F> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortField<F>> {
        self.attributes.iter()
    }
}

/// Build a sort specification from `(field, direction)` pairs in the given order.
#[must_use]
pub fn order_by<F: DocumentField>(
    pairs: impl IntoIterator<Item = (F, SortDirection)>,
) -> SortSpec<F> {
    SortSpec {
        attributes: pairs
            .into_iter()
            .map(|(field, direction)| SortField {
                field: Field(field),
                direction,
            })
            .collect(),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    crate::document_fields! {
        enum NoteField {
            Id => "id",
            TrusteeId => "trusteeId",
            ArchivedOn => "archivedOn",
            UpdatedOn => "updatedOn",
        }
    }

    #[test]
    fn using_yields_leaf_conditions() {
        let doc = using::<NoteField>();
        let c = doc(NoteField::Id).equals("n-1");
        assert_eq!(c.condition, ConditionKind::Equals);
        assert_eq!(c.field(), NoteField::Id);
        assert_eq!(c.right_operand, Some(Operand::Value(Value::from("n-1"))));

        let e = doc(NoteField::ArchivedOn).not_exists();
        assert_eq!(e.condition, ConditionKind::NotExists);
        assert!(e.right_operand.is_none());
    }

    #[test]
    fn and_rejects_empty_input() {
        let err = and(Vec::<Condition<NoteField>>::new()).unwrap_err();
        assert_eq!(err, QueryError::EmptyConjunction(ConjunctionKind::And));
        assert!(or(Vec::<Condition<NoteField>>::new()).is_err());
        assert!(all_of(Vec::<Condition<NoteField>>::new()).is_none());
    }

    #[test]
    fn not_wraps_single_predicate() {
        let doc = using::<NoteField>();
        let n = not(doc(NoteField::Id).equals("x"));
        assert_eq!(n.kind(), ConjunctionKind::Not);
        assert_eq!(n.values().len(), 1);
    }

    #[test]
    fn order_by_keeps_argument_order() {
        let sort = order_by([
            (NoteField::UpdatedOn, SortDirection::Descending),
            (NoteField::Id, SortDirection::Ascending),
        ]);
        let names: Vec<_> = sort.iter().map(|s| s.field.name()).collect();
        assert_eq!(names, ["updatedOn", "id"]);
        assert_eq!(sort.attributes[0].direction, SortDirection::Descending);
    }
}
