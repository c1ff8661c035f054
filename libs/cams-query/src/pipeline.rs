//! Aggregation pipeline DSL.
//!
//! A [`Pipeline`] is an ordered list of [`Stage`]s executed in the order given.
//! Builders never reorder or merge stages.

use serde::{Deserialize, Serialize};

use crate::builder::{SortDirection, SortField, SortSpec};
use crate::condition::ConditionOrConjunction;
use crate::field::{DocumentField, Field};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "accumulator",
    rename_all = "SCREAMING_SNAKE_CASE",
    bound(serialize = "F: DocumentField", deserialize = "F: DocumentField")
)]
pub enum Accumulator<F: DocumentField> {
    /// First value of `field` within each group, exposed as `as`.
    First {
        field: Field<F>,
        #[serde(rename = "as")]
        as_name: String,
    },
    /// Number of documents in each group, exposed as `as`.
    Count {
        #[serde(rename = "as")]
        as_name: String,
    },
}

impl<F: DocumentField> Accumulator<F> {
    #[must_use]
    pub fn as_name(&self) -> &str {
        match self {
            Self::First { as_name, .. } | Self::Count { as_name } => as_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(serialize = "F: DocumentField", deserialize = "F: DocumentField")
)]
pub struct Group<F: DocumentField> {
    pub group_by: Vec<Field<F>>,
    pub accumulators: Vec<Accumulator<F>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginate {
    pub skip: u64,
    pub limit: u64,
}

/// Lookup of documents from another collection.
///
/// `foreign_field` names a field of `source`, so it is not typed by this record's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(serialize = "F: DocumentField", deserialize = "F: DocumentField")
)]
pub struct Join<F: DocumentField> {
    pub source: String,
    pub local_field: Field<F>,
    pub foreign_field: String,
    pub alias: String,
}

/// Array field derived by filtering another array field of the same document.
///
/// `query` is evaluated against each element of `query_source`, so its field names are
/// read from the element rather than the enclosing document; element fields are declared
/// in the record's field enum alongside its own. A missing or `null` source yields an
/// empty array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(serialize = "F: DocumentField", deserialize = "F: DocumentField")
)]
pub struct AdditionalField<F: DocumentField> {
    pub field_to_add: String,
    pub query_source: String,
    pub query: ConditionOrConjunction<F>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "stage",
    content = "spec",
    rename_all = "SCREAMING_SNAKE_CASE",
    bound(serialize = "F: DocumentField", deserialize = "F: DocumentField")
)]
pub enum Stage<F: DocumentField> {
    Match(ConditionOrConjunction<F>),
    Sort(SortSpec<F>),
    Group(Group<F>),
    Paginate(Paginate),
    Join(Join<F>),
    Include(Vec<Field<F>>),
    Exclude(Vec<Field<F>>),
    /// Every field is computed from the document as it entered the stage.
    AddFields(Vec<AdditionalField<F>>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    transparent,
    bound(serialize = "F: DocumentField", deserialize = "F: DocumentField")
)]
pub struct Pipeline<F: DocumentField> {
    stages: Vec<Stage<F>>,
}

impl<F: DocumentField> Pipeline<F> {
    #[must_use]
    pub fn stages(&self) -> &[Stage<F>] {
        &self.stages
    }

    #[must_use]
    pub fn into_stages(self) -> Vec<Stage<F>> {
        self.stages
    }

    /// Append a stage after the existing ones.
    #[must_use]
    pub fn then(mut self, stage: Stage<F>) -> Self {
        self.stages.push(stage);
        self
    }

    #[must_use]
    pub fn is_paginated(&self) -> bool {
        matches!(self.stages.last(), Some(Stage::Paginate(_)))
    }
}

#[must_use]
pub fn pipeline<F: DocumentField>(stages: impl IntoIterator<Item = Stage<F>>) -> Pipeline<F> {
    Pipeline {
        stages: stages.into_iter().collect(),
    }
}

#[must_use]
pub fn match_stage<F: DocumentField>(predicate: impl Into<ConditionOrConjunction<F>>) -> Stage<F> {
    Stage::Match(predicate.into())
}

#[must_use]
pub fn sort<F: DocumentField>(fields: impl IntoIterator<Item = SortField<F>>) -> Stage<F> {
    Stage::Sort(SortSpec {
        attributes: fields.into_iter().collect(),
    })
}

#[must_use]
pub fn ascending<F: DocumentField>(field: F) -> SortField<F> {
    SortField {
        field: Field(field),
        direction: SortDirection::Ascending,
    }
}

#[must_use]
pub fn descending<F: DocumentField>(field: F) -> SortField<F> {
    SortField {
        field: Field(field),
        direction: SortDirection::Descending,
    }
}

#[must_use]
pub fn group<F: DocumentField>(
    group_by: impl IntoIterator<Item = F>,
    accumulators: impl IntoIterator<Item = Accumulator<F>>,
) -> Stage<F> {
    Stage::Group(Group {
        group_by: group_by.into_iter().map(Field).collect(),
        accumulators: accumulators.into_iter().collect(),
    })
}

#[must_use]
pub fn first<F: DocumentField>(field: F, as_name: impl Into<String>) -> Accumulator<F> {
    Accumulator::First {
        field: Field(field),
        as_name: as_name.into(),
    }
}

#[must_use]
pub fn count<F: DocumentField>(as_name: impl Into<String>) -> Accumulator<F> {
    Accumulator::Count {
        as_name: as_name.into(),
    }
}

/// Skip `skip` documents and return at most `limit`, alongside the total match count.
#[must_use]
pub fn paginate<F: DocumentField>(skip: u64, limit: u64) -> Stage<F> {
    Stage::Paginate(Paginate { skip, limit })
}

#[must_use]
pub fn join<F: DocumentField>(
    source: impl Into<String>,
    local_field: F,
    foreign_field: impl Into<String>,
    alias: impl Into<String>,
) -> Stage<F> {
    Stage::Join(Join {
        source: source.into(),
        local_field: Field(local_field),
        foreign_field: foreign_field.into(),
        alias: alias.into(),
    })
}

/// Keep only `fields`.
#[must_use]
pub fn include<F: DocumentField>(fields: impl IntoIterator<Item = F>) -> Stage<F> {
    Stage::Include(fields.into_iter().map(Field).collect())
}

/// Drop `fields`.
#[must_use]
pub fn exclude<F: DocumentField>(fields: impl IntoIterator<Item = F>) -> Stage<F> {
    Stage::Exclude(fields.into_iter().map(Field).collect())
}

#[must_use]
pub fn additional_field<F: DocumentField>(
    field_to_add: impl Into<String>,
    query_source: impl Into<String>,
    query: impl Into<ConditionOrConjunction<F>>,
) -> AdditionalField<F> {
    AdditionalField {
        field_to_add: field_to_add.into(),
        query_source: query_source.into(),
        query: query.into(),
    }
}

#[must_use]
pub fn add_fields<F: DocumentField>(
    fields: impl IntoIterator<Item = AdditionalField<F>>,
) -> Stage<F> {
    Stage::AddFields(fields.into_iter().collect())
}
