use cams_query::{
    Accumulator, AdditionalField, Condition, ConditionKind, ConditionOrConjunction,
    ConjunctionKind, DocumentField, Field, Group, Operand, Pipeline, Stage,
};
use mongodb::bson::{Bson, Document, doc};

use super::query::{operator, to_bson, to_mongo_query, to_mongo_sort};

fn field_path<F: DocumentField>(field: &Field<F>) -> String {
    format!("${}", field.name())
}

fn render_group<F: DocumentField>(group: &Group<F>) -> Document {
    // A single key groups by its value; several keys group by a sub-document.
    let id = match group.group_by.as_slice() {
        [] => Bson::Null,
        [single] => Bson::String(field_path(single)),
        keys => {
            let mut id = Document::new();
            for key in keys {
                id.insert(key.name(), field_path(key));
            }
            Bson::Document(id)
        }
    };
    let mut spec = doc! { "_id": id };
    for acc in &group.accumulators {
        let rendered = match acc {
            Accumulator::First { field, .. } => doc! { "$first": field_path(field) },
            Accumulator::Count { .. } => doc! { "$sum": 1 },
        };
        spec.insert(acc.as_name(), rendered);
    }
    spec
}

fn projection<F: DocumentField>(fields: &[Field<F>], flag: i32) -> Document {
    let mut out = Document::new();
    for f in fields {
        out.insert(f.name(), flag);
    }
    out
}

/// Field of the array element bound by `$filter`.
fn element_path(name: &str) -> String {
    format!("$$this.{name}")
}

/// Aggregation-expression form of a condition over one array element.
fn render_element_condition<F: DocumentField>(condition: &Condition<F>) -> Document {
    let left = element_path(condition.left_operand.name());
    let right = match condition.right_operand.as_ref() {
        None => Bson::Null,
        Some(Operand::Value(v)) => to_bson(v),
        Some(Operand::Values(vs)) => Bson::Array(vs.iter().map(to_bson).collect()),
        Some(Operand::Field(f)) => Bson::String(element_path(f.name())),
    };
    match condition.condition {
        kind @ (ConditionKind::Contains | ConditionKind::NotContains) => {
            // `$in` takes an array expression as its second argument
            let list = match condition.right_operand.as_ref() {
                Some(Operand::Value(v)) => Bson::Array(vec![to_bson(v)]),
                _ => right,
            };
            let within = doc! { "$in": [left, list] };
            if kind == ConditionKind::Contains {
                within
            } else {
                doc! { "$not": [within] }
            }
        }
        ConditionKind::Regex => doc! { "$regexMatch": { "input": left, "regex": right } },
        ConditionKind::Exists => doc! { "$ne": [{ "$type": left }, "missing"] },
        ConditionKind::NotExists => doc! { "$eq": [{ "$type": left }, "missing"] },
        kind => doc! { operator(kind): [left, right] },
    }
}

fn render_element_filter<F: DocumentField>(query: &ConditionOrConjunction<F>) -> Document {
    match query {
        ConditionOrConjunction::Condition(c) => render_element_condition(c),
        ConditionOrConjunction::Conjunction(c) => {
            let values: Vec<Bson> = c
                .values()
                .iter()
                .map(|v| Bson::Document(render_element_filter(v)))
                .collect();
            match c.kind() {
                ConjunctionKind::And => doc! { "$and": values },
                ConjunctionKind::Or => doc! { "$or": values },
                ConjunctionKind::Not => doc! { "$not": [{ "$or": values }] },
            }
        }
    }
}

fn render_add_fields<F: DocumentField>(fields: &[AdditionalField<F>]) -> Document {
    let mut spec = Document::new();
    for field in fields {
        let input = format!("${}", field.query_source);
        let empty: Vec<Bson> = Vec::new();
        spec.insert(
            field.field_to_add.as_str(),
            doc! {
                "$filter": {
                    "input": { "$ifNull": [input, empty] },
                    "cond": render_element_filter(&field.query),
                }
            },
        );
    }
    spec
}

fn render_stage<F: DocumentField>(stage: &Stage<F>) -> Document {
    match stage {
        Stage::Match(query) => doc! { "$match": to_mongo_query(query) },
        Stage::Sort(sort) => doc! { "$sort": to_mongo_sort(sort) },
        Stage::Group(group) => doc! { "$group": render_group(group) },
        Stage::Paginate(p) => {
            let skip = i64::try_from(p.skip).unwrap_or(i64::MAX);
            let limit = i64::try_from(p.limit).unwrap_or(i64::MAX);
            doc! {
                "$facet": {
                    "metadata": [{ "$count": "total" }],
                    "data": [{ "$skip": skip }, { "$limit": limit }],
                }
            }
        }
        Stage::Join(join) => doc! {
            "$lookup": {
                "from": join.source.as_str(),
                "localField": join.local_field.name(),
                "foreignField": join.foreign_field.as_str(),
                "as": join.alias.as_str(),
            }
        },
        Stage::Include(fields) => doc! { "$project": projection(fields, 1) },
        Stage::Exclude(fields) => doc! { "$project": projection(fields, 0) },
        Stage::AddFields(fields) => doc! { "$addFields": render_add_fields(fields) },
    }
}

/// Render a pipeline as MongoDB aggregation stages, one document per stage, in order.
#[must_use]
pub fn to_mongo_aggregate<F: DocumentField>(pipeline: &Pipeline<F>) -> Vec<Document> {
    pipeline.stages().iter().map(render_stage).collect()
}
