use cams_query::{
    Condition, ConditionKind, ConditionOrConjunction, Conjunction, ConjunctionKind,
    DocumentField, Operand, SortDirection, SortSpec, Value,
};
use mongodb::bson::{Bson, Document, doc};

/// Native BSON form of a scalar operand.
#[must_use]
pub fn to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Int(i) => Bson::Int64(*i),
        Value::Float(f) => Bson::Double(*f),
        Value::String(s) => Bson::String(s.clone()),
    }
}

pub(super) const fn operator(kind: ConditionKind) -> &'static str {
    match kind {
        ConditionKind::Equals => "$eq",
        ConditionKind::NotEqual => "$ne",
        ConditionKind::GreaterThan => "$gt",
        ConditionKind::GreaterThanOrEqual => "$gte",
        ConditionKind::LessThan => "$lt",
        ConditionKind::LessThanOrEqual => "$lte",
        ConditionKind::Contains => "$in",
        ConditionKind::NotContains => "$nin",
        ConditionKind::Regex => "$regex",
        ConditionKind::Exists | ConditionKind::NotExists => "$exists",
    }
}

fn operand_to_bson<F: DocumentField>(operand: Option<&Operand<F>>) -> Bson {
    match operand {
        None => Bson::Null,
        Some(Operand::Value(v)) => to_bson(v),
        Some(Operand::Values(vs)) => Bson::Array(vs.iter().map(to_bson).collect()),
        Some(Operand::Field(f)) => Bson::String(format!("${}", f.name())),
    }
}

/// Condition comparing two fields of the same document, expressed with `$expr`.
fn render_field_comparison(kind: ConditionKind, left: &str, right: &str) -> Document {
    let left = format!("${left}");
    let right = format!("${right}");
    let expr = match kind {
        ConditionKind::Regex => doc! { "$regexMatch": { "input": left, "regex": right } },
        ConditionKind::NotContains => doc! { "$not": [{ "$in": [left, right] }] },
        other => doc! { operator(other): [left, right] },
    };
    doc! { "$expr": expr }
}

fn render_exists(kind: ConditionKind, field: &str) -> Document {
    doc! { field: { "$exists": kind == ConditionKind::Exists } }
}

fn render_condition<F: DocumentField>(condition: &Condition<F>) -> Document {
    let field = condition.left_operand.name();
    match (condition.condition, condition.right_operand.as_ref()) {
        (kind @ (ConditionKind::Exists | ConditionKind::NotExists), _) => {
            render_exists(kind, field)
        }
        (kind, Some(Operand::Field(other))) => render_field_comparison(kind, field, other.name()),
        (kind, operand) => {
            let value = match (kind, operand) {
                // `$in`/`$nin` always take an array
                (
                    ConditionKind::Contains | ConditionKind::NotContains,
                    Some(Operand::Value(v)),
                ) => Bson::Array(vec![to_bson(v)]),
                _ => operand_to_bson(operand),
            };
            doc! { field: { operator(kind): value } }
        }
    }
}

fn render_conjunction<F: DocumentField>(conjunction: &Conjunction<F>) -> Document {
    let op = match conjunction.kind() {
        ConjunctionKind::And => "$and",
        ConjunctionKind::Or => "$or",
        ConjunctionKind::Not => "$nor",
    };
    let values: Vec<Bson> = conjunction
        .values()
        .iter()
        .map(|v| Bson::Document(to_mongo_query(v)))
        .collect();
    doc! { op: values }
}

/// Render a predicate tree as a MongoDB filter document.
#[must_use]
pub fn to_mongo_query<F: DocumentField>(query: &ConditionOrConjunction<F>) -> Document {
    match query {
        ConditionOrConjunction::Condition(c) => render_condition(c),
        ConditionOrConjunction::Conjunction(c) => render_conjunction(c),
    }
}

/// Render a sort specification as a MongoDB sort document, keeping key order.
#[must_use]
pub fn to_mongo_sort<F: DocumentField>(sort: &SortSpec<F>) -> Document {
    let mut out = Document::new();
    for attr in sort.iter() {
        let direction = match attr.direction {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        };
        out.insert(attr.field.name(), direction);
    }
    out
}
