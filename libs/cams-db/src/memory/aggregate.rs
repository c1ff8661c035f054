use cams_query::{
    Accumulator, AdditionalField, DocumentField, Field, Group, Join, Pipeline, Stage,
};
use serde_json::{Map, Value as Json, json};

use super::matcher::{Matcher, lookup, sort_documents};

fn group_key<F: DocumentField>(document: &Json, group_by: &[Field<F>]) -> Json {
    let value_of = |f: &Field<F>| lookup(document, f.name()).cloned().unwrap_or(Json::Null);
    match group_by {
        [] => Json::Null,
        [single] => value_of(single),
        keys => Json::Object(
            keys.iter()
                .map(|k| (k.name().to_owned(), value_of(k)))
                .collect(),
        ),
    }
}

fn run_group<F: DocumentField>(documents: Vec<Json>, group: &Group<F>) -> Vec<Json> {
    let mut groups: Vec<(Json, Vec<Json>)> = Vec::new();
    for document in documents {
        let key = group_key(&document, &group.group_by);
        if let Some((_, members)) = groups.iter_mut().find(|(k, _)| *k == key) {
            members.push(document);
        } else {
            groups.push((key, vec![document]));
        }
    }

    groups
        .into_iter()
        .map(|(key, members)| {
            let mut out = Map::new();
            out.insert("_id".to_owned(), key);
            for acc in &group.accumulators {
                let value = match acc {
                    Accumulator::First { field, .. } => members
                        .first()
                        .and_then(|m| lookup(m, field.name()).cloned())
                        .unwrap_or(Json::Null),
                    Accumulator::Count { .. } => Json::from(members.len()),
                };
                out.insert(acc.as_name().to_owned(), value);
            }
            Json::Object(out)
        })
        .collect()
}

fn run_join<F: DocumentField>(
    mut documents: Vec<Json>,
    join: &Join<F>,
    source: &[Json],
) -> Vec<Json> {
    for document in &mut documents {
        let local = lookup(document, join.local_field.name())
            .cloned()
            .unwrap_or(Json::Null);
        let joined: Vec<Json> = source
            .iter()
            .filter(|s| lookup(s, &join.foreign_field).cloned().unwrap_or(Json::Null) == local)
            .cloned()
            .collect();
        if let Json::Object(map) = document {
            map.insert(join.alias.clone(), Json::Array(joined));
        }
    }
    documents
}

fn project<F: DocumentField>(documents: &mut [Json], fields: &[Field<F>], keep: bool) {
    for document in documents {
        if let Json::Object(map) = document {
            map.retain(|k, _| fields.iter().any(|f| f.name() == k.as_str()) == keep);
        }
    }
}

/// Elements of the array at `source` that satisfy `matcher`.
fn filter_elements<F: DocumentField>(
    document: &Json,
    source: &str,
    matcher: &Matcher<'_, F>,
) -> anyhow::Result<Json> {
    let mut kept = Vec::new();
    match lookup(document, source) {
        None | Some(Json::Null) => {}
        Some(Json::Array(items)) => {
            for item in items {
                if matcher.is_match(item)? {
                    kept.push(item.clone());
                }
            }
        }
        Some(_) => anyhow::bail!("add fields source `{source}` is not an array"),
    }
    Ok(Json::Array(kept))
}

fn run_add_fields<F: DocumentField>(
    mut documents: Vec<Json>,
    fields: &[AdditionalField<F>],
) -> anyhow::Result<Vec<Json>> {
    let matchers = fields
        .iter()
        .map(|f| Matcher::new(&f.query))
        .collect::<anyhow::Result<Vec<_>>>()?;
    for document in &mut documents {
        let mut added = Vec::with_capacity(fields.len());
        for (field, matcher) in fields.iter().zip(&matchers) {
            added.push((
                field.field_to_add.clone(),
                filter_elements(document, &field.query_source, matcher)?,
            ));
        }
        if let Json::Object(map) = document {
            map.extend(added);
        }
    }
    Ok(documents)
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

/// Evaluate `pipeline` over `documents`. `source` resolves the collection named by a
/// join stage.
pub(super) fn run_pipeline<F: DocumentField>(
    mut documents: Vec<Json>,
    pipeline: &Pipeline<F>,
    source: &dyn Fn(&str) -> Vec<Json>,
) -> anyhow::Result<Vec<Json>> {
    for stage in pipeline.stages() {
        documents = match stage {
            Stage::Match(query) => {
                let matcher = Matcher::new(query)?;
                let mut kept = Vec::with_capacity(documents.len());
                for document in documents {
                    if matcher.is_match(&document)? {
                        kept.push(document);
                    }
                }
                kept
            }
            Stage::Sort(sort) => {
                sort_documents(&mut documents, sort);
                documents
            }
            Stage::Group(group) => run_group(documents, group),
            Stage::Paginate(p) => {
                let total = documents.len();
                let data: Vec<Json> = documents
                    .into_iter()
                    .skip(to_usize(p.skip))
                    .take(to_usize(p.limit))
                    .collect();
                // `$count` emits nothing for an empty input
                let metadata = if total == 0 {
                    json!([])
                } else {
                    json!([{ "total": total }])
                };
                vec![json!({ "metadata": metadata, "data": data })]
            }
            Stage::Join(join) => run_join(documents, join, &source(&join.source)),
            Stage::Include(fields) => {
                project(&mut documents, fields, true);
                documents
            }
            Stage::Exclude(fields) => {
                project(&mut documents, fields, false);
                documents
            }
            Stage::AddFields(fields) => run_add_fields(documents, fields)?,
        };
    }
    Ok(documents)
}
