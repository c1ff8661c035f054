use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use cams_query::{
    Condition, ConditionKind, ConditionOrConjunction, ConjunctionKind, DocumentField, Operand,
    SortDirection, SortSpec, Value,
};
use regex::Regex;
use serde_json::Value as Json;

/// Value at a dotted `path`, or `None` when any segment is missing.
pub(super) fn lookup<'a>(document: &'a Json, path: &str) -> Option<&'a Json> {
    path.split('.').try_fold(document, |current, segment| current.get(segment))
}

pub(super) fn compare(a: &Json, b: &Json) -> Option<Ordering> {
    match (a, b) {
        (Json::Null, Json::Null) => Some(Ordering::Equal),
        (Json::Number(x), Json::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Json::String(x), Json::String(y)) => Some(x.cmp(y)),
        (Json::Bool(x), Json::Bool(y)) => Some(x.cmp(y)),
        _ if a == b => Some(Ordering::Equal),
        _ => None,
    }
}

fn values_equal(a: &Json, b: &Json) -> bool {
    compare(a, b) == Some(Ordering::Equal)
}

/// The value itself plus, for arrays, each element.
fn candidates(value: &Json) -> Vec<&Json> {
    let mut out = vec![value];
    if let Json::Array(items) = value {
        out.extend(items.iter());
    }
    out
}

fn operand_values<F: DocumentField>(document: &Json, operand: Option<&Operand<F>>) -> Vec<Json> {
    match operand {
        None => Vec::new(),
        Some(Operand::Value(v)) => vec![v.to_json()],
        Some(Operand::Values(vs)) => vs.iter().map(Value::to_json).collect(),
        Some(Operand::Field(f)) => vec![lookup(document, f.name()).cloned().unwrap_or(Json::Null)],
    }
}

fn ordered(field: &Json, target: &Json, accept: fn(Ordering) -> bool) -> bool {
    candidates(field)
        .into_iter()
        .any(|c| compare(c, target).is_some_and(accept))
}

/// A predicate tree with its literal regex patterns compiled up front, so each pattern
/// is built once per query rather than once per document.
pub struct Matcher<'q, F: DocumentField> {
    query: &'q ConditionOrConjunction<F>,
    patterns: HashMap<&'q str, Regex>,
}

fn collect_patterns<'q, F: DocumentField>(
    query: &'q ConditionOrConjunction<F>,
    out: &mut HashMap<&'q str, Regex>,
) -> anyhow::Result<()> {
    match query {
        ConditionOrConjunction::Condition(c) if c.condition == ConditionKind::Regex => {
            match c.right_operand.as_ref() {
                Some(Operand::Value(Value::String(pattern))) => {
                    if let Entry::Vacant(slot) = out.entry(pattern.as_str()) {
                        slot.insert(Regex::new(pattern)?);
                    }
                }
                // resolved per document
                Some(Operand::Field(_)) => {}
                _ => anyhow::bail!("regex operand must be a string"),
            }
        }
        ConditionOrConjunction::Condition(_) => {}
        ConditionOrConjunction::Conjunction(c) => {
            for value in c.values() {
                collect_patterns(value, out)?;
            }
        }
    }
    Ok(())
}

impl<'q, F: DocumentField> Matcher<'q, F> {
    /// # Errors
    ///
    /// Returns an error if a regex condition carries an invalid pattern or a non-string
    /// operand.
    pub fn new(query: &'q ConditionOrConjunction<F>) -> anyhow::Result<Self> {
        let mut patterns = HashMap::new();
        collect_patterns(query, &mut patterns)?;
        Ok(Self { query, patterns })
    }

    /// Evaluate the query against `document`.
    ///
    /// # Errors
    ///
    /// Returns an error if a field-to-field regex reads an invalid pattern from `document`.
    pub fn is_match(&self, document: &Json) -> anyhow::Result<bool> {
        self.eval(document, self.query)
    }

    fn eval(&self, document: &Json, query: &ConditionOrConjunction<F>) -> anyhow::Result<bool> {
        match query {
            ConditionOrConjunction::Condition(c) => self.eval_condition(document, c),
            ConditionOrConjunction::Conjunction(c) => {
                let mut results = c.values().iter().map(|v| self.eval(document, v));
                match c.kind() {
                    ConjunctionKind::And => results.try_fold(true, |acc, r| r.map(|m| acc && m)),
                    ConjunctionKind::Or => results.try_fold(false, |acc, r| r.map(|m| acc || m)),
                    ConjunctionKind::Not => results.try_fold(true, |acc, r| r.map(|m| acc && !m)),
                }
            }
        }
    }

    fn regex_for(
        &self,
        condition: &Condition<F>,
        target: &Json,
    ) -> anyhow::Result<Cow<'_, Regex>> {
        let compiled = match condition.right_operand.as_ref() {
            Some(Operand::Value(Value::String(pattern))) => self.patterns.get(pattern.as_str()),
            _ => None,
        };
        if let Some(re) = compiled {
            return Ok(Cow::Borrowed(re));
        }
        let Some(pattern) = target.as_str() else {
            anyhow::bail!("regex operand must be a string");
        };
        Ok(Cow::Owned(Regex::new(pattern)?))
    }

    fn eval_condition(&self, document: &Json, condition: &Condition<F>) -> anyhow::Result<bool> {
        let field = lookup(document, condition.left_operand.name());
        let operands = operand_values(document, condition.right_operand.as_ref());
        let missing = Json::Null;
        let value = field.unwrap_or(&missing);
        let target = operands.first().unwrap_or(&missing);

        let equals = |target: &Json| candidates(value).into_iter().any(|c| values_equal(c, target));
        let contains = || operands.iter().any(|o| candidates(o).into_iter().any(&equals));

        Ok(match condition.condition {
            ConditionKind::Equals => equals(target),
            ConditionKind::NotEqual => !equals(target),
            ConditionKind::GreaterThan => {
                field.is_some_and(|v| ordered(v, target, Ordering::is_gt))
            }
            ConditionKind::GreaterThanOrEqual => {
                field.is_some_and(|v| ordered(v, target, Ordering::is_ge))
            }
            ConditionKind::LessThan => field.is_some_and(|v| ordered(v, target, Ordering::is_lt)),
            ConditionKind::LessThanOrEqual => {
                field.is_some_and(|v| ordered(v, target, Ordering::is_le))
            }
            ConditionKind::Contains => contains(),
            ConditionKind::NotContains => !contains(),
            ConditionKind::Regex => {
                let re = self.regex_for(condition, target)?;
                candidates(value)
                    .into_iter()
                    .filter_map(Json::as_str)
                    .any(|s| re.is_match(s))
            }
            ConditionKind::Exists => field.is_some(),
            ConditionKind::NotExists => field.is_none(),
        })
    }
}

/// Evaluate `query` against a single `document`. Use [`Matcher`] when the same query is
/// checked against many documents.
///
/// # Errors
///
/// Returns an error if a regex condition carries an invalid pattern.
pub fn matches<F: DocumentField>(
    document: &Json,
    query: &ConditionOrConjunction<F>,
) -> anyhow::Result<bool> {
    Matcher::new(query)?.is_match(document)
}

fn sort_key_cmp(a: Option<&Json>, b: Option<&Json>) -> Ordering {
    match (a, b) {
        (None | Some(Json::Null), None | Some(Json::Null)) => Ordering::Equal,
        (None | Some(Json::Null), _) => Ordering::Less,
        (_, None | Some(Json::Null)) => Ordering::Greater,
        (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
    }
}

/// Stable sort of `documents` by `sort`.
pub(super) fn sort_documents<F: DocumentField>(documents: &mut [Json], sort: &SortSpec<F>) {
    documents.sort_by(|a, b| {
        sort.iter()
            .map(|attr| {
                let name = attr.field.name();
                let ord = sort_key_cmp(lookup(a, name), lookup(b, name));
                match attr.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}
