#![allow(clippy::unwrap_used, clippy::expect_used)]

use cams_query::{
    Condition, ConditionKind, ConditionOrConjunction, Conjunction, ConjunctionKind, DocumentField,
    Operand, SortDirection, Value, and, document_fields, not, or, order_by, using,
};
use serde_json::json;

document_fields! {
    enum OrderField {
        Id => "id",
        CaseId => "caseId",
        ConsolidationId => "consolidationId",
        CourtDivisionCode => "courtDivisionCode",
        OrderDate => "orderDate",
        Status => "status",
        DocketSuggestedCaseNumber => "docketSuggestedCaseNumber",
    }
}

#[test]
fn field_names_resolve_both_ways() {
    assert_eq!(OrderField::CourtDivisionCode.name(), "courtDivisionCode");
    assert_eq!(OrderField::from_name("orderDate"), Some(OrderField::OrderDate));
    assert_eq!(OrderField::from_name("OrderDate"), None);
    assert_eq!(OrderField::FIELDS.len(), 7);
}

#[test]
fn consolidation_search_builds_expected_tree() {
    let doc = using::<OrderField>();
    let query: ConditionOrConjunction<OrderField> = and([
        doc(OrderField::CourtDivisionCode).contains(["081"]),
        doc(OrderField::ConsolidationId).equals("X"),
    ])
    .unwrap()
    .into();

    assert_eq!(
        serde_json::to_value(&query).unwrap(),
        json!({
            "conjunction": "AND",
            "values": [
                {
                    "condition": "CONTAINS",
                    "leftOperand": { "name": "courtDivisionCode" },
                    "rightOperand": ["081"]
                },
                {
                    "condition": "EQUALS",
                    "leftOperand": { "name": "consolidationId" },
                    "rightOperand": "X"
                }
            ]
        })
    );
}

#[test]
fn conjunction_preserves_input_order() {
    let doc = using::<OrderField>();
    let preds = vec![
        doc(OrderField::Status).equals("pending"),
        doc(OrderField::CaseId).not_equal("081-24-00001"),
        doc(OrderField::OrderDate).greater_than_or_equal("2024-01-01"),
    ];
    let conj = or(preds.clone()).unwrap();

    assert_eq!(conj.kind(), ConjunctionKind::Or);
    let got: Vec<_> = conj
        .values()
        .iter()
        .map(|v| match v {
            ConditionOrConjunction::Condition(c) => c.clone(),
            ConditionOrConjunction::Conjunction(_) => panic!("unexpected conjunction"),
        })
        .collect();
    assert_eq!(got, preds);
}

#[test]
fn nested_tree_survives_serde_round_trip() {
    let doc = using::<OrderField>();
    let inner = or([
        doc(OrderField::Status).equals("approved"),
        doc(OrderField::Status).equals("rejected"),
    ])
    .unwrap();
    let query: ConditionOrConjunction<OrderField> = and::<OrderField, Vec<ConditionOrConjunction<_>>>(vec![
        inner.into(),
        not(doc(OrderField::DocketSuggestedCaseNumber).exists()).into(),
        doc(OrderField::CaseId).regex("^081-").into(),
        doc(OrderField::OrderDate).less_than(20_240_101_i64).into(),
        doc(OrderField::Id).equals_field(OrderField::CaseId).into(),
        doc(OrderField::CourtDivisionCode).not_contains(["091", "092"]).into(),
        doc(OrderField::OrderDate).less_than_or_equal(1.5).into(),
        doc(OrderField::Status).equals(true).into(),
    ])
    .unwrap()
    .into();

    let json = serde_json::to_string(&query).unwrap();
    let back: ConditionOrConjunction<OrderField> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, query);
}

#[test]
fn empty_conjunction_is_rejected_on_deserialize() {
    for kind in ["AND", "OR", "NOT"] {
        let json = format!(r#"{{"conjunction":"{kind}","values":[]}}"#);
        assert!(serde_json::from_str::<ConditionOrConjunction<OrderField>>(&json).is_err());
        assert!(serde_json::from_str::<Conjunction<OrderField>>(&json).is_err());
    }

    let json = r#"{"conjunction":"AND","values":[]}"#;
    let err = serde_json::from_str::<Conjunction<OrderField>>(json).unwrap_err();
    assert!(err.to_string().contains("AND conjunction requires at least one predicate"));

    let nested = r#"{"conjunction":"OR","values":[{"conjunction":"AND","values":[]}]}"#;
    assert!(serde_json::from_str::<ConditionOrConjunction<OrderField>>(nested).is_err());
}

#[test]
fn non_empty_conjunction_deserializes() {
    let json = r#"{"conjunction":"NOT","values":[{"condition":"EXISTS","leftOperand":{"name":"status"}}]}"#;
    let conj: Conjunction<OrderField> = serde_json::from_str(json).unwrap();
    assert_eq!(conj.kind(), ConjunctionKind::Not);
    assert!(conj.values()[0].is_condition());
}

#[test]
fn field_comparison_serializes_as_field_operand() {
    let doc = using::<OrderField>();
    let cond = doc(OrderField::Id).compare_field(ConditionKind::NotEqual, OrderField::CaseId);
    assert_eq!(
        serde_json::to_value(&cond).unwrap(),
        json!({
            "condition": "NOT_EQUAL",
            "leftOperand": { "name": "id" },
            "rightOperand": { "name": "caseId" }
        })
    );
}

#[test]
fn exists_omits_right_operand() {
    let doc = using::<OrderField>();
    let json = serde_json::to_value(doc(OrderField::Status).exists()).unwrap();
    assert_eq!(
        json,
        json!({ "condition": "EXISTS", "leftOperand": { "name": "status" } })
    );
}

#[test]
fn unknown_field_is_rejected_on_deserialize() {
    let json = r#"{"condition":"EQUALS","leftOperand":{"name":"nope"},"rightOperand":1}"#;
    assert!(serde_json::from_str::<Condition<OrderField>>(json).is_err());
}

#[test]
fn deserialized_operand_kinds() {
    let json = r#"{"condition":"CONTAINS","leftOperand":{"name":"status"},"rightOperand":["a",2]}"#;
    let cond: Condition<OrderField> = serde_json::from_str(json).unwrap();
    assert_eq!(
        cond.right_operand,
        Some(Operand::Values(vec![Value::from("a"), Value::Int(2)]))
    );
}

#[test]
fn sort_spec_serializes_in_order() {
    let sort = order_by([
        (OrderField::OrderDate, SortDirection::Ascending),
        (OrderField::CaseId, SortDirection::Descending),
    ]);
    assert_eq!(
        serde_json::to_value(&sort).unwrap(),
        json!({
            "attributes": [
                { "field": { "name": "orderDate" }, "direction": "ASCENDING" },
                { "field": { "name": "caseId" }, "direction": "DESCENDING" }
            ]
        })
    );
}
