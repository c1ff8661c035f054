use cams_query::{Schema, document_fields};
use serde::{Deserialize, Serialize};

use crate::orders::{OrderStatus, OrderType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsolidationType {
    Administrative,
    Substantive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationOrderCase {
    pub case_id: String,
    pub case_title: String,
    pub court_division_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_filed: Option<String>,
}

/// A docketed order joining several cases under a lead case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub consolidation_id: String,
    pub order_type: OrderType,
    pub order_date: String,
    pub status: OrderStatus,
    pub court_division_code: String,
    pub court_name: String,
    /// Identifier of the import job that produced the order.
    pub job_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consolidation_type: Option<ConsolidationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_case: Option<ConsolidationOrderCase>,
    #[serde(default)]
    pub child_cases: Vec<ConsolidationOrderCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

document_fields! {
    /// Stored attributes of [`ConsolidationOrder`].
    pub enum ConsolidationOrderField {
        Id => "id",
        ConsolidationId => "consolidationId",
        OrderType => "orderType",
        OrderDate => "orderDate",
        Status => "status",
        CourtDivisionCode => "courtDivisionCode",
        CourtName => "courtName",
        JobId => "jobId",
        ConsolidationType => "consolidationType",
        LeadCase => "leadCase",
        ChildCases => "childCases",
        Reason => "reason",
    }
}

impl Schema for ConsolidationOrder {
    type Field = ConsolidationOrderField;
}

/// Changes to a consolidation order. Unset attributes keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationOrderUpdate {
    pub consolidation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consolidation_type: Option<ConsolidationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_case: Option<ConsolidationOrderCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_cases: Option<Vec<ConsolidationOrderCase>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Filters for order searches. Unset fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersSearchPredicate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division_codes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consolidation_id: Option<String>,
}
