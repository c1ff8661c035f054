use cams_query::{Schema, document_fields};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Transfer,
    Consolidation,
}

/// Case details embedded in orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSummary {
    pub case_id: String,
    pub case_title: String,
    pub chapter: String,
    pub court_division_code: String,
    pub court_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_filed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,
}

/// A docketed order transferring a case between court divisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub case_id: String,
    pub order_type: OrderType,
    /// ISO-8601 date the order was docketed.
    pub order_date: String,
    pub status: OrderStatus,
    pub court_division_code: String,
    pub court_name: String,
    pub case_title: String,
    pub chapter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docket_suggested_case_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_case: Option<CaseSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

document_fields! {
    /// Stored attributes of [`TransferOrder`].
    pub enum TransferOrderField {
        Id => "id",
        CaseId => "caseId",
        OrderType => "orderType",
        OrderDate => "orderDate",
        Status => "status",
        CourtDivisionCode => "courtDivisionCode",
        CourtName => "courtName",
        CaseTitle => "caseTitle",
        Chapter => "chapter",
        DocketSuggestedCaseNumber => "docketSuggestedCaseNumber",
        NewCase => "newCase",
        Reason => "reason",
    }
}

impl Schema for TransferOrder {
    type Field = TransferOrderField;
}

/// A reviewer's decision on a transfer order.
///
/// `id`, `order_type` and `case_id` identify the order and are never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferOrderAction {
    pub id: String,
    pub case_id: String,
    pub order_type: OrderType,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_case: Option<CaseSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
