use cams_query::{Schema, document_fields};
use serde::{Deserialize, Serialize};

/// A staff member assigned to a case within an office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeAssignee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub case_id: String,
    pub user_id: String,
    pub name: String,
    pub office_code: String,
}

document_fields! {
    pub enum OfficeAssigneeField {
        Id => "id",
        CaseId => "caseId",
        UserId => "userId",
        Name => "name",
        OfficeCode => "officeCode",
    }
}

impl Schema for OfficeAssignee {
    type Field = OfficeAssigneeField;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeAssigneePredicate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl OfficeAssigneePredicate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.office_code.is_none() && self.case_id.is_none() && self.user_id.is_none()
    }
}
