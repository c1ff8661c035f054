use serde::{Deserialize, Serialize};

/// Reference to a CAMS user as stored on audited records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CamsUserReference {
    pub id: String,
    pub name: String,
}

impl CamsUserReference {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
