use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: String,
    /// Medical license number (CRM).
    pub crm: String,
    pub specialty: String,
    pub upa_id: String,
    pub active: bool,
}
