use serde::{Deserialize, Serialize};

use super::enums::WaitTime;

/// Urgent-care unit (UPA) as persisted in the clinic collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clinic {
    pub id: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub specialties: Vec<String>,
    pub waiting_time: WaitTime,
}

impl Clinic {
    pub fn offers(&self, specialty: &str) -> bool {
        self.specialties.iter().any(|s| s == specialty)
    }
}
