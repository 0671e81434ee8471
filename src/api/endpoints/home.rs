//! Static pages: landing copy, reference lists, privacy policy.

use axum::Json;
use serde::Serialize;

use crate::content::{self, HomePage, PrivacyPolicy};
use crate::models::WaitTime;
use crate::reference::{self, Region};

/// `GET /api/home`
pub async fn home() -> Json<HomePage> {
    Json(content::HOME)
}

/// `GET /api/privacy`
pub async fn privacy() -> Json<PrivacyPolicy> {
    Json(content::PRIVACY)
}

#[derive(Serialize)]
pub struct ReferenceResponse {
    pub regions: &'static [Region],
    pub specialties: &'static [&'static str],
    pub time_slots: &'static [&'static str],
    pub wait_times: [WaitTime; 3],
}

/// `GET /api/reference`: vocabularies the front-end renders as choices.
pub async fn reference_data() -> Json<ReferenceResponse> {
    Json(ReferenceResponse {
        regions: reference::REGIONS,
        specialties: reference::SPECIALTIES,
        time_slots: reference::TIME_SLOTS,
        wait_times: [WaitTime::Low, WaitTime::Medium, WaitTime::High],
    })
}
