//! Shared types for the API layer.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::core_state::CoreState;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }

    /// Calendar date used for "today or later" checks.
    pub fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}
