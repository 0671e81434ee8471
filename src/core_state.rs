//! Shared application state handed to every API handler.
//!
//! Owns the persisted store, the in-memory booking sessions and the triage
//! client. Wrapped in `Arc` at startup.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use uuid::Uuid;

use crate::booking::BookingSessions;
use crate::config::AppConfig;
use crate::db::{self, Store};
use crate::triage::{OllamaTriageClient, TriageClient};

pub struct CoreState {
    store: Store,
    /// Lock order: bookings before store.
    bookings: Mutex<BookingSessions>,
    triage: Arc<dyn TriageClient>,
    pub config: AppConfig,
}

impl CoreState {
    pub fn new(config: AppConfig, store: Store, triage: Arc<dyn TriageClient>) -> Self {
        Self {
            store,
            bookings: Mutex::new(BookingSessions::new(config.session_ttl)),
            triage,
            config,
        }
    }

    /// Open the on-disk store and wire the configured triage service.
    pub fn open(config: AppConfig) -> Result<Self, CoreError> {
        let store = Store::open(&config.store_path)?;
        let triage = Arc::new(OllamaTriageClient::from_config(&config));
        tracing::info!(
            store = %config.store_path.display(),
            triage_url = %config.triage_url,
            triage_model = %config.triage_model,
            "Core state ready"
        );
        Ok(Self::new(config, store, triage))
    }

    /// In-memory store with the given triage client (for testing).
    pub fn in_memory(config: AppConfig, triage: Arc<dyn TriageClient>) -> Result<Self, CoreError> {
        Ok(Self::new(config, Store::open_in_memory()?, triage))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn triage_client(&self) -> Arc<dyn TriageClient> {
        Arc::clone(&self.triage)
    }

    /// Lock the booking sessions, dropping idle ones first.
    pub fn bookings(&self) -> Result<MutexGuard<'_, BookingSessions>, CoreError> {
        let mut guard = self.bookings.lock().map_err(|_| CoreError::LockPoisoned)?;
        guard.evict_expired(Instant::now());
        Ok(guard)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
    #[error("Booking session not found: {0}")]
    SessionNotFound(Uuid),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::MockTriageClient;
    use std::time::Duration;

    fn test_config() -> AppConfig {
        AppConfig::default()
    }

    #[test]
    fn in_memory_state_seeds_clinics() {
        let core = CoreState::in_memory(test_config(), Arc::new(MockTriageClient::failing())).unwrap();
        assert_eq!(core.store().clinics().load_all().unwrap().len(), 6);
    }

    #[test]
    fn open_creates_store_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig {
            store_path: tmp.path().join("nested").join("agenda.db"),
            ..test_config()
        };
        let path = config.store_path.clone();
        let core = CoreState::open(config).unwrap();
        core.store().appointments().load_all().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn bookings_lock_evicts_idle_sessions() {
        let config = AppConfig {
            session_ttl: Duration::ZERO,
            ..test_config()
        };
        let core = CoreState::in_memory(config, Arc::new(MockTriageClient::failing())).unwrap();
        let id = core.bookings().unwrap().create(Instant::now());
        std::thread::sleep(Duration::from_millis(5));
        let mut bookings = core.bookings().unwrap();
        assert!(matches!(
            bookings.get_mut(id, Instant::now()),
            Err(CoreError::SessionNotFound(_))
        ));
    }
}
