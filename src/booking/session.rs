//! In-memory booking sessions, keyed by a random id.
//!
//! Nothing here is persisted: an evicted or abandoned session loses every
//! selection made so far.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use uuid::Uuid;

use super::wizard::WizardState;
use crate::core_state::CoreError;
use crate::triage::TriageSlot;

pub struct BookingSession {
    pub state: WizardState,
    pub triage: TriageSlot,
    last_touched: Instant,
}

impl BookingSession {
    fn new(now: Instant) -> Self {
        Self {
            state: WizardState::new(),
            triage: TriageSlot::default(),
            last_touched: now,
        }
    }
}

pub struct BookingSessions {
    sessions: HashMap<Uuid, BookingSession>,
    ttl: Duration,
}

impl BookingSessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
        }
    }

    pub fn create(&mut self, now: Instant) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(id, BookingSession::new(now));
        id
    }

    /// Borrow a live session and mark it as used.
    pub fn get_mut(&mut self, id: Uuid, now: Instant) -> Result<&mut BookingSession, CoreError> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(CoreError::SessionNotFound(id))?;
        session.last_touched = now;
        Ok(session)
    }

    pub fn remove(&mut self, id: Uuid) -> Result<(), CoreError> {
        self.sessions
            .remove(&id)
            .map(|_| ())
            .ok_or(CoreError::SessionNotFound(id))
    }

    /// Drop sessions idle for longer than the TTL. Returns how many went.
    pub fn evict_expired(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, s| now.saturating_duration_since(s.last_touched) <= ttl);
        let evicted = before - self.sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted idle booking sessions");
        }
        evicted
    }

    /// Open sessions, reported by the health check.
    pub(crate) fn len(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_get() {
        let mut sessions = BookingSessions::new(Duration::from_secs(60));
        let now = Instant::now();
        let id = sessions.create(now);
        assert!(sessions.get_mut(id, now).is_ok());
        assert!(matches!(
            sessions.get_mut(Uuid::new_v4(), now),
            Err(CoreError::SessionNotFound(_))
        ));
    }

    #[test]
    fn idle_sessions_expire() {
        let mut sessions = BookingSessions::new(Duration::from_secs(60));
        let start = Instant::now();
        let stale = sessions.create(start);
        let fresh = sessions.create(start);

        sessions.get_mut(fresh, start + Duration::from_secs(50)).unwrap();
        let evicted = sessions.evict_expired(start + Duration::from_secs(90));
        assert_eq!(evicted, 1);
        assert!(sessions.get_mut(stale, start).is_err());
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn remove_discards_session() {
        let mut sessions = BookingSessions::new(Duration::from_secs(60));
        let id = sessions.create(Instant::now());
        sessions.remove(id).unwrap();
        assert_eq!(sessions.len(), 0);
        assert!(sessions.remove(id).is_err());
    }
}
