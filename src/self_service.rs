//! Citizen self-service: find my appointments by national ID, then cancel,
//! complete, rate or erase them.
//!
//! Every mutation is one `mutate` cycle on the appointment collection and
//! returns the re-derived result set for the same search. Targets must
//! belong to the searched national ID.

use serde::Serialize;

use crate::content;
use crate::db::{DatabaseError, Store};
use crate::models::{Appointment, AppointmentStatus};
use crate::national_id;

pub const MIN_STARS: u8 = 1;
pub const MAX_STARS: u8 = 5;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// Carries the question to put to the citizen.
    #[error("{0}")]
    ConfirmationRequired(&'static str),
    #[error("Enter a national ID to search")]
    EmptyQuery,
    #[error("Appointment not found: {0}")]
    NotFound(String),
    #[error("Cannot {action} an appointment that is {status}")]
    InvalidTransition {
        action: &'static str,
        status: AppointmentStatus,
    },
    #[error("Por favor, selecione uma nota de 1 a 5 estrelas.")]
    InvalidRating,
    #[error("Appointment already rated")]
    AlreadyRated,
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// One lookup result with the actions currently offered for it.
/// Keys follow the stored record's camelCase.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupEntry {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub status_label: &'static str,
    pub can_cancel: bool,
    pub can_complete: bool,
    pub can_rate: bool,
}

impl From<Appointment> for LookupEntry {
    fn from(appointment: Appointment) -> Self {
        Self {
            status_label: appointment.status.display_label(),
            can_cancel: appointment.can_cancel(),
            can_complete: appointment.can_complete(),
            can_rate: appointment.can_rate(),
            appointment,
        }
    }
}

/// Every appointment whose normalized national ID equals the query, in
/// collection order. A query without digits matches nothing.
pub fn lookup(store: &Store, query: &str) -> Result<Vec<Appointment>, LookupError> {
    let all = store.appointments().load_all()?;
    Ok(matching(&all, query))
}

fn matching(all: &[Appointment], query: &str) -> Vec<Appointment> {
    if national_id::normalize(query).is_empty() {
        return Vec::new();
    }
    all.iter().filter(|a| a.belongs_to(query)).cloned().collect()
}

/// Run `apply` on the appointment `id` of the searched person, persist, and
/// return the refreshed result set.
fn mutate_one(
    store: &Store,
    query: &str,
    id: &str,
    apply: impl FnOnce(&mut Appointment) -> Result<(), LookupError>,
) -> Result<Vec<Appointment>, LookupError> {
    store.appointments().mutate(|all| {
        let target = all
            .iter_mut()
            .find(|a| a.id == id && a.belongs_to(query))
            .ok_or_else(|| LookupError::NotFound(id.to_string()))?;
        apply(target)?;
        Ok(matching(all, query))
    })
}

/// Scheduled → canceled. Canceling a canceled appointment changes nothing.
pub fn cancel(
    store: &Store,
    query: &str,
    id: &str,
    confirmed: bool,
) -> Result<Vec<Appointment>, LookupError> {
    if !confirmed {
        return Err(LookupError::ConfirmationRequired(content::CANCEL_PROMPT));
    }
    let result = mutate_one(store, query, id, |a| match a.status {
        AppointmentStatus::Scheduled => {
            a.status = AppointmentStatus::Canceled;
            Ok(())
        }
        AppointmentStatus::Canceled => Ok(()),
        status => Err(LookupError::InvalidTransition {
            action: "cancel",
            status,
        }),
    })?;
    tracing::info!(appointment_id = id, "Appointment canceled");
    Ok(result)
}

/// Scheduled → completed.
pub fn complete(store: &Store, query: &str, id: &str) -> Result<Vec<Appointment>, LookupError> {
    let result = mutate_one(store, query, id, |a| {
        if !a.can_complete() {
            return Err(LookupError::InvalidTransition {
                action: "complete",
                status: a.status,
            });
        }
        a.status = AppointmentStatus::Completed;
        Ok(())
    })?;
    tracing::info!(appointment_id = id, "Appointment completed");
    Ok(result)
}

/// Rate a completed appointment once. A blank comment is dropped.
pub fn rate(
    store: &Store,
    query: &str,
    id: &str,
    stars: u8,
    comment: Option<&str>,
) -> Result<Vec<Appointment>, LookupError> {
    if !(MIN_STARS..=MAX_STARS).contains(&stars) {
        return Err(LookupError::InvalidRating);
    }
    let comment = comment
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    let result = mutate_one(store, query, id, |a| {
        if a.status != AppointmentStatus::Completed {
            return Err(LookupError::InvalidTransition {
                action: "rate",
                status: a.status,
            });
        }
        if a.rating.is_some() {
            return Err(LookupError::AlreadyRated);
        }
        a.rating = Some(stars);
        a.comment = comment;
        Ok(())
    })?;
    tracing::info!(appointment_id = id, stars, "Appointment rated");
    Ok(result)
}

/// Hard-delete every appointment of the searched national ID. Returns the
/// number removed.
pub fn erase_all(store: &Store, query: &str, confirmed: bool) -> Result<usize, LookupError> {
    if !confirmed {
        return Err(LookupError::ConfirmationRequired(content::ERASE_PROMPT));
    }
    if national_id::normalize(query).is_empty() {
        return Err(LookupError::EmptyQuery);
    }
    let removed = store.appointments().mutate(|all| {
        let before = all.len();
        all.retain(|a| !a.belongs_to(query));
        Ok::<_, LookupError>(before - all.len())
    })?;
    tracing::info!(
        national_id = %national_id::redact(query),
        removed,
        "Erased appointments on request"
    );
    Ok(removed)
}
