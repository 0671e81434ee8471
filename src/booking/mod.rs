//! Booking wizard service: sessions, step edits, transitions and triage.
//!
//! Only the forward transition out of the patient-info step writes to the
//! store; everything else lives in the session until it is abandoned or
//! evicted.

pub mod session;
pub mod view;
pub mod wizard;

pub use session::*;
pub use view::*;
pub use wizard::*;

use std::time::Instant;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::core_state::{CoreError, CoreState};
use crate::db::DatabaseError;
use crate::models::Clinic;
use crate::national_id;
use crate::receipt::{self, ReceiptError};
use crate::triage::{self, FALLBACK_ADVICE};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error("Describe the symptoms before asking for help")]
    SymptomsRequired,
    #[error("The receipt is only available after confirmation")]
    NotConfirmed,
    #[error("Receipt error: {0}")]
    Receipt(#[from] ReceiptError),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// One edit of the current step's form.
#[derive(Debug, Clone)]
pub enum StepEdit {
    Consent {
        accepted: bool,
    },
    Location {
        region: Option<String>,
        locality: Option<String>,
    },
    Clinic {
        clinic_id: String,
    },
    Slot {
        specialty: Option<String>,
        date: Option<NaiveDate>,
        time: Option<String>,
    },
    Patient(PatientUpdate),
}

fn apply_edit(
    state: &mut WizardState,
    edit: StepEdit,
    clinics: &[Clinic],
    today: NaiveDate,
) -> Result<(), WizardError> {
    match edit {
        StepEdit::Consent { accepted } => state.set_consent(accepted),
        StepEdit::Location { region, locality } => {
            if let Some(region) = region {
                state.select_region(&region)?;
            }
            if let Some(locality) = locality {
                state.select_locality(&locality)?;
            }
            Ok(())
        }
        StepEdit::Clinic { clinic_id } => state.select_clinic(clinics, &clinic_id),
        StepEdit::Slot {
            specialty,
            date,
            time,
        } => {
            if let Some(specialty) = specialty {
                state.select_specialty(&specialty)?;
            }
            if let Some(date) = date {
                state.select_date(date, today)?;
            }
            if let Some(time) = time {
                state.select_time(&time)?;
            }
            Ok(())
        }
        StepEdit::Patient(update) => state.update_patient(update),
    }
}

/// Clinics are needed only while a clinic is being chosen.
fn clinics_for(core: &CoreState, step: BookingStep) -> Result<Vec<Clinic>, BookingError> {
    if step == BookingStep::ClinicSelection {
        Ok(core.store().clinics().load_all()?)
    } else {
        Ok(Vec::new())
    }
}

fn current_step(core: &CoreState, id: Uuid) -> Result<BookingStep, BookingError> {
    let mut bookings = core.bookings()?;
    Ok(bookings.get_mut(id, Instant::now())?.state.step())
}

pub fn start(core: &CoreState, today: NaiveDate) -> Result<WizardView, BookingError> {
    let id = core.bookings()?.create(Instant::now());
    tracing::debug!(session_id = %id, "Booking session started");
    view(core, id, today)
}

pub fn view(core: &CoreState, id: Uuid, today: NaiveDate) -> Result<WizardView, BookingError> {
    let clinics = clinics_for(core, current_step(core, id)?)?;
    let mut bookings = core.bookings()?;
    let session = bookings.get_mut(id, Instant::now())?;
    Ok(project(id, session, &clinics, today))
}

/// Leave the wizard; unsaved selections are discarded.
pub fn abandon(core: &CoreState, id: Uuid) -> Result<(), BookingError> {
    core.bookings()?.remove(id)?;
    tracing::debug!(session_id = %id, "Booking session closed");
    Ok(())
}

pub fn edit(
    core: &CoreState,
    id: Uuid,
    edit: StepEdit,
    today: NaiveDate,
) -> Result<WizardView, BookingError> {
    let clinics = match edit {
        StepEdit::Clinic { .. } => core.store().clinics().load_all()?,
        _ => Vec::new(),
    };
    {
        let mut bookings = core.bookings()?;
        let session = bookings.get_mut(id, Instant::now())?;
        apply_edit(&mut session.state, edit, &clinics, today)?;
    }
    view(core, id, today)
}

/// Validated forward transition. Confirming the patient step appends the
/// appointment; if that write fails the session stays on patient info.
pub fn advance(core: &CoreState, id: Uuid, today: NaiveDate) -> Result<WizardView, BookingError> {
    {
        let mut bookings = core.bookings()?;
        let session = bookings.get_mut(id, Instant::now())?;
        let current = std::mem::take(&mut session.state);
        let previous = (current.step() == BookingStep::PatientInfo).then(|| current.clone());

        let next = match current.advance(today) {
            Ok(next) => next,
            Err(Rejected { state, error }) => {
                session.state = state;
                return Err(error.into());
            }
        };

        let booked = match &next {
            WizardState::Confirmation { appointment } => Some(appointment.clone()),
            _ => None,
        };
        if let Some(booked) = booked {
            if let Err(e) = core.store().appointments().append(booked.clone()) {
                session.state = previous.unwrap_or(next);
                return Err(e.into());
            }
            tracing::info!(
                appointment_id = %booked.id,
                clinic_id = %booked.upa_id,
                national_id = %national_id::redact(&booked.cpf),
                "Appointment booked"
            );
        }
        session.state = next;
    }
    view(core, id, today)
}

pub fn back(core: &CoreState, id: Uuid, today: NaiveDate) -> Result<WizardView, BookingError> {
    {
        let mut bookings = core.bookings()?;
        let session = bookings.get_mut(id, Instant::now())?;
        let current = std::mem::take(&mut session.state);
        match current.back() {
            Ok(previous) => session.state = previous,
            Err(Rejected { state, error }) => {
                session.state = state;
                return Err(error.into());
            }
        }
    }
    view(core, id, today)
}

/// Ask the triage assistant about `symptoms`. Only offered on the patient
/// step. A newer request supersedes this one; the stale answer is dropped.
pub async fn request_triage(
    core: &CoreState,
    id: Uuid,
    symptoms: &str,
    today: NaiveDate,
) -> Result<WizardView, BookingError> {
    let generation = {
        let mut bookings = core.bookings()?;
        let session = bookings.get_mut(id, Instant::now())?;
        let step = session.state.step();
        if step != BookingStep::PatientInfo {
            return Err(WizardError::WrongStep {
                expected: BookingStep::PatientInfo,
                actual: step,
            }
            .into());
        }
        session
            .triage
            .begin(symptoms)
            .ok_or(BookingError::SymptomsRequired)?
    };

    // Releases the control if this future is dropped before the answer lands.
    let pending = PendingTriage {
        core,
        id,
        generation,
    };

    let client = core.triage_client();
    let question = symptoms.to_string();
    let advice = tokio::task::spawn_blocking(move || triage::advise(client.as_ref(), &question))
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Triage task failed: {e}");
            FALLBACK_ADVICE.to_string()
        });

    {
        let mut bookings = core.bookings()?;
        let session = bookings.get_mut(id, Instant::now())?;
        if !session.triage.complete(generation, advice) {
            tracing::debug!(session_id = %id, generation, "Discarded stale triage answer");
        }
    }
    drop(pending);
    view(core, id, today)
}

struct PendingTriage<'a> {
    core: &'a CoreState,
    id: Uuid,
    generation: u64,
}

impl Drop for PendingTriage<'_> {
    fn drop(&mut self) {
        let Ok(mut bookings) = self.core.bookings() else {
            return;
        };
        if let Ok(session) = bookings.get_mut(self.id, Instant::now()) {
            if session.triage.abandon(self.generation) {
                tracing::debug!(
                    session_id = %self.id,
                    generation = self.generation,
                    "Triage request dropped before completion"
                );
            }
        }
    }
}

/// Receipt PDF of a confirmed session.
pub fn receipt_pdf(core: &CoreState, id: Uuid) -> Result<Vec<u8>, BookingError> {
    let appointment = {
        let mut bookings = core.bookings()?;
        match &bookings.get_mut(id, Instant::now())?.state {
            WizardState::Confirmation { appointment } => appointment.clone(),
            _ => return Err(BookingError::NotConfirmed),
        }
    };
    Ok(receipt::generate_receipt_pdf(&appointment)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::{AppointmentStatus, NotificationChannel};
    use crate::self_service;
    use crate::triage::MockTriageClient;
    use std::sync::Arc;
    use std::time::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn test_core(triage: MockTriageClient) -> CoreState {
        CoreState::in_memory(AppConfig::default(), Arc::new(triage)).unwrap()
    }

    fn to_patient_step(core: &CoreState) -> Uuid {
        let id = start(core, today()).unwrap().session_id;
        edit(core, id, StepEdit::Consent { accepted: true }, today()).unwrap();
        advance(core, id, today()).unwrap();
        edit(
            core,
            id,
            StepEdit::Location {
                region: Some("RS".into()),
                locality: Some("Porto Alegre".into()),
            },
            today(),
        )
        .unwrap();
        advance(core, id, today()).unwrap();
        edit(core, id, StepEdit::Clinic { clinic_id: "5".into() }, today()).unwrap();
        advance(core, id, today()).unwrap();
        edit(
            core,
            id,
            StepEdit::Slot {
                specialty: Some("Pediatria".into()),
                date: today().succ_opt(),
                time: Some("09:00".into()),
            },
            today(),
        )
        .unwrap();
        let view = advance(core, id, today()).unwrap();
        assert_eq!(view.step, BookingStep::PatientInfo);
        id
    }

    fn fill_patient(core: &CoreState, id: Uuid) {
        edit(
            core,
            id,
            StepEdit::Patient(PatientUpdate {
                name: Some("Maria Silva".into()),
                national_id: Some("12345678901".into()),
                phone: Some("51999990000".into()),
                email: None,
                channel: Some(NotificationChannel::Sms),
            }),
            today(),
        )
        .unwrap();
    }

    #[test]
    fn end_to_end_booking_is_found_by_lookup() {
        let core = test_core(MockTriageClient::failing());
        let id = to_patient_step(&core);
        fill_patient(&core, id);

        let view = advance(&core, id, today()).unwrap();
        assert_eq!(view.step, BookingStep::Confirmation);
        assert!(view.progress.is_none());
        let StepDetail::Confirmation { appointment, .. } = view.detail else {
            panic!("expected confirmation");
        };
        assert_eq!(appointment.upa_name, "UPA Moacyr Scliar");
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);

        let found = self_service::lookup(core.store(), "123.456.789-01").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, appointment.id);
    }

    #[test]
    fn nothing_persists_before_confirmation() {
        let core = test_core(MockTriageClient::failing());
        let id = to_patient_step(&core);
        abandon(&core, id).unwrap();
        assert!(core.store().appointments().load_all().unwrap().is_empty());
        assert!(matches!(
            view(&core, id, today()),
            Err(BookingError::Core(CoreError::SessionNotFound(_)))
        ));
    }

    #[test]
    fn rejected_advance_keeps_session_state() {
        let core = test_core(MockTriageClient::failing());
        let id = to_patient_step(&core);
        let err = advance(&core, id, today()).unwrap_err();
        assert!(matches!(err, BookingError::Wizard(WizardError::PatientNameRequired)));
        let view = view(&core, id, today()).unwrap();
        assert_eq!(view.step, BookingStep::PatientInfo);
        assert!(!view.can_advance);
        assert!(view.blocked_reason.is_some());
    }

    #[test]
    fn clinic_step_reports_empty_state() {
        let core = test_core(MockTriageClient::failing());
        let id = start(&core, today()).unwrap().session_id;
        edit(&core, id, StepEdit::Consent { accepted: true }, today()).unwrap();
        advance(&core, id, today()).unwrap();
        edit(
            &core,
            id,
            StepEdit::Location {
                region: Some("BA".into()),
                locality: Some("Salvador".into()),
            },
            today(),
        )
        .unwrap();
        let view = advance(&core, id, today()).unwrap();
        let StepDetail::ClinicSelection { empty, candidates, .. } = view.detail else {
            panic!("expected clinic step");
        };
        assert!(empty && candidates.is_empty());
        assert!(!view.can_advance);
    }

    #[test]
    fn back_from_first_step_is_rejected() {
        let core = test_core(MockTriageClient::failing());
        let id = start(&core, today()).unwrap().session_id;
        assert!(matches!(
            back(&core, id, today()),
            Err(BookingError::Wizard(WizardError::NoPreviousStep))
        ));
    }

    #[test]
    fn receipt_only_after_confirmation() {
        let core = test_core(MockTriageClient::failing());
        let id = to_patient_step(&core);
        assert!(matches!(receipt_pdf(&core, id), Err(BookingError::NotConfirmed)));
        fill_patient(&core, id);
        advance(&core, id, today()).unwrap();
        let pdf = receipt_pdf(&core, id).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn triage_answer_lands_in_view() {
        let core = test_core(MockTriageClient::answering("Caso adequado para UPA."));
        let id = to_patient_step(&core);
        let view = request_triage(&core, id, "febre há dois dias", today()).await.unwrap();
        assert_eq!(view.triage.advice.as_deref(), Some("Caso adequado para UPA."));
        assert!(!view.triage.disabled);
    }

    #[tokio::test]
    async fn triage_failure_degrades_to_fallback() {
        let core = test_core(MockTriageClient::failing());
        let id = to_patient_step(&core);
        let view = request_triage(&core, id, "dor de cabeça", today()).await.unwrap();
        assert_eq!(view.triage.advice.as_deref(), Some(FALLBACK_ADVICE));
        // booking still proceeds
        fill_patient(&core, id);
        assert!(advance(&core, id, today()).is_ok());
    }

    #[tokio::test]
    async fn dropped_triage_request_reenables_control() {
        let core = test_core(
            MockTriageClient::answering("tarde demais").with_delay(Duration::from_millis(300)),
        );
        let id = to_patient_step(&core);

        let cut_short = tokio::time::timeout(
            Duration::from_millis(50),
            request_triage(&core, id, "febre", today()),
        )
        .await;
        assert!(cut_short.is_err());

        let view = view(&core, id, today()).unwrap();
        assert!(!view.triage.in_flight);
        assert!(!view.triage.disabled);
        assert_eq!(view.triage.advice, None);

        // A fresh request still works afterwards.
        tokio::time::sleep(Duration::from_millis(400)).await;
        let view = request_triage(&core, id, "febre alta", today()).await.unwrap();
        assert_eq!(view.triage.advice.as_deref(), Some("tarde demais"));
    }

    #[tokio::test]
    async fn triage_needs_symptoms_and_patient_step() {
        let core = test_core(MockTriageClient::answering("ok"));
        let id = to_patient_step(&core);
        assert!(matches!(
            request_triage(&core, id, "  ", today()).await,
            Err(BookingError::SymptomsRequired)
        ));

        let other = start(&core, today()).unwrap().session_id;
        assert!(matches!(
            request_triage(&core, other, "febre", today()).await,
            Err(BookingError::Wizard(WizardError::WrongStep { .. }))
        ));
    }
}
