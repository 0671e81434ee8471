//! What the front-end renders for a booking session.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::session::BookingSession;
use super::wizard::{candidate_clinics, BookingStep, WizardState};
use crate::models::{Appointment, Clinic, NotificationChannel, WaitTime};
use crate::reference::{self, REGIONS, TIME_SLOTS};

/// Dots shown above every step except Confirmation.
const PROGRESS_DOTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DotState {
    Done,
    Current,
    Pending,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClinicCard {
    pub id: String,
    pub name: String,
    pub address: String,
    pub waiting_time: WaitTime,
}

impl From<&Clinic> for ClinicCard {
    fn from(c: &Clinic) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            address: c.address.clone(),
            waiting_time: c.waiting_time,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepDetail {
    Consent {
        accepted: bool,
    },
    Location {
        regions: Vec<&'static str>,
        cities: Vec<&'static str>,
        region: Option<String>,
        locality: Option<String>,
    },
    ClinicSelection {
        region: String,
        locality: String,
        candidates: Vec<ClinicCard>,
        empty: bool,
        selected_id: Option<String>,
    },
    SpecialtyTime {
        clinic_name: String,
        specialties: Vec<String>,
        time_slots: Vec<&'static str>,
        min_date: NaiveDate,
        specialty: Option<String>,
        date: Option<NaiveDate>,
        time: Option<String>,
    },
    PatientInfo {
        clinic_name: String,
        specialty: String,
        date: NaiveDate,
        time: String,
        name: String,
        national_id: String,
        phone: String,
        email: String,
        channel: NotificationChannel,
    },
    Confirmation {
        appointment: Appointment,
        status_label: &'static str,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct TriageView {
    pub symptoms: String,
    pub advice: Option<String>,
    pub in_flight: bool,
    /// The request control is disabled while an answer is pending.
    pub disabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub session_id: Uuid,
    pub step: BookingStep,
    pub step_index: usize,
    pub progress: Option<Vec<DotState>>,
    pub can_advance: bool,
    pub blocked_reason: Option<String>,
    pub can_go_back: bool,
    pub detail: StepDetail,
    pub triage: TriageView,
}

fn progress(step: BookingStep) -> Option<Vec<DotState>> {
    if step == BookingStep::Confirmation {
        return None;
    }
    let current = step.index();
    Some(
        (0..PROGRESS_DOTS)
            .map(|i| match i.cmp(&current) {
                std::cmp::Ordering::Less => DotState::Done,
                std::cmp::Ordering::Equal => DotState::Current,
                std::cmp::Ordering::Greater => DotState::Pending,
            })
            .collect(),
    )
}

fn detail(state: &WizardState, clinics: &[Clinic], today: NaiveDate) -> StepDetail {
    match state {
        WizardState::Consent { accepted } => StepDetail::Consent {
            accepted: *accepted,
        },
        WizardState::Location { form } => StepDetail::Location {
            regions: REGIONS.iter().map(|r| r.state).collect(),
            cities: form
                .region
                .as_deref()
                .map(|r| reference::cities_of(r).to_vec())
                .unwrap_or_default(),
            region: form.region.clone(),
            locality: form.locality.clone(),
        },
        WizardState::ClinicSelection { location, selected } => {
            let candidates: Vec<ClinicCard> = candidate_clinics(clinics, &location.locality)
                .iter()
                .map(ClinicCard::from)
                .collect();
            StepDetail::ClinicSelection {
                region: location.region.clone(),
                locality: location.locality.clone(),
                empty: candidates.is_empty(),
                candidates,
                selected_id: selected.as_ref().map(|c| c.id.clone()),
            }
        }
        WizardState::SpecialtyTime { clinic, form, .. } => StepDetail::SpecialtyTime {
            clinic_name: clinic.name.clone(),
            specialties: clinic.specialties.clone(),
            time_slots: TIME_SLOTS.to_vec(),
            min_date: today,
            specialty: form.specialty.clone(),
            date: form.date,
            time: form.time.clone(),
        },
        WizardState::PatientInfo {
            clinic, slot, form, ..
        } => StepDetail::PatientInfo {
            clinic_name: clinic.name.clone(),
            specialty: slot.specialty.clone(),
            date: slot.date,
            time: slot.time.clone(),
            name: form.name.clone(),
            national_id: form.national_id.clone(),
            phone: form.phone.clone(),
            email: form.email.clone(),
            channel: form.channel,
        },
        WizardState::Confirmation { appointment } => StepDetail::Confirmation {
            status_label: appointment.status.display_label(),
            appointment: appointment.clone(),
        },
    }
}

/// Project a session. `clinics` is only read on the clinic-selection step.
pub fn project(id: Uuid, session: &BookingSession, clinics: &[Clinic], today: NaiveDate) -> WizardView {
    let state = &session.state;
    let step = state.step();
    let validation = state.validate(today);
    WizardView {
        session_id: id,
        step,
        step_index: step.index(),
        progress: progress(step),
        can_advance: validation.is_ok(),
        blocked_reason: validation.err().map(|e| e.to_string()),
        can_go_back: !matches!(step, BookingStep::Consent | BookingStep::Confirmation),
        detail: detail(state, clinics, today),
        triage: TriageView {
            symptoms: session.triage.symptoms.clone(),
            advice: session.triage.advice.clone(),
            in_flight: session.triage.in_flight,
            disabled: session.triage.in_flight,
        },
    }
}
