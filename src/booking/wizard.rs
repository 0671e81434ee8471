//! Booking wizard state machine.
//!
//! Six states in strict linear order. Each state carries the validated data
//! of the steps before it plus the form of the current step, so a state that
//! needs a clinic cannot exist without one. `advance` checks the current
//! step and moves forward; `back` moves to the preceding step without
//! checks. Both consume the state and hand it back untouched on rejection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{new_record_id, Appointment, AppointmentStatus, Clinic, NotificationChannel};
use crate::national_id;
use crate::reference;

// ═══════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Consent must be accepted before continuing")]
    ConsentRequired,
    #[error("Unknown region: {0}")]
    UnknownRegion(String),
    #[error("Select a region before choosing a city")]
    RegionRequired,
    #[error("{locality} is not a city of {region}")]
    UnknownLocality { region: String, locality: String },
    #[error("Select both a region and a city")]
    LocationIncomplete,
    #[error("Clinic {0} is not available in the selected city")]
    ClinicNotAvailable(String),
    #[error("Select a clinic to continue")]
    ClinicRequired,
    #[error("{0} is not offered by the selected clinic")]
    SpecialtyNotOffered(String),
    #[error("Date {0} is in the past")]
    DateInPast(NaiveDate),
    #[error("Unknown time slot: {0}")]
    UnknownTimeSlot(String),
    #[error("Select a specialty, a date and a time")]
    SlotIncomplete,
    #[error("Patient name is required")]
    PatientNameRequired,
    #[error("National ID must have 11 digits")]
    NationalIdIncomplete,
    #[error("Phone number is required")]
    PhoneRequired,
    #[error("This action belongs to the {expected} step, current step is {actual}")]
    WrongStep {
        expected: BookingStep,
        actual: BookingStep,
    },
    #[error("There is no previous step")]
    NoPreviousStep,
    #[error("Booking already confirmed")]
    AlreadyConfirmed,
}

/// A refused transition: the unchanged state plus the reason.
#[derive(Debug)]
pub struct Rejected {
    pub state: WizardState,
    pub error: WizardError,
}

// ═══════════════════════════════════════════
// Steps and step data
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    Consent,
    Location,
    ClinicSelection,
    SpecialtyTime,
    PatientInfo,
    Confirmation,
}

impl BookingStep {
    pub fn index(&self) -> usize {
        match self {
            Self::Consent => 0,
            Self::Location => 1,
            Self::ClinicSelection => 2,
            Self::SpecialtyTime => 3,
            Self::PatientInfo => 4,
            Self::Confirmation => 5,
        }
    }
}

impl std::fmt::Display for BookingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Consent => "consent",
            Self::Location => "location",
            Self::ClinicSelection => "clinic selection",
            Self::SpecialtyTime => "specialty and time",
            Self::PatientInfo => "patient info",
            Self::Confirmation => "confirmation",
        };
        f.write_str(name)
    }
}

/// Confirmed region and city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub region: String,
    pub locality: String,
}

/// Confirmed specialty, date and time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub specialty: String,
    pub date: NaiveDate,
    pub time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationForm {
    pub region: Option<String>,
    pub locality: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlotForm {
    pub specialty: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatientForm {
    pub name: String,
    /// Kept masked as typed.
    pub national_id: String,
    pub phone: String,
    pub email: String,
    pub channel: NotificationChannel,
}

/// Partial update of the patient form; `None` leaves a field as is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub channel: Option<NotificationChannel>,
}

// ═══════════════════════════════════════════
// State machine
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum WizardState {
    Consent {
        accepted: bool,
    },
    Location {
        form: LocationForm,
    },
    ClinicSelection {
        location: Location,
        selected: Option<Clinic>,
    },
    SpecialtyTime {
        location: Location,
        clinic: Clinic,
        form: SlotForm,
    },
    PatientInfo {
        location: Location,
        clinic: Clinic,
        slot: Slot,
        form: PatientForm,
    },
    Confirmation {
        appointment: Appointment,
    },
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::Consent { accepted: false }
    }

    pub fn step(&self) -> BookingStep {
        match self {
            Self::Consent { .. } => BookingStep::Consent,
            Self::Location { .. } => BookingStep::Location,
            Self::ClinicSelection { .. } => BookingStep::ClinicSelection,
            Self::SpecialtyTime { .. } => BookingStep::SpecialtyTime,
            Self::PatientInfo { .. } => BookingStep::PatientInfo,
            Self::Confirmation { .. } => BookingStep::Confirmation,
        }
    }

    fn wrong_step(&self, expected: BookingStep) -> WizardError {
        WizardError::WrongStep {
            expected,
            actual: self.step(),
        }
    }

    // ── Step edits ──────────────────────────────────────────

    pub fn set_consent(&mut self, value: bool) -> Result<(), WizardError> {
        match self {
            Self::Consent { accepted } => {
                *accepted = value;
                Ok(())
            }
            _ => Err(self.wrong_step(BookingStep::Consent)),
        }
    }

    /// Choosing a region always clears the city.
    pub fn select_region(&mut self, region: &str) -> Result<(), WizardError> {
        let step_error = self.wrong_step(BookingStep::Location);
        let Self::Location { form } = self else {
            return Err(step_error);
        };
        if reference::find_region(region).is_none() {
            return Err(WizardError::UnknownRegion(region.to_string()));
        }
        form.region = Some(region.to_string());
        form.locality = None;
        Ok(())
    }

    pub fn select_locality(&mut self, locality: &str) -> Result<(), WizardError> {
        let step_error = self.wrong_step(BookingStep::Location);
        let Self::Location { form } = self else {
            return Err(step_error);
        };
        let region = form.region.as_deref().ok_or(WizardError::RegionRequired)?;
        if !reference::cities_of(region).contains(&locality) {
            return Err(WizardError::UnknownLocality {
                region: region.to_string(),
                locality: locality.to_string(),
            });
        }
        form.locality = Some(locality.to_string());
        Ok(())
    }

    /// Pick a clinic among the candidates of the chosen city. The whole
    /// record is kept for the following steps.
    pub fn select_clinic(&mut self, clinics: &[Clinic], clinic_id: &str) -> Result<(), WizardError> {
        let step_error = self.wrong_step(BookingStep::ClinicSelection);
        let Self::ClinicSelection { location, selected } = self else {
            return Err(step_error);
        };
        let clinic = candidate_clinics(clinics, &location.locality)
            .into_iter()
            .find(|c| c.id == clinic_id)
            .ok_or_else(|| WizardError::ClinicNotAvailable(clinic_id.to_string()))?;
        *selected = Some(clinic);
        Ok(())
    }

    pub fn select_specialty(&mut self, specialty: &str) -> Result<(), WizardError> {
        let step_error = self.wrong_step(BookingStep::SpecialtyTime);
        let Self::SpecialtyTime { clinic, form, .. } = self else {
            return Err(step_error);
        };
        if !clinic.offers(specialty) {
            return Err(WizardError::SpecialtyNotOffered(specialty.to_string()));
        }
        form.specialty = Some(specialty.to_string());
        Ok(())
    }

    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), WizardError> {
        let step_error = self.wrong_step(BookingStep::SpecialtyTime);
        let Self::SpecialtyTime { form, .. } = self else {
            return Err(step_error);
        };
        if date < today {
            return Err(WizardError::DateInPast(date));
        }
        form.date = Some(date);
        Ok(())
    }

    pub fn select_time(&mut self, time: &str) -> Result<(), WizardError> {
        let step_error = self.wrong_step(BookingStep::SpecialtyTime);
        let Self::SpecialtyTime { form, .. } = self else {
            return Err(step_error);
        };
        if !reference::is_time_slot(time) {
            return Err(WizardError::UnknownTimeSlot(time.to_string()));
        }
        form.time = Some(time.to_string());
        Ok(())
    }

    /// National ID input goes through the progressive mask.
    pub fn update_patient(&mut self, update: PatientUpdate) -> Result<(), WizardError> {
        let step_error = self.wrong_step(BookingStep::PatientInfo);
        let Self::PatientInfo { form, .. } = self else {
            return Err(step_error);
        };
        if let Some(name) = update.name {
            form.name = name;
        }
        if let Some(raw) = update.national_id {
            form.national_id = national_id::mask(&raw);
        }
        if let Some(phone) = update.phone {
            form.phone = phone;
        }
        if let Some(email) = update.email {
            form.email = email;
        }
        if let Some(channel) = update.channel {
            form.channel = channel;
        }
        Ok(())
    }

    // ── Transitions ─────────────────────────────────────────

    /// Forward predicate of the current step.
    pub fn validate(&self, today: NaiveDate) -> Result<(), WizardError> {
        match self {
            Self::Consent { accepted } => {
                if *accepted {
                    Ok(())
                } else {
                    Err(WizardError::ConsentRequired)
                }
            }
            Self::Location { form } => match (&form.region, &form.locality) {
                (Some(_), Some(_)) => Ok(()),
                _ => Err(WizardError::LocationIncomplete),
            },
            Self::ClinicSelection { selected, .. } => {
                if selected.is_some() {
                    Ok(())
                } else {
                    Err(WizardError::ClinicRequired)
                }
            }
            Self::SpecialtyTime { form, .. } => match (&form.specialty, form.date, &form.time) {
                (Some(_), Some(date), Some(_)) if date < today => Err(WizardError::DateInPast(date)),
                (Some(_), Some(_), Some(_)) => Ok(()),
                _ => Err(WizardError::SlotIncomplete),
            },
            Self::PatientInfo { form, .. } => {
                if form.name.trim().is_empty() {
                    Err(WizardError::PatientNameRequired)
                } else if !national_id::is_complete(&form.national_id) {
                    Err(WizardError::NationalIdIncomplete)
                } else if form.phone.trim().is_empty() {
                    Err(WizardError::PhoneRequired)
                } else {
                    Ok(())
                }
            }
            Self::Confirmation { .. } => Err(WizardError::AlreadyConfirmed),
        }
    }

    /// Move forward. Leaving `PatientInfo` builds the appointment; storing
    /// it is the caller's job.
    pub fn advance(self, today: NaiveDate) -> Result<WizardState, Rejected> {
        if let Err(error) = self.validate(today) {
            return Err(Rejected { state: self, error });
        }

        let next = match self {
            Self::Consent { .. } => Self::Location {
                form: LocationForm::default(),
            },
            Self::Location { form } => match (form.region, form.locality) {
                (Some(region), Some(locality)) => Self::ClinicSelection {
                    location: Location { region, locality },
                    selected: None,
                },
                (region, locality) => {
                    return Err(Rejected {
                        state: Self::Location {
                            form: LocationForm { region, locality },
                        },
                        error: WizardError::LocationIncomplete,
                    })
                }
            },
            Self::ClinicSelection { location, selected } => match selected {
                Some(clinic) => Self::SpecialtyTime {
                    location,
                    clinic,
                    form: SlotForm::default(),
                },
                None => {
                    return Err(Rejected {
                        state: Self::ClinicSelection {
                            location,
                            selected: None,
                        },
                        error: WizardError::ClinicRequired,
                    })
                }
            },
            Self::SpecialtyTime {
                location,
                clinic,
                form,
            } => match (form.specialty, form.date, form.time) {
                (Some(specialty), Some(date), Some(time)) => Self::PatientInfo {
                    location,
                    clinic,
                    slot: Slot {
                        specialty,
                        date,
                        time,
                    },
                    form: PatientForm::default(),
                },
                (specialty, date, time) => {
                    return Err(Rejected {
                        state: Self::SpecialtyTime {
                            location,
                            clinic,
                            form: SlotForm {
                                specialty,
                                date,
                                time,
                            },
                        },
                        error: WizardError::SlotIncomplete,
                    })
                }
            },
            Self::PatientInfo {
                clinic, slot, form, ..
            } => Self::Confirmation {
                appointment: build_appointment(&clinic, &slot, &form),
            },
            Self::Confirmation { .. } => unreachable!("validate rejects Confirmation"),
        };

        Ok(next)
    }

    /// Move to the preceding step. Data confirmed earlier is restored into
    /// that step's form; the current step's unsaved input is dropped.
    pub fn back(self) -> Result<WizardState, Rejected> {
        let previous = match self {
            Self::Consent { .. } | Self::Confirmation { .. } => {
                return Err(Rejected {
                    state: self,
                    error: WizardError::NoPreviousStep,
                })
            }
            Self::Location { .. } => Self::Consent { accepted: true },
            Self::ClinicSelection { location, .. } => Self::Location {
                form: LocationForm {
                    region: Some(location.region),
                    locality: Some(location.locality),
                },
            },
            Self::SpecialtyTime {
                location, clinic, ..
            } => Self::ClinicSelection {
                location,
                selected: Some(clinic),
            },
            Self::PatientInfo {
                location,
                clinic,
                slot,
                ..
            } => Self::SpecialtyTime {
                location,
                clinic,
                form: SlotForm {
                    specialty: Some(slot.specialty),
                    date: Some(slot.date),
                    time: Some(slot.time),
                },
            },
        };
        Ok(previous)
    }
}

/// Clinics whose city equals the chosen locality, in collection order.
pub fn candidate_clinics(clinics: &[Clinic], locality: &str) -> Vec<Clinic> {
    clinics
        .iter()
        .filter(|c| c.city == locality)
        .cloned()
        .collect()
}

fn build_appointment(clinic: &Clinic, slot: &Slot, form: &PatientForm) -> Appointment {
    Appointment {
        id: new_record_id(),
        patient_name: form.name.trim().to_string(),
        cpf: national_id::mask(&form.national_id),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        upa_id: clinic.id.clone(),
        upa_name: clinic.name.clone(),
        specialty: slot.specialty.clone(),
        date: slot.date.format("%Y-%m-%d").to_string(),
        time: slot.time.clone(),
        status: AppointmentStatus::Scheduled,
        notification_channel: form.channel,
        rating: None,
        comment: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::seed_clinics;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn tomorrow() -> NaiveDate {
        today().succ_opt().unwrap()
    }

    fn advance(state: WizardState) -> WizardState {
        state.advance(today()).unwrap()
    }

    fn at_clinic_selection() -> WizardState {
        let mut state = WizardState::new();
        state.set_consent(true).unwrap();
        let mut state = advance(state);
        state.select_region("RS").unwrap();
        state.select_locality("Porto Alegre").unwrap();
        advance(state)
    }

    fn at_specialty_time() -> WizardState {
        let mut state = at_clinic_selection();
        state.select_clinic(&seed_clinics(), "5").unwrap();
        advance(state)
    }

    fn at_patient_info() -> WizardState {
        let mut state = at_specialty_time();
        state.select_specialty("Pediatria").unwrap();
        state.select_date(tomorrow(), today()).unwrap();
        state.select_time("09:00").unwrap();
        advance(state)
    }

    #[test]
    fn starts_at_consent() {
        let state = WizardState::new();
        assert_eq!(state.step(), BookingStep::Consent);
        assert!(state.validate(today()).is_err());
    }

    #[test]
    fn consent_gates_forward() {
        let state = WizardState::new();
        let rejected = state.advance(today()).unwrap_err();
        assert_eq!(rejected.error, WizardError::ConsentRequired);
        assert_eq!(rejected.state.step(), BookingStep::Consent);
    }

    #[test]
    fn consent_has_no_back() {
        let rejected = WizardState::new().back().unwrap_err();
        assert_eq!(rejected.error, WizardError::NoPreviousStep);
    }

    #[test]
    fn region_change_resets_locality() {
        let mut state = WizardState::Location {
            form: LocationForm::default(),
        };
        state.select_region("SP").unwrap();
        state.select_locality("Campinas").unwrap();
        state.select_region("RJ").unwrap();
        let WizardState::Location { form } = &state else {
            panic!("expected location step");
        };
        assert_eq!(form.region.as_deref(), Some("RJ"));
        assert_eq!(form.locality, None);
        assert_eq!(
            state.advance(today()).unwrap_err().error,
            WizardError::LocationIncomplete
        );
    }

    #[test]
    fn locality_must_belong_to_region() {
        let mut state = WizardState::Location {
            form: LocationForm::default(),
        };
        assert_eq!(
            state.select_locality("Santos").unwrap_err(),
            WizardError::RegionRequired
        );
        state.select_region("RS").unwrap();
        assert!(matches!(
            state.select_locality("Santos"),
            Err(WizardError::UnknownLocality { .. })
        ));
    }

    #[test]
    fn unknown_region_rejected() {
        let mut state = WizardState::Location {
            form: LocationForm::default(),
        };
        assert_eq!(
            state.select_region("ZZ").unwrap_err(),
            WizardError::UnknownRegion("ZZ".into())
        );
    }

    #[test]
    fn clinic_candidates_match_city_exactly() {
        let clinics = seed_clinics();
        let names: Vec<_> = candidate_clinics(&clinics, "Porto Alegre")
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["UPA Moacyr Scliar", "UPA Bom Jesus"]);
        assert!(candidate_clinics(&clinics, "Santos").is_empty());
    }

    #[test]
    fn clinic_from_other_city_rejected() {
        let mut state = at_clinic_selection();
        assert_eq!(
            state.select_clinic(&seed_clinics(), "1").unwrap_err(),
            WizardError::ClinicNotAvailable("1".into())
        );
    }

    #[test]
    fn empty_city_blocks_forward() {
        let mut state = WizardState::new();
        state.set_consent(true).unwrap();
        let mut state = advance(state);
        state.select_region("SP").unwrap();
        state.select_locality("Santos").unwrap();
        let state = advance(state);
        assert_eq!(
            state.advance(today()).unwrap_err().error,
            WizardError::ClinicRequired
        );
    }

    #[test]
    fn specialty_limited_to_clinic() {
        let mut state = at_specialty_time();
        assert_eq!(
            state.select_specialty("Cardiologia").unwrap_err(),
            WizardError::SpecialtyNotOffered("Cardiologia".into())
        );
        state.select_specialty("Traumatologia").unwrap();
    }

    #[test]
    fn past_dates_rejected_today_accepted() {
        let mut state = at_specialty_time();
        let yesterday = today().pred_opt().unwrap();
        assert_eq!(
            state.select_date(yesterday, today()).unwrap_err(),
            WizardError::DateInPast(yesterday)
        );
        state.select_date(today(), today()).unwrap();
    }

    #[test]
    fn stale_date_blocks_forward_next_day() {
        let mut state = at_specialty_time();
        state.select_specialty("Pediatria").unwrap();
        state.select_date(today(), today()).unwrap();
        state.select_time("08:00").unwrap();
        let later = tomorrow();
        assert_eq!(
            state.advance(later).unwrap_err().error,
            WizardError::DateInPast(today())
        );
    }

    #[test]
    fn time_must_be_a_known_slot() {
        let mut state = at_specialty_time();
        assert_eq!(
            state.select_time("12:00").unwrap_err(),
            WizardError::UnknownTimeSlot("12:00".into())
        );
    }

    #[test]
    fn slot_requires_all_fields() {
        let mut state = at_specialty_time();
        state.select_specialty("Pediatria").unwrap();
        state.select_time("09:00").unwrap();
        let rejected = state.advance(today()).unwrap_err();
        assert_eq!(rejected.error, WizardError::SlotIncomplete);
        let WizardState::SpecialtyTime { form, .. } = rejected.state else {
            panic!("expected specialty step");
        };
        assert_eq!(form.time.as_deref(), Some("09:00"));
    }

    #[test]
    fn patient_form_masks_national_id() {
        let mut state = at_patient_info();
        state
            .update_patient(PatientUpdate {
                national_id: Some("1234567".into()),
                ..Default::default()
            })
            .unwrap();
        let WizardState::PatientInfo { form, .. } = &state else {
            panic!("expected patient step");
        };
        assert_eq!(form.national_id, "123.456.7");
        assert_eq!(form.channel, NotificationChannel::Whatsapp);
    }

    #[test]
    fn patient_confirm_requires_name_id_and_phone() {
        let mut state = at_patient_info();
        assert_eq!(state.validate(today()), Err(WizardError::PatientNameRequired));

        state
            .update_patient(PatientUpdate {
                name: Some("Maria Silva".into()),
                national_id: Some("1234567890".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(state.validate(today()), Err(WizardError::NationalIdIncomplete));

        state
            .update_patient(PatientUpdate {
                national_id: Some("12345678901".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(state.validate(today()), Err(WizardError::PhoneRequired));

        state
            .update_patient(PatientUpdate {
                phone: Some("51999990000".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(state.validate(today()).is_ok());
    }

    #[test]
    fn confirm_builds_scheduled_appointment() {
        let mut state = at_patient_info();
        state
            .update_patient(PatientUpdate {
                name: Some("Maria Silva".into()),
                national_id: Some("12345678901".into()),
                phone: Some("51999990000".into()),
                email: None,
                channel: Some(NotificationChannel::Sms),
            })
            .unwrap();

        let WizardState::Confirmation { appointment } = advance(state) else {
            panic!("expected confirmation");
        };
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(appointment.upa_id, "5");
        assert_eq!(appointment.upa_name, "UPA Moacyr Scliar");
        assert_eq!(appointment.specialty, "Pediatria");
        assert_eq!(appointment.date, "2026-10-18");
        assert_eq!(appointment.time, "09:00");
        assert_eq!(appointment.cpf, "123.456.789-01");
        assert_eq!(appointment.notification_channel, NotificationChannel::Sms);
        assert_eq!(appointment.email, "");
        assert!(appointment.rating.is_none());
    }

    #[test]
    fn confirmation_is_terminal() {
        let state = WizardState::Confirmation {
            appointment: build_appointment(
                &seed_clinics()[0],
                &Slot {
                    specialty: "Pediatria".into(),
                    date: tomorrow(),
                    time: "08:00".into(),
                },
                &PatientForm::default(),
            ),
        };
        let rejected = state.advance(today()).unwrap_err();
        assert_eq!(rejected.error, WizardError::AlreadyConfirmed);
        assert_eq!(
            rejected.state.back().unwrap_err().error,
            WizardError::NoPreviousStep
        );
    }

    #[test]
    fn back_restores_previous_selections() {
        let state = at_patient_info();
        let state = state.back().unwrap();
        let WizardState::SpecialtyTime { form, .. } = &state else {
            panic!("expected specialty step");
        };
        assert_eq!(form.specialty.as_deref(), Some("Pediatria"));
        assert_eq!(form.time.as_deref(), Some("09:00"));

        let state = state.back().unwrap();
        let WizardState::ClinicSelection { selected, .. } = &state else {
            panic!("expected clinic step");
        };
        assert_eq!(selected.as_ref().map(|c| c.id.as_str()), Some("5"));

        let state = state.back().unwrap();
        let WizardState::Location { form } = &state else {
            panic!("expected location step");
        };
        assert_eq!(form.locality.as_deref(), Some("Porto Alegre"));

        let state = state.back().unwrap();
        assert_eq!(state, WizardState::Consent { accepted: true });
    }

    #[test]
    fn edits_outside_their_step_are_rejected() {
        let mut state = WizardState::new();
        assert_eq!(
            state.select_time("09:00").unwrap_err(),
            WizardError::WrongStep {
                expected: BookingStep::SpecialtyTime,
                actual: BookingStep::Consent,
            }
        );
    }

    #[test]
    fn step_indices_are_linear() {
        let steps = [
            BookingStep::Consent,
            BookingStep::Location,
            BookingStep::ClinicSelection,
            BookingStep::SpecialtyTime,
            BookingStep::PatientInfo,
            BookingStep::Confirmation,
        ];
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.index(), i);
        }
    }
}
