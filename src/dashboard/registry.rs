//! Clinic and doctor registries, as staff see them in the current scope.

use serde::{Deserialize, Serialize};

use super::scope::{find_clinic, scoped_clinics, scoped_doctors, Scope};
use super::DashboardError;
use crate::db::Store;
use crate::models::{new_record_id, Clinic, Doctor, WaitTime};
use crate::reference::{self, GENERIC_SPECIALTY};

/// Shown for a doctor whose clinic id no longer resolves.
pub const UNBOUND_CLINIC_LABEL: &str = "Não vinculada";

// ═══════════════════════════════════════════
// Clinics
// ═══════════════════════════════════════════

/// New clinic form. Omitted specialties start as the generic one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClinicDraft {
    pub name: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub address: String,
    pub specialties: Option<Vec<String>>,
    pub waiting_time: Option<WaitTime>,
    /// Applied after `specialties`, one toggle per entry.
    #[serde(default)]
    pub toggle_specialties: Vec<String>,
}

/// Edit form; `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClinicPatch {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub waiting_time: Option<WaitTime>,
    #[serde(default)]
    pub toggle_specialties: Vec<String>,
}

/// Flip membership of `specialty`. Only vocabulary entries can be added;
/// anything already present can be removed.
pub fn toggle_specialty(specialties: &mut Vec<String>, specialty: &str) -> Result<(), DashboardError> {
    if let Some(pos) = specialties.iter().position(|s| s == specialty) {
        specialties.remove(pos);
        return Ok(());
    }
    if !reference::is_known_specialty(specialty) {
        return Err(DashboardError::UnknownSpecialty(specialty.to_string()));
    }
    specialties.push(specialty.to_string());
    Ok(())
}

/// Replace the specialty list. Entries outside the vocabulary are kept only
/// if `current` already had them.
fn replace_specialties(current: &[String], wanted: Vec<String>) -> Result<Vec<String>, DashboardError> {
    let mut result: Vec<String> = Vec::with_capacity(wanted.len());
    for s in wanted {
        if !reference::is_known_specialty(&s) && !current.contains(&s) {
            return Err(DashboardError::UnknownSpecialty(s));
        }
        if !result.contains(&s) {
            result.push(s);
        }
    }
    Ok(result)
}

fn require(value: &str, field: &'static str) -> Result<(), DashboardError> {
    if value.trim().is_empty() {
        Err(DashboardError::MissingField(field))
    } else {
        Ok(())
    }
}

fn check_clinic(clinic: &Clinic) -> Result<(), DashboardError> {
    require(&clinic.name, "name")?;
    require(&clinic.city, "city")?;
    require(&clinic.state, "state")
}

pub fn list_clinics(store: &Store, scope: &Scope) -> Result<Vec<Clinic>, DashboardError> {
    Ok(scoped_clinics(scope, &store.clinics().load_all()?))
}

pub fn create_clinic(store: &Store, scope: &Scope, draft: ClinicDraft) -> Result<Clinic, DashboardError> {
    if !scope.can_create_clinics() {
        return Err(DashboardError::ScopeViolation(
            "clinic managers cannot create clinics".into(),
        ));
    }

    let mut specialties = match draft.specialties {
        Some(list) => replace_specialties(&[], list)?,
        None => vec![GENERIC_SPECIALTY.to_string()],
    };
    for s in &draft.toggle_specialties {
        toggle_specialty(&mut specialties, s)?;
    }

    let clinic = Clinic {
        id: new_record_id(),
        name: draft.name.trim().to_string(),
        city: draft.city.trim().to_string(),
        state: draft.state.trim().to_string(),
        address: draft.address.trim().to_string(),
        specialties,
        waiting_time: draft.waiting_time.unwrap_or_default(),
    };
    check_clinic(&clinic)?;
    if !scope.includes_clinic(&clinic) {
        return Err(DashboardError::ScopeViolation(format!(
            "clinic in {} is outside {scope}",
            clinic.state
        )));
    }

    store.clinics().append(clinic.clone())?;
    tracing::info!(clinic_id = %clinic.id, scope = %scope, "Clinic created");
    Ok(clinic)
}

/// Merge `patch` into a clinic visible in `scope`.
pub fn update_clinic(
    store: &Store,
    scope: &Scope,
    id: &str,
    patch: ClinicPatch,
) -> Result<Clinic, DashboardError> {
    let updated = store.clinics().mutate(|clinics| {
        let clinic = clinics
            .iter_mut()
            .find(|c| c.id == id && scope.includes_clinic(c))
            .ok_or_else(|| DashboardError::ClinicNotFound(id.to_string()))?;

        let mut edited = clinic.clone();
        if let Some(name) = patch.name {
            edited.name = name.trim().to_string();
        }
        if let Some(city) = patch.city {
            edited.city = city.trim().to_string();
        }
        if let Some(state) = patch.state {
            edited.state = state.trim().to_string();
        }
        if let Some(address) = patch.address {
            edited.address = address.trim().to_string();
        }
        if let Some(list) = patch.specialties {
            edited.specialties = replace_specialties(&clinic.specialties, list)?;
        }
        for s in &patch.toggle_specialties {
            toggle_specialty(&mut edited.specialties, s)?;
        }
        if let Some(waiting_time) = patch.waiting_time {
            edited.waiting_time = waiting_time;
        }

        check_clinic(&edited)?;
        if !scope.includes_clinic(&edited) {
            return Err(DashboardError::ScopeViolation(format!(
                "cannot move clinic outside {scope}"
            )));
        }
        *clinic = edited.clone();
        Ok(edited)
    })?;
    tracing::info!(clinic_id = id, scope = %scope, "Clinic updated");
    Ok(updated)
}

// ═══════════════════════════════════════════
// Doctors
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorDraft {
    pub name: String,
    pub crm: String,
    pub specialty: String,
    pub upa_id: String,
}

/// Doctor row with the owning clinic resolved for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRow {
    #[serde(flatten)]
    pub doctor: Doctor,
    pub clinic_name: String,
}

pub fn list_doctors(
    store: &Store,
    scope: &Scope,
    specialty: Option<&str>,
) -> Result<Vec<DoctorRow>, DashboardError> {
    let clinics = store.clinics().load_all()?;
    let doctors = store.doctors().load_all()?;
    Ok(scoped_doctors(scope, &clinics, &doctors, specialty)
        .into_iter()
        .map(|doctor| DoctorRow {
            clinic_name: find_clinic(&clinics, &doctor.upa_id)
                .map_or_else(|| UNBOUND_CLINIC_LABEL.to_string(), |c| c.name.clone()),
            doctor,
        })
        .collect())
}

/// Register a doctor, always active, at an existing clinic in scope.
pub fn create_doctor(store: &Store, scope: &Scope, draft: DoctorDraft) -> Result<Doctor, DashboardError> {
    require(&draft.name, "name")?;
    require(&draft.crm, "crm")?;
    require(&draft.specialty, "specialty")?;
    require(&draft.upa_id, "upa_id")?;

    let clinics = store.clinics().load_all()?;
    let clinic = find_clinic(&clinics, &draft.upa_id)
        .ok_or_else(|| DashboardError::ClinicNotFound(draft.upa_id.clone()))?;
    if !scope.includes_clinic(clinic) {
        return Err(DashboardError::ScopeViolation(format!(
            "clinic {} is outside {scope}",
            clinic.id
        )));
    }

    let doctor = Doctor {
        id: new_record_id(),
        name: draft.name.trim().to_string(),
        crm: draft.crm.trim().to_string(),
        specialty: draft.specialty.trim().to_string(),
        upa_id: clinic.id.clone(),
        active: true,
    };
    store.doctors().append(doctor.clone())?;
    tracing::info!(doctor_id = %doctor.id, clinic_id = %doctor.upa_id, "Doctor registered");
    Ok(doctor)
}

/// Flip the active flag of a doctor visible in `scope`.
pub fn toggle_doctor(store: &Store, scope: &Scope, id: &str) -> Result<Doctor, DashboardError> {
    let clinics = store.clinics().load_all()?;
    let doctor = store.doctors().mutate(|doctors| {
        let doctor = doctors
            .iter_mut()
            .find(|d| d.id == id && scope.includes_clinic_id(&clinics, &d.upa_id))
            .ok_or_else(|| DashboardError::DoctorNotFound(id.to_string()))?;
        doctor.active = !doctor.active;
        Ok::<_, DashboardError>(doctor.clone())
    })?;
    tracing::info!(doctor_id = id, active = doctor.active, "Doctor status toggled");
    Ok(doctor)
}
