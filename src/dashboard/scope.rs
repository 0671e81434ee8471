//! Visibility scopes and the per-collection filters.
//!
//! Appointments and doctors carry only a clinic id. Each record is resolved
//! against the full clinic list on every query; a record whose clinic no
//! longer resolves is visible under Global only.

use serde::Serialize;

use super::DashboardError;
use crate::models::{Appointment, Clinic, Doctor};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Global,
    /// One state (UF), e.g. "SP".
    Region(String),
    /// One clinic id.
    Clinic(String),
}

/// Preset offered by the role switcher.
#[derive(Debug, Clone, Serialize)]
pub struct ScopePreset {
    pub label: &'static str,
    pub role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_id: Option<&'static str>,
}

pub const SCOPE_PRESETS: &[ScopePreset] = &[
    ScopePreset {
        label: "Global",
        role: "global",
        region: None,
        clinic_id: None,
    },
    ScopePreset {
        label: "Secr. SP",
        role: "region",
        region: Some("SP"),
        clinic_id: None,
    },
    ScopePreset {
        label: "UPA Central",
        role: "clinic",
        region: None,
        clinic_id: Some("1"),
    },
];

impl Scope {
    /// Build a scope from query parameters. No role means Global.
    pub fn from_params(
        role: Option<&str>,
        region: Option<&str>,
        clinic_id: Option<&str>,
    ) -> Result<Self, DashboardError> {
        fn non_empty(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|v| !v.is_empty())
        }
        match role.map(str::trim) {
            None | Some("") | Some("global") => Ok(Self::Global),
            Some("region") => non_empty(region)
                .map(|r| Self::Region(r.to_string()))
                .ok_or_else(|| DashboardError::InvalidScope("region scope needs a region".into())),
            Some("clinic") => non_empty(clinic_id)
                .map(|id| Self::Clinic(id.to_string()))
                .ok_or_else(|| DashboardError::InvalidScope("clinic scope needs a clinic_id".into())),
            Some(other) => Err(DashboardError::InvalidScope(format!("unknown role {other}"))),
        }
    }

    /// Header label of the current view.
    pub fn label(&self, clinics: &[Clinic]) -> String {
        match self {
            Self::Global => "Administrador Federal (SUS)".to_string(),
            Self::Region(state) => format!("Secretaria Estadual de Saúde ({state})"),
            Self::Clinic(id) => {
                let name = find_clinic(clinics, id).map_or("Unidade", |c| c.name.as_str());
                format!("Gestor: {name}")
            }
        }
    }

    pub fn can_create_clinics(&self) -> bool {
        !matches!(self, Self::Clinic(_))
    }

    pub fn includes_clinic(&self, clinic: &Clinic) -> bool {
        match self {
            Self::Global => true,
            Self::Region(state) => &clinic.state == state,
            Self::Clinic(id) => &clinic.id == id,
        }
    }

    /// Resolve `clinic_id` and test it against the scope.
    pub fn includes_clinic_id(&self, clinics: &[Clinic], clinic_id: &str) -> bool {
        match self {
            Self::Global => true,
            _ => find_clinic(clinics, clinic_id).is_some_and(|c| self.includes_clinic(c)),
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Region(state) => write!(f, "region:{state}"),
            Self::Clinic(id) => write!(f, "clinic:{id}"),
        }
    }
}

pub fn find_clinic<'a>(clinics: &'a [Clinic], id: &str) -> Option<&'a Clinic> {
    clinics.iter().find(|c| c.id == id)
}

pub fn scoped_clinics(scope: &Scope, clinics: &[Clinic]) -> Vec<Clinic> {
    clinics
        .iter()
        .filter(|c| scope.includes_clinic(c))
        .cloned()
        .collect()
}

pub fn scoped_appointments(
    scope: &Scope,
    clinics: &[Clinic],
    appointments: &[Appointment],
) -> Vec<Appointment> {
    appointments
        .iter()
        .filter(|a| scope.includes_clinic_id(clinics, &a.upa_id))
        .cloned()
        .collect()
}

/// Scoped doctors, optionally narrowed to one exact specialty.
pub fn scoped_doctors(
    scope: &Scope,
    clinics: &[Clinic],
    doctors: &[Doctor],
    specialty: Option<&str>,
) -> Vec<Doctor> {
    let specialty = specialty.filter(|s| !s.is_empty());
    doctors
        .iter()
        .filter(|d| scope.includes_clinic_id(clinics, &d.upa_id))
        .filter(|d| specialty.map_or(true, |s| d.specialty == s))
        .cloned()
        .collect()
}
