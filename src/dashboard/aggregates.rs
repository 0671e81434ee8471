//! Figures derived from the scoped appointments, recomputed per query.

use serde::Serialize;

use super::scope::{scoped_appointments, scoped_clinics, Scope};
use crate::models::{Appointment, AppointmentStatus, Clinic};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub scheduled: usize,
    pub canceled: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClinicVolume {
    pub name: String,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub scope_label: String,
    pub clinics_in_scope: usize,
    pub total_appointments: usize,
    pub status_counts: StatusCounts,
    pub clinic_volume: Vec<ClinicVolume>,
    pub average_rating: String,
}

pub fn status_counts(appointments: &[Appointment]) -> StatusCounts {
    appointments
        .iter()
        .fold(StatusCounts::default(), |mut counts, a| {
            match a.status {
                AppointmentStatus::Scheduled => counts.scheduled += 1,
                AppointmentStatus::Canceled => counts.canceled += 1,
                AppointmentStatus::Completed => counts.completed += 1,
            }
            counts
        })
}

/// Appointment count per clinic display name, in order of first appearance.
pub fn clinic_volume(appointments: &[Appointment]) -> Vec<ClinicVolume> {
    let mut volume: Vec<ClinicVolume> = Vec::new();
    for a in appointments {
        match volume.iter_mut().find(|v| v.name == a.upa_name) {
            Some(entry) => entry.total += 1,
            None => volume.push(ClinicVolume {
                name: a.upa_name.clone(),
                total: 1,
            }),
        }
    }
    volume
}

/// Mean of present ratings with one decimal; "0.0" when nothing is rated.
pub fn average_rating(appointments: &[Appointment]) -> String {
    let ratings: Vec<u32> = appointments
        .iter()
        .filter_map(|a| a.rating.map(u32::from))
        .collect();
    if ratings.is_empty() {
        return "0.0".to_string();
    }
    // Tenths rounded half-up in integer arithmetic: 4.25 shows as "4.3".
    let sum = u64::from(ratings.iter().sum::<u32>());
    let count = ratings.len() as u64;
    let tenths = (sum * 20 + count) / (count * 2);
    format!("{}.{}", tenths / 10, tenths % 10)
}

pub fn summarize(scope: &Scope, clinics: &[Clinic], appointments: &[Appointment]) -> DashboardSummary {
    let visible = scoped_appointments(scope, clinics, appointments);
    DashboardSummary {
        scope_label: scope.label(clinics),
        clinics_in_scope: scoped_clinics(scope, clinics).len(),
        total_appointments: visible.len(),
        status_counts: status_counts(&visible),
        clinic_volume: clinic_volume(&visible),
        average_rating: average_rating(&visible),
    }
}
