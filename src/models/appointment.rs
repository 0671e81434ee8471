use serde::{Deserialize, Serialize};

use super::enums::{AppointmentStatus, NotificationChannel};
use crate::national_id;

/// One citizen's booking. `upa_name` is a display copy of the clinic name;
/// anything authoritative resolves through `upa_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_name: String,
    /// National ID (CPF), stored formatted.
    pub cpf: String,
    #[serde(default)]
    pub email: String,
    pub phone: String,
    pub upa_id: String,
    pub upa_name: String,
    pub specialty: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub time: String,
    pub status: AppointmentStatus,
    pub notification_channel: NotificationChannel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Appointment {
    /// Digits-only form of the stored national ID.
    pub fn normalized_cpf(&self) -> String {
        national_id::normalize(&self.cpf)
    }

    pub fn belongs_to(&self, national_id_query: &str) -> bool {
        self.normalized_cpf() == national_id::normalize(national_id_query)
    }

    pub fn can_cancel(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }

    pub fn can_complete(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }

    pub fn can_rate(&self) -> bool {
        self.status == AppointmentStatus::Completed && self.rating.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Appointment {
        Appointment {
            id: "abc123xyz".into(),
            patient_name: "Maria Silva".into(),
            cpf: "123.456.789-01".into(),
            email: String::new(),
            phone: "51999990000".into(),
            upa_id: "5".into(),
            upa_name: "UPA Moacyr Scliar".into(),
            specialty: "Pediatria".into(),
            date: "2026-10-18".into(),
            time: "09:00".into(),
            status: AppointmentStatus::Scheduled,
            notification_channel: NotificationChannel::Sms,
            rating: None,
            comment: None,
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["upaId"], "5");
        assert_eq!(json["patientName"], "Maria Silva");
        assert_eq!(json["notificationChannel"], "sms");
        assert!(json.get("rating").is_none());
    }

    #[test]
    fn deserializes_record_without_email_or_rating() {
        let raw = r#"{"id":"x","patientName":"A","cpf":"111.222.333-44","phone":"1",
            "upaId":"1","upaName":"UPA 24h Central","specialty":"Pediatria",
            "date":"2026-01-01","time":"08:00","status":"completed",
            "notificationChannel":"both"}"#;
        let appt: Appointment = serde_json::from_str(raw).unwrap();
        assert_eq!(appt.email, "");
        assert!(appt.can_rate());
    }

    #[test]
    fn belongs_to_ignores_formatting() {
        let appt = sample();
        assert!(appt.belongs_to("12345678901"));
        assert!(appt.belongs_to("123.456.789-01"));
        assert!(!appt.belongs_to("123.456.789-02"));
    }

    #[test]
    fn action_availability_follows_status() {
        let mut appt = sample();
        assert!(appt.can_cancel() && appt.can_complete() && !appt.can_rate());
        appt.status = AppointmentStatus::Completed;
        assert!(!appt.can_cancel() && appt.can_rate());
        appt.rating = Some(4);
        assert!(!appt.can_rate());
    }
}
