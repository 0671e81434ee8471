use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The wire string doubles as the serde representation.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(AppointmentStatus {
    Scheduled => "scheduled",
    Canceled => "canceled",
    Completed => "completed",
});

impl AppointmentStatus {
    /// Badge text shown next to an appointment.
    pub fn display_label(&self) -> &'static str {
        match self {
            Self::Scheduled => "AGENDADO",
            Self::Canceled => "CANCELADO",
            Self::Completed => "REALIZADO",
        }
    }
}

str_enum!(NotificationChannel {
    Sms => "sms",
    Whatsapp => "whatsapp",
    Both => "both",
});

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::Whatsapp
    }
}

str_enum!(WaitTime {
    Low => "Baixo",
    Medium => "Médio",
    High => "Alto",
});

impl Default for WaitTime {
    fn default() -> Self {
        Self::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&AppointmentStatus::Canceled).unwrap();
        assert_eq!(json, "\"canceled\"");
        let back: AppointmentStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(back, AppointmentStatus::Completed);
    }

    #[test]
    fn wait_time_uses_portuguese_labels() {
        let json = serde_json::to_string(&WaitTime::Medium).unwrap();
        assert_eq!(json, "\"Médio\"");
        assert_eq!(WaitTime::from_str("Alto").unwrap(), WaitTime::High);
    }

    #[test]
    fn unknown_channel_is_rejected() {
        let err = NotificationChannel::from_str("pigeon").unwrap_err();
        assert!(err.to_string().contains("NotificationChannel"));
    }

    #[test]
    fn defaults_follow_booking_form() {
        assert_eq!(NotificationChannel::default(), NotificationChannel::Whatsapp);
        assert_eq!(WaitTime::default(), WaitTime::Medium);
    }

    #[test]
    fn status_display_labels() {
        assert_eq!(AppointmentStatus::Scheduled.display_label(), "AGENDADO");
        assert_eq!(AppointmentStatus::Canceled.display_label(), "CANCELADO");
        assert_eq!(AppointmentStatus::Completed.display_label(), "REALIZADO");
    }
}
