//! Static reference data: regions and cities, seed clinics, specialty
//! vocabulary and the half-hour slot list.

use serde::Serialize;

use crate::models::{Clinic, WaitTime};

// ═══════════════════════════════════════════
// Locations
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Region {
    pub state: &'static str,
    pub cities: &'static [&'static str],
}

pub const REGIONS: &[Region] = &[
    Region {
        state: "SP",
        cities: &["São Paulo", "Campinas", "Santos", "Ribeirão Preto"],
    },
    Region {
        state: "RJ",
        cities: &["Rio de Janeiro", "Niterói", "Duque de Caxias"],
    },
    Region {
        state: "MG",
        cities: &["Belo Horizonte", "Uberlândia", "Contagem"],
    },
    Region {
        state: "RS",
        cities: &["Porto Alegre", "Caxias do Sul"],
    },
    Region {
        state: "BA",
        cities: &["Salvador", "Feira de Santana"],
    },
];

pub fn find_region(state: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.state == state)
}

/// Cities of a region; empty for an unknown region.
pub fn cities_of(state: &str) -> &'static [&'static str] {
    find_region(state).map(|r| r.cities).unwrap_or(&[])
}

// ═══════════════════════════════════════════
// Specialties and slots
// ═══════════════════════════════════════════

/// Generic specialty every new clinic starts with.
pub const GENERIC_SPECIALTY: &str = "Clínico Geral";

pub const SPECIALTIES: &[&str] = &[
    "Clínico Geral",
    "Pediatria",
    "Ortopedia",
    "Cardiologia",
    "Odontologia de Emergência",
    "Enfermagem",
];

pub fn is_known_specialty(name: &str) -> bool {
    SPECIALTIES.contains(&name)
}

pub const TIME_SLOTS: &[&str] = &[
    "08:00", "08:30", "09:00", "09:30", "10:00", "10:30",
    "11:00", "11:30", "13:00", "13:30", "14:00", "14:30",
    "15:00", "15:30", "16:00", "16:30",
];

pub fn is_time_slot(time: &str) -> bool {
    TIME_SLOTS.contains(&time)
}

// ═══════════════════════════════════════════
// Seed clinics
// ═══════════════════════════════════════════

/// Clinic collection written the first time it is read from an empty store.
pub fn seed_clinics() -> Vec<Clinic> {
    fn clinic(
        id: &str,
        name: &str,
        city: &str,
        state: &str,
        address: &str,
        specialties: &[&str],
        waiting_time: WaitTime,
    ) -> Clinic {
        Clinic {
            id: id.into(),
            name: name.into(),
            city: city.into(),
            state: state.into(),
            address: address.into(),
            specialties: specialties.iter().map(|s| s.to_string()).collect(),
            waiting_time,
        }
    }

    vec![
        clinic(
            "1",
            "UPA 24h Central",
            "São Paulo",
            "SP",
            "Av. Ipiranga, 1234",
            &["Clínico Geral", "Pediatria", "Ortopedia"],
            WaitTime::Medium,
        ),
        clinic(
            "2",
            "UPA Norte",
            "São Paulo",
            "SP",
            "Rua das Flores, 500",
            &["Clínico Geral", "Pediatria"],
            WaitTime::Low,
        ),
        clinic(
            "3",
            "UPA Copacabana",
            "Rio de Janeiro",
            "RJ",
            "Av. Atlântica, 99",
            &["Clínico Geral", "Cardiologia"],
            WaitTime::High,
        ),
        clinic(
            "4",
            "UPA Pampulha",
            "Belo Horizonte",
            "MG",
            "Av. Fleming, 202",
            &["Clínico Geral", "Pediatria", "Odontologia"],
            WaitTime::Low,
        ),
        clinic(
            "5",
            "UPA Moacyr Scliar",
            "Porto Alegre",
            "RS",
            "Rua Jerônimo de Ornelas, 100",
            &["Clínico Geral", "Pediatria", "Traumatologia"],
            WaitTime::Medium,
        ),
        clinic(
            "6",
            "UPA Bom Jesus",
            "Porto Alegre",
            "RS",
            "Rua Bom Jesus, 410",
            &["Clínico Geral", "Enfermagem"],
            WaitTime::Low,
        ),
    ]
}
