//! Repository layer: one typed collection per entity.
//!
//! Each collection is a JSON array stored whole under a fixed key. Every
//! operation runs under the store mutex, which is the single-writer guard:
//! `mutate` holds it across load → transform → save, so two writers can
//! never interleave a read-modify-write cycle.

use std::marker::PhantomData;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{kv, sqlite, DatabaseError};
use crate::models::{Appointment, Clinic, Doctor};
use crate::reference;

/// A record type persisted as one whole collection.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Key of the collection in the key-value store.
    const KEY: &'static str;

    /// Collection written the first time an absent key is read.
    /// `None` means an absent key simply reads as empty.
    fn seed() -> Option<Vec<Self>> {
        None
    }
}

impl Record for Appointment {
    const KEY: &'static str = "upa_appointments";
}

impl Record for Clinic {
    const KEY: &'static str = "upa_list";

    fn seed() -> Option<Vec<Self>> {
        Some(reference::seed_clinics())
    }
}

impl Record for Doctor {
    const KEY: &'static str = "doctor_list";
}

// ═══════════════════════════════════════════════════════════
// Store
// ═══════════════════════════════════════════════════════════

/// Local persisted store holding every collection.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open (or create) the on-disk store and run migrations.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self::new(sqlite::open_database(path)?))
    }

    /// In-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::new(sqlite::open_memory_database()?))
    }

    pub fn collection<T: Record>(&self) -> Collection<'_, T> {
        Collection {
            store: self,
            _record: PhantomData,
        }
    }

    pub fn appointments(&self) -> Collection<'_, Appointment> {
        self.collection()
    }

    pub fn clinics(&self) -> Collection<'_, Clinic> {
        self.collection()
    }

    pub fn doctors(&self) -> Collection<'_, Doctor> {
        self.collection()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }
}

// ═══════════════════════════════════════════════════════════
// Collection handle
// ═══════════════════════════════════════════════════════════

/// Typed handle over one persisted collection.
pub struct Collection<'a, T: Record> {
    store: &'a Store,
    _record: PhantomData<T>,
}

impl<T: Record> Collection<'_, T> {
    /// Read the whole collection. Corrupted data reads as empty.
    pub fn load_all(&self) -> Result<Vec<T>, DatabaseError> {
        let conn = self.store.lock()?;
        load_locked(&conn)
    }

    /// Overwrite the whole collection.
    pub fn save_all(&self, items: &[T]) -> Result<(), DatabaseError> {
        let conn = self.store.lock()?;
        save_locked(&conn, items)
    }

    /// Load, transform and save under one lock. Nothing is written when
    /// `apply` returns an error.
    pub fn mutate<R, E>(&self, apply: impl FnOnce(&mut Vec<T>) -> Result<R, E>) -> Result<R, E>
    where
        E: From<DatabaseError>,
    {
        let conn = self.store.lock()?;
        let mut items = load_locked::<T>(&conn)?;
        let outcome = apply(&mut items)?;
        save_locked(&conn, &items)?;
        Ok(outcome)
    }

    /// Append one record.
    pub fn append(&self, item: T) -> Result<(), DatabaseError> {
        self.mutate(|items| {
            items.push(item);
            Ok::<_, DatabaseError>(())
        })
    }
}

fn load_locked<T: Record>(conn: &Connection) -> Result<Vec<T>, DatabaseError> {
    match kv::get_value(conn, T::KEY)? {
        None => match T::seed() {
            Some(seed) => {
                save_locked(conn, &seed)?;
                tracing::info!(key = T::KEY, count = seed.len(), "Seeded collection");
                Ok(seed)
            }
            None => Ok(Vec::new()),
        },
        Some(raw) => match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(key = T::KEY, "Corrupted collection, reading as empty: {e}");
                Ok(Vec::new())
            }
        },
    }
}

fn save_locked<T: Record>(conn: &Connection, items: &[T]) -> Result<(), DatabaseError> {
    let raw = serde_json::to_string(items).map_err(|source| DatabaseError::Serialization {
        key: T::KEY.to_string(),
        source,
    })?;
    kv::put_value(conn, T::KEY, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, NotificationChannel};

    fn test_store() -> Store {
        Store::open_in_memory().unwrap()
    }

    fn make_doctor(id: &str) -> Doctor {
        Doctor {
            id: id.into(),
            name: "Dra. Ana".into(),
            crm: "CRM-RS 1234".into(),
            specialty: "Pediatria".into(),
            upa_id: "5".into(),
            active: true,
        }
    }

    fn make_appointment(id: &str) -> Appointment {
        Appointment {
            id: id.into(),
            patient_name: "João".into(),
            cpf: "111.222.333-44".into(),
            email: String::new(),
            phone: "11999990000".into(),
            upa_id: "1".into(),
            upa_name: "UPA 24h Central".into(),
            specialty: "Clínico Geral".into(),
            date: "2026-10-20".into(),
            time: "08:00".into(),
            status: AppointmentStatus::Scheduled,
            notification_channel: NotificationChannel::Whatsapp,
            rating: None,
            comment: None,
        }
    }

    #[test]
    fn absent_appointments_read_as_empty() {
        let store = test_store();
        assert!(store.appointments().load_all().unwrap().is_empty());
    }

    #[test]
    fn absent_clinics_are_seeded_and_persisted() {
        let store = test_store();
        let clinics = store.clinics().load_all().unwrap();
        assert_eq!(clinics.len(), 6);

        let conn = store.lock().unwrap();
        assert!(kv::get_value(&conn, Clinic::KEY).unwrap().is_some());
    }

    #[test]
    fn seed_only_applies_to_absent_key() {
        let store = test_store();
        store.clinics().save_all(&[]).unwrap();
        assert!(store.clinics().load_all().unwrap().is_empty());
    }

    #[test]
    fn corrupted_collection_reads_as_empty() {
        let store = test_store();
        {
            let conn = store.lock().unwrap();
            kv::put_value(&conn, Doctor::KEY, "{not json").unwrap();
        }
        assert!(store.doctors().load_all().unwrap().is_empty());
    }

    #[test]
    fn corrupted_clinics_read_as_empty_not_seed() {
        let store = test_store();
        {
            let conn = store.lock().unwrap();
            kv::put_value(&conn, Clinic::KEY, "[{\"id\":").unwrap();
        }
        assert!(store.clinics().load_all().unwrap().is_empty());
    }

    #[test]
    fn save_and_load_roundtrip_preserves_order() {
        let store = test_store();
        let doctors = vec![make_doctor("b"), make_doctor("a"), make_doctor("c")];
        store.doctors().save_all(&doctors).unwrap();
        let loaded = store.doctors().load_all().unwrap();
        let ids: Vec<_> = loaded.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn append_adds_to_end() {
        let store = test_store();
        store.appointments().append(make_appointment("1")).unwrap();
        store.appointments().append(make_appointment("2")).unwrap();
        let ids: Vec<_> = store
            .appointments()
            .load_all()
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn failed_mutation_writes_nothing() {
        let store = test_store();
        store.doctors().save_all(&[make_doctor("a")]).unwrap();

        let result: Result<(), DatabaseError> = store.doctors().mutate(|items| {
            items.clear();
            Err(DatabaseError::LockPoisoned)
        });
        assert!(result.is_err());
        assert_eq!(store.doctors().load_all().unwrap().len(), 1);
    }

    #[test]
    fn collections_are_independent() {
        let store = test_store();
        store.doctors().save_all(&[make_doctor("a")]).unwrap();
        assert!(store.appointments().load_all().unwrap().is_empty());
        assert_eq!(store.clinics().load_all().unwrap().len(), 6);
    }

    #[test]
    fn on_disk_store_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("agenda.db");
        {
            let store = Store::open(&path).unwrap();
            store.appointments().append(make_appointment("x")).unwrap();
        }
        let store = Store::open(&path).unwrap();
        assert_eq!(store.appointments().load_all().unwrap().len(), 1);
    }
}
