//! Referential checks between appointments and the patient/doctor stores.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Appointment, Doctor, Patient};
use crate::store::{Entity, EntityStore};

/// Reference errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("Invalid patient reference: {0}")]
    InvalidPatient(i32),

    #[error("Invalid doctor reference: {0}")]
    InvalidDoctor(i32),
}

pub type LinkResult<T> = Result<T, LinkError>;

/// Which end of an appointment no longer resolves.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DanglingEnd {
    Patient,
    Doctor,
}

/// An appointment pointing at a record that no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DanglingReference {
    pub appointment_id: i32,
    pub end: DanglingEnd,
    pub referenced_id: i32,
}

/// Checks appointment endpoints against the live stores.
pub struct ReferentialLinker<'a> {
    patients: &'a EntityStore<Patient>,
    doctors: &'a EntityStore<Doctor>,
}

impl<'a> ReferentialLinker<'a> {
    pub fn new(patients: &'a EntityStore<Patient>, doctors: &'a EntityStore<Doctor>) -> Self {
        Self { patients, doctors }
    }

    /// Both ends must exist and be active. The patient is checked first.
    pub fn validate_appointment_endpoints(&self, patient_id: i32, doctor_id: i32) -> LinkResult<()> {
        if !is_live(self.patients, patient_id) {
            return Err(LinkError::InvalidPatient(patient_id));
        }
        if !is_live(self.doctors, doctor_id) {
            return Err(LinkError::InvalidDoctor(doctor_id));
        }
        Ok(())
    }

    /// Appointments whose patient or doctor was permanently deleted.
    ///
    /// A discharged or deactivated endpoint still resolves. References are
    /// only enforced at creation, so these are reported, never repaired.
    pub fn dangling(&self, appointments: &EntityStore<Appointment>) -> Vec<DanglingReference> {
        let mut found = Vec::new();
        for appt in appointments.iter() {
            if !exists(self.patients, appt.patient_id) {
                found.push(DanglingReference {
                    appointment_id: appt.id,
                    end: DanglingEnd::Patient,
                    referenced_id: appt.patient_id,
                });
            }
            if !exists(self.doctors, appt.doctor_id) {
                found.push(DanglingReference {
                    appointment_id: appt.id,
                    end: DanglingEnd::Doctor,
                    referenced_id: appt.doctor_id,
                });
            }
        }
        found
    }
}

fn is_live<T: Entity>(store: &EntityStore<T>, id: i32) -> bool {
    store.iter().any(|r| r.id() == id && r.is_active())
}

fn exists<T: Entity>(store: &EntityStore<T>, id: i32) -> bool {
    store.find_by_id(id).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    fn stores() -> (EntityStore<Patient>, EntityStore<Doctor>) {
        let mut patients = EntityStore::new();
        patients
            .add(Patient::new("Alice", 30, Gender::Female, "01712345678", "Dhaka", "A+"))
            .unwrap();
        patients
            .add(Patient::new("Bob", 52, Gender::Male, "01812345678", "Sylhet", "B+"))
            .unwrap();
        patients.deactivate(1002).unwrap();

        let mut doctors = EntityStore::new();
        doctors
            .add(Doctor::new("Ana Rahman", "01912345678", "ana@clinic.org", "Cardiology", 12))
            .unwrap();
        (patients, doctors)
    }

    #[test]
    fn test_valid_endpoints() {
        let (patients, doctors) = stores();
        let linker = ReferentialLinker::new(&patients, &doctors);
        assert_eq!(linker.validate_appointment_endpoints(1001, 2001), Ok(()));
    }

    #[test]
    fn test_missing_or_inactive_patient() {
        let (patients, doctors) = stores();
        let linker = ReferentialLinker::new(&patients, &doctors);
        assert_eq!(
            linker.validate_appointment_endpoints(1999, 2001),
            Err(LinkError::InvalidPatient(1999))
        );
        assert_eq!(
            linker.validate_appointment_endpoints(1002, 2001),
            Err(LinkError::InvalidPatient(1002))
        );
    }

    #[test]
    fn test_patient_checked_before_doctor() {
        let (patients, doctors) = stores();
        let linker = ReferentialLinker::new(&patients, &doctors);
        assert_eq!(
            linker.validate_appointment_endpoints(1999, 2999),
            Err(LinkError::InvalidPatient(1999))
        );
        assert_eq!(
            linker.validate_appointment_endpoints(1001, 2999),
            Err(LinkError::InvalidDoctor(2999))
        );
    }

    #[test]
    fn test_dangling_after_hard_delete() {
        let (mut patients, mut doctors) = stores();
        let mut appointments = EntityStore::new();
        appointments
            .add(Appointment::new(1001, 2001, "01-01-2025", "10:00 AM", "Checkup"))
            .unwrap();

        assert!(ReferentialLinker::new(&patients, &doctors)
            .dangling(&appointments)
            .is_empty());

        patients.deactivate(1001).unwrap();
        doctors.deactivate(2001).unwrap();
        // inactive records still resolve
        assert!(ReferentialLinker::new(&patients, &doctors)
            .dangling(&appointments)
            .is_empty());

        patients.hard_delete(1001).unwrap();
        doctors.hard_delete(2001).unwrap();

        let dangling = ReferentialLinker::new(&patients, &doctors).dangling(&appointments);
        assert_eq!(
            dangling,
            vec![
                DanglingReference {
                    appointment_id: 5001,
                    end: DanglingEnd::Patient,
                    referenced_id: 1001,
                },
                DanglingReference {
                    appointment_id: 5001,
                    end: DanglingEnd::Doctor,
                    referenced_id: 2001,
                },
            ]
        );
    }
}
