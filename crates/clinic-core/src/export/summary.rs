//! Record counts across the clinic.

use serde::{Deserialize, Serialize};

use crate::clinic::Clinic;
use crate::linker::DanglingReference;
use crate::models::AppointmentStatus;
use crate::store::{Entity, EntityStore};

/// Counters of a single store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreCounts {
    pub count: usize,
    pub available: usize,
    pub unavailable: usize,
    pub capacity: usize,
}

impl StoreCounts {
    pub fn of<T: Entity>(store: &EntityStore<T>) -> Self {
        Self {
            count: store.len(),
            available: store.available(),
            unavailable: store.unavailable(),
            capacity: store.capacity(),
        }
    }
}

/// Appointments per status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub confirmed: usize,
    pub completed: usize,
    pub cancelled: usize,
}

/// Snapshot of everything the clinic holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicSummary {
    /// Generation timestamp
    pub generated_at: String,
    pub patients: StoreCounts,
    pub doctors: StoreCounts,
    pub receptionists: StoreCounts,
    pub users: StoreCounts,
    pub appointments: StoreCounts,
    pub appointment_status: StatusCounts,
    /// Doctors that are active and on duty
    pub doctors_on_duty: usize,
    pub dangling: Vec<DanglingReference>,
}

impl ClinicSummary {
    pub fn from_clinic(clinic: &Clinic) -> Self {
        let mut status = StatusCounts::default();
        for appt in clinic.appointments().iter() {
            match appt.status {
                AppointmentStatus::Pending => status.pending += 1,
                AppointmentStatus::Confirmed => status.confirmed += 1,
                AppointmentStatus::Completed => status.completed += 1,
                AppointmentStatus::Cancelled => status.cancelled += 1,
            }
        }

        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            patients: StoreCounts::of(clinic.patients()),
            doctors: StoreCounts::of(clinic.doctors()),
            receptionists: StoreCounts::of(clinic.receptionists()),
            users: StoreCounts::of(clinic.users()),
            appointments: StoreCounts::of(clinic.appointments()),
            appointment_status: status,
            doctors_on_duty: clinic.on_duty_doctors().len(),
            dangling: clinic.dangling_appointments(),
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClinicConfig;
    use crate::models::{Appointment, Doctor, Gender, Patient};

    #[test]
    fn test_summary_counts() {
        let mut clinic = Clinic::open_in_memory(ClinicConfig::default()).unwrap();
        clinic
            .add_patient(Patient::new("Alice", 30, Gender::Female, "01712345678", "Dhaka", "A+"))
            .unwrap();
        clinic
            .add_patient(Patient::new("Bob", 41, Gender::Male, "01812345678", "Khulna", "O-"))
            .unwrap();
        clinic
            .add_doctor(Doctor::new("Ana Rahman", "01912345678", "ana@clinic.org", "Cardiology", 12))
            .unwrap();
        let first = clinic
            .create_appointment(Appointment::new(1001, 2001, "01-01-2025", "10:00 AM", "Checkup"))
            .unwrap();
        clinic
            .create_appointment(Appointment::new(1002, 2001, "01-01-2025", "11:00 AM", "Fever"))
            .unwrap();
        clinic.complete_appointment(first).unwrap();
        clinic.discharge_patient(1002).unwrap();
        clinic.delete_patient_permanently(1002).unwrap();

        let summary = ClinicSummary::from_clinic(&clinic);
        assert_eq!(
            summary.patients,
            StoreCounts {
                count: 1,
                available: 1,
                unavailable: 0,
                capacity: 100,
            }
        );
        assert_eq!(summary.users.count, 1);
        assert_eq!(summary.appointments.count, 2);
        assert_eq!(summary.appointment_status.pending, 1);
        assert_eq!(summary.appointment_status.completed, 1);
        assert_eq!(summary.doctors_on_duty, 1);
        assert_eq!(summary.dangling.len(), 1);
        assert_eq!(summary.dangling[0].referenced_id, 1002);

        let json = summary.to_json().unwrap();
        assert!(json.contains("\"appointment_status\""));
        assert!(json.contains("\"generated_at\""));
    }
}
