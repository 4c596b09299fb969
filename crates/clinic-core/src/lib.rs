//! Clinic Records Core Library
//!
//! Record keeping for a small clinic: patients, doctors, receptionists,
//! user accounts and appointments, held in bounded in-memory stores and
//! persisted as flat binary snapshots (one file per entity type).
//!
//! # Architecture
//!
//! ```text
//!             ClinicCore (FFI, Arc<Mutex<_>>)
//!                          │
//!                       Clinic ──────────── ReferentialLinker
//!                          │                        │
//!   ┌──────────┬───────────┼────────────┬───────────┘
//!   ▼          ▼           ▼            ▼           ▼
//! patients  doctors  receptionists  AuthStore  appointments
//!   └──────────┴───────────┼────────────┴───────────┘
//!                          ▼
//!                EntityStore<T> + IdPolicy
//!                          │
//!                     codec (save / load)
//!                          │
//!               <data_dir>/<entity>.dat
//! ```
//!
//! Every successful mutation rewrites the snapshot of the store it touched.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, Doctor, Appointment, etc.)
//! - [`store`]: Bounded entity stores and id generation
//! - [`codec`]: Fixed-layout binary snapshots
//! - [`linker`]: Appointment reference checks
//! - [`auth`]: Registration and login
//! - [`clinic`]: The aggregate repository
//! - [`export`]: Summary and roster reports
//! - [`config`], [`log`]: Runtime configuration and logging

pub mod auth;
pub mod clinic;
pub mod codec;
pub mod config;
pub mod export;
pub mod linker;
pub mod log;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use auth::{AuthError, AuthStore};
pub use clinic::{Clinic, ClinicError, ClinicResult};
pub use codec::CodecError;
pub use config::{ClinicConfig, ConfigError, LogConfig};
pub use export::{ClinicSummary, RosterExport};
pub use linker::{DanglingReference, LinkError, ReferentialLinker};
pub use models::{
    Appointment, AppointmentAction, AppointmentStatus, Doctor, DoctorUpdate, EntityKind, Gender,
    Patient, PatientUpdate, Receptionist, Role, User,
};
pub use store::{EntityStore, IdPolicy, StoreError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicFfiError {
    #[error("Capacity reached: {0}")]
    Capacity(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Duplicate username: {0}")]
    DuplicateUsername(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<StoreError> for ClinicFfiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Capacity { .. } => ClinicFfiError::Capacity(e.to_string()),
            StoreError::NotFound { .. } => ClinicFfiError::NotFound(e.to_string()),
            StoreError::AlreadyInactive { .. } | StoreError::StillActive { .. } => {
                ClinicFfiError::InvalidState(e.to_string())
            }
            StoreError::FieldTooLong { .. }
            | StoreError::FieldContainsNul { .. }
            | StoreError::Immutable { .. } => ClinicFfiError::InvalidInput(e.to_string()),
        }
    }
}

impl From<AuthError> for ClinicFfiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::DuplicateUsername(name) => ClinicFfiError::DuplicateUsername(name),
            AuthError::InvalidCredentials => ClinicFfiError::InvalidCredentials,
            AuthError::InvalidInput(msg) => ClinicFfiError::InvalidInput(msg),
            AuthError::Store(e) => e.into(),
        }
    }
}

impl From<ConfigError> for ClinicFfiError {
    fn from(e: ConfigError) -> Self {
        ClinicFfiError::InvalidInput(e.to_string())
    }
}

impl From<ClinicError> for ClinicFfiError {
    fn from(e: ClinicError) -> Self {
        match e {
            ClinicError::Store(e) => e.into(),
            ClinicError::Auth(e) => e.into(),
            ClinicError::Config(e) => e.into(),
            ClinicError::Link(e) => ClinicFfiError::InvalidReference(e.to_string()),
            ClinicError::InvalidTransition { .. } | ClinicError::NotOwner { .. } => {
                ClinicFfiError::InvalidState(e.to_string())
            }
            ClinicError::DataDir { .. } | ClinicError::Persist { .. } => {
                ClinicFfiError::Persistence(e.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for ClinicFfiError {
    fn from(e: serde_json::Error) -> Self {
        ClinicFfiError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicFfiError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicFfiError::Persistence(format!("Lock poisoned: {}", e))
    }
}

/// `NotFound` becomes `None`, everything else stays an error.
fn optional<T>(result: ClinicResult<T>) -> Result<Option<T>, ClinicFfiError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ClinicError::Store(StoreError::NotFound { .. })) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a clinic in `data_dir`.
///
/// `CLINIC_LOG_LEVEL` is honoured; the data directory argument wins over
/// `CLINIC_DATA_DIR`.
#[uniffi::export]
pub fn open_clinic(data_dir: String) -> Result<Arc<ClinicCore>, ClinicFfiError> {
    let config = ClinicConfig::from_env()?.with_data_dir(data_dir);
    open_with(config)
}

/// Open a clinic described by a JSON config document.
#[uniffi::export]
pub fn open_clinic_with_config(config_json: String) -> Result<Arc<ClinicCore>, ClinicFfiError> {
    let config = ClinicConfig::from_json(&config_json)?;
    open_with(config)
}

/// Create an in-memory clinic (for testing).
#[uniffi::export]
pub fn open_clinic_in_memory() -> Result<Arc<ClinicCore>, ClinicFfiError> {
    let clinic = Clinic::open_in_memory(ClinicConfig::default())?;
    Ok(Arc::new(ClinicCore {
        clinic: Arc::new(Mutex::new(clinic)),
    }))
}

fn open_with(config: ClinicConfig) -> Result<Arc<ClinicCore>, ClinicFfiError> {
    log::init(&config.log);
    let clinic = Clinic::open(config)?;
    Ok(Arc::new(ClinicCore {
        clinic: Arc::new(Mutex::new(clinic)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe clinic wrapper for FFI.
#[derive(uniffi::Object)]
pub struct ClinicCore {
    clinic: Arc<Mutex<Clinic>>,
}

#[uniffi::export]
impl ClinicCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Admit a new patient.
    pub fn add_patient(
        &self,
        name: String,
        age: i32,
        gender: FfiGender,
        phone: String,
        address: String,
        blood_group: String,
    ) -> Result<FfiPatient, ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        let patient = Patient::new(name, age, gender.into(), phone, address, blood_group);
        let id = clinic.add_patient(patient)?;
        Ok(clinic.get_patient(id)?.into())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: i32) -> Result<Option<FfiPatient>, ClinicFfiError> {
        let clinic = self.clinic.lock()?;
        Ok(optional(clinic.get_patient(id))?.map(|p| p.into()))
    }

    /// Find a patient by name (case and spacing ignored).
    pub fn find_patient_by_name(&self, name: String) -> Result<Option<FfiPatient>, ClinicFfiError> {
        let clinic = self.clinic.lock()?;
        Ok(optional(clinic.find_patient_by_name(&name))?.map(|p| p.into()))
    }

    pub fn find_patient_by_phone(&self, phone: String) -> Result<Option<FfiPatient>, ClinicFfiError> {
        let clinic = self.clinic.lock()?;
        Ok(optional(clinic.find_patient_by_phone(&phone))?.map(|p| p.into()))
    }

    /// Apply a single field edit.
    pub fn update_patient(
        &self,
        id: i32,
        update: FfiPatientUpdate,
    ) -> Result<FfiPatient, ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        let patient = clinic.update_patient(id, update.into())?;
        Ok((&patient).into())
    }

    pub fn discharge_patient(&self, id: i32) -> Result<(), ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.discharge_patient(id)?)
    }

    pub fn delete_patient_permanently(&self, id: i32) -> Result<(), ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        clinic.delete_patient_permanently(id)?;
        Ok(())
    }

    /// Active patients, or discharged ones.
    pub fn list_patients(&self, discharged: bool) -> Result<Vec<FfiPatient>, ClinicFfiError> {
        let clinic = self.clinic.lock()?;
        let patients = if discharged {
            clinic.discharged_patients()
        } else {
            clinic.active_patients()
        };
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    // =========================================================================
    // Doctor Operations
    // =========================================================================

    /// Add a doctor profile without a login account.
    pub fn add_doctor(
        &self,
        name: String,
        phone: String,
        email: String,
        specialization: String,
        room_number: i32,
    ) -> Result<FfiDoctor, ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        let doctor = Doctor::new(name, phone, email, specialization, room_number);
        let id = clinic.add_doctor(doctor)?;
        Ok(clinic.get_doctor(id)?.into())
    }

    pub fn get_doctor(&self, id: i32) -> Result<Option<FfiDoctor>, ClinicFfiError> {
        let clinic = self.clinic.lock()?;
        Ok(optional(clinic.get_doctor(id))?.map(|d| d.into()))
    }

    pub fn set_doctor_on_duty(&self, id: i32, on_duty: bool) -> Result<FfiDoctor, ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        let doctor = clinic.set_doctor_on_duty(id, on_duty)?;
        Ok((&doctor).into())
    }

    pub fn deactivate_doctor(&self, id: i32) -> Result<(), ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.deactivate_doctor(id)?)
    }

    pub fn delete_doctor_permanently(&self, id: i32) -> Result<(), ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        clinic.delete_doctor_permanently(id)?;
        Ok(())
    }

    pub fn list_doctors(&self, inactive: bool) -> Result<Vec<FfiDoctor>, ClinicFfiError> {
        let clinic = self.clinic.lock()?;
        let doctors = if inactive {
            clinic.inactive_doctors()
        } else {
            clinic.active_doctors()
        };
        Ok(doctors.into_iter().map(|d| d.into()).collect())
    }

    // =========================================================================
    // Receptionist Operations
    // =========================================================================

    pub fn add_receptionist(
        &self,
        name: String,
        phone: String,
        email: String,
    ) -> Result<i32, ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.add_receptionist(Receptionist::new(name, phone, email))?)
    }

    pub fn deactivate_receptionist(&self, id: i32) -> Result<(), ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.deactivate_receptionist(id)?)
    }

    // =========================================================================
    // Appointment Operations
    // =========================================================================

    /// Book a pending appointment.
    pub fn create_appointment(
        &self,
        patient_id: i32,
        doctor_id: i32,
        date: String,
        time_slot: String,
        reason: String,
    ) -> Result<FfiAppointment, ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        let appointment = Appointment::new(patient_id, doctor_id, date, time_slot, reason);
        let id = clinic.create_appointment(appointment)?;
        Ok(clinic.get_appointment(id)?.into())
    }

    pub fn confirm_appointment(&self, id: i32) -> Result<FfiAppointment, ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        Ok((&clinic.confirm_appointment(id)?).into())
    }

    pub fn complete_appointment(&self, id: i32) -> Result<FfiAppointment, ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        Ok((&clinic.complete_appointment(id)?).into())
    }

    pub fn cancel_appointment(&self, id: i32) -> Result<FfiAppointment, ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        Ok((&clinic.cancel_appointment(id)?).into())
    }

    /// Complete an appointment booked with `doctor_id`.
    pub fn complete_for_doctor(
        &self,
        doctor_id: i32,
        id: i32,
    ) -> Result<FfiAppointment, ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        Ok((&clinic.complete_for_doctor(doctor_id, id)?).into())
    }

    /// Cancel an appointment booked with `doctor_id`.
    pub fn cancel_for_doctor(&self, doctor_id: i32, id: i32) -> Result<FfiAppointment, ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        Ok((&clinic.cancel_for_doctor(doctor_id, id)?).into())
    }

    /// A doctor's appointments, cancelled ones left out.
    pub fn appointments_for_doctor(&self, doctor_id: i32) -> Result<Vec<FfiAppointment>, ClinicFfiError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic
            .appointments_for_doctor(doctor_id)
            .into_iter()
            .map(|a| a.into())
            .collect())
    }

    pub fn appointments_for_patient(
        &self,
        patient_id: i32,
    ) -> Result<Vec<FfiAppointment>, ClinicFfiError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic
            .appointments_for_patient(patient_id)
            .into_iter()
            .map(|a| a.into())
            .collect())
    }

    pub fn todays_appointments(&self, doctor_id: i32) -> Result<Vec<FfiAppointment>, ClinicFfiError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic
            .todays_appointments(doctor_id)
            .into_iter()
            .map(|a| a.into())
            .collect())
    }

    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Log in as `role`.
    pub fn authenticate(
        &self,
        username: String,
        password: String,
        role: FfiRole,
    ) -> Result<FfiUser, ClinicFfiError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.authenticate(&username, &password, role.into())?.into())
    }

    /// Register an Admin, Receptionist or Patient account.
    pub fn register_user(
        &self,
        username: String,
        password: String,
        role: FfiRole,
    ) -> Result<FfiUser, ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        let user = clinic.register_user(&username, &password, role.into())?;
        Ok((&user).into())
    }

    /// Register a doctor account together with its profile.
    pub fn register_doctor(
        &self,
        username: String,
        password: String,
        name: String,
        phone: String,
        email: String,
        specialization: String,
        room_number: i32,
    ) -> Result<FfiDoctor, ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        let profile = Doctor::new(name, phone, email, specialization, room_number);
        let (_, doctor) = clinic.register_doctor(&username, &password, profile)?;
        Ok((&doctor).into())
    }

    pub fn deactivate_user(&self, id: i32) -> Result<(), ClinicFfiError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.deactivate_user(id)?)
    }

    pub fn list_users(&self) -> Result<Vec<FfiUser>, ClinicFfiError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.list_users().iter().map(|u| u.into()).collect())
    }

    // =========================================================================
    // Report Operations
    // =========================================================================

    pub fn summary(&self) -> Result<FfiSummary, ClinicFfiError> {
        let clinic = self.clinic.lock()?;
        Ok(ClinicSummary::from_clinic(&clinic).into())
    }

    /// Export the summary as JSON.
    pub fn export_summary_json(&self) -> Result<String, ClinicFfiError> {
        let clinic = self.clinic.lock()?;
        Ok(ClinicSummary::from_clinic(&clinic).to_json()?)
    }

    /// Export the patient and doctor roster as JSON.
    pub fn export_roster_json(&self, include_inactive: bool) -> Result<String, ClinicFfiError> {
        let clinic = self.clinic.lock()?;
        Ok(RosterExport::from_clinic(&clinic, include_inactive).to_json()?)
    }

    /// Export the patient and doctor roster as CSV.
    pub fn export_roster_csv(&self, include_inactive: bool) -> Result<String, ClinicFfiError> {
        let clinic = self.clinic.lock()?;
        Ok(RosterExport::from_clinic(&clinic, include_inactive).to_csv())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiGender {
    Male,
    Female,
}

impl From<FfiGender> for Gender {
    fn from(gender: FfiGender) -> Self {
        match gender {
            FfiGender::Male => Gender::Male,
            FfiGender::Female => Gender::Female,
        }
    }
}

impl From<Gender> for FfiGender {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Male => FfiGender::Male,
            Gender::Female => FfiGender::Female,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiRole {
    Admin,
    Doctor,
    Receptionist,
    Patient,
}

impl From<FfiRole> for Role {
    fn from(role: FfiRole) -> Self {
        match role {
            FfiRole::Admin => Role::Admin,
            FfiRole::Doctor => Role::Doctor,
            FfiRole::Receptionist => Role::Receptionist,
            FfiRole::Patient => Role::Patient,
        }
    }
}

impl From<Role> for FfiRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => FfiRole::Admin,
            Role::Doctor => FfiRole::Doctor,
            Role::Receptionist => FfiRole::Receptionist,
            Role::Patient => FfiRole::Patient,
        }
    }
}

/// Single-field patient edit.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum FfiPatientUpdate {
    Name { value: String },
    Age { value: i32 },
    Gender { value: FfiGender },
    Phone { value: String },
    Address { value: String },
    BloodGroup { value: String },
}

impl From<FfiPatientUpdate> for PatientUpdate {
    fn from(update: FfiPatientUpdate) -> Self {
        match update {
            FfiPatientUpdate::Name { value } => PatientUpdate::Name(value),
            FfiPatientUpdate::Age { value } => PatientUpdate::Age(value),
            FfiPatientUpdate::Gender { value } => PatientUpdate::Gender(value.into()),
            FfiPatientUpdate::Phone { value } => PatientUpdate::Phone(value),
            FfiPatientUpdate::Address { value } => PatientUpdate::Address(value),
            FfiPatientUpdate::BloodGroup { value } => PatientUpdate::BloodGroup(value),
        }
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub gender: FfiGender,
    pub phone: String,
    pub address: String,
    pub blood_group: String,
    pub active: bool,
}

impl From<&Patient> for FfiPatient {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name.clone(),
            age: patient.age,
            gender: patient.gender.into(),
            phone: patient.phone.clone(),
            address: patient.address.clone(),
            blood_group: patient.blood_group.clone(),
            active: patient.active,
        }
    }
}

/// FFI-safe doctor.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDoctor {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub specialization: String,
    pub room_number: i32,
    pub on_duty: bool,
    pub active: bool,
}

impl From<&Doctor> for FfiDoctor {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name.clone(),
            phone: doctor.phone.clone(),
            email: doctor.email.clone(),
            specialization: doctor.specialization.clone(),
            room_number: doctor.room_number,
            on_duty: doctor.on_duty,
            active: doctor.active,
        }
    }
}

/// FFI-safe appointment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointment {
    pub id: i32,
    pub patient_id: i32,
    pub doctor_id: i32,
    pub date: String,
    pub time_slot: String,
    pub reason: String,
    pub status: String,
}

impl From<&Appointment> for FfiAppointment {
    fn from(appt: &Appointment) -> Self {
        Self {
            id: appt.id,
            patient_id: appt.patient_id,
            doctor_id: appt.doctor_id,
            date: appt.date.clone(),
            time_slot: appt.time_slot.clone(),
            reason: appt.reason.clone(),
            status: appt.status.to_string(),
        }
    }
}

/// FFI-safe user account; the password never crosses the boundary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiUser {
    pub id: i32,
    pub username: String,
    pub role: FfiRole,
    pub active: bool,
}

impl From<&User> for FfiUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role.into(),
            active: user.active,
        }
    }
}

/// FFI-safe summary counts.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSummary {
    pub patients: u32,
    pub discharged_patients: u32,
    pub doctors: u32,
    pub doctors_on_duty: u32,
    pub receptionists: u32,
    pub users: u32,
    pub appointments: u32,
    pub pending_appointments: u32,
    pub dangling_references: u32,
}

impl From<ClinicSummary> for FfiSummary {
    fn from(summary: ClinicSummary) -> Self {
        Self {
            patients: summary.patients.available as u32,
            discharged_patients: summary.patients.unavailable as u32,
            doctors: summary.doctors.available as u32,
            doctors_on_duty: summary.doctors_on_duty as u32,
            receptionists: summary.receptionists.available as u32,
            users: summary.users.count as u32,
            appointments: summary.appointments.count as u32,
            pending_appointments: summary.appointment_status.pending as u32,
            dangling_references: summary.dangling.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_round_trip_through_ffi_types() {
        let core = open_clinic_in_memory().unwrap();
        let patient = core
            .add_patient(
                "alice".into(),
                30,
                FfiGender::Female,
                "01712345678".into(),
                "Dhaka".into(),
                "A+".into(),
            )
            .unwrap();
        assert_eq!(patient.id, 1001);
        assert_eq!(patient.name, "Alice");

        let doctor = core
            .register_doctor(
                "drana".into(),
                "pass1".into(),
                "Ana Rahman".into(),
                "01912345678".into(),
                "ana@clinic.org".into(),
                "Cardiology".into(),
                12,
            )
            .unwrap();
        assert_eq!(doctor.id, 2001);

        let appt = core
            .create_appointment(1001, 2001, "01-01-2025".into(), "10:00 AM".into(), "Checkup".into())
            .unwrap();
        assert_eq!(appt.status, "Pending");
        assert_eq!(core.complete_for_doctor(2001, appt.id).unwrap().status, "Completed");

        let summary = core.summary().unwrap();
        assert_eq!(summary.patients, 1);
        assert_eq!(summary.users, 2);
        assert_eq!(summary.appointments, 1);
    }

    #[test]
    fn test_not_found_is_none() {
        let core = open_clinic_in_memory().unwrap();
        assert!(core.get_patient(1001).unwrap().is_none());
        assert!(core.find_patient_by_name("Nobody".into()).unwrap().is_none());
    }

    #[test]
    fn test_error_mapping() {
        let core = open_clinic_in_memory().unwrap();
        assert!(matches!(
            core.authenticate("admin".into(), "nope".into(), FfiRole::Admin),
            Err(ClinicFfiError::InvalidCredentials)
        ));
        assert!(matches!(
            core.create_appointment(1001, 2001, "01-01-2025".into(), "10:00 AM".into(), "x".into()),
            Err(ClinicFfiError::InvalidReference(_))
        ));
        assert!(matches!(
            core.register_user("admin".into(), "pass1".into(), FfiRole::Receptionist),
            Err(ClinicFfiError::DuplicateUsername(_))
        ));
        assert!(matches!(
            core.discharge_patient(1001),
            Err(ClinicFfiError::NotFound(_))
        ));
    }

    #[test]
    fn test_open_clinic_with_config_json() {
        let dir = tempfile::tempdir().unwrap();
        let json = serde_json::json!({ "data_dir": dir.path(), "log": { "level": "warn" } });
        let core = open_clinic_with_config(json.to_string()).unwrap();
        assert_eq!(core.list_users().unwrap().len(), 1);
        assert!(dir.path().join("users.dat").exists());

        assert!(matches!(
            open_clinic_with_config("{broken".into()),
            Err(ClinicFfiError::InvalidInput(_))
        ));
    }
}
