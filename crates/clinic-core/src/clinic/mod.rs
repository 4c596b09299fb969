//! The clinic repository: one store per entity type plus persistence.

mod appointments;
mod doctors;
mod patients;
mod receptionists;
mod users;

pub use appointments::{today, DATE_FORMAT};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::auth::{AuthError, AuthStore};
use crate::codec::{self, CodecError, Record};
use crate::config::{ClinicConfig, ConfigError};
use crate::linker::{DanglingReference, LinkError, ReferentialLinker};
use crate::log::CLINIC;
use crate::models::{
    Appointment, AppointmentAction, AppointmentStatus, Doctor, EntityKind, Patient, Receptionist,
    Role, User,
};
use crate::store::{EntityStore, StoreError};

/// Clinic errors.
#[derive(Error, Debug)]
pub enum ClinicError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Could not create data directory {path}: {source}")]
    DataDir { path: PathBuf, source: io::Error },

    /// The in-memory change stands; the snapshots of `kinds` on disk are
    /// stale. `source` is the first failure.
    #[error("{} changed in memory but not saved: {source}", kind_list(.kinds))]
    Persist {
        kinds: Vec<EntityKind>,
        source: CodecError,
    },

    #[error("Cannot {action} appointment {id} while {from}")]
    InvalidTransition {
        id: i32,
        from: AppointmentStatus,
        action: AppointmentAction,
    },

    #[error("Appointment {appointment_id} is not assigned to doctor {doctor_id}")]
    NotOwner { appointment_id: i32, doctor_id: i32 },
}

pub type ClinicResult<T> = Result<T, ClinicError>;

fn kind_list(kinds: &[EntityKind]) -> String {
    kinds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// All clinic records, loaded from and flushed to a data directory.
///
/// Every successful mutation rewrites the snapshot of the store it touched.
/// An in-memory clinic (no data directory) never touches the disk.
#[derive(Debug)]
pub struct Clinic {
    config: ClinicConfig,
    data_dir: Option<PathBuf>,
    patients: EntityStore<Patient>,
    doctors: EntityStore<Doctor>,
    receptionists: EntityStore<Receptionist>,
    auth: AuthStore,
    appointments: EntityStore<Appointment>,
}

impl Clinic {
    /// Open the clinic rooted at `config.data_dir`, creating the directory
    /// if needed.
    ///
    /// Missing or unreadable snapshots start empty. With `seed_admin` set
    /// and no users on disk, the default administrator is created and
    /// saved straight away.
    pub fn open(config: ClinicConfig) -> ClinicResult<Self> {
        let dir = config.data_dir.clone();
        fs::create_dir_all(&dir).map_err(|source| ClinicError::DataDir {
            path: dir.clone(),
            source,
        })?;

        let appointments: EntityStore<Appointment> = load_store(&config);
        let auth = AuthStore::new(load_store(&config));
        let mut patients: EntityStore<Patient> = load_store(&config);
        let mut doctors: EntityStore<Doctor> = load_store(&config);

        // ids still referenced elsewhere must not be handed out again
        patients.reserve_ids(appointments.iter().map(|a| a.patient_id));
        doctors.reserve_ids(
            appointments.iter().map(|a| a.doctor_id).chain(
                auth.users()
                    .iter()
                    .filter(|u| u.role == Role::Doctor)
                    .map(|u| u.id),
            ),
        );

        let mut clinic = Self {
            patients,
            doctors,
            receptionists: load_store(&config),
            auth,
            appointments,
            data_dir: Some(dir),
            config,
        };
        clinic.seed()?;

        info!(
            target: CLINIC,
            data_dir = %clinic.config.data_dir.display(),
            patients = clinic.patients.len(),
            doctors = clinic.doctors.len(),
            receptionists = clinic.receptionists.len(),
            users = clinic.auth.users().len(),
            appointments = clinic.appointments.len(),
            "Opened clinic"
        );
        Ok(clinic)
    }

    /// Open using the JSON config file at `path`.
    pub fn open_with_config_file<P: AsRef<Path>>(path: P) -> ClinicResult<Self> {
        Self::open(ClinicConfig::load(path)?)
    }

    /// A clinic that lives only in memory.
    pub fn open_in_memory(config: ClinicConfig) -> ClinicResult<Self> {
        let policy = config.id_policy;
        let mut clinic = Self {
            patients: EntityStore::with_policy(policy),
            doctors: EntityStore::with_policy(policy),
            receptionists: EntityStore::with_policy(policy),
            auth: AuthStore::new(EntityStore::with_policy(policy)),
            appointments: EntityStore::with_policy(policy),
            data_dir: None,
            config,
        };
        clinic.seed()?;
        Ok(clinic)
    }

    fn seed(&mut self) -> ClinicResult<()> {
        if self.config.seed_admin && self.auth.seed_default_admin()?.is_some() {
            self.flush(self.auth.users())?;
        }
        Ok(())
    }

    pub fn config(&self) -> &ClinicConfig {
        &self.config
    }

    /// `None` for an in-memory clinic.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn patients(&self) -> &EntityStore<Patient> {
        &self.patients
    }

    pub fn doctors(&self) -> &EntityStore<Doctor> {
        &self.doctors
    }

    pub fn receptionists(&self) -> &EntityStore<Receptionist> {
        &self.receptionists
    }

    pub fn users(&self) -> &EntityStore<User> {
        self.auth.users()
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn appointments(&self) -> &EntityStore<Appointment> {
        &self.appointments
    }

    /// Appointments whose patient or doctor was permanently deleted.
    pub fn dangling_appointments(&self) -> Vec<DanglingReference> {
        ReferentialLinker::new(&self.patients, &self.doctors).dangling(&self.appointments)
    }

    /// Rewrite every snapshot, attempting all of them even when one fails.
    pub fn save_all(&self) -> ClinicResult<()> {
        persisted([
            (EntityKind::Patient, self.write(&self.patients)),
            (EntityKind::Doctor, self.write(&self.doctors)),
            (EntityKind::Receptionist, self.write(&self.receptionists)),
            (EntityKind::User, self.write(self.auth.users())),
            (EntityKind::Appointment, self.write(&self.appointments)),
        ])
    }

    /// Write one store to its snapshot file.
    fn flush<T: Record>(&self, store: &EntityStore<T>) -> ClinicResult<()> {
        persisted([(T::KIND, self.write(store))])
    }

    fn write<T: Record>(&self, store: &EntityStore<T>) -> Result<(), CodecError> {
        if self.data_dir.is_none() {
            return Ok(());
        }
        let path = self.config.data_file(T::KIND);
        codec::save(store, &path, self.config.atomic_writes).inspect_err(|e| {
            warn!(
                target: CLINIC,
                kind = %T::KIND,
                path = %path.display(),
                error = %e,
                "Snapshot not written, memory and disk now differ"
            );
        })
    }
}

/// Collapse several write results into one, naming every stale store.
fn persisted<I>(writes: I) -> ClinicResult<()>
where
    I: IntoIterator<Item = (EntityKind, Result<(), CodecError>)>,
{
    let mut kinds = Vec::new();
    let mut first = None;
    for (kind, result) in writes {
        if let Err(e) = result {
            kinds.push(kind);
            first.get_or_insert(e);
        }
    }
    match first {
        None => Ok(()),
        Some(source) => Err(ClinicError::Persist { kinds, source }),
    }
}

fn load_store<T: Record>(config: &ClinicConfig) -> EntityStore<T> {
    codec::load_or_default(&config.data_file(T::KIND), config.id_policy)
}
