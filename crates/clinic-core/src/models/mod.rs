//! Domain models for the clinic records system.

mod appointment;
mod doctor;
mod patient;
mod receptionist;
mod text;
mod user;

pub use appointment::*;
pub use doctor::*;
pub use patient::*;
pub use receptionist::*;
pub use text::*;
pub use user::*;

use std::fmt;

use serde::{Deserialize, Serialize};

pub const MAX_PATIENTS: usize = 100;
pub const MAX_DOCTORS: usize = 20;
pub const MAX_RECEPTIONISTS: usize = 20;
pub const MAX_USERS: usize = 50;
pub const MAX_APPOINTMENTS: usize = 200;

pub const PATIENT_ID_BASE: i32 = 1001;
pub const DOCTOR_ID_BASE: i32 = 2001;
pub const ADMIN_ID_BASE: i32 = 3001;
pub const RECEPTIONIST_ID_BASE: i32 = 4001;
pub const APPOINTMENT_ID_BASE: i32 = 5001;

/// Width of one id block; every role base is followed by this many ids.
pub const ID_BLOCK: i32 = 1000;

/// The kinds of record the clinic keeps, one store and one file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Patient,
    Doctor,
    Receptionist,
    User,
    Appointment,
}

impl EntityKind {
    /// Role base used when the store assigns ids itself.
    ///
    /// User ids depend on the role being registered, so the auth layer picks
    /// the base; the admin base is only the fallback.
    pub const fn id_base(self) -> i32 {
        match self {
            EntityKind::Patient => PATIENT_ID_BASE,
            EntityKind::Doctor => DOCTOR_ID_BASE,
            EntityKind::Receptionist => RECEPTIONIST_ID_BASE,
            EntityKind::User => ADMIN_ID_BASE,
            EntityKind::Appointment => APPOINTMENT_ID_BASE,
        }
    }

    pub const fn capacity(self) -> usize {
        match self {
            EntityKind::Patient => MAX_PATIENTS,
            EntityKind::Doctor => MAX_DOCTORS,
            EntityKind::Receptionist => MAX_RECEPTIONISTS,
            EntityKind::User => MAX_USERS,
            EntityKind::Appointment => MAX_APPOINTMENTS,
        }
    }

    /// Snapshot file name inside the data directory.
    pub const fn file_name(self) -> &'static str {
        match self {
            EntityKind::Patient => "patients.dat",
            EntityKind::Doctor => "doctors.dat",
            EntityKind::Receptionist => "receptionists.dat",
            EntityKind::User => "users.dat",
            EntityKind::Appointment => "appointments.dat",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::Patient => "patient",
            EntityKind::Doctor => "doctor",
            EntityKind::Receptionist => "receptionist",
            EntityKind::User => "user",
            EntityKind::Appointment => "appointment",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_blocks_do_not_overlap() {
        let mut bases = [
            PATIENT_ID_BASE,
            DOCTOR_ID_BASE,
            ADMIN_ID_BASE,
            RECEPTIONIST_ID_BASE,
            APPOINTMENT_ID_BASE,
        ];
        bases.sort();
        for pair in bases.windows(2) {
            assert!(pair[1] - pair[0] >= ID_BLOCK);
        }
    }

    #[test]
    fn test_capacity_covers_id_block() {
        for kind in [
            EntityKind::Patient,
            EntityKind::Doctor,
            EntityKind::Receptionist,
            EntityKind::User,
            EntityKind::Appointment,
        ] {
            assert!(kind.capacity() as i32 <= ID_BLOCK, "{kind}");
        }
    }
}
