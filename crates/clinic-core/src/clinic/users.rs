//! Account operations that span the user and doctor stores.

use tracing::debug;

use super::{persisted, Clinic, ClinicResult};
use crate::log::CLINIC;
use crate::models::{Doctor, EntityKind, Role, User};
use crate::store::{check_fields, StoreError};

impl Clinic {
    /// Register an Admin, Receptionist or Patient account.
    pub fn register_user(&mut self, username: &str, password: &str, role: Role) -> ClinicResult<User> {
        let user = self.auth.register(username, password, role)?;
        self.flush(self.auth.users())?;
        Ok(user)
    }

    /// Register a doctor account together with its profile.
    ///
    /// The profile is added first and the account takes its id. Every
    /// check on both stores runs before either is touched, and both
    /// snapshots are written even if the first write fails.
    pub fn register_doctor(
        &mut self,
        username: &str,
        password: &str,
        profile: Doctor,
    ) -> ClinicResult<(User, Doctor)> {
        self.auth.check_registration(username, password)?;
        if self.doctors.is_full() {
            return Err(StoreError::Capacity {
                kind: EntityKind::Doctor,
                capacity: self.doctors.capacity(),
            }
            .into());
        }
        check_fields(&profile)?;

        let id = self.doctors.add(profile)?;
        let user = self.auth.register_with_id(username, password, Role::Doctor, id)?;
        debug!(target: CLINIC, id, "Registered doctor account");

        persisted([
            (EntityKind::Doctor, self.write(&self.doctors)),
            (EntityKind::User, self.write(self.auth.users())),
        ])?;
        Ok((user, self.doctors.get(id)?.clone()))
    }

    pub fn authenticate(&self, username: &str, password: &str, role: Role) -> ClinicResult<&User> {
        Ok(self.auth.authenticate(username, password, role)?)
    }

    pub fn deactivate_user(&mut self, id: i32) -> ClinicResult<()> {
        self.auth.deactivate_user(id)?;
        self.flush(self.auth.users())
    }

    pub fn list_users(&self) -> &[User] {
        self.auth.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::auth::AuthError;
    use crate::clinic::ClinicError;
    use crate::config::ClinicConfig;

    fn clinic() -> Clinic {
        Clinic::open_in_memory(ClinicConfig::default()).unwrap()
    }

    fn profile() -> Doctor {
        Doctor::new("Ana Rahman", "01912345678", "ana@clinic.org", "Cardiology", 12)
    }

    #[test]
    fn test_register_doctor_shares_id() {
        let mut clinic = clinic();
        let (user, doctor) = clinic.register_doctor("drana", "pass1", profile()).unwrap();

        assert_eq!(user.id, 2001);
        assert_eq!(doctor.id, 2001);
        assert_eq!(user.role, Role::Doctor);
        assert_eq!(clinic.authenticate("drana", "pass1", Role::Doctor).unwrap().id, 2001);
    }

    #[test]
    fn test_register_doctor_rejects_before_touching_stores() {
        let mut clinic = clinic();
        let err = clinic.register_doctor("admin", "pass1", profile()).unwrap_err();
        assert!(matches!(err, ClinicError::Auth(AuthError::DuplicateUsername(_))));

        let mut bad = profile();
        bad.email = "x".repeat(60);
        let err = clinic.register_doctor("drana", "pass1", bad).unwrap_err();
        assert!(matches!(err, ClinicError::Store(StoreError::FieldTooLong { .. })));

        let long_name = "d".repeat(40);
        let err = clinic.register_doctor(&long_name, "pass1", profile()).unwrap_err();
        assert!(matches!(
            err,
            ClinicError::Auth(AuthError::Store(StoreError::FieldTooLong { .. }))
        ));

        assert!(clinic.doctors().is_empty());
        assert_eq!(clinic.list_users().len(), 1);
    }

    #[test]
    fn test_register_doctor_writes_users_when_doctors_fail() {
        let dir = tempfile::tempdir().unwrap();
        let mut clinic = Clinic::open(ClinicConfig::default().with_data_dir(dir.path())).unwrap();
        fs::create_dir(dir.path().join("doctors.dat.tmp")).unwrap();

        let err = clinic.register_doctor("drana", "pass1", profile()).unwrap_err();
        match err {
            ClinicError::Persist { kinds, .. } => assert_eq!(kinds, vec![EntityKind::Doctor]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(clinic.doctors().len(), 1);

        // the account reached disk even though the profile did not
        drop(clinic);
        fs::remove_dir(dir.path().join("doctors.dat.tmp")).unwrap();
        let clinic = Clinic::open(ClinicConfig::default().with_data_dir(dir.path())).unwrap();
        assert!(clinic.authenticate("drana", "pass1", Role::Doctor).is_ok());
        assert!(clinic.doctors().is_empty());
    }

    #[test]
    fn test_register_doctor_reports_both_stores() {
        let dir = tempfile::tempdir().unwrap();
        let mut clinic = Clinic::open(ClinicConfig::default().with_data_dir(dir.path())).unwrap();
        fs::create_dir(dir.path().join("doctors.dat.tmp")).unwrap();
        fs::create_dir(dir.path().join("users.dat.tmp")).unwrap();

        let err = clinic.register_doctor("drana", "pass1", profile()).unwrap_err();
        match err {
            ClinicError::Persist { kinds, .. } => {
                assert_eq!(kinds, vec![EntityKind::Doctor, EntityKind::User])
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(clinic.doctors().len(), 1);
        assert_eq!(clinic.list_users().len(), 2);
    }

    #[test]
    fn test_register_user_rejects_doctor_role() {
        let mut clinic = clinic();
        assert!(matches!(
            clinic.register_user("drana", "pass1", Role::Doctor),
            Err(ClinicError::Auth(AuthError::InvalidInput(_)))
        ));
    }

    #[test]
    fn test_deactivated_user_cannot_log_in() {
        let mut clinic = clinic();
        let user = clinic.register_user("rita", "pass1", Role::Receptionist).unwrap();
        clinic.deactivate_user(user.id).unwrap();
        assert!(matches!(
            clinic.authenticate("rita", "pass1", Role::Receptionist),
            Err(ClinicError::Auth(AuthError::InvalidCredentials))
        ));
    }
}
