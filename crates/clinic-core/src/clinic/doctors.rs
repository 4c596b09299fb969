//! Doctor operations.

use tracing::debug;

use super::{Clinic, ClinicResult};
use crate::log::CLINIC;
use crate::models::{Doctor, DoctorUpdate};

impl Clinic {
    /// Add a doctor profile without a login account.
    pub fn add_doctor(&mut self, doctor: Doctor) -> ClinicResult<i32> {
        let id = self.doctors.add(doctor)?;
        debug!(target: CLINIC, id, "Added doctor");
        self.flush(&self.doctors)?;
        Ok(id)
    }

    pub fn get_doctor(&self, id: i32) -> ClinicResult<&Doctor> {
        Ok(self.doctors.get(id)?)
    }

    pub fn find_doctor_by_name(&self, name: &str) -> ClinicResult<&Doctor> {
        let index = self.doctors.find_by_name(name)?;
        Ok(&self.doctors.records()[index])
    }

    pub fn find_doctor_by_phone(&self, phone: &str) -> ClinicResult<&Doctor> {
        let index = self.doctors.find_by_phone(phone)?;
        Ok(&self.doctors.records()[index])
    }

    pub fn update_doctor(&mut self, id: i32, update: DoctorUpdate) -> ClinicResult<Doctor> {
        let updated = self.doctors.update(id, |d| d.apply(update))?.clone();
        self.flush(&self.doctors)?;
        Ok(updated)
    }

    /// Toggle whether the doctor is taking appointments.
    pub fn set_doctor_on_duty(&mut self, id: i32, on_duty: bool) -> ClinicResult<Doctor> {
        self.update_doctor(id, DoctorUpdate::OnDuty(on_duty))
    }

    pub fn deactivate_doctor(&mut self, id: i32) -> ClinicResult<()> {
        self.doctors.deactivate(id)?;
        debug!(target: CLINIC, id, "Deactivated doctor");
        self.flush(&self.doctors)
    }

    pub fn delete_doctor_permanently(&mut self, id: i32) -> ClinicResult<Doctor> {
        let removed = self.doctors.hard_delete(id)?;
        self.flush(&self.doctors)?;
        Ok(removed)
    }

    pub fn active_doctors(&self) -> Vec<&Doctor> {
        self.doctors.active().collect()
    }

    pub fn inactive_doctors(&self) -> Vec<&Doctor> {
        self.doctors.inactive().collect()
    }

    /// Active doctors currently on duty.
    pub fn on_duty_doctors(&self) -> Vec<&Doctor> {
        self.doctors.active().filter(|d| d.on_duty).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClinicConfig;

    #[test]
    fn test_on_duty_toggle() {
        let mut clinic = Clinic::open_in_memory(ClinicConfig::default()).unwrap();
        clinic
            .add_doctor(Doctor::new("Ana Rahman", "01912345678", "ana@clinic.org", "Cardiology", 12))
            .unwrap();
        clinic
            .add_doctor(Doctor::new("Karim Uddin", "01612345678", "karim@clinic.org", "Surgery", 3))
            .unwrap();

        let doctor = clinic.set_doctor_on_duty(2001, false).unwrap();
        assert!(!doctor.on_duty);
        assert!(doctor.active);

        let on_duty: Vec<i32> = clinic.on_duty_doctors().iter().map(|d| d.id).collect();
        assert_eq!(on_duty, vec![2002]);
        assert_eq!(clinic.active_doctors().len(), 2);
    }

    #[test]
    fn test_doctor_lifecycle() {
        let mut clinic = Clinic::open_in_memory(ClinicConfig::default()).unwrap();
        clinic
            .add_doctor(Doctor::new("Ana Rahman", "01912345678", "ana@clinic.org", "Cardiology", 12))
            .unwrap();

        assert_eq!(clinic.find_doctor_by_name("ana rahman").unwrap().id, 2001);
        clinic.deactivate_doctor(2001).unwrap();
        assert_eq!(clinic.inactive_doctors().len(), 1);
        assert_eq!(clinic.doctors().unavailable(), 1);

        clinic.delete_doctor_permanently(2001).unwrap();
        assert!(clinic.doctors().is_empty());
        assert_eq!(clinic.doctors().unavailable(), 0);
    }
}
