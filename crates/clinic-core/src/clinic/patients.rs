//! Patient operations.

use tracing::debug;

use super::{Clinic, ClinicResult};
use crate::log::CLINIC;
use crate::models::{Patient, PatientUpdate};

impl Clinic {
    /// Admit a patient and return the assigned id.
    pub fn add_patient(&mut self, patient: Patient) -> ClinicResult<i32> {
        let id = self.patients.add(patient)?;
        debug!(target: CLINIC, id, "Admitted patient");
        self.flush(&self.patients)?;
        Ok(id)
    }

    pub fn get_patient(&self, id: i32) -> ClinicResult<&Patient> {
        Ok(self.patients.get(id)?)
    }

    /// First patient with this name, active or discharged.
    pub fn find_patient_by_name(&self, name: &str) -> ClinicResult<&Patient> {
        let index = self.patients.find_by_name(name)?;
        Ok(&self.patients.records()[index])
    }

    pub fn find_patient_by_phone(&self, phone: &str) -> ClinicResult<&Patient> {
        let index = self.patients.find_by_phone(phone)?;
        Ok(&self.patients.records()[index])
    }

    pub fn update_patient(&mut self, id: i32, update: PatientUpdate) -> ClinicResult<Patient> {
        let updated = self.patients.update(id, |p| p.apply(update))?.clone();
        self.flush(&self.patients)?;
        Ok(updated)
    }

    /// Soft delete.
    pub fn discharge_patient(&mut self, id: i32) -> ClinicResult<()> {
        self.patients.deactivate(id)?;
        debug!(target: CLINIC, id, "Discharged patient");
        self.flush(&self.patients)
    }

    /// Remove a discharged patient for good.
    pub fn delete_patient_permanently(&mut self, id: i32) -> ClinicResult<Patient> {
        let removed = self.patients.hard_delete(id)?;
        self.flush(&self.patients)?;
        Ok(removed)
    }

    pub fn active_patients(&self) -> Vec<&Patient> {
        self.patients.active().collect()
    }

    pub fn discharged_patients(&self) -> Vec<&Patient> {
        self.patients.inactive().collect()
    }
}
