//! Receptionist operations.

use tracing::debug;

use super::{Clinic, ClinicResult};
use crate::log::CLINIC;
use crate::models::{Receptionist, ReceptionistUpdate};

impl Clinic {
    pub fn add_receptionist(&mut self, receptionist: Receptionist) -> ClinicResult<i32> {
        let id = self.receptionists.add(receptionist)?;
        debug!(target: CLINIC, id, "Added receptionist");
        self.flush(&self.receptionists)?;
        Ok(id)
    }

    pub fn get_receptionist(&self, id: i32) -> ClinicResult<&Receptionist> {
        Ok(self.receptionists.get(id)?)
    }

    pub fn find_receptionist_by_name(&self, name: &str) -> ClinicResult<&Receptionist> {
        let index = self.receptionists.find_by_name(name)?;
        Ok(&self.receptionists.records()[index])
    }

    pub fn update_receptionist(
        &mut self,
        id: i32,
        update: ReceptionistUpdate,
    ) -> ClinicResult<Receptionist> {
        let updated = self.receptionists.update(id, |r| r.apply(update))?.clone();
        self.flush(&self.receptionists)?;
        Ok(updated)
    }

    pub fn set_receptionist_on_duty(&mut self, id: i32, on_duty: bool) -> ClinicResult<Receptionist> {
        self.update_receptionist(id, ReceptionistUpdate::OnDuty(on_duty))
    }

    pub fn deactivate_receptionist(&mut self, id: i32) -> ClinicResult<()> {
        self.receptionists.deactivate(id)?;
        debug!(target: CLINIC, id, "Deactivated receptionist");
        self.flush(&self.receptionists)
    }

    pub fn delete_receptionist_permanently(&mut self, id: i32) -> ClinicResult<Receptionist> {
        let removed = self.receptionists.hard_delete(id)?;
        self.flush(&self.receptionists)?;
        Ok(removed)
    }

    pub fn active_receptionists(&self) -> Vec<&Receptionist> {
        self.receptionists.active().collect()
    }

    pub fn inactive_receptionists(&self) -> Vec<&Receptionist> {
        self.receptionists.inactive().collect()
    }
}
