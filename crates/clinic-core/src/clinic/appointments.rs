//! Appointment booking, status changes, and schedule queries.

use chrono::Local;
use tracing::{debug, warn};

use super::{Clinic, ClinicError, ClinicResult};
use crate::linker::ReferentialLinker;
use crate::log::APPOINTMENT;
use crate::models::{Appointment, AppointmentAction, AppointmentStatus, EntityKind};
use crate::store::StoreError;

/// Date format used in appointment records.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Today's date as stored in appointment records.
pub fn today() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

impl Clinic {
    /// Book an appointment and return its id.
    ///
    /// Capacity is checked before the patient and doctor references. An
    /// off-duty doctor is allowed and only logged.
    pub fn create_appointment(&mut self, appointment: Appointment) -> ClinicResult<i32> {
        if self.appointments.is_full() {
            return Err(StoreError::Capacity {
                kind: EntityKind::Appointment,
                capacity: self.appointments.capacity(),
            }
            .into());
        }
        ReferentialLinker::new(&self.patients, &self.doctors)
            .validate_appointment_endpoints(appointment.patient_id, appointment.doctor_id)?;

        if let Ok(doctor) = self.doctors.get(appointment.doctor_id) {
            if !doctor.on_duty {
                warn!(target: APPOINTMENT, doctor_id = doctor.id, "Booking with a doctor who is off duty");
            }
        }

        let patient_id = appointment.patient_id;
        let doctor_id = appointment.doctor_id;
        let id = self.appointments.add(appointment)?;
        debug!(target: APPOINTMENT, id, patient_id, doctor_id, "Booked appointment");
        self.flush(&self.appointments)?;
        Ok(id)
    }

    pub fn get_appointment(&self, id: i32) -> ClinicResult<&Appointment> {
        Ok(self.appointments.get(id)?)
    }

    pub fn confirm_appointment(&mut self, id: i32) -> ClinicResult<Appointment> {
        self.transition(id, AppointmentAction::Confirm, None)
    }

    pub fn complete_appointment(&mut self, id: i32) -> ClinicResult<Appointment> {
        self.transition(id, AppointmentAction::Complete, None)
    }

    pub fn cancel_appointment(&mut self, id: i32) -> ClinicResult<Appointment> {
        self.transition(id, AppointmentAction::Cancel, None)
    }

    /// Complete an appointment on behalf of the doctor it is booked with.
    pub fn complete_for_doctor(&mut self, doctor_id: i32, id: i32) -> ClinicResult<Appointment> {
        self.transition(id, AppointmentAction::Complete, Some(doctor_id))
    }

    /// Cancel an appointment on behalf of the doctor it is booked with.
    pub fn cancel_for_doctor(&mut self, doctor_id: i32, id: i32) -> ClinicResult<Appointment> {
        self.transition(id, AppointmentAction::Cancel, Some(doctor_id))
    }

    fn transition(
        &mut self,
        id: i32,
        action: AppointmentAction,
        doctor_id: Option<i32>,
    ) -> ClinicResult<Appointment> {
        let current = self.appointments.get(id)?;
        if let Some(doctor_id) = doctor_id {
            if current.doctor_id != doctor_id {
                return Err(ClinicError::NotOwner {
                    appointment_id: id,
                    doctor_id,
                });
            }
        }
        let from = current.status;
        let next = from
            .next(action)
            .ok_or(ClinicError::InvalidTransition { id, from, action })?;

        let updated = self.appointments.update(id, |a| a.status = next)?.clone();
        debug!(target: APPOINTMENT, id, %from, to = %next, "Appointment status changed");
        self.flush(&self.appointments)?;
        Ok(updated)
    }

    /// A doctor's schedule, cancelled visits left out.
    pub fn appointments_for_doctor(&self, doctor_id: i32) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id && a.status != AppointmentStatus::Cancelled)
            .collect()
    }

    pub fn appointments_for_patient(&self, patient_id: i32) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .collect()
    }

    pub fn pending_appointments_for_doctor(&self, doctor_id: i32) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id && a.status == AppointmentStatus::Pending)
            .collect()
    }

    /// A doctor's non-cancelled appointments on `date` (`DD-MM-YYYY`).
    pub fn appointments_on(&self, doctor_id: i32, date: &str) -> Vec<&Appointment> {
        self.appointments_for_doctor(doctor_id)
            .into_iter()
            .filter(|a| a.date == date)
            .collect()
    }

    pub fn todays_appointments(&self, doctor_id: i32) -> Vec<&Appointment> {
        self.appointments_on(doctor_id, &today())
    }
}
