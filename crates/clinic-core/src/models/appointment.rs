//! Appointment models and the appointment status lifecycle.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::text::{TextField, DATE_WIDTH, REASON_WIDTH, TIME_SLOT_WIDTH};
use super::EntityKind;
use crate::store::Entity;

/// Appointment status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    /// Booked, not yet confirmed
    Pending = 0,
    /// Confirmed by the clinic
    Confirmed = 1,
    /// Visit happened (terminal)
    Completed = 2,
    /// Called off (terminal)
    Cancelled = 3,
}

/// Something that can be done to an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentAction {
    Confirm,
    Complete,
    Cancel,
}

impl AppointmentStatus {
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(AppointmentStatus::Pending),
            1 => Some(AppointmentStatus::Confirmed),
            2 => Some(AppointmentStatus::Completed),
            3 => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled
        )
    }

    /// Status after `action`, or `None` when the transition is not allowed.
    pub fn next(&self, action: AppointmentAction) -> Option<Self> {
        use AppointmentAction::*;
        use AppointmentStatus::*;

        if self.is_terminal() {
            return None;
        }
        match (self, action) {
            (Pending, Confirm) => Some(Confirmed),
            (Pending | Confirmed, Complete) => Some(Completed),
            (Pending | Confirmed, Cancel) => Some(Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AppointmentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            AppointmentAction::Confirm => "confirm",
            AppointmentAction::Complete => "complete",
            AppointmentAction::Cancel => "cancel",
        };
        f.write_str(verb)
    }
}

/// A booked visit between a patient and a doctor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    pub id: i32,
    pub patient_id: i32,
    pub doctor_id: i32,
    /// "DD-MM-YYYY"
    pub date: String,
    /// e.g. "10:00 AM"
    pub time_slot: String,
    pub reason: String,
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Create a new pending appointment; the id is assigned on add.
    pub fn new(
        patient_id: i32,
        doctor_id: i32,
        date: impl Into<String>,
        time_slot: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            patient_id,
            doctor_id,
            date: date.into(),
            time_slot: time_slot.into(),
            reason: reason.into(),
            status: AppointmentStatus::Pending,
        }
    }
}

impl Entity for Appointment {
    const KIND: EntityKind = EntityKind::Appointment;

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn text_fields(&self) -> Vec<TextField<'_>> {
        vec![
            TextField::new("date", &self.date, DATE_WIDTH),
            TextField::new("time_slot", &self.time_slot, TIME_SLOT_WIDTH),
            TextField::new("reason", &self.reason, REASON_WIDTH),
        ]
    }
}
