//! Doctor models.

use serde::{Deserialize, Serialize};

use super::text::{normalize_name, TextField, EMAIL_WIDTH, NAME_WIDTH, PHONE_WIDTH, SPECIALIZATION_WIDTH};
use super::EntityKind;
use crate::store::{Entity, SoftDelete};

/// A doctor profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Doctor {
    /// Assigned by the store on add; shared with the doctor's user account
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub specialization: String,
    pub room_number: i32,
    /// On-duty toggle, independent of the lifecycle flag
    pub on_duty: bool,
    /// False once deactivated
    pub active: bool,
}

impl Doctor {
    /// Create a new, not yet stored, active and on-duty doctor.
    pub fn new(
        name: impl AsRef<str>,
        phone: impl Into<String>,
        email: impl Into<String>,
        specialization: impl Into<String>,
        room_number: i32,
    ) -> Self {
        Self {
            id: 0,
            name: normalize_name(name.as_ref()),
            phone: phone.into(),
            email: email.into(),
            specialization: specialization.into(),
            room_number,
            on_duty: true,
            active: true,
        }
    }

    /// Apply a single field edit.
    pub fn apply(&mut self, update: DoctorUpdate) {
        match update {
            DoctorUpdate::Name(name) => self.name = normalize_name(&name),
            DoctorUpdate::Phone(phone) => self.phone = phone,
            DoctorUpdate::Email(email) => self.email = email,
            DoctorUpdate::Specialization(specialization) => self.specialization = specialization,
            DoctorUpdate::RoomNumber(room) => self.room_number = room,
            DoctorUpdate::OnDuty(on_duty) => self.on_duty = on_duty,
        }
    }
}

/// Field-level edits accepted for a doctor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoctorUpdate {
    Name(String),
    Phone(String),
    Email(String),
    Specialization(String),
    RoomNumber(i32),
    OnDuty(bool),
}

impl Entity for Doctor {
    const KIND: EntityKind = EntityKind::Doctor;

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn phone(&self) -> Option<&str> {
        Some(&self.phone)
    }

    fn text_fields(&self) -> Vec<TextField<'_>> {
        vec![
            TextField::new("name", &self.name, NAME_WIDTH),
            TextField::new("phone", &self.phone, PHONE_WIDTH),
            TextField::new("email", &self.email, EMAIL_WIDTH),
            TextField::new("specialization", &self.specialization, SPECIALIZATION_WIDTH),
        ]
    }
}

impl SoftDelete for Doctor {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
