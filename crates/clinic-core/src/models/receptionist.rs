//! Receptionist models.

use serde::{Deserialize, Serialize};

use super::text::{normalize_name, TextField, EMAIL_WIDTH, NAME_WIDTH, PHONE_WIDTH};
use super::EntityKind;
use crate::store::{Entity, SoftDelete};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Receptionist {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub on_duty: bool,
    pub active: bool,
}

impl Receptionist {
    pub fn new(name: impl AsRef<str>, phone: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: normalize_name(name.as_ref()),
            phone: phone.into(),
            email: email.into(),
            on_duty: true,
            active: true,
        }
    }

    pub fn apply(&mut self, update: ReceptionistUpdate) {
        match update {
            ReceptionistUpdate::Name(name) => self.name = normalize_name(&name),
            ReceptionistUpdate::Phone(phone) => self.phone = phone,
            ReceptionistUpdate::Email(email) => self.email = email,
            ReceptionistUpdate::OnDuty(on_duty) => self.on_duty = on_duty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceptionistUpdate {
    Name(String),
    Phone(String),
    Email(String),
    OnDuty(bool),
}

impl Entity for Receptionist {
    const KIND: EntityKind = EntityKind::Receptionist;

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
        ]
    }
}

impl SoftDelete for Receptionist {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
