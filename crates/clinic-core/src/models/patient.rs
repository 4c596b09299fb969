//! Patient models.

use serde::{Deserialize, Serialize};

use super::text::{
    normalize_name, TextField, ADDRESS_WIDTH, BLOOD_GROUP_WIDTH, NAME_WIDTH, PHONE_WIDTH,
};
use super::EntityKind;
use crate::store::{Entity, SoftDelete};

/// Patient gender, stored as its 4-byte discriminant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    Male = 0,
    Female = 1,
}

impl Gender {
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Gender::Male),
            1 => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// A registered patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    /// Assigned by the store on add
    pub id: i32,
    /// Normalized full name
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub phone: String,
    pub address: String,
    pub blood_group: String,
    /// False once discharged
    pub active: bool,
}

impl Patient {
    /// Create a new, not yet stored, active patient.
    pub fn new(
        name: impl AsRef<str>,
        age: i32,
        gender: Gender,
        phone: impl Into<String>,
        address: impl Into<String>,
        blood_group: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            name: normalize_name(name.as_ref()),
            age,
            gender,
            phone: phone.into(),
            address: address.into(),
            blood_group: blood_group.into(),
            active: true,
        }
    }

    /// Apply a single field edit.
    pub fn apply(&mut self, update: PatientUpdate) {
        match update {
            PatientUpdate::Name(name) => self.name = normalize_name(&name),
            PatientUpdate::Age(age) => self.age = age,
            PatientUpdate::Gender(gender) => self.gender = gender,
            PatientUpdate::Phone(phone) => self.phone = phone,
            PatientUpdate::Address(address) => self.address = address,
            PatientUpdate::BloodGroup(blood_group) => self.blood_group = blood_group,
        }
    }
}

/// Field-level edits accepted for a patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatientUpdate {
    Name(String),
    Age(i32),
    Gender(Gender),
    Phone(String),
    Address(String),
    BloodGroup(String),
}

impl Entity for Patient {
    const KIND: EntityKind = EntityKind::Patient;

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
            TextField::new("address", &self.address, ADDRESS_WIDTH),
            TextField::new("blood_group", &self.blood_group, BLOOD_GROUP_WIDTH),
        ]
    }
}

impl SoftDelete for Patient {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
