//! User account models.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::text::{TextField, PASSWORD_WIDTH, USERNAME_WIDTH};
use super::{EntityKind, ADMIN_ID_BASE, DOCTOR_ID_BASE, PATIENT_ID_BASE, RECEPTIONIST_ID_BASE};
use crate::store::{Entity, SoftDelete};

/// Obfuscation key applied to every password byte.
const OBFUSCATION_KEY: u8 = 0x01;

/// Role a user logs in as.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    Admin = 0,
    Doctor = 1,
    Receptionist = 2,
    Patient = 3,
}

impl Role {
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Role::Admin),
            1 => Some(Role::Doctor),
            2 => Some(Role::Receptionist),
            3 => Some(Role::Patient),
            _ => None,
        }
    }

    /// Base added to the relevant live count to form a new user id.
    pub fn id_base(&self) -> i32 {
        match self {
            Role::Admin => ADMIN_ID_BASE,
            Role::Doctor => DOCTOR_ID_BASE,
            Role::Receptionist => RECEPTIONIST_ID_BASE,
            Role::Patient => PATIENT_ID_BASE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Doctor => "Doctor",
            Role::Receptionist => "Receptionist",
            Role::Patient => "Patient",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A password as it is kept at rest: every byte XORed with a fixed key.
///
/// This is obfuscation, not protection. The plain text never leaves the
/// constructor.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ObfuscatedPassword(Vec<u8>);

impl ObfuscatedPassword {
    pub fn from_plain(plain: &str) -> Self {
        Self(plain.bytes().map(|b| b ^ OBFUSCATION_KEY).collect())
    }

    /// Wrap bytes that are already obfuscated (read back from disk).
    pub fn from_stored(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn matches(&self, plain: &str) -> bool {
        self.0.len() == plain.len()
            && self
                .0
                .iter()
                .zip(plain.bytes())
                .all(|(stored, b)| *stored == b ^ OBFUSCATION_KEY)
    }
}

impl fmt::Debug for ObfuscatedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ObfuscatedPassword(..)")
    }
}

/// A login account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip)]
    pub password: ObfuscatedPassword,
    pub role: Role,
    pub active: bool,
}

impl User {
    pub fn new(id: i32, username: impl Into<String>, password: &str, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            password: ObfuscatedPassword::from_plain(password),
            role,
            active: true,
        }
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

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
        Some(&self.username)
    }

    fn text_fields(&self) -> Vec<TextField<'_>> {
        vec![
            TextField::new("username", &self.username, USERNAME_WIDTH),
            TextField::raw("password", self.password.as_bytes(), PASSWORD_WIDTH),
        ]
    }
}

impl SoftDelete for User {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
