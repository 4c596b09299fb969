//! User accounts: registration, login, and the default administrator.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::log::AUTH;
use crate::models::{EntityKind, Role, User, ADMIN_ID_BASE};
use crate::store::{check_fields, EntityStore, StoreError};

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 4;

/// Auth errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// The user store plus the rules around it.
#[derive(Debug, Clone, Default)]
pub struct AuthStore {
    users: EntityStore<User>,
}

impl AuthStore {
    pub fn new(users: EntityStore<User>) -> Self {
        Self { users }
    }

    pub fn users(&self) -> &EntityStore<User> {
        &self.users
    }

    /// All accounts, active or not, in registration order.
    pub fn list(&self) -> &[User] {
        self.users.records()
    }

    /// Create `admin` / `admin123` when there are no users at all.
    ///
    /// Returns the new account, or `None` if users already exist.
    pub fn seed_default_admin(&mut self) -> AuthResult<Option<User>> {
        if !self.users.is_empty() {
            return Ok(None);
        }
        let admin = User::new(
            ADMIN_ID_BASE,
            DEFAULT_ADMIN_USERNAME,
            DEFAULT_ADMIN_PASSWORD,
            Role::Admin,
        );
        self.users.insert_with_id(admin.clone(), ADMIN_ID_BASE)?;
        info!(target: AUTH, id = ADMIN_ID_BASE, "Seeded default administrator");
        Ok(Some(admin))
    }

    /// Everything `register` checks, without touching the store.
    pub fn check_registration(&self, username: &str, password: &str) -> AuthResult<()> {
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(AuthError::InvalidInput(format!(
                "username must be at least {MIN_USERNAME_LEN} characters"
            )));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        check_fields(&User::new(0, username, password, Role::Admin))?;
        // case-sensitive, across every role and inactive accounts too
        if self.users.iter().any(|u| u.username == username) {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }
        if self.users.is_full() {
            return Err(StoreError::Capacity {
                kind: EntityKind::User,
                capacity: self.users.capacity(),
            }
            .into());
        }
        Ok(())
    }

    /// Register an account whose id comes from its role base.
    ///
    /// Doctor accounts share their id with a doctor profile, so they go
    /// through [`AuthStore::register_with_id`] once the profile exists.
    pub fn register(&mut self, username: &str, password: &str, role: Role) -> AuthResult<User> {
        if role == Role::Doctor {
            return Err(AuthError::InvalidInput(
                "doctor accounts need a doctor profile".to_string(),
            ));
        }
        self.check_registration(username, password)?;
        let id = self.users.next_id(role.id_base());
        self.insert(username, password, role, id)
    }

    /// Register an account under an id chosen by the caller.
    pub fn register_with_id(
        &mut self,
        username: &str,
        password: &str,
        role: Role,
        id: i32,
    ) -> AuthResult<User> {
        self.check_registration(username, password)?;
        self.insert(username, password, role, id)
    }

    fn insert(&mut self, username: &str, password: &str, role: Role, id: i32) -> AuthResult<User> {
        let user = User::new(id, username, password, role);
        self.users.insert_with_id(user.clone(), id)?;
        debug!(target: AUTH, id, role = %role, "Registered user");
        Ok(user)
    }

    /// Log in as `role`.
    ///
    /// Every mismatch (unknown name, wrong password, other role, inactive
    /// account) is the same `InvalidCredentials`.
    pub fn authenticate(&self, username: &str, password: &str, role: Role) -> AuthResult<&User> {
        let user = self.users.iter().find(|u| {
            u.username == username && u.password.matches(password) && u.role == role && u.active
        });
        match user {
            Some(user) => {
                debug!(target: AUTH, id = user.id, role = %role, "Login succeeded");
                Ok(user)
            }
            None => {
                warn!(target: AUTH, role = %role, "Login failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    pub fn deactivate_user(&mut self, id: i32) -> AuthResult<()> {
        self.users.deactivate(id)?;
        debug!(target: AUTH, id, "Deactivated user");
        Ok(())
    }
}
