use chrono::Utc;
use tracing::{debug, info};

use super::error::AuthError;
use crate::models::{UserAccount, UserId, UserType};

pub const DEMO_EMAIL: &str = "demo@ribamarket.com";
pub const DEMO_PASSWORD: &str = "password123";

/// Minimum length that earns a strength point.
const STRONG_PASSWORD_LEN: usize = 8;

fn demo_user() -> UserAccount {
    UserAccount {
        id: UserId::new("demo-001"),
        email: DEMO_EMAIL.to_string(),
        password: DEMO_PASSWORD.to_string(),
        name: "Demo User".to_string(),
        phone: "+234 800 000 0000".to_string(),
        user_type: UserType::Both,
        business_name: Some("Demo Store".to_string()),
        avatar: None,
        bio: Some("This is a demo account for testing Riba Market.".to_string()),
        is_pro: false,
        created_at: Utc::now(),
    }
}

/// Password strength from 0 to 4: one point each for length of at least
/// eight, an uppercase letter, a digit and a symbol.
pub fn password_strength(password: &str) -> u8 {
    let checks = [
        password.chars().count() >= STRONG_PASSWORD_LEN,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    checks.iter().filter(|passed| **passed).count() as u8
}

/// Sign-up form contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    pub user_type: UserType,
    pub business_name: Option<String>,
}

/// Profile fields a logged-in user may change. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub business_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

/// In-memory accounts and the current session. Nothing here is persisted.
#[derive(Debug, Clone)]
pub struct AccountDirectory {
    users: Vec<UserAccount>,
    current: Option<UserId>,
}

impl Default for AccountDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountDirectory {
    /// Directory seeded with the demo account.
    pub fn new() -> Self {
        Self {
            users: vec![demo_user()],
            current: None,
        }
    }

    pub fn users(&self) -> &[UserAccount] {
        &self.users
    }

    pub fn current_user(&self) -> Option<&UserAccount> {
        let id = self.current.as_ref()?;
        self.users.iter().find(|u| &u.id == id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Log in with a case-insensitive email and an exact password.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&UserAccount, AuthError> {
        let index = self
            .users
            .iter()
            .position(|u| u.email_matches(email) && u.password == password)
            .ok_or_else(|| {
                debug!(email, "Login rejected");
                AuthError::InvalidCredentials
            })?;
        let user = &self.users[index];
        self.current = Some(user.id.clone());
        info!(user = %user.id, "Logged in");
        Ok(user)
    }

    pub fn logout(&mut self) {
        if let Some(id) = self.current.take() {
            info!(user = %id, "Logged out");
        }
    }

    fn next_user_id(&self) -> UserId {
        let mut millis = Utc::now().timestamp_millis();
        loop {
            let id = UserId::new(format!("user-{}", millis));
            if !self.users.iter().any(|u| u.id == id) {
                return id;
            }
            millis += 1;
        }
    }

    /// Create an account and log it in.
    pub fn register(&mut self, registration: Registration) -> Result<&UserAccount, AuthError> {
        if self.users.iter().any(|u| u.email_matches(&registration.email)) {
            return Err(AuthError::EmailTaken);
        }

        let business_name = registration
            .business_name
            .filter(|_| registration.user_type.can_sell());
        let user = UserAccount {
            id: self.next_user_id(),
            email: registration.email.trim().to_string(),
            password: registration.password,
            name: registration.name,
            phone: registration.phone,
            user_type: registration.user_type,
            business_name,
            avatar: None,
            bio: None,
            is_pro: false,
            created_at: Utc::now(),
        };
        info!(user = %user.id, user_type = %user.user_type, "Registered account");
        self.current = Some(user.id.clone());
        self.users.push(user);
        Ok(&self.users[self.users.len() - 1])
    }

    /// Apply `update` to the logged-in user.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<&UserAccount, AuthError> {
        let id = self.current.clone().ok_or(AuthError::NotAuthenticated)?;
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AuthError::NotAuthenticated)?;

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(phone) = update.phone {
            user.phone = phone;
        }
        if update.business_name.is_some() {
            user.business_name = update.business_name;
        }
        if update.avatar.is_some() {
            user.avatar = update.avatar;
        }
        if update.bio.is_some() {
            user.bio = update.bio;
        }
        debug!(user = %user.id, "Updated profile");
        Ok(user)
    }
}
