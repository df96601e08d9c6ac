use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Buyer,
    Seller,
    Both,
}

impl UserType {
    pub fn can_sell(&self) -> bool {
        matches!(self, UserType::Seller | UserType::Both)
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Buyer => write!(f, "Buyer"),
            UserType::Seller => write!(f, "Seller"),
            UserType::Both => write!(f, "Both"),
        }
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buyer" => Ok(UserType::Buyer),
            "seller" => Ok(UserType::Seller),
            "both" => Ok(UserType::Both),
            other => Err(format!("unknown user type '{}'", other)),
        }
    }
}

/// A session-only account. The password is kept in plain text: this is a
/// demo directory, not an authentication system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    pub user_type: UserType,
    pub business_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub is_pro: bool,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}
