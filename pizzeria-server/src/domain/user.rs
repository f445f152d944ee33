use serde::{Deserialize, Serialize};

pub const DEFAULT_ROLE: &str = "USER";

/// Stored in place of a password hash for accounts created through Google
/// sign-in. It is not a PHC string, so password login can never match it.
pub const GOOGLE_PASSWORD_SENTINEL: &str = "GOOGLE_AUTH";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub role: String,
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub profile: Profile,
}

impl NewUser {
    pub fn new(email: String, password_hash: String, profile: Profile) -> Self {
        Self {
            email,
            password_hash,
            profile,
        }
    }
}

/// Editable contact details of a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Which profile fields an update overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileScope {
    /// Names, address and phone. The city is left untouched.
    Contact,
    /// Every profile field, city included.
    Full,
}

impl User {
    pub fn apply_profile(&mut self, profile: Profile, scope: ProfileScope) {
        self.first_name = profile.first_name;
        self.last_name = profile.last_name;
        self.address = profile.address;
        self.phone = profile.phone;
        if scope == ProfileScope::Full {
            self.city = profile.city;
        }
    }
}
