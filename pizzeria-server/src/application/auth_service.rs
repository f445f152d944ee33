use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{GOOGLE_PASSWORD_SENTINEL, NewUser, Profile, ProfileScope, User};
use crate::infrastructure::google::{IdTokenError, IdTokenVerifier};
use crate::infrastructure::security::{JwtKeys, hash_password, verify_password};

/// A signed-in user together with the token that proves it.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
    google: Arc<dyn IdTokenVerifier>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        keys: JwtKeys,
        google: Arc<dyn IdTokenVerifier>,
    ) -> Self {
        Self { repo, keys, google }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn get_user(&self, id: i64) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound(id))
    }

    #[instrument(skip(self, password, profile))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        profile: Profile,
    ) -> Result<Session, DomainError> {
        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::Validation("a valid email is required".into()));
        }
        if password.is_empty() {
            return Err(DomainError::Validation("password must not be empty".into()));
        }
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(DomainError::EmailAlreadyRegistered);
        }

        let hash =
            hash_password(password).map_err(|err| DomainError::Internal(err.to_string()))?;
        let user = self.repo.create(NewUser::new(email, hash, profile)).await?;
        self.issue(user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let user = self
            .repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(DomainError::Unauthorized)?;

        // accounts created through Google have no usable hash
        let valid = verify_password(password, &user.password_hash)
            .map_err(|_| DomainError::Unauthorized)?;
        if !valid {
            return Err(DomainError::Unauthorized);
        }

        self.issue(user)
    }

    #[instrument(skip_all)]
    pub async fn google_sign_in(&self, id_token: &str) -> Result<Session, DomainError> {
        let identity = self.google.verify(id_token).await.map_err(|err| match err {
            IdTokenError::Invalid(reason) => {
                warn!(%reason, "google sign-in rejected");
                DomainError::InvalidIdToken
            }
            IdTokenError::Unavailable(reason) => DomainError::Internal(reason),
        })?;

        let email = normalize_email(&identity.email);
        if let Some(user) = self.repo.find_by_email(&email).await? {
            return self.issue(user);
        }

        let user = self
            .repo
            .create(NewUser::new(
                email,
                GOOGLE_PASSWORD_SENTINEL.to_string(),
                Profile::default(),
            ))
            .await?;
        info!(user_id = user.id, "account created from google sign-in");
        self.issue(user)
    }

    #[instrument(skip(self, profile))]
    pub async fn update_profile(
        &self,
        id: i64,
        profile: Profile,
        scope: ProfileScope,
    ) -> Result<User, DomainError> {
        let mut user = self.get_user(id).await?;
        user.apply_profile(profile, scope);
        self.repo
            .update_profile(&user)
            .await?
            .ok_or(DomainError::UserNotFound(id))
    }

    fn issue(&self, user: User) -> Result<Session, DomainError> {
        let access_token = self
            .keys
            .generate_token(user.id, &user.role)
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        Ok(Session {
            user,
            access_token,
            expires_in: self.keys.expires_in(),
        })
    }
}
