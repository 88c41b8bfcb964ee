//! Auth data models.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use jiff::Timestamp;

use crate::{
    auth::{AuthServiceError, password},
    domain::users::records::{UserRecord, UserUuid},
};

/// Registration payload. The password is hashed before anything is stored.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub(crate) async fn into_record(self) -> Result<UserRecord, AuthServiceError> {
        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();
        let email = normalise_email(&self.email);

        if first_name.is_empty() || last_name.is_empty() || !is_plausible_email(&email) {
            return Err(AuthServiceError::InvalidData);
        }

        password::validate_password(&self.password)?;

        let password_hash = password::hash_password(self.password).await?;
        let now = Timestamp::now();

        Ok(UserRecord {
            uuid: self.uuid,
            first_name,
            last_name,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Debug for NewUser {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("NewUser")
            .field("uuid", &self.uuid)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Bearer token handed out on login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
}

pub(crate) fn normalise_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_plausible_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
}
