//! Auth service.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;

use crate::{
    auth::{
        AuthServiceError, IssuedToken, NewUser, TokenError, TokenSigner,
        models::normalise_email,
        password::verify_password,
    },
    domain::users::records::UserRecord,
    storage::{FieldValue, StorageError},
    unit_of_work::{PgUnitOfWork, Repositories},
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    uow: PgUnitOfWork,
    signer: TokenSigner,
    ttl: SignedDuration,
}

impl PgAuthService {
    #[must_use]
    pub fn new(uow: PgUnitOfWork, signer: TokenSigner, ttl: SignedDuration) -> Self {
        Self { uow, signer, ttl }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn register(&self, user: NewUser) -> Result<UserRecord, AuthServiceError> {
        let record = user.into_record().await?;

        self.uow
            .run(move |repos| Box::pin(create_user(repos, record)))
            .await
    }

    async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AuthServiceError> {
        let email = normalise_email(email);

        let user = self
            .uow
            .run(move |repos| {
                Box::pin(async move {
                    repos
                        .users()
                        .get_by_fields(&[("email", FieldValue::from(email))], false)
                        .await
                })
            })
            .await;

        let user = match user {
            Ok(user) => user,
            Err(StorageError::NotFound) => return Err(AuthServiceError::InvalidCredentials),
            Err(error) => return Err(error.into()),
        };

        verify_password(password.to_string(), user.password_hash).await?;

        let expires_at = Timestamp::now()
            .checked_add(self.ttl)
            .map_err(|_overflow| TokenError::InvalidExpiry)?;

        let token = self.signer.issue(user.uuid, expires_at)?;

        Ok(IssuedToken { token, expires_at })
    }

    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserRecord, AuthServiceError> {
        let user = self.signer.verify(bearer_token, Timestamp::now())?;

        self.uow
            .run(move |repos| Box::pin(async move { repos.users().get_by_id(user, false).await }))
            .await
            .map_err(AuthServiceError::from)
    }
}

async fn create_user(
    repos: &mut Repositories,
    record: UserRecord,
) -> Result<UserRecord, AuthServiceError> {
    let existing = repos
        .users()
        .get_by_fields(&[("email", FieldValue::from(record.email.as_str()))], false)
        .await;

    match existing {
        Ok(_) => return Err(AuthServiceError::EmailTaken),
        Err(StorageError::NotFound) => {}
        Err(error) => return Err(error.into()),
    }

    Ok(repos.users().create(&record).await?)
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account with a hashed password.
    async fn register(&self, user: NewUser) -> Result<UserRecord, AuthServiceError>;

    /// Exchange an email and password for a bearer token.
    async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AuthServiceError>;

    /// Resolve a bearer token to the user it was issued to.
    async fn authenticate_bearer(&self, bearer_token: &str)
    -> Result<UserRecord, AuthServiceError>;
}
