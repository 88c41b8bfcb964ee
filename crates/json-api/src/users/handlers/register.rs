//! Register Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ecom_app::{
    auth::NewUser,
    domain::users::records::{UserRecord, UserUuid},
};

use crate::{extensions::*, state::State, users::errors::into_status_error};

/// Register Request
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    /// Between 8 and 128 characters
    pub password: String,
}

impl From<RegisterRequest> for NewUser {
    fn from(request: RegisterRequest) -> Self {
        NewUser {
            uuid: UserUuid::new(),
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
        }
    }
}

/// Registered user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.uuid.into(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            created_at: user.created_at.to_string(),
        }
    }
}

/// Register Handler
#[endpoint(
    tags("users"),
    summary = "Register",
    responses(
        (status_code = StatusCode::CREATED, description = "User registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid name, email or password"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let user = state
        .app
        .auth
        .register(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/v1/users/{}", user.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use ecom_app::auth::{AuthServiceError, MockAuthService};

    use crate::test_helpers::{auth_service, make_user};

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        auth_service(auth, Router::with_path("register").post(handler))
    }

    fn payload() -> Value {
        json!({
            "firstName": "Grace",
            "lastName": "Hopper",
            "email": "grace@example.com",
            "password": "cobol forever",
        })
    }

    #[tokio::test]
    async fn test_register_returns_201_with_camel_case_user() -> TestResult {
        let uuid = UserUuid::new();

        let mut auth = MockAuthService::new();

        auth.expect_register()
            .once()
            .withf(|user| user.email == "grace@example.com" && user.password == "cobol forever")
            .return_once(move |_| Ok(make_user(uuid)));

        auth.expect_login().never();
        auth.expect_authenticate_bearer().never();

        let mut res = TestClient::post("http://example.com/register")
            .json(&payload())
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let body: Value = res.take_json().await?;

        assert_eq!(body["id"], json!(uuid.into_uuid()));
        assert_eq!(body["firstName"], "Grace");
        assert!(body.get("passwordHash").is_none(), "hash must not be exposed");

        Ok(())
    }

    #[tokio::test]
    async fn test_register_taken_email_returns_409() {
        let mut auth = MockAuthService::new();

        auth.expect_register()
            .once()
            .return_once(|_| Err(AuthServiceError::EmailTaken));

        auth.expect_login().never();
        auth.expect_authenticate_bearer().never();

        let res = TestClient::post("http://example.com/register")
            .json(&payload())
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }

    #[tokio::test]
    async fn test_register_invalid_data_returns_400() {
        let mut auth = MockAuthService::new();

        auth.expect_register()
            .once()
            .return_once(|_| Err(AuthServiceError::InvalidData));

        auth.expect_login().never();
        auth.expect_authenticate_bearer().never();

        let res = TestClient::post("http://example.com/register")
            .json(&payload())
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
