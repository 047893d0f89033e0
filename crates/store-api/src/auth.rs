//! Authentication, profile and password endpoints.

use crate::wire::MessageResponse;
use crate::StoreApi;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use store_commerce::user::{Role, User};
use store_commerce::UserId;
use store_data::{ApiError, FetchError};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
    #[serde(default)]
    pub token: Option<String>,
}

impl UserDto {
    pub(crate) fn into_user(self) -> User {
        let role = self
            .role
            .as_deref()
            .and_then(|r| r.to_lowercase().parse::<Role>().ok())
            .unwrap_or(if self.is_admin == Some(true) {
                Role::Admin
            } else {
                Role::Client
            });

        User {
            id: UserId::new(self.id),
            name: self.name,
            email: self.email,
            role,
        }
    }
}

/// A signed-in user and their bearer token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: SecretString,
}

impl TryFrom<UserDto> for AuthSession {
    type Error = ApiError;

    fn try_from(mut dto: UserDto) -> Result<Self, Self::Error> {
        let token = dto
            .token
            .take()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| FetchError::ParseError("login response has no token".to_string()))?;
        Ok(Self {
            user: dto.into_user(),
            token: SecretString::from(token),
        })
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct Registration<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// Profile fields to change. `None` leaves a field alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// `/users` login, registration and profile.
pub struct AuthApi<'a> {
    pub(crate) api: &'a StoreApi,
}

impl AuthApi<'_> {
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        let client = self.api.client();
        let request = client
            .post("/users/login")
            .json(&Credentials { email, password })?;
        let dto: UserDto = client.execute(request).await?;
        AuthSession::try_from(dto)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ApiError> {
        let client = self.api.client();
        let request = client.post("/users").json(&Registration {
            name,
            email,
            password,
        })?;
        let dto: UserDto = client.execute(request).await?;
        AuthSession::try_from(dto)
    }

    pub async fn profile(&self) -> Result<User, ApiError> {
        let client = self.api.client();
        let dto: UserDto = client.execute(client.get("/users/profile")).await?;
        Ok(dto.into_user())
    }

    /// Update the profile. Returns the refreshed token when the server issues one.
    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<(User, Option<SecretString>), ApiError> {
        let client = self.api.client();
        let mut dto: UserDto = client
            .execute(client.put("/users/profile").json(update)?)
            .await?;
        let token = dto.token.take().filter(|t| !t.is_empty()).map(SecretString::from);
        Ok((dto.into_user(), token))
    }
}

/// `/password` reset flow.
pub struct PasswordApi<'a> {
    pub(crate) api: &'a StoreApi,
}

impl PasswordApi<'_> {
    /// Ask for a reset email. Returns the server's confirmation text.
    pub async fn forgot(&self, email: &str) -> Result<String, ApiError> {
        let client = self.api.client();
        let body = serde_json::json!({ "email": email });
        let response: MessageResponse = client
            .execute(client.post("/password/forgot").json(&body)?)
            .await?;
        Ok(response.message)
    }

    /// Set a new password with the token from the reset email.
    pub async fn reset(&self, token: &str, password: &str) -> Result<String, ApiError> {
        let client = self.api.client();
        let body = serde_json::json!({ "password": password });
        let response: MessageResponse = client
            .execute(client.post(&format!("/password/reset/{token}")).json(&body)?)
            .await?;
        Ok(response.message)
    }
}
