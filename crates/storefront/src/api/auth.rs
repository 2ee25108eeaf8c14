//! Backend auth API client.
//!
//! The storefront never sees password hashes or mints tokens - it proxies
//! credentials to the backend and keeps the returned identity in the
//! session.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use spotfit_core::{Email, UserId, UserRole};

use crate::config::BackendApiConfig;
use crate::models::CurrentUser;

use super::{ApiError, error_for_response};

/// Body for `POST auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: Email,
    pub password: String,
}

/// A user as returned by the backend auth routes.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub role: UserRole,
}

impl From<BackendUser> for CurrentUser {
    fn from(user: BackendUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

/// Successful login/register response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    /// Backend-issued bearer token; kept only for the session's lifetime.
    pub token: String,
    pub user: BackendUser,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a Email,
    password: &'a str,
}

/// HTTP client for the backend auth API.
#[derive(Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    /// Create a new auth client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &BackendApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + Sync,
    {
        let url = format!("{}/{path}", self.base_url);
        let response = self.client.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the backend's status for bad
    /// credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<AuthSession, ApiError> {
        self.post_json("auth/login", &LoginRequest { email, password })
            .await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` if the email is taken or the payload is
    /// rejected.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthSession, ApiError> {
        self.post_json("auth/register", request).await
    }
}
