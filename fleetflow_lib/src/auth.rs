//! Login, logout and the current user.
//!
//! The session token lives in the client's [`TokenStore`]. Apart from the
//! client's own session-expiry path, this is the only code that writes it.
//!
//! [`TokenStore`]: fleetflow_api::session::TokenStore

use std::sync::Arc;

use fleetflow_api::normalize::unwrap_data_object;
use fleetflow_api::types::{LoginResponse, ResourceKind, User};
use fleetflow_api::Client;
use serde::Serialize;

use crate::error::FleetError;

pub const ACCESS_TOKEN_PATH: &str = "/auth/access-token";
pub const CURRENT_USER_PATH: &str = "/auth/me";

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Body of `PUT /users/{id}` from the account screen. The password pair is
/// only sent when changing the password.
#[derive(Serialize)]
struct AccountUpdate<'a> {
    name: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password_confirmation: Option<&'a str>,
}

pub struct AuthSession {
    client: Arc<Client>,
}

impl AuthSession {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// The stored token, if any.
    pub fn token(&self) -> Option<String> {
        self.client.token_store().load()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Exchanges credentials for an access token and stores it.
    ///
    /// The server may answer bare or wrapped in `{"data": ...}`.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, FleetError> {
        let payload = self
            .client
            .post(ACCESS_TOKEN_PATH, &Credentials { email, password })
            .await?;
        let response: LoginResponse = serde_json::from_value(unwrap_data_object(payload))?;
        let token = response
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                FleetError::InvalidInput(
                    "Login response did not contain an access token.".to_string(),
                )
            })?;
        self.client.token_store().save(token)?;
        tracing::info!("Logged in as {}", email);
        Ok(response)
    }

    /// Loads the user behind the stored token. Returns `None` without a
    /// request when nobody is logged in. If the lookup fails the token is
    /// dropped, since it no longer identifies anyone.
    pub async fn current_user(&self) -> Result<Option<User>, FleetError> {
        if !self.is_authenticated() {
            return Ok(None);
        }
        match self.fetch_user().await {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!("Failed to load current user: {}", e);
                self.logout()?;
                Err(e)
            }
        }
    }

    /// Saves a new name and email for `user`, then reloads the current user.
    pub async fn update_profile(
        &self,
        user: &User,
        name: &str,
        email: &str,
    ) -> Result<Option<User>, FleetError> {
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(FleetError::InvalidInput(
                "Name and email are required.".to_string(),
            ));
        }
        let body = AccountUpdate {
            name: name.trim(),
            email: email.trim(),
            password: None,
            password_confirmation: None,
        };
        self.client
            .put(&ResourceKind::Users.member(&user.id), &body)
            .await?;
        tracing::info!("Updated profile of user {}", user.id);
        self.current_user().await
    }

    /// Sets a new password for `user` and ends the session; the next
    /// command has to log in with the new password.
    pub async fn change_password(
        &self,
        user: &User,
        password: &str,
        confirmation: &str,
    ) -> Result<(), FleetError> {
        if password != confirmation {
            return Err(FleetError::InvalidInput(
                "Passwords do not match.".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(FleetError::InvalidInput(
                "Password cannot be empty.".to_string(),
            ));
        }
        let body = AccountUpdate {
            name: &user.name,
            email: &user.email,
            password: Some(password),
            password_confirmation: Some(confirmation),
        };
        self.client
            .put(&ResourceKind::Users.member(&user.id), &body)
            .await?;
        tracing::info!("Changed password of user {}", user.id);
        self.logout()
    }

    pub fn logout(&self) -> Result<(), FleetError> {
        self.client.token_store().clear()?;
        Ok(())
    }

    async fn fetch_user(&self) -> Result<User, FleetError> {
        let payload = self.client.get(CURRENT_USER_PATH).await?;
        Ok(serde_json::from_value(unwrap_data_object(payload))?)
    }
}
