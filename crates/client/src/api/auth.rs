// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authentication service: the only writer of the [`SessionStore`].
//!
//! Login and registration establish the session on success and leave prior
//! state untouched on failure. Logout calls the backend best-effort and
//! always wipes local state. The OTP flow covers password reset for users
//! who are locked out.
//!
//! [`SessionStore`]: crate::session::SessionStore

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::endpoints;
use crate::api::users::User;
use crate::error::ApiResult;
use crate::http::ApiClient;
use crate::validate;

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration form. The confirmation is checked locally and never sent.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Token and role set carried in the auth envelopes' `metadata`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// OTP password-reset completion request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpVerification {
    pub email: String,
    pub otp_code: String,
    pub new_password: String,
}

pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `POST /users/login`. On success the session is established and
    /// persisted before this returns, so a reader sees the new roles with
    /// no unauthenticated window. On failure prior state is untouched and
    /// the server error passes through unchanged.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<AuthPayload> {
        validate::validate_login(&credentials.email, &credentials.password)?;
        let envelope = self.client.post(endpoints::LOGIN, credentials).await?;
        let payload: AuthPayload = envelope.metadata_as()?;
        self.client
            .session()
            .establish(payload.access_token.clone(), payload.roles.clone())
            .await;
        Ok(payload)
    }

    /// `POST /users/register` after local validation. A confirmation
    /// mismatch fails here with a field-level error and no network call.
    /// Email and password are trimmed before submission.
    pub async fn register(&self, registration: &Registration) -> ApiResult<AuthPayload> {
        validate::validate_registration(
            &registration.email,
            &registration.password,
            &registration.confirm_password,
        )?;
        let body = Credentials {
            email: registration.email.trim().to_owned(),
            password: registration.password.trim().to_owned(),
        };
        let envelope = self.client.post(endpoints::REGISTER, &body).await?;
        let payload: AuthPayload = envelope.metadata_as()?;
        self.client
            .session()
            .establish(payload.access_token.clone(), payload.roles.clone())
            .await;
        Ok(payload)
    }

    /// Best-effort `POST /users/logout`, then unconditional local wipe.
    /// A server failure is logged and never blocks the cleanup.
    pub async fn logout(&self) {
        if let Err(e) = self.client.post_empty(endpoints::LOGOUT).await {
            warn!("server logout failed: {e}");
        }
        self.client.session().clear().await;
        info!("logged out");
    }

    /// `POST /users/forgot-password`: requests an OTP for password reset.
    /// Returns the server's informational message, if any.
    pub async fn forgot_password(&self, email: &str) -> ApiResult<Option<String>> {
        let envelope = self
            .client
            .post(endpoints::FORGOT_PASSWORD, &serde_json::json!({ "email": email }))
            .await?;
        Ok(envelope.message)
    }

    /// `POST /users/verify-otp`: completes the OTP password reset.
    pub async fn verify_otp(&self, request: &OtpVerification) -> ApiResult<Option<String>> {
        let envelope = self.client.post(endpoints::VERIFY_OTP, request).await?;
        Ok(envelope.message)
    }

    /// `POST /users/change-password` for the logged-in user.
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> ApiResult<Option<String>> {
        let envelope = self
            .client
            .post(
                endpoints::CHANGE_PASSWORD,
                &serde_json::json!({
                    "oldPassword": old_password,
                    "newPassword": new_password,
                }),
            )
            .await?;
        Ok(envelope.message)
    }

    /// `GET /users/me`: the authenticated user.
    pub async fn me(&self) -> ApiResult<User> {
        let envelope = self.client.get(endpoints::ME, &[]).await?;
        envelope.data_as()
    }
}
