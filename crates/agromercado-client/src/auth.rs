//! Account endpoints: login, registration, profile and password reset.

use crate::client::MarketClient;
use crate::envelope::AuthPayload;
use crate::error::Result;
use agromercado_core::{
    ForgotPasswordRequest, LoginRequest, ProfileUpdate, RegisterRequest, ResetPasswordRequest,
    User,
};
use reqwest::Method;

impl MarketClient {
    /// POST /auth/login → `(token, user)`.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<(String, User)> {
        let req = self
            .request(Method::POST, "/auth/login", None)
            .json(credentials);
        let payload: AuthPayload = self.fetch(req).await?;
        Ok((payload.token, payload.user))
    }

    /// POST /auth/register → `(token, user)`.
    ///
    /// The backend may or may not enforce the strength gate itself; a
    /// refusal surfaces as `Api` or `Rejected`.
    pub async fn register(&self, registration: &RegisterRequest) -> Result<(String, User)> {
        let req = self
            .request(Method::POST, "/auth/register", None)
            .json(registration);
        let payload: AuthPayload = self.fetch(req).await?;
        Ok((payload.token, payload.user))
    }

    /// POST /auth/profile. Returns the updated user when the backend echoes it.
    pub async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<Option<User>> {
        let req = self
            .request(Method::POST, "/auth/profile", Some(token))
            .json(update);
        self.fetch_optional(req).await
    }

    /// POST /auth/forgot-password. The backend emails a six-digit code.
    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<Option<String>> {
        let req = self
            .request(Method::POST, "/auth/forgot-password", None)
            .json(request);
        self.execute(req).await
    }

    /// POST /auth/reset-password with the emailed code.
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<Option<String>> {
        let req = self
            .request(Method::POST, "/auth/reset-password", None)
            .json(request);
        self.execute(req).await
    }
}
