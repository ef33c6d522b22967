use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Ack, ApiClient};
use crate::error::ApiError;
use crate::models::User;
use crate::session::StoredSession;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OtpCheck {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

impl ApiClient {
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.http.post("/auth/register", request).await
    }

    /// Authenticate and persist the returned token into the session slot.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let response: AuthResponse = self.http.post("/auth/login", credentials).await?;
        self.store_session(&response);
        Ok(response)
    }

    /// Remote revocation is best-effort: the local session is cleared no
    /// matter what the server says, so a failed call can never leave a
    /// token behind.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let revocation: Result<Ack, ApiError> =
            self.http.post("/auth/logout", &serde_json::json!({})).await;
        if let Err(error) = self.session().clear() {
            warn!(%error, "failed to clear persisted session on logout");
        }
        if let Err(error) = revocation {
            warn!(%error, "logout call failed; local session cleared anyway");
        }
        Ok(())
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.http.get("/auth/me").await
    }

    /// Manual, user-triggered re-send; never called automatically.
    pub async fn resend_otp(&self, email: &str) -> Result<Ack, ApiError> {
        self.http
            .post("/auth/otp/resend", &serde_json::json!({ "email": email }))
            .await
    }

    /// A successful verification signs the user in, same as `login`.
    pub async fn verify_otp(&self, check: &OtpCheck) -> Result<AuthResponse, ApiError> {
        let response: AuthResponse = self.http.post("/auth/otp/verify", check).await?;
        self.store_session(&response);
        Ok(response)
    }

    fn store_session(&self, response: &AuthResponse) {
        let session = StoredSession {
            token: response.token.clone(),
            user_id: response.user.id.clone(),
            role: response.user.role,
        };
        if let Err(error) = self.session().set(session) {
            // The in-process slot still holds the session; only the
            // persisted copy is affected, so don't fail the login.
            warn!(%error, "failed to persist session token");
        }
    }
}
