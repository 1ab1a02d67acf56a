// Auth service endpoints
//
// Login and signup hand back a JWT in the response body; the caller decides
// where to keep it and passes it back through `BackendClient::set_token`.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::{BackendClient, Service};
use crate::error::Error;
use crate::models::{AuthResponse, LoginRequest, SignupRequest};

impl BackendClient {
    /// Authenticate with email + password.
    ///
    /// `POST /api/auth/login`. The auth service answers bad credentials with
    /// 400/401/403 depending on the failure, all of which map to
    /// [`Error::Authentication`].
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<AuthResponse, Error> {
        debug!(email, "logging in");
        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        self.post_json(Service::Auth, &["api", "auth", "login"], &body)
            .await
            .map_err(into_auth_error)
    }

    /// Create an account.
    ///
    /// `POST /api/auth/register`
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, Error> {
        debug!(email = %request.email, role = %request.role, "registering account");
        self.post_json(Service::Auth, &["api", "auth", "register"], request)
            .await
    }
}

fn into_auth_error(err: Error) -> Error {
    match err {
        Error::Api {
            status: 400 | 403,
            message,
        } => Error::Authentication { message },
        other => other,
    }
}
