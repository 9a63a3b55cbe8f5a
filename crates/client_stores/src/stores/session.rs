//! Session store: the authenticated user and their token.

use std::sync::Arc;

use api_protocol::{AuthResponse, LoginRequest, Role, SignupRequest, User};

use crate::{ApiClient, Cached, ClientResult};

/// Holds the signed-in user and wires the bearer token into the shared
/// client.
pub struct SessionStore {
    client: Arc<ApiClient>,
    user: Cached<User>,
}

impl SessionStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            user: Cached::new(),
        }
    }

    /// Returns the cached signed-in user, if any.
    pub fn user(&self) -> Option<User> {
        self.user.get()
    }

    /// Subscribes to session changes.
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Option<User>> {
        self.user.subscribe()
    }

    /// Creates an account and signs in.
    pub async fn signup(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> ClientResult<User> {
        let auth: AuthResponse = self
            .client
            .post(
                "/auth/signup",
                &SignupRequest {
                    name: name.into(),
                    email: email.into(),
                    password: password.into(),
                    role,
                },
            )
            .await?;

        self.client.set_token(auth.access_token).await;
        self.user.set(auth.user.clone());
        tracing::debug!(user_id = %auth.user.id, "Account created and signed in");
        Ok(auth.user)
    }

    /// Signs in with email and password.
    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> ClientResult<User> {
        let auth: AuthResponse = self
            .client
            .post(
                "/auth/login",
                &LoginRequest {
                    email: email.into(),
                    password: password.into(),
                },
            )
            .await?;

        self.client.set_token(auth.access_token).await;
        self.user.set(auth.user.clone());
        tracing::debug!(user_id = %auth.user.id, "Signed in");
        Ok(auth.user)
    }

    /// Refreshes the signed-in user from the server.
    pub async fn fetch_me(&self) -> ClientResult<User> {
        let user: User = self.client.get("/auth/me").await?;
        self.user.set(user.clone());
        Ok(user)
    }

    /// Drops the session locally.
    pub async fn logout(&self) {
        self.client.clear_token().await;
        self.user.clear();
        tracing::debug!("Session cleared");
    }
}
