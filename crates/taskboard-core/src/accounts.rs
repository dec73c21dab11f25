// ── Account flows ──
//
// Registration, login, session resume and logout against the users
// resource. Validation always runs first; a failing form never reaches
// the network.

use chrono::Utc;
use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

use taskboard_api::{NewUserRecord, UsersClient};

use crate::config::ServerConfig;
use crate::convert::format_timestamp;
use crate::error::CoreError;
use crate::model::User;
use crate::session::{SessionGuard, SessionToken};
use crate::validation::{LoginForm, RegistrationForm};

/// Account operations for one server.
#[derive(Debug, Clone)]
pub struct Accounts {
    client: UsersClient,
    session: SessionGuard,
}

impl Accounts {
    pub fn new(config: &ServerConfig, session: SessionGuard) -> Result<Self, CoreError> {
        let client = UsersClient::new(config.base_url.clone(), &config.transport())?;
        Ok(Self::with_client(client, session))
    }

    pub fn with_client(client: UsersClient, session: SessionGuard) -> Self {
        Self { client, session }
    }

    pub fn session(&self) -> &SessionGuard {
        &self.session
    }

    /// Whether any existing user already has `email`.
    ///
    /// Check-then-create is not atomic; a concurrent registration with the
    /// same email can slip through.
    pub async fn email_taken(&self, email: &str) -> Result<bool, CoreError> {
        let users = self.client.list_users().await?;
        Ok(users.iter().any(|u| u.email == email))
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, form: &RegistrationForm) -> Result<User, CoreError> {
        form.validate()?;

        if self.email_taken(&form.email).await? {
            debug!(email = %form.email, "registration rejected: email in use");
            return Err(CoreError::EmailTaken {
                email: form.email.clone(),
            });
        }

        let record = NewUserRecord {
            username: form.username.clone(),
            email: form.email.clone(),
            password: form.password.expose_secret().to_owned(),
            created_at: format_timestamp(&Utc::now()),
        };
        let created = User::from(self.client.create_user(&record).await?);
        info!(user = %created.id, username = %created.username, "account registered");
        Ok(created)
    }

    /// Match email and password against the user list and store the
    /// user's id as the session token.
    pub async fn login(&self, form: &LoginForm) -> Result<User, CoreError> {
        form.validate()?;

        let users = self.client.list_users().await?;
        let password = form.password.expose_secret();
        let Some(record) = users
            .into_iter()
            .find(|u| u.email == form.email && u.password == password)
        else {
            warn!(email = %form.email, "login failed: no matching account");
            return Err(CoreError::InvalidCredentials);
        };

        let user = User::from(record);
        self.session.sign_in(&SessionToken::from(&user.id))?;
        info!(username = %user.username, "logged in");
        Ok(user)
    }

    /// Revalidate a stored token. `Ok(None)` when nobody is signed in; a
    /// token that no longer resolves is cleared.
    pub async fn resume(&self) -> Result<Option<User>, CoreError> {
        let Some(token) = self.session.token()? else {
            return Ok(None);
        };
        match self.client.get_user(token.as_str()).await {
            Ok(record) => Ok(Some(User::from(record))),
            Err(e) => {
                let reason = CoreError::from(e).to_string();
                self.session.revoke(&reason);
                Err(CoreError::SessionRevoked { reason })
            }
        }
    }

    pub fn logout(&self) -> Result<(), CoreError> {
        self.session.sign_out()
    }
}
