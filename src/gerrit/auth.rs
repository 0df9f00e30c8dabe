//! Gerrit Authentication
//!
//! Gerrit serves authenticated REST calls under the `/a/` prefix and accepts
//! HTTP basic auth with the account's generated HTTP password.

use std::fmt;

/// Environment variable holding the account name
pub const USERNAME_ENV: &str = "GERRIT_USERNAME";

/// Environment variable holding the generated HTTP password
pub const PASSWORD_ENV: &str = "GERRIT_HTTP_PASSWORD";

/// Basic-auth credentials for a Gerrit account
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create credentials, rejecting usernames basic auth cannot carry
    pub fn new(username: &str, password: &str) -> Option<Self> {
        if !validate_username(username) {
            tracing::warn!("Invalid Gerrit username, ignoring credentials");
            return None;
        }

        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Pair an explicit username with the password from `GERRIT_HTTP_PASSWORD`
    pub fn with_env_password(username: &str) -> Option<Self> {
        let Ok(password) = std::env::var(PASSWORD_ENV) else {
            tracing::debug!("{} not set, using anonymous access", PASSWORD_ENV);
            return None;
        };
        Self::new(username, &password)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Attach the credentials to a request
    pub fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth(&self.username, Some(&self.password))
    }
}

// Never print the password, not even in debug logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A basic-auth username must be non-empty, contain no ':' and no control characters
fn validate_username(username: &str) -> bool {
    !username.is_empty() && !username.contains(':') && !username.chars().any(char::is_control)
}
