use serde::{Deserialize, Serialize};

/// Login for the cloud WebDAV endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Full email address (user@mail.ru)
    pub username: String,
    /// Application password
    pub password: String,
}

impl Credentials {
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
