use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of JWT: access or refresh.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Who a token is issued to. One login = one `sid`, kept across refreshes.
#[derive(Debug, Clone)]
pub struct Subject {
    pub id: Uuid,
    pub email: String,
    pub sid: Uuid,
    pub role: Role,
}

impl Subject {
    pub fn user(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            sid: Uuid::new_v4(),
            role: Role::User,
        }
    }

    /// The admin has no account row; `sub` is the nil UUID.
    pub fn admin(email: impl Into<String>) -> Self {
        Self {
            id: Uuid::nil(),
            email: email.into(),
            sid: Uuid::new_v4(),
            role: Role::Admin,
        }
    }
}

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,       // user ID
    pub email: String,   // login name
    pub sid: Uuid,       // session id
    pub role: Role,
    pub iat: usize,      // issued at (unix timestamp)
    pub exp: usize,      // expires at (unix timestamp)
    pub iss: String,     // issuer
    pub aud: String,     // audience
    pub kind: TokenKind, // token type
}

impl Claims {
    pub fn subject(&self) -> Subject {
        Subject {
            id: self.sub,
            email: self.email.clone(),
            sid: self.sid,
            role: self.role,
        }
    }

    /// Subject for a refreshed pair: same session and role, but the email
    /// comes from the current account row.
    pub fn renewed_for(&self, current_email: &str) -> Subject {
        Subject {
            email: current_email.to_string(),
            ..self.subject()
        }
    }
}
