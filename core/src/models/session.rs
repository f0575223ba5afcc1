// storefront/src/models/session.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
  pub fn new() -> Self {
    UserId(Uuid::new_v4())
  }
}

impl Default for UserId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id: UserId,
  pub email: String,
  pub created_at: DateTime<Utc>,
}

/// An authenticated user context issued by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  /// Never serialized; a session read back from JSON carries an empty token.
  #[serde(skip)]
  pub access_token: String,
  pub user: User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
  SignedIn,
  SignedOut,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn session_json_omits_token_and_reads_back() {
    let session = Session {
      access_token: "secret-token".to_string(),
      user: User {
        id: UserId(Uuid::new_v4()),
        email: "shopper@example.com".to_string(),
        created_at: Utc::now(),
      },
    };

    let json = serde_json::to_value(&session).unwrap();
    assert!(json.get("access_token").is_none());

    let read_back: Session = serde_json::from_value(json).unwrap();
    assert_eq!(read_back.user, session.user);
    assert!(read_back.access_token.is_empty());
  }
}
