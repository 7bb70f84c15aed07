use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type EmailId = String;

/// One email record as it arrives on the wire (camelCase, ISO-8601 date).
/// `is_favorite`/`is_read` are overlay fields: the source may omit them,
/// and their real value comes from the flag store at fetch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub id: EmailId,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_read: bool,
}

/// Partial read/favorite state. Absent fields mean "no override".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
}

/// Persisted flag table: email id -> partial flags.
pub type FlagMap = HashMap<EmailId, FlagUpdate>;

impl FlagUpdate {
    pub fn favorite(value: bool) -> Self {
        Self {
            is_favorite: Some(value),
            ..Self::default()
        }
    }

    pub fn read(value: bool) -> Self {
        Self {
            is_read: Some(value),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.is_favorite.is_none() && self.is_read.is_none()
    }

    /// Shallow merge: fields set in `other` win, absent fields are kept.
    pub fn merge(&mut self, other: &FlagUpdate) {
        if other.is_favorite.is_some() {
            self.is_favorite = other.is_favorite;
        }
        if other.is_read.is_some() {
            self.is_read = other.is_read;
        }
    }

    /// Write the set fields onto an email, leaving the rest untouched.
    pub fn apply_to(&self, email: &mut Email) {
        if let Some(fav) = self.is_favorite {
            email.is_favorite = fav;
        }
        if let Some(read) = self.is_read {
            email.is_read = read;
        }
    }
}
