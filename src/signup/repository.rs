use serde::{Deserialize, Serialize};

use super::domain::WaitlistEntry;

/// Storage for the waitlist table.
pub trait WaitlistRepository: Send + Sync {
    fn insert(&self, entry: WaitlistEntry) -> Result<WaitlistEntry, RepositoryError>;
    /// Case-insensitive email lookup.
    fn find_by_email(&self, email: &str) -> Result<Option<WaitlistEntry>, RepositoryError>;
    /// All entries, newest first.
    fn list(&self) -> Result<Vec<WaitlistEntry>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound mail hook (e.g. a transactional email API adapter).
pub trait SignupNotifier: Send + Sync {
    fn send(&self, email: OutboundEmail) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("email transport unavailable: {0}")]
    Transport(String),
}
