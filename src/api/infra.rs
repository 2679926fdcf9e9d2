use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::signup::{
    NotifyError, OutboundEmail, RepositoryError, SignupNotifier, WaitlistEntry, WaitlistRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub readiness: Arc<AtomicBool>,
    pub metrics: Arc<PrometheusHandle>,
}

/// Process-local waitlist table; entries are lost on restart.
#[derive(Default, Clone)]
pub struct InMemoryWaitlistRepository {
    entries: Arc<Mutex<Vec<WaitlistEntry>>>,
}

impl WaitlistRepository for InMemoryWaitlistRepository {
    fn insert(&self, entry: WaitlistEntry) -> Result<WaitlistEntry, RepositoryError> {
        let mut guard = self.entries.lock().map_err(poisoned)?;
        if guard
            .iter()
            .any(|existing| existing.email.eq_ignore_ascii_case(&entry.email))
        {
            return Err(RepositoryError::Conflict);
        }
        guard.push(entry.clone());
        Ok(entry)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<WaitlistEntry>, RepositoryError> {
        let guard = self.entries.lock().map_err(poisoned)?;
        Ok(guard
            .iter()
            .find(|entry| entry.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn list(&self) -> Result<Vec<WaitlistEntry>, RepositoryError> {
        let guard = self.entries.lock().map_err(poisoned)?;
        let mut entries = guard.clone();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("waitlist lock poisoned".to_string())
}

/// Notifier that records outbound mail in the log instead of delivering it.
#[derive(Default, Clone)]
pub struct LoggingNotifier {
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl SignupNotifier for LoggingNotifier {
    fn send(&self, email: OutboundEmail) -> Result<(), NotifyError> {
        info!(to = %email.to, subject = %email.subject, "outbound email queued");
        let mut guard = self
            .sent
            .lock()
            .map_err(|_| NotifyError::Transport("outbox lock poisoned".to_string()))?;
        guard.push(email);
        Ok(())
    }
}

impl LoggingNotifier {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}
