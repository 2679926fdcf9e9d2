use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    ContactSubmission, ValidContactRequest, ValidWaitlistSignup, ValidationError,
    WaitlistEntry, WaitlistSubmission,
};
use super::repository::{
    NotifyError, OutboundEmail, RepositoryError, SignupNotifier, WaitlistRepository,
};

/// Where signup and contact notices are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    pub admin_email: String,
    pub support_email: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            admin_email: "admin@platetrend.com".to_string(),
            support_email: "support@platetrend.com".to_string(),
        }
    }
}

/// Waitlist intake and contact form handling.
pub struct SignupService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    settings: NotificationSettings,
}

static WAITLIST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_waitlist_id() -> String {
    let id = WAITLIST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("wl-{id:06}")
}

impl<R, N> SignupService<R, N>
where
    R: WaitlistRepository + 'static,
    N: SignupNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, settings: NotificationSettings) -> Self {
        Self {
            repository,
            notifier,
            settings,
        }
    }

    /// Register a restaurant for early access. Email delivery failures are
    /// logged and never undo the registration.
    pub fn join_waitlist(
        &self,
        submission: WaitlistSubmission,
    ) -> Result<WaitlistEntry, SignupError> {
        let signup = submission.validate()?;

        if self.repository.find_by_email(&signup.email)?.is_some() {
            return Err(SignupError::DuplicateEmail);
        }

        let now = Utc::now();
        let ValidWaitlistSignup {
            restaurant_name,
            email,
            location,
            num_locations,
        } = signup;
        let entry = self
            .repository
            .insert(WaitlistEntry {
                id: next_waitlist_id(),
                restaurant_name,
                email,
                location,
                num_locations,
                created_at: now,
                updated_at: now,
            })
            .map_err(|err| match err {
                // lost a race with a concurrent signup for the same address
                RepositoryError::Conflict => SignupError::DuplicateEmail,
                other => SignupError::Repository(other),
            })?;

        info!(id = %entry.id, locations = %entry.num_locations, "waitlist signup stored");

        if let Err(err) = self.send_waitlist_emails(&entry) {
            warn!(id = %entry.id, error = %err, "waitlist emails not delivered");
        }

        Ok(entry)
    }

    pub fn waitlist(&self) -> Result<Vec<WaitlistEntry>, SignupError> {
        Ok(self.repository.list()?)
    }

    /// Forward a contact request to the support inbox. The support notice must
    /// go out; the sender's confirmation is best effort.
    pub fn submit_contact(
        &self,
        submission: ContactSubmission,
    ) -> Result<ValidContactRequest, SignupError> {
        let request = submission.validate()?;

        self.notifier.send(support_notice(&request, &self.settings))?;

        if let Err(err) = self.notifier.send(contact_confirmation(&request)) {
            warn!(topic = request.topic.label(), error = %err, "contact confirmation not delivered");
        }

        info!(topic = request.topic.label(), "contact request forwarded");
        Ok(request)
    }

    fn send_waitlist_emails(&self, entry: &WaitlistEntry) -> Result<(), NotifyError> {
        self.notifier.send(OutboundEmail {
            to: entry.email.clone(),
            subject: "Welcome to PlateTrend Early Access!".to_string(),
            body: format!(
                "Hi {} team,\n\nThanks for signing up for early access to PlateTrend. \
                 You're on the waitlist and will be among the first to try it.\n\n\
                 Restaurant: {} | {}\n\nThe PlateTrend Team",
                entry.restaurant_name, entry.restaurant_name, entry.location
            ),
            reply_to: None,
        })?;

        self.notifier.send(OutboundEmail {
            to: self.settings.admin_email.clone(),
            subject: "New PlateTrend Waitlist Signup".to_string(),
            body: format!(
                "Restaurant: {}\nEmail: {}\nLocation: {}\nLocations: {}\nSigned up: {}",
                entry.restaurant_name,
                entry.email,
                entry.location,
                entry.num_locations,
                entry.created_at.to_rfc3339()
            ),
            reply_to: None,
        })
    }
}

fn support_notice(request: &ValidContactRequest, settings: &NotificationSettings) -> OutboundEmail {
    let mut body = format!("Name: {}\nEmail: {}\n", request.name, request.email);
    if let Some(restaurant) = &request.restaurant_name {
        body.push_str(&format!("Restaurant: {restaurant}\n"));
    }
    body.push_str(&format!(
        "Subject: {}\n\n{}",
        request.topic.label(),
        request.message
    ));

    OutboundEmail {
        to: settings.support_email.clone(),
        subject: format!(
            "PlateTrend Contact: {} - {}",
            request.topic.label(),
            request.name
        ),
        body,
        reply_to: Some(request.email.clone()),
    }
}

fn contact_confirmation(request: &ValidContactRequest) -> OutboundEmail {
    OutboundEmail {
        to: request.email.clone(),
        subject: format!(
            "Thank you for contacting PlateTrend - {}",
            request.topic.label()
        ),
        body: format!(
            "Hi {},\n\nWe've received your message about {} and will get back to you \
             within 24 hours during business days.\n\nYour message:\n{}\n\nThe PlateTrend Team",
            request.name,
            request.topic.label().to_lowercase(),
            request.message
        ),
        reply_to: None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

impl SignupError {
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SignupError::Validation(_)
                | SignupError::DuplicateEmail
                | SignupError::Repository(RepositoryError::Conflict)
        )
    }
}
