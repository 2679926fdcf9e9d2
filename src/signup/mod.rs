//! Landing-page intake: the early-access waitlist, the contact form, and the
//! shared-secret guard for the admin listing.

pub mod admin;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use admin::{AdminGuard, ADMIN_KEY_HEADER};
pub use domain::{
    ContactSubmission, ContactTopic, LocationCount, ValidContactRequest, ValidWaitlistSignup,
    ValidationError, WaitlistEntry, WaitlistSubmission,
};
pub use repository::{
    NotifyError, OutboundEmail, RepositoryError, SignupNotifier, WaitlistRepository,
};
pub use router::signup_router;
pub use service::{NotificationSettings, SignupError, SignupService};
