use axum::http::HeaderMap;
use std::fmt;

/// Header carrying the admin shared secret.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Single shared-secret check guarding admin-only routes.
#[derive(Clone)]
pub struct AdminGuard {
    secret: String,
}

impl AdminGuard {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn authorize(&self, presented: Option<&str>) -> bool {
        !self.secret.is_empty() && presented == Some(self.secret.as_str())
    }

    pub fn authorize_headers(&self, headers: &HeaderMap) -> bool {
        let presented = headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|value| value.to_str().ok());
        self.authorize(presented)
    }
}

impl fmt::Debug for AdminGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminGuard").finish_non_exhaustive()
    }
}
