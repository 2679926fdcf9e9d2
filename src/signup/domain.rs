use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_NAME_LEN: usize = 100;
const MIN_MESSAGE_LEN: usize = 10;
const MAX_MESSAGE_LEN: usize = 2000;

/// First failing field of a submitted form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationCount {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2-5")]
    TwoToFive,
    #[serde(rename = "6-10")]
    SixToTen,
    #[serde(rename = "10+")]
    MoreThanTen,
}

impl LocationCount {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(Self::One),
            "2-5" => Some(Self::TwoToFive),
            "6-10" => Some(Self::SixToTen),
            "10+" => Some(Self::MoreThanTen),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::One => "1",
            Self::TwoToFive => "2-5",
            Self::SixToTen => "6-10",
            Self::MoreThanTen => "10+",
        }
    }
}

impl fmt::Display for LocationCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw waitlist form as posted by the landing page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WaitlistSubmission {
    pub restaurant_name: String,
    pub email: String,
    pub location: String,
    pub num_locations: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidWaitlistSignup {
    pub restaurant_name: String,
    pub email: String,
    pub location: String,
    pub num_locations: LocationCount,
}

impl WaitlistSubmission {
    pub fn validate(&self) -> Result<ValidWaitlistSignup, ValidationError> {
        let restaurant_name = required_text(
            "restaurantName",
            &self.restaurant_name,
            "Restaurant name is required",
            "Restaurant name must be less than 100 characters",
        )?;
        let email = valid_email(&self.email)?;
        let location = required_text(
            "location",
            &self.location,
            "Location is required",
            "Location must be less than 100 characters",
        )?;
        let num_locations = LocationCount::parse(&self.num_locations).ok_or_else(|| {
            ValidationError::new("numLocations", "Please select number of locations")
        })?;

        Ok(ValidWaitlistSignup {
            restaurant_name,
            email,
            location,
            num_locations,
        })
    }
}

/// Row of the waitlist table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: String,
    pub restaurant_name: String,
    pub email: String,
    pub location: String,
    pub num_locations: LocationCount,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactTopic {
    General,
    Demo,
    Pricing,
    Technical,
    Partnership,
    Other,
}

impl ContactTopic {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "general" => Some(Self::General),
            "demo" => Some(Self::Demo),
            "pricing" => Some(Self::Pricing),
            "technical" => Some(Self::Technical),
            "partnership" => Some(Self::Partnership),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General Inquiry",
            Self::Demo => "Demo Request",
            Self::Pricing => "Pricing Question",
            Self::Technical => "Technical Support",
            Self::Partnership => "Partnership Opportunity",
            Self::Other => "Other Inquiry",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub restaurant_name: Option<String>,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContactRequest {
    pub name: String,
    pub email: String,
    pub restaurant_name: Option<String>,
    pub topic: ContactTopic,
    pub message: String,
}

impl ContactSubmission {
    pub fn validate(&self) -> Result<ValidContactRequest, ValidationError> {
        let name = required_text(
            "name",
            &self.name,
            "Name is required",
            "Name must be less than 100 characters",
        )?;
        let email = valid_email(&self.email)?;

        let restaurant_name = match self.restaurant_name.as_deref().map(str::trim) {
            Some(value) if value.chars().count() > MAX_NAME_LEN => {
                return Err(ValidationError::new(
                    "restaurantName",
                    "Restaurant name must be less than 100 characters",
                ))
            }
            Some("") | None => None,
            Some(value) => Some(value.to_string()),
        };

        let topic = ContactTopic::parse(&self.subject)
            .ok_or_else(|| ValidationError::new("subject", "Please select a subject"))?;

        let message = self.message.trim();
        let length = message.chars().count();
        if length < MIN_MESSAGE_LEN {
            return Err(ValidationError::new(
                "message",
                "Message must be at least 10 characters",
            ));
        }
        if length > MAX_MESSAGE_LEN {
            return Err(ValidationError::new(
                "message",
                "Message must be less than 2000 characters",
            ));
        }

        Ok(ValidContactRequest {
            name,
            email,
            restaurant_name,
            topic,
            message: message.to_string(),
        })
    }
}

fn required_text(
    field: &'static str,
    raw: &str,
    missing: &'static str,
    too_long: &'static str,
) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::new(field, missing));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::new(field, too_long));
    }
    Ok(value.to_string())
}

fn valid_email(raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if looks_like_email(value) {
        Ok(value.to_string())
    } else {
        Err(ValidationError::new(
            "email",
            "Please enter a valid email address",
        ))
    }
}

fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waitlist() -> WaitlistSubmission {
        WaitlistSubmission {
            restaurant_name: "Pasta House".to_string(),
            email: "owner@pastahouse.com".to_string(),
            location: "Des Moines, IA".to_string(),
            num_locations: "2-5".to_string(),
        }
    }

    #[test]
    fn waitlist_submission_validates() {
        let signup = waitlist().validate().expect("valid submission");
        assert_eq!(signup.num_locations, LocationCount::TwoToFive);
        assert_eq!(signup.email, "owner@pastahouse.com");
    }

    #[test]
    fn waitlist_reports_first_failing_field() {
        let submission = WaitlistSubmission {
            restaurant_name: "  ".to_string(),
            email: "nope".to_string(),
            ..waitlist()
        };
        let err = submission.validate().expect_err("blank name");
        assert_eq!(err.field, "restaurantName");
        assert_eq!(err.to_string(), "Restaurant name is required");

        let submission = WaitlistSubmission {
            email: "nope".to_string(),
            ..waitlist()
        };
        assert_eq!(
            submission.validate().expect_err("bad email").message,
            "Please enter a valid email address"
        );

        let submission = WaitlistSubmission {
            num_locations: "3".to_string(),
            ..waitlist()
        };
        assert_eq!(
            submission.validate().expect_err("bad count").field,
            "numLocations"
        );
    }

    #[test]
    fn waitlist_rejects_overlong_names() {
        let submission = WaitlistSubmission {
            restaurant_name: "x".repeat(101),
            ..waitlist()
        };
        assert!(submission.validate().is_err());
    }

    #[test]
    fn email_shape_checks() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a@@b.co"));
        assert!(!looks_like_email("a b@c.co"));
        assert!(!looks_like_email("a@b..co"));
    }

    #[test]
    fn contact_submission_validates_topic_and_message() {
        let submission = ContactSubmission {
            name: "Dana".to_string(),
            email: "dana@example.com".to_string(),
            restaurant_name: Some(String::new()),
            subject: "demo".to_string(),
            message: "Could we see a live demo next week?".to_string(),
        };
        let request = submission.validate().expect("valid contact");
        assert_eq!(request.topic, ContactTopic::Demo);
        assert!(request.restaurant_name.is_none());

        let short = ContactSubmission {
            message: "hi".to_string(),
            ..submission.clone()
        };
        assert_eq!(short.validate().expect_err("short").field, "message");

        let unknown = ContactSubmission {
            subject: "sales".to_string(),
            ..submission
        };
        assert_eq!(unknown.validate().expect_err("topic").field, "subject");
    }
}
