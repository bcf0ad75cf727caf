//! Contact form.
//!
//! Submissions are validated and acknowledged; nothing is delivered.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, response::IntoResponse};
use serde::Deserialize;
use tracing::{info, instrument};
use under_the_hood_core::Email;

use crate::error::add_breadcrumb;
use crate::filters;
use crate::layout::Layout;

pub const NAME_REQUIRED: &str = "Please enter your name.";
pub const EMAIL_INVALID: &str = "Please enter a valid email.";
pub const MESSAGE_REQUIRED: &str = "Please enter a message.";
pub const SENT: &str = "Thanks! We'll get back to you soon.";

/// Contact form fields as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactErrors {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub message: Option<&'static str>,
}

impl ContactErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.message.is_none()
    }
}

impl ContactForm {
    /// Check required fields. Phone is optional and free-form.
    #[must_use]
    pub fn validate(&self) -> ContactErrors {
        ContactErrors {
            name: self.name.trim().is_empty().then_some(NAME_REQUIRED),
            email: Email::parse(&self.email).is_err().then_some(EMAIL_INVALID),
            message: self.message.trim().is_empty().then_some(MESSAGE_REQUIRED),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub layout: Layout,
    pub form: ContactForm,
    pub errors: ContactErrors,
    pub sent: bool,
}

/// Display the empty form.
#[instrument(skip(layout))]
pub async fn show(layout: Layout) -> impl IntoResponse {
    ContactTemplate {
        layout: layout.page("Contact"),
        form: ContactForm::default(),
        errors: ContactErrors::default(),
        sent: false,
    }
}

/// Validate a submission.
///
/// Invalid input re-renders the form with the values kept and a message
/// beside each bad field; valid input clears the form and thanks the sender.
#[instrument(skip(layout, form))]
pub async fn submit(layout: Layout, Form(form): Form<ContactForm>) -> impl IntoResponse {
    let errors = form.validate();
    let layout = layout.page("Contact");

    if !errors.is_empty() {
        return ContactTemplate {
            layout,
            form,
            errors,
            sent: false,
        };
    }

    info!("Contact form accepted");
    add_breadcrumb("contact", "Contact form accepted", None);

    ContactTemplate {
        layout,
        form: ContactForm::default(),
        errors,
        sent: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            phone: String::new(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_valid_submission() {
        let errors = form("Sam", "sam@example.co.nz", "Catering for 40?").validate();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_blank_fields_are_reported() {
        let errors = form("   ", "", "\n").validate();
        assert_eq!(errors.name, Some(NAME_REQUIRED));
        assert_eq!(errors.email, Some(EMAIL_INVALID));
        assert_eq!(errors.message, Some(MESSAGE_REQUIRED));
    }

    #[test]
    fn test_email_shape() {
        assert_eq!(form("a", "a@b.c", "m").validate().email, None);
        assert_eq!(form("a", "a@b", "m").validate().email, Some(EMAIL_INVALID));
        assert_eq!(form("a", "a b@c.d", "m").validate().email, Some(EMAIL_INVALID));
        assert_eq!(form("a", "@c.d", "m").validate().email, Some(EMAIL_INVALID));
    }

    #[test]
    fn test_long_email_is_accepted() {
        let email = format!("{}@example.co.nz", "pit".repeat(100));
        assert_eq!(form("Sam", &email, "Hi").validate().email, None);
    }
}
