//! Contact form submissions.

use thiserror::Error;
use tracing::instrument;

use delicious_bakers_core::{ContactMessage, Email};

use super::non_blank;
use crate::notify::{Notification, Notifier};
use crate::supabase::{SupabaseClient, SupabaseError};

/// Subject used when the customer leaves it blank.
pub const DEFAULT_SUBJECT: &str = "General enquiry";

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Failed to send message: {0}")]
    Supabase(#[from] SupabaseError),
}

/// Fields of the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: Email,
    pub subject: Option<String>,
    pub message: String,
}

impl ContactForm {
    /// Validate and convert into the stored row.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::MissingField` if the name or message is blank.
    pub fn into_message(self) -> Result<ContactMessage, ContactError> {
        let name = non_blank(&self.name).ok_or(ContactError::MissingField("name"))?;
        let message = non_blank(&self.message).ok_or(ContactError::MissingField("message"))?;
        let subject = self
            .subject
            .as_deref()
            .and_then(non_blank)
            .unwrap_or(DEFAULT_SUBJECT);

        Ok(ContactMessage {
            name: name.to_owned(),
            email: self.email,
            subject: subject.to_owned(),
            message: message.to_owned(),
        })
    }
}

/// Store a contact message and announce it.
///
/// # Errors
///
/// Returns a validation error or the backend error.
#[instrument(skip_all, fields(from = %form.email))]
pub async fn send_contact_message(
    client: &SupabaseClient,
    notifier: &dyn Notifier,
    form: ContactForm,
) -> Result<(), ContactError> {
    let message = form.into_message()?;
    client.insert_contact_message(&message).await?;
    notifier.notify(&Notification::message_sent());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Ravi".to_string(),
            email: Email::parse("ravi@example.org").unwrap(),
            subject: None,
            message: "Do you make gluten-free bread?".to_string(),
        }
    }

    #[test]
    fn test_blank_subject_gets_default() {
        let message = form().into_message().unwrap();
        assert_eq!(message.subject, DEFAULT_SUBJECT);
        assert_eq!(message.name, "Ravi");
    }

    #[test]
    fn test_blank_message_rejected() {
        let mut form = form();
        form.message = "\n ".to_string();
        assert!(matches!(
            form.into_message(),
            Err(ContactError::MissingField("message"))
        ));
    }
}
