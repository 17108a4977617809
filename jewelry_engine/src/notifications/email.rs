use serde::{Deserialize, Serialize};

use crate::{helpers::is_valid_email, traits::NotificationError};

/// A fully rendered e-mail, ready to hand to a [`NotificationSender`](crate::traits::NotificationSender).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub to_name: String,
    pub to_email: String,
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    pub html_body: String,
}

impl Email {
    /// Checks that all fields are filled in and both addresses are well-formed.
    pub fn validate(&self) -> Result<(), NotificationError> {
        let required = [
            ("recipient name", &self.to_name),
            ("recipient address", &self.to_email),
            ("sender name", &self.from_name),
            ("sender address", &self.from_email),
            ("subject", &self.subject),
            ("body", &self.html_body),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(NotificationError::InvalidEmail(format!("the {field} is empty")));
        }
        if !is_valid_email(&self.to_email) {
            return Err(NotificationError::InvalidEmail(format!("{} is not a valid address", self.to_email)));
        }
        if !is_valid_email(&self.from_email) {
            return Err(NotificationError::InvalidEmail(format!("{} is not a valid address", self.from_email)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn email() -> Email {
        Email {
            to_name: "Support".into(),
            to_email: "support@shop.example.com".into(),
            from_name: "Jewelry Shop".into(),
            from_email: "noreply@shop.example.com".into(),
            subject: "New order #1".into(),
            html_body: "<p>Hi</p>".into(),
        }
    }

    #[test]
    fn complete_email_is_valid() {
        assert!(email().validate().is_ok());
    }

    #[test]
    fn empty_fields_are_rejected() {
        let mut e = email();
        e.subject = "  ".into();
        let err = e.validate().unwrap_err();
        assert_eq!(err.to_string(), "The e-mail is not valid. the subject is empty");
        let mut e = email();
        e.to_name = String::new();
        assert!(e.validate().is_err());
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        let mut e = email();
        e.to_email = "support-at-shop".into();
        assert!(e.validate().is_err());
        let mut e = email();
        e.from_email = "noreply@".into();
        assert!(e.validate().is_err());
    }
}
