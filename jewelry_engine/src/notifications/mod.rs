//! E-mail notifications
//!
//! The [`Notifier`] turns order and payment payloads into e-mails for the shop's support staff and for the customer,
//! and hands them to a [`NotificationSender`]. Delivery is best-effort: failures are logged and never reported back
//! to the workflow that triggered them.
//!
//! [`NotificationSender`]: crate::traits::NotificationSender
mod email;
mod notifier;
mod payloads;
mod templates;

pub use email::Email;
pub use notifier::{EmailSettings, Notifier};
pub use payloads::{OrderInfoEmail, OrderInfoItem, PaymentInfoEmail};
pub use templates::{render_template, render_text, EmailTemplate, EmailTemplates};
