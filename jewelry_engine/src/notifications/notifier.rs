use std::sync::Arc;

use log::*;
use serde::Serialize;

use crate::{
    notifications::{
        templates::{render_template, render_text, EmailTemplate, EmailTemplates},
        Email,
        OrderInfoEmail,
        PaymentInfoEmail,
    },
    traits::{NotificationError, NotificationSender},
};

/// Names and addresses used when composing e-mails.
#[derive(Debug, Clone, Default)]
pub struct EmailSettings {
    /// Recipient of the support copies
    pub support_name: String,
    pub support_email: String,
    /// The "From" line of every e-mail
    pub sender_name: String,
    pub sender_email: String,
}

/// Composes and sends the support and customer e-mails for new orders and received payments.
///
/// Every send is independent. A failure to render, validate or deliver one e-mail is logged and does not prevent the
/// other from going out.
#[derive(Clone)]
pub struct Notifier {
    sender: Arc<dyn NotificationSender>,
    settings: EmailSettings,
    templates: EmailTemplates,
}

impl Notifier {
    pub fn new(sender: Arc<dyn NotificationSender>, settings: EmailSettings, templates: EmailTemplates) -> Self {
        Self { sender, settings, templates }
    }

    /// Sends the "new order" e-mails. Returns the number of e-mails that were delivered.
    pub async fn send_order_info(&self, info: &OrderInfoEmail) -> usize {
        let support = self.compose(
            &self.templates.order_info_support,
            &self.settings.support_name,
            &self.settings.support_email,
            info,
        );
        let customer = self.compose(&self.templates.order_info_customer, &info.first_name, &info.email, info);
        self.deliver("order info (support)", info.order_id, support).await as usize
            + self.deliver("order info (customer)", info.order_id, customer).await as usize
    }

    /// Sends the "payment received" e-mails. Returns the number of e-mails that were delivered.
    pub async fn send_payment_info(&self, info: &PaymentInfoEmail) -> usize {
        let support = self.compose(
            &self.templates.payment_info_support,
            &self.settings.support_name,
            &self.settings.support_email,
            info,
        );
        let customer =
            self.compose(&self.templates.payment_info_customer, &info.buyer_name, &info.buyer_email, info);
        self.deliver("payment info (support)", info.order_id, support).await as usize
            + self.deliver("payment info (customer)", info.order_id, customer).await as usize
    }

    fn compose<T: Serialize>(
        &self,
        template: &EmailTemplate,
        to_name: &str,
        to_email: &str,
        data: &T,
    ) -> Result<Email, NotificationError> {
        let email = Email {
            to_name: to_name.to_string(),
            to_email: to_email.to_string(),
            from_name: self.settings.sender_name.clone(),
            from_email: self.settings.sender_email.clone(),
            subject: render_text(&template.subject, data)?,
            html_body: render_template(&template.body, data)?,
        };
        email.validate()?;
        Ok(email)
    }

    async fn deliver(&self, kind: &str, order_id: i64, email: Result<Email, NotificationError>) -> bool {
        let email = match email {
            Ok(e) => e,
            Err(e) => {
                error!("📧 Not sending {kind} e-mail for order #{order_id}. {e}");
                return false;
            },
        };
        let to = email.to_email.clone();
        match self.sender.send(email).await {
            Ok(()) => {
                info!("📧 Sent {kind} e-mail for order #{order_id} to {to}");
                true
            },
            Err(e) => {
                error!("📧 Could not send {kind} e-mail for order #{order_id} to {to}. {e}");
                false
            },
        }
    }
}
