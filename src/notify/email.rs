//! Email delivery of generated mockups via SMTP.
//!
//! [`SmtpNotifier`] wraps the `lettre` async SMTP transport and sends an HTML
//! message that shows the mockup inline and also carries it as an attachment.
//! Failures are logged and collapsed to `false`; they never fail the task that
//! produced the image.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::notify::{MockupDelivery, Notifier};

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    #[error("SMTP host is not configured")]
    NotConfigured,
}

/// Sends mockup emails through an SMTP relay.
pub struct SmtpNotifier {
    config: MailConfig,
}

impl SmtpNotifier {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Build the MIME message for a delivery.
    pub fn build_message(&self, delivery: &MockupDelivery) -> Result<Message, EmailError> {
        let content_type = ContentType::parse(&delivery.mime_type)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let inline = Attachment::new_inline(content_id(delivery))
            .body(delivery.image.clone(), content_type.clone());
        let attachment = Attachment::new(delivery.filename.clone())
            .body(delivery.image.clone(), content_type);

        Message::builder()
            .from(self.config.sender.parse()?)
            .to(delivery.recipient.parse()?)
            .subject(subject(&delivery.keyword))
            .multipart(
                MultiPart::mixed()
                    .multipart(
                        MultiPart::related()
                            .singlepart(SinglePart::html(render_html(delivery)))
                            .singlepart(inline),
                    )
                    .singlepart(attachment),
            )
            .map_err(|e| EmailError::Build(e.to_string()))
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let host = self
            .config
            .smtp_host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .ok_or(EmailError::NotConfigured)?;

        let builder = if self.config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
        };

        let mut builder = builder
            .port(self.config.smtp_port)
            .timeout(Some(self.config.timeout()));

        if let (Some(user), Some(pass)) = (&self.config.username, &self.config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(builder.build())
    }

    /// Send a delivery, surfacing the failure cause.
    pub async fn deliver(&self, delivery: &MockupDelivery) -> Result<(), EmailError> {
        let message = self.build_message(delivery)?;
        self.transport()?.send(message).await?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, delivery: MockupDelivery) -> bool {
        match self.deliver(&delivery).await {
            Ok(()) => {
                info!(to = %delivery.recipient, "Mockup email sent");
                true
            }
            Err(e) => {
                warn!(to = %delivery.recipient, error = %e, "Failed to send mockup email");
                false
            }
        }
    }
}

fn subject(keyword: &str) -> String {
    format!("PixelDuetWeb: AI website mockup | '{}'", keyword)
}

/// Content-ID the HTML body references the inline image by
fn content_id(delivery: &MockupDelivery) -> String {
    delivery.filename.clone()
}

fn render_html(delivery: &MockupDelivery) -> String {
    format!(
        r#"<html>
  <body>
    <h2>Your Website Mockup</h2>
    <p>Hello,</p>
    <p>We've generated a website mockup based on your request:</p>
    <ul>
      <li><strong>Keyword:</strong> {keyword}</li>
      <li><strong>Industry:</strong> {industry}</li>
      <li><strong>Color scheme:</strong> {color_scheme}</li>
    </ul>
    <p><img src="cid:{cid}" alt="Website Mockup" style="max-width: 100%; height: auto;"></p>
    <p>The mockup is also attached as <em>{filename}</em>.</p>
    <p>Best regards,<br>Mockup Generator Team</p>
  </body>
</html>"#,
        keyword = escape_html(&delivery.keyword),
        industry = delivery.industry,
        color_scheme = escape_html(&delivery.color_scheme),
        cid = escape_html(&content_id(delivery)),
        filename = escape_html(&delivery.filename),
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
