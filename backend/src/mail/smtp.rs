use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{Mailer, OutgoingEmail};

/// SMTP relay sender. Authenticates with the base address and app password
/// but sends from the alias address so replies land back in scope.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        address: &str,
        app_password: &str,
        alias: &str,
        sender_name: &str,
    ) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .context("Failed to configure SMTP relay")?
            .credentials(Credentials::new(
                address.to_string(),
                app_password.to_string(),
            ))
            .build();

        let from = Mailbox::new(
            Some(sender_name.to_string()),
            alias
                .parse()
                .with_context(|| format!("Invalid alias address: {}", alias))?,
        );

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingEmail) -> Result<()> {
        let to: Mailbox = mail
            .to
            .parse()
            .with_context(|| format!("Invalid recipient address: {}", mail.to))?;

        let builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject.clone());

        let message = match mail.html {
            Some(html) => builder
                .multipart(MultiPart::alternative_plain_html(mail.text, html))
                .context("Failed to build email")?,
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(mail.text)
                .context("Failed to build email")?,
        };

        self.transport
            .send(message)
            .await
            .context("Failed to send email")?;

        tracing::info!("Email sent to: {}, Subject: {}", mail.to, mail.subject);
        Ok(())
    }
}
