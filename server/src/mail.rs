use async_trait::async_trait;
use eyre::{Context, Result};
use lettre::{
    address::AddressError,
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tracing::{debug, instrument};

use kavian_core::config::MailConfig;

/// A fully rendered HTML email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: AddressError,
    },
    #[error("{0}")]
    Build(#[from] lettre::error::Error),
    #[error("{0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    /// Failure reported by a transport that is not SMTP
    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends `email` once. No retries.
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// Sends through an SMTP relay with fixed credentials.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// The password is taken from the environment variable named in the
    /// config, never from the config file.
    pub fn from_config(config: &MailConfig) -> Result<SmtpMailer> {
        let password = config.password()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.relay)
            .wrap_err_with(|| format!("error setting up SMTP relay {}", config.relay))?
            .credentials(Credentials::new(config.username.clone(), password))
            .build();
        Ok(SmtpMailer { transport })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|source| MailError::Address {
        address: address.to_owned(),
        source,
    })
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, email), fields(to = %email.to))]
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = Message::builder()
            .from(parse_mailbox(&email.from)?)
            .to(parse_mailbox(&email.to)?)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html)?;
        let response = self.transport.send(message).await?;
        debug!(code = %response.code(), "relay accepted message");
        Ok(())
    }
}
