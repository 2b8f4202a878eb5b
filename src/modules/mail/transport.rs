use lettre::{
    transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport, Message,
    Tokio1Executor,
};
use log::{info, warn};

use crate::api::error::SystemError;
use crate::modules::mail::config::MailConfig;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("could not reach the mail relay: {0}")]
    Connection(String),
    #[error("secure channel setup failed: {0}")]
    Tls(String),
    #[error("the mail relay rejected the message: {0}")]
    Rejected(String),
    #[error("{0}")]
    Other(String),
}

impl From<lettre::transport::smtp::Error> for TransportError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        if err.is_tls() {
            TransportError::Tls(err.to_string())
        } else if err.is_timeout() || err.is_client() {
            TransportError::Connection(err.to_string())
        } else if err.is_permanent() || err.is_transient() {
            TransportError::Rejected(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Delivers one composed message. A failure is returned as a value, never raised.
#[async_trait::async_trait]
pub trait MailTransport {
    async fn send(&self, message: Message) -> Result<(), TransportError>;
}

/// STARTTLS relay with login authentication, one connection per message.
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    relay: String,
}

impl SmtpMailTransport {
    pub fn new(config: &MailConfig) -> Result<Self, SystemError> {
        let creds = Credentials::new(config.login(), config.sender_credential.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.relay_host)
            .map_err(|e| SystemError::config(format!("Failed to create SMTP transport: {e}")))?
            .port(config.relay_port)
            .credentials(creds)
            .build();

        info!("SMTP transport ready for {}:{}", config.relay_host, config.relay_port);
        Ok(Self { transport, relay: format!("{}:{}", config.relay_host, config.relay_port) })
    }
}

#[async_trait::async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, message: Message) -> Result<(), TransportError> {
        match self.transport.send(message).await {
            Ok(response) => {
                info!("Relay {} accepted message: {}", self.relay, response.code());
                Ok(())
            }
            Err(e) => {
                warn!("Relay {} failed: {}", self.relay, e);
                Err(TransportError::from(e))
            }
        }
    }
}
