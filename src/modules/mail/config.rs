use lettre::message::Mailbox;

use crate::{api::error::SystemError, constants::Env};

/// Relay settings and addresses supplied by the deployment, never by the end user.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub sender_address: Mailbox,
    pub sender_credential: String,
    pub recipient_address: Mailbox,
    pub relay_host: String,
    pub relay_port: u16,
}

impl MailConfig {
    pub fn new(
        sender_address: &str,
        sender_credential: &str,
        recipient_address: &str,
        relay_host: &str,
        relay_port: u16,
    ) -> Result<Self, SystemError> {
        if sender_credential.trim().is_empty() {
            return Err(SystemError::config("Sender credential cannot be empty"));
        }
        if relay_host.trim().is_empty() {
            return Err(SystemError::config("Relay host cannot be empty"));
        }

        Ok(Self {
            sender_address: sender_address.trim().parse()?,
            sender_credential: sender_credential.to_string(),
            recipient_address: recipient_address.trim().parse()?,
            relay_host: relay_host.trim().to_string(),
            relay_port,
        })
    }

    pub fn from_env(env: &Env) -> Result<Self, SystemError> {
        Self::new(
            &env.sender_address,
            &env.sender_credential,
            &env.recipient_address,
            &env.relay_host,
            env.relay_port,
        )
    }

    /// The relay login is the bare sender email.
    pub fn login(&self) -> String {
        self.sender_address.email.to_string()
    }
}
