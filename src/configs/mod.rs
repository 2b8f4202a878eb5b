use crate::{
    api::error,
    constants::Env,
    modules::mail::{MailConfig, SmtpMailTransport},
};

/// Validates the mail settings once and prepares the relay client.
pub fn connect_mail_relay(
    env: &Env,
) -> Result<(MailConfig, SmtpMailTransport), error::SystemError> {
    let config = MailConfig::from_env(env)?;
    let transport = SmtpMailTransport::new(&config)?;
    Ok((config, transport))
}
