use validator::Validate;

use crate::api::error::SystemError;

pub const DEFAULT_RELAY_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_RELAY_PORT: u16 = 587;
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024; // 10MB
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];

#[derive(Debug, Validate)]
pub struct Env {
    /// Parsed as a mailbox by `MailConfig`, display names allowed.
    pub sender_address: String,
    #[validate(length(min = 1, message = "SENDER_CREDENTIAL cannot be empty"))]
    pub sender_credential: String,
    pub recipient_address: String,
    #[validate(length(min = 1, message = "RELAY_HOST cannot be empty"))]
    pub relay_host: String,
    #[validate(range(min = 1, message = "RELAY_PORT must be greater than zero"))]
    pub relay_port: u16,
    #[validate(range(min = 1, message = "MAX_FILE_SIZE must be greater than zero"))]
    pub max_file_size: usize,
    pub ip: String,
    pub port: u16,
}

fn required(key: &'static str) -> Result<String, SystemError> {
    std::env::var(key).map_err(|_| {
        SystemError::config(format!("{key} must be set in .env file or environment variable"))
    })
}

fn parsed<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, SystemError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| SystemError::config(format!("{key} has an invalid value '{value}'"))),
        Err(_) => Ok(default),
    }
}

impl Env {
    /// Reads the deployment settings once at startup.
    pub fn load() -> Result<Self, SystemError> {
        let sender_address = required("SENDER_ADDRESS")?;
        let sender_credential = required("SENDER_CREDENTIAL")?;
        let recipient_address = required("RECIPIENT_ADDRESS")?;

        let relay_host =
            std::env::var("RELAY_HOST").unwrap_or_else(|_| DEFAULT_RELAY_HOST.to_string());
        let relay_port = parsed("RELAY_PORT", DEFAULT_RELAY_PORT)?;
        let max_file_size = parsed("MAX_FILE_SIZE", MAX_FILE_SIZE)?;

        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parsed("PORT", 8080u16)?;

        let env = Env {
            sender_address: sender_address.trim().to_string(),
            sender_credential,
            recipient_address: recipient_address.trim().to_string(),
            relay_host: relay_host.trim().to_string(),
            relay_port,
            max_file_size,
            ip,
            port,
        };
        env.validate().map_err(|e| SystemError::config(e.to_string()))?;
        Ok(env)
    }
}
