pub mod composer;
pub mod config;
pub mod transport;

pub use composer::compose;
pub use config::MailConfig;
pub use transport::{MailTransport, SmtpMailTransport};
