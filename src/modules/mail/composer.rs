use chrono::{DateTime, Local};
use lettre::{
    message::{
        header::{ContentTransferEncoding, ContentType},
        Attachment, Body, MultiPart, SinglePart,
    },
    Message,
};

use crate::api::error::SystemError;
use crate::modules::{mail::config::MailConfig, submission::model::Submission};

pub fn subject(submission: &Submission) -> String {
    format!("Documents - {} ({})", submission.name, submission.service_type)
}

pub fn body_text(submission: &Submission, submitted_at: &DateTime<Local>) -> String {
    format!(
        "New documents received through the intake form:\n\
         \n\
         PROVIDER DETAILS:\n\
         - Name: {}\n\
         - Service: {}\n\
         - WhatsApp: {}\n\
         - Date/Time: {}\n\
         \n\
         ATTACHED FILES: {} file(s)\n\
         \n\
         ---\n\
         Document Intake - Condominium\n",
        submission.name,
        submission.service_type,
        submission.phone,
        submitted_at.format("%d/%m/%Y at %H:%M"),
        submission.files.len(),
    )
}

/// Builds the outbound message with one base64 attachment per file, in submission order.
///
/// Takes the submission by value so each file's bytes move into its attachment.
/// Any part that fails to build fails the whole message.
pub fn compose(
    submission: Submission,
    config: &MailConfig,
    submitted_at: &DateTime<Local>,
) -> Result<Message, SystemError> {
    let octet_stream = ContentType::parse("application/octet-stream")?;
    let subject = subject(&submission);

    let mut multipart =
        MultiPart::mixed().singlepart(SinglePart::plain(body_text(&submission, submitted_at)));

    for file in submission.files {
        let body = Body::new_with_encoding(file.bytes, ContentTransferEncoding::Base64)
            .map_err(|_| {
                SystemError::bad_request(format!("Failed to encode file '{}'", file.filename))
            })?;
        multipart =
            multipart.singlepart(Attachment::new(file.filename).body(body, octet_stream.clone()));
    }

    let message = Message::builder()
        .from(config.sender_address.clone())
        .to(config.recipient_address.clone())
        .subject(subject)
        .multipart(multipart)?;

    Ok(message)
}
