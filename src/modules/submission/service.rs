use log::{debug, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::mail::{compose, MailConfig, MailTransport};
use crate::modules::submission::{
    model::{ServiceType, Submission, SubmissionForm, UploadPolicy},
    schema::{AttachmentSummary, SubmissionOutcome, SubmissionState},
    validation::validate,
};
use crate::utils::format_phone;

pub struct SubmissionService<M>
where
    M: MailTransport + Send + Sync,
{
    transport: Arc<M>,
    mail_config: MailConfig,
    policy: UploadPolicy,
}

fn advance(id: &Uuid, from: SubmissionState, to: SubmissionState) -> SubmissionState {
    debug!("Submission {}: {:?} -> {:?}", id, from, to);
    to
}

impl<M> SubmissionService<M>
where
    M: MailTransport + Send + Sync,
{
    pub fn new(transport: Arc<M>, mail_config: MailConfig, policy: UploadPolicy) -> Self {
        info!("SubmissionService initialized, mail goes to {}", mail_config.recipient_address);
        Self { transport, mail_config, policy }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Turns a validated form into the submission that gets mailed.
    fn accept(&self, form: SubmissionForm) -> Result<Submission, error::SystemError> {
        let service_type = ServiceType::from_label(&form.service_type).ok_or_else(|| {
            error::SystemError::bad_request(format!("Unknown service type '{}'", form.service_type))
        })?;

        Ok(Submission {
            name: form.name.trim().to_string(),
            service_type,
            phone: format_phone(form.phone.as_deref().unwrap_or_default()),
            files: form.files,
        })
    }

    /// Validates the form and, when accepted, mails it with every file attached.
    ///
    /// Validation and transport failures come back as an outcome in the
    /// `Rejected` or `SendFailed` state. An `Err` means the message itself
    /// could not be built, and nothing was sent.
    pub async fn submit(
        &self,
        form: SubmissionForm,
    ) -> Result<SubmissionOutcome, error::SystemError> {
        let id = Uuid::now_v7();
        let submitted_at = chrono::Local::now();
        let attachments: Vec<AttachmentSummary> =
            form.files.iter().map(AttachmentSummary::from).collect();

        let state = advance(&id, SubmissionState::Idle, SubmissionState::Validating);
        let validation = validate(&form, &self.policy);

        if !validation.is_accepted() {
            info!("Submission {} rejected with {} error(s)", id, validation.errors.len());
            return Ok(SubmissionOutcome {
                id,
                state: advance(&id, state, SubmissionState::Rejected),
                message: "Submission rejected".into(),
                errors: validation.errors,
                attachments,
                submitted_at,
            });
        }

        let submission = self.accept(form)?;
        info!(
            "Submission {} from '{}' ({}) with {} file(s) accepted, sending",
            id,
            submission.name,
            submission.service_type,
            submission.files.len()
        );

        let message = compose(submission, &self.mail_config, &submitted_at)?;
        let state = advance(&id, state, SubmissionState::Sending);

        match self.transport.send(message).await {
            Ok(()) => {
                info!("Submission {} sent", id);
                Ok(SubmissionOutcome {
                    id,
                    state: advance(&id, state, SubmissionState::Sent),
                    message: "Documents sent successfully".into(),
                    errors: Vec::new(),
                    attachments,
                    submitted_at,
                })
            }
            Err(e) => {
                warn!("Submission {} failed to send: {}", id, e);
                Ok(SubmissionOutcome {
                    id,
                    state: advance(&id, state, SubmissionState::SendFailed),
                    message: format!("Failed to send email: {e}").into(),
                    errors: Vec::new(),
                    attachments,
                    submitted_at,
                })
            }
        }
    }
}
