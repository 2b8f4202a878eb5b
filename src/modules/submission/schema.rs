use serde::Serialize;
use std::borrow::Cow;
use uuid::Uuid;

use crate::modules::submission::model::{FileAttachment, FileCategory};
use crate::utils::format_size_mb;

/// Where a submission stands. Nothing is stored between requests; the state
/// travels with the outcome of a single submit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmissionState {
    Idle,
    Validating,
    Rejected,
    Sending,
    Sent,
    SendFailed,
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionState::Sent)
    }

    /// States that hand the form back to the user for another attempt.
    pub fn accepts_resubmission(&self) -> bool {
        matches!(
            self,
            SubmissionState::Idle | SubmissionState::Rejected | SubmissionState::SendFailed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentSummary {
    pub filename: String,
    pub category: FileCategory,
    pub size_bytes: usize,
    pub size: String,
}

impl From<&FileAttachment> for AttachmentSummary {
    fn from(file: &FileAttachment) -> Self {
        Self {
            filename: file.filename.clone(),
            category: file.category,
            size_bytes: file.size_bytes,
            size: format_size_mb(file.size_bytes),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub id: Uuid,
    pub state: SubmissionState,
    pub message: Cow<'static, str>,
    pub errors: Vec<String>,
    pub attachments: Vec<AttachmentSummary>,
    pub submitted_at: chrono::DateTime<chrono::Local>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub state: SubmissionState,
    pub attachments: Vec<AttachmentSummary>,
    pub submitted_at: chrono::DateTime<chrono::Local>,
}

impl From<SubmissionOutcome> for SubmissionResponse {
    fn from(outcome: SubmissionOutcome) -> Self {
        Self {
            id: outcome.id,
            state: outcome.state,
            attachments: outcome.attachments,
            submitted_at: outcome.submitted_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceTypesResponse {
    pub service_types: Vec<&'static str>,
}
