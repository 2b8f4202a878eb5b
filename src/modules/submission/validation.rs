use serde::Serialize;

use crate::modules::submission::model::{ServiceType, SubmissionForm, UploadPolicy};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        self.errors.is_empty()
    }
}

fn describe_limit(limit: usize) -> String {
    const MB: usize = 1024 * 1024;
    if limit >= MB && limit % MB == 0 {
        format!("{}MB", limit / MB)
    } else {
        format!("{} bytes", limit)
    }
}

/// Runs every check and reports all failures in a fixed order:
/// name, service type, file presence, then per-file size and type.
pub fn validate(form: &SubmissionForm, policy: &UploadPolicy) -> ValidationResult {
    let mut errors = Vec::new();

    if form.name.trim().is_empty() {
        errors.push("Name is required".to_string());
    }

    let service_type = form.service_type.trim();
    if service_type.is_empty() {
        errors.push("Service type is required".to_string());
    } else if ServiceType::from_label(service_type).is_none() {
        errors.push(format!("Unknown service type '{}'", service_type));
    }

    if form.files.is_empty() {
        errors.push("At least one file is required".to_string());
    }

    for file in &form.files {
        if file.size_bytes > policy.max_file_size {
            errors.push(format!(
                "File '{}' exceeds {}",
                file.filename,
                describe_limit(policy.max_file_size)
            ));
        }
    }

    for file in &form.files {
        if !policy.allows_extension(file.extension().as_deref()) {
            errors.push(format!("File '{}' has an unsupported type", file.filename));
        }
    }

    ValidationResult { errors }
}
