use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{ALLOWED_EXTENSIONS, MAX_FILE_SIZE};

/// Services a provider can declare on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "Pedreiro")]
    Mason,
    #[serde(rename = "Eletricista")]
    Electrician,
    #[serde(rename = "Encanador")]
    Plumber,
    #[serde(rename = "Pintor")]
    Painter,
    #[serde(rename = "Jardinagem")]
    Gardening,
    #[serde(rename = "Limpeza")]
    Cleaning,
    #[serde(rename = "Segurança")]
    Security,
    #[serde(rename = "Manutenção Geral")]
    GeneralMaintenance,
    #[serde(rename = "Outro")]
    Other,
}

impl ServiceType {
    pub const ALL: [ServiceType; 9] = [
        ServiceType::Mason,
        ServiceType::Electrician,
        ServiceType::Plumber,
        ServiceType::Painter,
        ServiceType::Gardening,
        ServiceType::Cleaning,
        ServiceType::Security,
        ServiceType::GeneralMaintenance,
        ServiceType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::Mason => "Pedreiro",
            ServiceType::Electrician => "Eletricista",
            ServiceType::Plumber => "Encanador",
            ServiceType::Painter => "Pintor",
            ServiceType::Gardening => "Jardinagem",
            ServiceType::Cleaning => "Limpeza",
            ServiceType::Security => "Segurança",
            ServiceType::GeneralMaintenance => "Manutenção Geral",
            ServiceType::Other => "Outro",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Image,
    Document,
}

impl FileCategory {
    /// Uses the declared content type, falling back to a guess from the filename.
    pub fn detect(filename: &str, content_type: Option<&str>) -> Self {
        let mime = match content_type {
            Some(ct) if ct != "application/octet-stream" => ct.to_string(),
            _ => mime_guess::from_path(filename).first_or_octet_stream().to_string(),
        };

        if mime.starts_with("image/") {
            FileCategory::Image
        } else {
            FileCategory::Document
        }
    }
}

/// One uploaded file. `bytes` is only complete when `size_bytes` is within the limit.
#[derive(Debug, Clone)]
pub struct FileAttachment {
    pub filename: String,
    pub category: FileCategory,
    pub size_bytes: usize,
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    pub fn new(filename: impl Into<String>, category: FileCategory, bytes: Vec<u8>) -> Self {
        Self { filename: filename.into(), category, size_bytes: bytes.len(), bytes }
    }

    /// A file over the size limit: its length is known, its content is not kept.
    pub fn oversized(
        filename: impl Into<String>,
        category: FileCategory,
        size_bytes: usize,
    ) -> Self {
        Self { filename: filename.into(), category, size_bytes, bytes: Vec::new() }
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

/// Raw form input, before validation.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub name: String,
    pub service_type: String,
    pub phone: Option<String>,
    pub files: Vec<FileAttachment>,
}

/// An accepted submission, ready to be mailed.
#[derive(Debug, Clone)]
pub struct Submission {
    pub name: String,
    pub service_type: ServiceType,
    pub phone: String,
    pub files: Vec<FileAttachment>,
}

/// Upload constraints
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_file_size: usize,
    pub allowed_extensions: Vec<String>,
}

impl UploadPolicy {
    pub fn with_max_file_size(max_file_size: usize) -> Self {
        Self { max_file_size, ..Default::default() }
    }

    pub fn allows_extension(&self, extension: Option<&str>) -> bool {
        extension.is_some_and(|ext| self.allowed_extensions.iter().any(|a| a == ext))
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}
