use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::borrow::Cow;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),
    #[error("Bad Gateway: {0}")]
    BadGateway(Cow<'static, str>),
    #[error("Internal Server Error")]
    InternalServer,
}

#[derive(serde::Serialize)]
pub struct ErrorBody {
    pub message: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl Error {
    pub fn bad_gateway(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadGateway(msg.into())
    }

    pub fn internal_server_error() -> Self {
        Self::InternalServer
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match *self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Error::InternalServer => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut res = HttpResponse::build(self.status_code());

        match self {
            Error::BadRequest(msg) | Error::BadGateway(msg) => {
                res.json(ErrorBody { message: msg.clone(), errors: None })
            }
            Error::Validation(errors) => res.json(ErrorBody {
                message: "Submission rejected".into(),
                errors: Some(errors.clone()),
            }),
            Error::InternalServer => {
                res.json(ErrorBody { message: "Internal Server Error".into(), errors: None })
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    // lettre errors
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Failed to build email: {0}")]
    MailBuild(#[from] lettre::error::Error),
    #[error("Invalid content type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),
    // multipart errors
    #[error("Multipart Error: {0}")]
    Multipart(#[from] actix_multipart::MultipartError),
    // Custom Errors
    #[error("Configuration Error: {0}")]
    Config(Cow<'static, str>),
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
}

impl From<SystemError> for Error {
    fn from(value: SystemError) -> Self {
        match value {
            SystemError::BadRequest(msg) => Error::BadRequest(msg),
            SystemError::Multipart(err) => {
                log::warn!("Rejected malformed multipart payload: {}", err);
                Error::BadRequest(format!("Malformed form data: {err}").into())
            }
            _ => {
                log::error!("Internal Server Error: {:?}", value);
                Error::InternalServer
            }
        }
    }
}

impl From<SystemError> for std::io::Error {
    fn from(value: SystemError) -> Self {
        std::io::Error::other(value.to_string())
    }
}

impl SystemError {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn config(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(msg.into())
    }
}
