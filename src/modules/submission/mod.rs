pub mod handle;
pub mod model;
pub mod route;
pub mod schema;
pub mod service;
pub mod validation;

pub use model::UploadPolicy;
pub use service::SubmissionService;
