use actix_multipart::{Field, Multipart};
use actix_web::web;
use futures_util::TryStreamExt;

use crate::api::success::Success;
use crate::api::{error, success};
use crate::modules::mail::MailTransport;
use crate::modules::submission::{
    model::{FileAttachment, FileCategory, ServiceType, SubmissionForm},
    schema::{ServiceTypesResponse, SubmissionResponse, SubmissionState},
    service::SubmissionService,
};

const MAX_TEXT_FIELD: usize = 4 * 1024;

/// Reads a text field as UTF-8, refusing anything larger than a form input.
async fn read_text(field: &mut Field) -> Result<String, error::SystemError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if bytes.len() + chunk.len() > MAX_TEXT_FIELD {
            return Err(error::SystemError::bad_request("Form field is too long"));
        }
        bytes.extend_from_slice(&chunk);
    }
    String::from_utf8(bytes)
        .map_err(|_| error::SystemError::bad_request("Form field is not valid UTF-8"))
}

/// Reads one uploaded file completely. Bytes past `max_file_size` are counted
/// but not kept, so the validator can name the file without it sitting in memory.
async fn read_file(
    field: &mut Field,
    filename: String,
    max_file_size: usize,
) -> Result<FileAttachment, error::SystemError> {
    let category =
        FileCategory::detect(&filename, field.content_type().map(|m| m.essence_str()));

    let mut bytes = Vec::new();
    let mut size_bytes = 0usize;
    loop {
        let chunk = match field.try_next().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                log::warn!("Failed to read file '{}': {}", filename, e);
                return Err(error::SystemError::bad_request(format!(
                    "Failed to read file '{}'",
                    filename
                )));
            }
        };
        size_bytes += chunk.len();
        if size_bytes <= max_file_size {
            bytes.extend_from_slice(&chunk);
        }
    }

    if size_bytes > max_file_size {
        return Ok(FileAttachment::oversized(filename, category, size_bytes));
    }

    Ok(FileAttachment::new(filename, category, bytes))
}

/// Collects the multipart body into a form. Any file that cannot be read
/// drops the whole submission.
pub async fn read_form(
    payload: &mut Multipart,
    max_file_size: usize,
) -> Result<SubmissionForm, error::SystemError> {
    let mut form = SubmissionForm::default();

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "name" => form.name = read_text(&mut field).await?,
            "service_type" => form.service_type = read_text(&mut field).await?,
            "phone" => {
                let phone = read_text(&mut field).await?;
                form.phone = (!phone.trim().is_empty()).then_some(phone);
            }
            "files" => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string();

                // Browsers send an empty part when no file was picked
                if filename.is_empty() {
                    while field.try_next().await?.is_some() {}
                    continue;
                }

                form.files.push(read_file(&mut field, filename, max_file_size).await?);
            }
            _ => {
                while field.try_next().await?.is_some() {}
            }
        }
    }

    Ok(form)
}

/// Submit documents handler
pub async fn submit_documents<M>(
    mut payload: Multipart,
    service: web::Data<SubmissionService<M>>,
) -> Result<success::Success<SubmissionResponse>, error::Error>
where
    M: MailTransport + Send + Sync + 'static,
{
    let form = read_form(&mut payload, service.policy().max_file_size).await?;
    let outcome = service.submit(form).await?;

    match outcome.state {
        state if state.is_terminal() => {
            let message = outcome.message.clone();
            Ok(Success::ok(Some(SubmissionResponse::from(outcome))).message(message))
        }
        SubmissionState::Rejected => Err(error::Error::Validation(outcome.errors)),
        state if state.accepts_resubmission() => Err(error::Error::bad_gateway(outcome.message)),
        state => {
            log::error!("Submission {} ended in unexpected state {:?}", outcome.id, state);
            Err(error::Error::internal_server_error())
        }
    }
}

/// List service types handler
pub async fn list_service_types() -> success::Success<ServiceTypesResponse> {
    let service_types = ServiceType::ALL.iter().map(|s| s.label()).collect();
    Success::ok(Some(ServiceTypesResponse { service_types }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::header, http::StatusCode, test, App};
    use std::sync::Arc;

    use crate::modules::mail::{transport::mock::RecordingTransport, MailConfig};
    use crate::modules::submission::{model::UploadPolicy, route};

    const BOUNDARY: &str = "----intake-test-boundary";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    fn multipart_body(parts: &[Part]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(filename, content_type, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\n\
                             Content-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn submission_service(
        transport: Arc<RecordingTransport>,
        policy: UploadPolicy,
    ) -> web::Data<SubmissionService<RecordingTransport>> {
        let config = MailConfig::new(
            "docs@example.com",
            "secret",
            "sindico@example.com",
            "smtp.gmail.com",
            587,
        )
        .unwrap();
        web::Data::new(SubmissionService::new(transport, config, policy))
    }

    fn post_raw(payload: Vec<u8>) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/submissions")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(payload)
    }

    fn post(parts: &[Part]) -> test::TestRequest {
        post_raw(multipart_body(parts))
    }

    #[actix_web::test]
    async fn test_submit_sends_email() {
        let transport = Arc::new(RecordingTransport::default());
        let app = test::init_service(
            App::new()
                .app_data(submission_service(transport.clone(), UploadPolicy::default()))
                .service(web::scope("/api").configure(route::configure::<RecordingTransport>)),
        )
        .await;

        let req = post(&[
            Part::Text("name", "Maria Souza"),
            Part::Text("service_type", "Eletricista"),
            Part::Text("phone", "11999998888"),
            Part::File("nota.pdf", "application/pdf", b"%PDF-1.4 fake invoice"),
        ]);
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["state"], "sent");
        assert_eq!(body["data"]["attachments"][0]["filename"], "nota.pdf");
        assert_eq!(body["data"]["attachments"][0]["category"], "document");
        assert_eq!(body["message"], "Documents sent successfully");
        assert_eq!(transport.sent_count(), 1);
    }

    #[actix_web::test]
    async fn test_submit_empty_form_is_rejected() {
        let transport = Arc::new(RecordingTransport::default());
        let app = test::init_service(
            App::new()
                .app_data(submission_service(transport.clone(), UploadPolicy::default()))
                .service(web::scope("/api").configure(route::configure::<RecordingTransport>)),
        )
        .await;

        let req = post(&[Part::Text("name", "  "), Part::Text("service_type", "")]);
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(
            body["errors"],
            serde_json::json!([
                "Name is required",
                "Service type is required",
                "At least one file is required"
            ])
        );
        assert_eq!(transport.sent_count(), 0);
    }

    #[actix_web::test]
    async fn test_oversized_file_is_named() {
        let transport = Arc::new(RecordingTransport::default());
        let app = test::init_service(
            App::new()
                .app_data(submission_service(transport.clone(), UploadPolicy::with_max_file_size(16)))
                .service(web::scope("/api").configure(route::configure::<RecordingTransport>)),
        )
        .await;

        let req = post(&[
            Part::Text("name", "Maria Souza"),
            Part::Text("service_type", "Pintor"),
            Part::File("ok.png", "image/png", b"0123456789abcdef"),
            Part::File("big.pdf", "application/pdf", b"0123456789abcdefg"),
        ]);
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"], serde_json::json!(["File 'big.pdf' exceeds 16 bytes"]));
        assert_eq!(transport.sent_count(), 0);
    }

    #[actix_web::test]
    async fn test_send_failure_returns_bad_gateway() {
        let transport = Arc::new(RecordingTransport::failing("535 authentication failed"));
        let app = test::init_service(
            App::new()
                .app_data(submission_service(transport.clone(), UploadPolicy::default()))
                .service(web::scope("/api").configure(route::configure::<RecordingTransport>)),
        )
        .await;

        let parts = [
            Part::Text("name", "Maria Souza"),
            Part::Text("service_type", "Eletricista"),
            Part::File("recibo.jpg", "image/jpeg", &[0xff, 0xd8, 0xff, 0xe0]),
        ];

        for _ in 0..2 {
            let resp = test::call_service(&app, post(&parts).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["message"], "Failed to send email: 535 authentication failed");
        }
    }

    #[actix_web::test]
    async fn test_truncated_file_drops_submission() {
        let transport = Arc::new(RecordingTransport::default());
        let app = test::init_service(
            App::new()
                .app_data(submission_service(transport.clone(), UploadPolicy::default()))
                .service(web::scope("/api").configure(route::configure::<RecordingTransport>)),
        )
        .await;

        // Cut off inside the file part, before any closing boundary
        let mut payload = multipart_body(&[
            Part::Text("name", "Maria Souza"),
            Part::Text("service_type", "Eletricista"),
        ]);
        payload.truncate(payload.len() - format!("--{BOUNDARY}--\r\n").len());
        payload.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"files\"; filename=\"a.pdf\"\r\n\
                 Content-Type: application/pdf\r\n\r\n\
                 %PDF partial"
            )
            .as_bytes(),
        );

        let req = post_raw(payload);
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(transport.sent_count(), 0);
    }

    #[actix_web::test]
    async fn test_oversized_file_is_not_kept_in_memory() {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_str(&format!("multipart/form-data; boundary={BOUNDARY}"))
                .unwrap(),
        );
        let body = web::Bytes::from(multipart_body(&[
            Part::File("small.png", "image/png", b"0123"),
            Part::File("big.pdf", "application/pdf", b"0123456789"),
        ]));
        let mut payload = Multipart::new(
            &headers,
            futures_util::stream::iter([Ok::<_, actix_web::error::PayloadError>(body)]),
        );

        let form = read_form(&mut payload, 8).await.unwrap();
        assert_eq!(form.files.len(), 2);
        assert_eq!(form.files[0].size_bytes, 4);
        assert_eq!(form.files[0].bytes, b"0123");
        assert_eq!(form.files[1].filename, "big.pdf");
        assert_eq!(form.files[1].size_bytes, 10);
        assert!(form.files[1].bytes.is_empty());
    }

    #[actix_web::test]
    async fn test_list_service_types() {
        let transport = Arc::new(RecordingTransport::default());
        let app = test::init_service(
            App::new()
                .app_data(submission_service(transport, UploadPolicy::default()))
                .service(web::scope("/api").configure(route::configure::<RecordingTransport>)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/service-types").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let types = body["data"]["service_types"].as_array().unwrap();
        assert_eq!(types.len(), 9);
        assert_eq!(types[0], "Pedreiro");
        assert_eq!(types[8], "Outro");
    }
}
