use actix_web::{http::header, test::TestRequest};
use venter_test_context::{
    call::{self, CallService},
    VenterContext,
};

const BOUNDARY: &str = "venter-test-boundary";

pub async fn caller(ctx: &VenterContext) -> anyhow::Result<impl CallService + '_> {
    call::caller(ctx, |svc| {
        crate::endpoints::configure(
            svc,
            ctx.db.clone(),
            ctx.storage.clone(),
            ctx.authenticator.clone(),
        )
    })
    .await
}

/// A `multipart/form-data` POST, with a single file part.
pub fn upload_request(uri: &str, field: &str, file_name: &str, content: &[u8]) -> TestRequest {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

/// A `multipart/form-data` POST without any part.
pub fn empty_upload_request(uri: &str) -> TestRequest {
    raw_upload_request(uri, format!("--{BOUNDARY}--\r\n"))
}

/// A `multipart/form-data` POST with the body as given.
pub fn raw_upload_request(uri: &str, body: impl Into<String>) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body.into())
}

/// The start of a multipart body, cut off within the `input_file` part.
pub fn truncated_upload_body() -> String {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"input_file\"; filename=\"a.csv\"\r\n\r\nName,Cat"
    )
}
