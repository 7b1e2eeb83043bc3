// handlers/upload.rs - POST /api/upload handler

use axum::{
    extract::{RawQuery, State},
    http::{header, HeaderMap},
    response::Json,
};
use bytes::Bytes;

use crate::api::AppState;
use crate::error::{ApiError, ApiResult};
use crate::types::{BlobDescriptor, BlobOptions};

pub const MISSING_INPUT: &str = "Filename and body required";
pub const UPLOAD_FAILED: &str = "Upload failed";

/// Value of the first `filename` key in the query string; blank counts as absent.
/// Repeated keys are accepted and only the first one is read.
pub fn filename_from_query(raw: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(raw?.as_bytes())
        .find(|(key, _)| key == "filename")
        .map(|(_, value)| value.into_owned())
        .filter(|name| !name.trim().is_empty())
}

/// POST /api/upload?filename=NAME - Store the raw request body as a public blob
///
/// Expected Output (Success): the blob subsystem's descriptor, verbatim
/// ```json
/// { "url": "https://.../report.pdf", "pathname": "report.pdf", "contentType": "application/pdf" }
/// ```
///
/// Errors:
/// - 400 `{"error":"Filename and body required"}` when either input is missing (no upstream call)
/// - 500 `{"error":"Upload failed"}` when the blob store fails; the cause is only logged
pub async fn upload(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<BlobDescriptor>> {
    let filename = filename_from_query(query.as_deref());
    let Some(filename) = filename.filter(|_| !body.is_empty()) else {
        return Err(ApiError::bad_request(MISSING_INPUT));
    };

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let options = BlobOptions::public().with_content_type(content_type);
    let size = body.len();

    match state.gateway.store_blob(&filename, body, &options).await {
        Ok(descriptor) => {
            tracing::info!(
                "Stored upload {} ({} bytes) at {}",
                filename,
                size,
                descriptor.url().unwrap_or("<no url>")
            );
            Ok(Json(descriptor))
        }
        Err(e) => {
            tracing::error!("Upload of {} failed: {}", filename, e);
            Err(ApiError::internal_server_error(UPLOAD_FAILED))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_filename_wins() {
        assert_eq!(
            filename_from_query(Some("filename=a.pdf&filename=b.pdf")),
            Some("a.pdf".to_string())
        );
    }

    #[test]
    fn filename_is_percent_decoded() {
        assert_eq!(
            filename_from_query(Some("x=1&filename=q1%20summary.pdf")),
            Some("q1 summary.pdf".to_string())
        );
    }

    #[test]
    fn blank_or_absent_filename_is_missing() {
        assert_eq!(filename_from_query(None), None);
        assert_eq!(filename_from_query(Some("filename=")), None);
        assert_eq!(filename_from_query(Some("name=report.pdf")), None);
    }
}
