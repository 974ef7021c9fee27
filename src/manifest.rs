use crate::error::Result;
use crate::rest::ApiContext;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response};
use serde::Deserialize;

/// Endpoint for dry-run manifest validation
const VALIDATE_ENDPOINT: &str = "ingestion/validate";
/// Endpoint for committed manifest ingestion
const UPLOAD_ENDPOINT: &str = "ingestion/upload_manifest";

/// A manifest spreadsheet staged for submission.
///
/// Request-scoped: built right before a request and discarded after. The
/// client performs no local content checks; an empty schema or a zero-byte
/// template is passed through as-is and the backend is the sole validator.
#[derive(Debug, Clone)]
pub struct ManifestForm {
    /// Schema identifier (e.g. "plasma"); lower-cased on the wire
    pub schema: String,
    /// File name reported in the multipart body
    pub file_name: String,
    /// Raw spreadsheet bytes
    pub template: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct ValidationResponse {
    errors: Vec<String>,
}

/// POST a manifest form to an ingestion endpoint.
///
/// The multipart body carries exactly two fields: `schema` (text) and
/// `template` (binary). Non-2xx responses come back normalized through the
/// standard error path.
pub async fn make_manifest_request(
    ctx: &ApiContext,
    endpoint: &str,
    token: &str,
    form: &ManifestForm,
) -> Result<Response> {
    let template = Part::bytes(form.template.clone()).file_name(form.file_name.clone());
    let body = Form::new()
        .text("schema", form.schema.to_lowercase())
        .part("template", template);

    let request = ctx.request(Method::POST, endpoint, token).multipart(body);
    ctx.execute(request).await
}

/// Submit a manifest for ingestion. Failures propagate to the caller as
/// normalized errors; nothing is swallowed here.
pub async fn upload_manifest(
    ctx: &ApiContext,
    token: &str,
    form: &ManifestForm,
) -> Result<Response> {
    make_manifest_request(ctx, UPLOAD_ENDPOINT, token, form).await
}

/// Submit a manifest for dry-run validation, returning the list of
/// validation errors. An empty list means the manifest is valid.
///
/// The backend reports validation failures two ways: a 200 response whose
/// body carries `{"errors": [...]}`, and a 4xx error envelope whose message
/// embeds the same `errors` array. Both are flattened to the same return
/// shape here, and any other failure becomes a one-element list holding the
/// error's display string. This is the one place in the crate where a failed
/// response is deliberately reinterpreted as a successful result, because it
/// is the backend's intentional encoding for this scenario.
pub async fn get_manifest_validation_errors(
    ctx: &ApiContext,
    token: &str,
    form: &ManifestForm,
) -> Vec<String> {
    match make_manifest_request(ctx, VALIDATE_ENDPOINT, token, form).await {
        Ok(response) => match response.json::<ValidationResponse>().await {
            Ok(validation) => validation.errors,
            Err(e) => vec![e.to_string()],
        },
        Err(e) => e
            .validation_errors()
            .unwrap_or_else(|| vec![e.to_string()]),
    }
}
