//! Status handling and body decoding.

use bytes::Bytes;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use transit_gateway_sdk::TransitGatewayError;

use super::transport::RawResponse;

/// Longest body excerpt quoted in an error message when the body is not the
/// structured error shape.
const ERROR_PREVIEW_LIMIT: usize = 512;

/// Error document returned by the service for non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorItem>,
    #[serde(default)]
    trace: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    more_info: Option<String>,
}

/// Return the body of a 2xx response, or the error the response describes.
///
/// `resource` names the addressed resource in `NotFound` errors.
pub fn into_success(
    response: RawResponse,
    resource: &str,
) -> Result<Bytes, TransitGatewayError> {
    if response.status.is_success() {
        return Ok(response.body);
    }
    if response.status == http::StatusCode::NOT_FOUND {
        return Err(TransitGatewayError::not_found(resource));
    }
    Err(api_error(response.status, &response.body))
}

fn api_error(status: http::StatusCode, body: &[u8]) -> TransitGatewayError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let first = parsed.errors.into_iter().next();

    let message = match &first {
        Some(ErrorItem {
            message: Some(message),
            more_info,
            ..
        }) => match more_info {
            Some(info) => format!("{message} ({info})"),
            None => message.clone(),
        },
        _ if !body.is_empty() => preview(body),
        _ => status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_owned(),
    };

    TransitGatewayError::Api {
        status: status.as_u16(),
        code: first.and_then(|item| item.code),
        message,
        trace: parsed.trace,
    }
}

fn preview(body: &[u8]) -> String {
    let end = body.len().min(ERROR_PREVIEW_LIMIT);
    let mut text = String::from_utf8_lossy(&body[..end]).into_owned();
    if body.len() > ERROR_PREVIEW_LIMIT {
        text.push_str("...");
    }
    text
}

/// Decode a JSON success body.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, TransitGatewayError> {
    serde_json::from_slice(body).map_err(|e| TransitGatewayError::Decode(e.to_string()))
}
