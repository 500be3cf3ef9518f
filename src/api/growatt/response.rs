use serde::Deserialize;

use crate::api::growatt::error::ApiError;

/// Generic API response.
///
/// On failure, Growatt tends to send an empty string or nothing at all in place of `data`,
/// so I read it into [`serde_json::Value`] first and parse only after the error code check.
#[derive(Deserialize)]
pub struct Response<R = serde_json::Value> {
    #[serde(default)]
    error_code: i64,

    #[serde(rename = "error_msg", default)]
    message: String,

    #[serde(default)]
    data: R,
}

impl<R> From<Response<R>> for Result<R, ApiError> {
    fn from(response: Response<R>) -> Self {
        if response.error_code == 0 {
            Ok(response.data)
        } else {
            Err(ApiError { code: response.error_code, message: response.message })
        }
    }
}
