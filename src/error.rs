//! Error types shared by the site runtime.
//!
//! Nothing in here is fatal to the page: callers log the error and skip the
//! feature that failed.

use thiserror::Error;

/// Errors raised while binding, drawing or fetching.
#[derive(Debug, Error)]
pub enum SiteError {
    /// A required mount point is absent from the host page.
    #[error("mount point `{0}` not found")]
    MissingMount(&'static str),

    /// The graphics back end refused a request (context, buffer, texture).
    #[error("graphics: {0}")]
    Graphics(String),

    /// GLSL compilation failed; carries the driver's info log.
    #[error("shader compile failed: {0}")]
    ShaderCompile(String),

    /// Program linking failed; carries the driver's info log.
    #[error("program link failed: {0}")]
    ProgramLink(String),

    /// Network request failed or returned a non-success status.
    #[error("fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Response body did not match the expected shape.
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),

    /// Inline site configuration was present but unusable.
    #[error("config: {0}")]
    Config(String),

    /// Any other exception surfaced from the browser.
    #[error("js: {0}")]
    Js(String),
}

pub type Result<T> = std::result::Result<T, SiteError>;

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for SiteError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        SiteError::Js(format!("{value:?}"))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<SiteError> for wasm_bindgen::JsValue {
    fn from(err: SiteError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_mount_names_the_selector() {
        let err = SiteError::MissingMount("#projects-container");
        assert_eq!(err.to_string(), "mount point `#projects-container` not found");
    }

    #[test]
    fn decode_wraps_serde_errors() {
        let err: SiteError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert!(err.to_string().starts_with("decode: "));
    }
}
