//! Invocation event parsing and request validation.

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Extension used for both input and output when the caller gives none.
pub const DEFAULT_EXTENSION: &str = "mp3";

/// Output bitrate in kbps when the caller gives none.
pub const DEFAULT_BITRATE: &str = "96";

/// Raw invocation event as delivered by the host.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvocationEvent {
    #[serde(rename = "queryStringParameters", default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

impl InvocationEvent {
    /// Query parameters of the event; a missing map is treated as empty.
    pub fn query_parameters(&self) -> HashMap<String, String> {
        self.query_string_parameters.clone().unwrap_or_default()
    }
}

/// Caller-fault errors detected before any work is done.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("`outputBitrate` must be a number")]
    InvalidBitrate,

    #[error("`fileUrl` query parameter not specified")]
    MissingFileUrl,

    #[error("`{parameter}` must not contain path separators")]
    InvalidExtension { parameter: &'static str },
}

/// A validated transcode request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub file_url: String,
    pub input_extension: String,
    pub output_extension: String,
    /// Numeric string, passed to the engine as `<bitrate>k`.
    pub output_bitrate: String,
}

impl Request {
    /// Validates raw query parameters.
    ///
    /// Empty values count as absent. Checks run in a fixed order: bitrate,
    /// file URL, then extensions.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let input_extension = param_or(params, "inputExtension", DEFAULT_EXTENSION);
        let output_extension = param_or(params, "outputExtension", DEFAULT_EXTENSION);
        let output_bitrate = param_or(params, "outputBitrate", DEFAULT_BITRATE)
            .trim()
            .to_string();

        if !is_numeric(&output_bitrate) {
            return Err(ValidationError::InvalidBitrate);
        }

        let file_url = params
            .get("fileUrl")
            .filter(|url| !url.is_empty())
            .cloned()
            .ok_or(ValidationError::MissingFileUrl)?;

        check_extension("inputExtension", &input_extension)?;
        check_extension("outputExtension", &output_extension)?;

        Ok(Self {
            file_url,
            input_extension,
            output_extension,
            output_bitrate,
        })
    }

    /// File name of the downloaded source inside the workspace.
    pub fn input_file_name(&self) -> String {
        format!("input.{}", self.input_extension)
    }

    /// File name of the transcoded result inside the workspace.
    pub fn output_file_name(&self) -> String {
        format!("output.{}", self.output_extension)
    }
}

fn param_or(params: &HashMap<String, String>, name: &str, default: &str) -> String {
    params
        .get(name)
        .filter(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.parse::<f64>().is_ok_and(f64::is_finite)
}

// Extensions are otherwise free-form; the engine decides what it can read and write.
fn check_extension(parameter: &'static str, extension: &str) -> Result<(), ValidationError> {
    if extension.contains(['/', '\\', '\0']) || extension == "." || extension == ".." {
        return Err(ValidationError::InvalidExtension { parameter });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let request =
            Request::from_query(&query(&[("fileUrl", "https://cdn.test/a.mp3")])).unwrap();
        assert_eq!(request.input_extension, "mp3");
        assert_eq!(request.output_extension, "mp3");
        assert_eq!(request.output_bitrate, "96");
        assert_eq!(request.input_file_name(), "input.mp3");
        assert_eq!(request.output_file_name(), "output.mp3");
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let request = Request::from_query(&query(&[
            ("fileUrl", "https://cdn.test/a.wav"),
            ("inputExtension", ""),
            ("outputBitrate", ""),
        ]))
        .unwrap();
        assert_eq!(request.input_extension, "mp3");
        assert_eq!(request.output_bitrate, "96");
    }

    #[test]
    fn test_missing_file_url() {
        let err = Request::from_query(&HashMap::new()).unwrap_err();
        assert_eq!(err, ValidationError::MissingFileUrl);
        assert!(err.to_string().contains("fileUrl"));

        let err = Request::from_query(&query(&[("fileUrl", "")])).unwrap_err();
        assert_eq!(err, ValidationError::MissingFileUrl);
    }

    #[test]
    fn test_non_numeric_bitrate() {
        for bad in ["abc", "64k", "NaN", "12 34"] {
            let err = Request::from_query(&query(&[
                ("fileUrl", "https://cdn.test/a.mp3"),
                ("outputBitrate", bad),
            ]))
            .unwrap_err();
            assert_eq!(err, ValidationError::InvalidBitrate, "input {:?}", bad);
            assert!(err.to_string().contains("outputBitrate"));
        }
    }

    #[test]
    fn test_non_finite_bitrate_rejected() {
        for bad in ["inf", "-infinity", "Infinity", "1e400"] {
            let err = Request::from_query(&query(&[
                ("fileUrl", "https://cdn.test/a.mp3"),
                ("outputBitrate", bad),
            ]))
            .unwrap_err();
            assert_eq!(err, ValidationError::InvalidBitrate, "input {:?}", bad);
        }
    }

    #[test]
    fn test_bitrate_checked_before_file_url() {
        let err = Request::from_query(&query(&[("outputBitrate", "abc")])).unwrap_err();
        assert_eq!(err, ValidationError::InvalidBitrate);
    }

    #[test]
    fn test_numeric_bitrate_forms() {
        for good in ["64", " 128 ", "1.5", "1e2"] {
            let request = Request::from_query(&query(&[
                ("fileUrl", "https://cdn.test/a.mp3"),
                ("outputBitrate", good),
            ]))
            .unwrap();
            assert_eq!(request.output_bitrate, good.trim());
        }
    }

    #[test]
    fn test_unknown_extensions_accepted() {
        let request = Request::from_query(&query(&[
            ("fileUrl", "https://cdn.test/a"),
            ("inputExtension", "weird"),
            ("outputExtension", "opus"),
        ]))
        .unwrap();
        assert_eq!(request.input_file_name(), "input.weird");
        assert_eq!(request.output_file_name(), "output.opus");
    }

    #[test]
    fn test_extension_with_separator_rejected() {
        let err = Request::from_query(&query(&[
            ("fileUrl", "https://cdn.test/a"),
            ("outputExtension", "mp3/../../etc"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidExtension {
                parameter: "outputExtension"
            }
        );
    }

    #[test]
    fn test_event_deserialization() {
        let event: InvocationEvent = serde_json::from_str(
            r#"{"queryStringParameters": {"fileUrl": "https://cdn.test/a.mp3"}, "rawPath": "/"}"#,
        )
        .unwrap();
        assert_eq!(
            event.query_parameters().get("fileUrl").map(String::as_str),
            Some("https://cdn.test/a.mp3")
        );

        let event: InvocationEvent =
            serde_json::from_str(r#"{"queryStringParameters": null}"#).unwrap();
        assert!(event.query_parameters().is_empty());
    }
}
