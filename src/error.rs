//! Intake error taxonomy.
//!
//! Every failure the intake can report maps to one fixed numeric code so
//! host applications can branch on it without parsing messages:
//!
//! | Code | Variant | Raised by |
//! |---|---|---|
//! | 11 | [`IntakeError::NoFileSupplied`] | missing or empty source |
//! | 12 | [`IntakeError::Decode`] | codec could not read the image |
//! | 21 | [`IntakeError::UnsupportedFormat`] | extension not in `limits.formats` |
//! | 22 | [`IntakeError::FileTooLarge`] | declared size over `limits.max_file_size` |
//! | 23 | [`IntakeError::ImageTooSmall`] | pixels under `limits.min_image_size` |
//! | 41 | [`IntakeError::Config`] | `origin` / `dimensions` missing required keys |
//! | 51 | [`IntakeError::Storage`] | directory creation or encode/write failed |

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    NoFileSupplied = 11,
    DecodeError = 12,
    UnsupportedFormat = 21,
    FileTooLarge = 22,
    ImageTooSmall = 23,
    ConfigError = 41,
    StorageError = 51,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntakeError {
    #[error("No file supplied.")]
    NoFileSupplied,
    #[error("{0}")]
    Decode(String),
    #[error("This type of file is not allowed.")]
    UnsupportedFormat { extension: Option<String> },
    #[error("The file is too large. Make sure that the file is less than {limit_mb}M.")]
    FileTooLarge { size: u64, limit_mb: f64 },
    #[error(
        "The image is too small. {min_width} pixels of width and {min_height} pixels of height or larger are needed."
    )]
    ImageTooSmall {
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },
    #[error("Config error for {section}: {detail}.")]
    Config { section: String, detail: String },
    #[error("{0}")]
    Storage(String),
}

impl IntakeError {
    pub fn config(section: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Config {
            section: section.into(),
            detail: detail.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NoFileSupplied => ErrorCode::NoFileSupplied,
            Self::Decode(_) => ErrorCode::DecodeError,
            Self::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            Self::FileTooLarge { .. } => ErrorCode::FileTooLarge,
            Self::ImageTooSmall { .. } => ErrorCode::ImageTooSmall,
            Self::Config { .. } => ErrorCode::ConfigError,
            Self::Storage(_) => ErrorCode::StorageError,
        }
    }
}

/// Flat success/code/message triple for hosts that don't speak `Result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
    pub ok: bool,
    /// `0` on success, otherwise one of the [`ErrorCode`] values.
    pub error_code: i32,
    pub error_message: String,
}

impl PipelineResult {
    pub fn success() -> Self {
        Self {
            ok: true,
            error_code: 0,
            error_message: String::new(),
        }
    }

    pub fn failure(error: &IntakeError) -> Self {
        Self {
            ok: false,
            error_code: error.code().as_i32(),
            error_message: error.to_string(),
        }
    }
}

impl From<Option<&IntakeError>> for PipelineResult {
    fn from(error: Option<&IntakeError>) -> Self {
        error.map_or_else(Self::success, Self::failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_table() {
        assert_eq!(IntakeError::NoFileSupplied.code().as_i32(), 11);
        assert_eq!(IntakeError::Decode("x".into()).code().as_i32(), 12);
        assert_eq!(
            IntakeError::UnsupportedFormat { extension: None }
                .code()
                .as_i32(),
            21
        );
        assert_eq!(
            IntakeError::FileTooLarge {
                size: 1,
                limit_mb: 0.0
            }
            .code()
            .as_i32(),
            22
        );
        assert_eq!(
            IntakeError::ImageTooSmall {
                width: 1,
                height: 1,
                min_width: 2,
                min_height: 2
            }
            .code()
            .as_i32(),
            23
        );
        assert_eq!(IntakeError::config("origin", "x").code().as_i32(), 41);
        assert_eq!(IntakeError::Storage("x".into()).code().as_i32(), 51);
    }

    #[test]
    fn file_too_large_message_names_limit() {
        let err = IntakeError::FileTooLarge {
            size: 11 * 1024 * 1024,
            limit_mb: 10.0,
        };
        assert!(err.to_string().contains("10M"));
    }

    #[test]
    fn image_too_small_message_names_both_minimums() {
        let err = IntakeError::ImageTooSmall {
            width: 100,
            height: 100,
            min_width: 950,
            min_height: 280,
        };
        let msg = err.to_string();
        assert!(msg.contains("950"));
        assert!(msg.contains("280"));
    }

    #[test]
    fn decode_and_storage_carry_underlying_text() {
        assert_eq!(IntakeError::Decode("bad header".into()).to_string(), "bad header");
        assert_eq!(IntakeError::Storage("disk full".into()).to_string(), "disk full");
    }

    #[test]
    fn pipeline_result_from_error() {
        let result = PipelineResult::failure(&IntakeError::NoFileSupplied);
        assert!(!result.ok);
        assert_eq!(result.error_code, 11);
        assert_eq!(result.error_message, "No file supplied.");
    }

    #[test]
    fn pipeline_result_success_is_zero() {
        let result = PipelineResult::from(None);
        assert!(result.ok);
        assert_eq!(result.error_code, 0);
        assert!(result.error_message.is_empty());
    }

    #[test]
    fn pipeline_result_serializes_flat() {
        let json = serde_json::to_value(PipelineResult::failure(&IntakeError::Storage(
            "denied".into(),
        )))
        .unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error_code"], 51);
        assert_eq!(json["error_message"], "denied");
    }
}
