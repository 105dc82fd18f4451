use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShrinkError {
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid SVG: {0}")]
    InvalidSvg(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Rule `{rule}` failed: {reason}")]
    Processing { rule: &'static str, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShrinkError {
    pub(crate) fn processing(rule: &'static str, reason: impl Into<String>) -> Self {
        Self::Processing {
            rule,
            reason: reason.into(),
        }
    }
}
