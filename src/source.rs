//! Where markup comes from and where the result goes.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ShrinkError;

/// A document to optimize together with its destination.
pub trait ContentSource {
    fn input_content(&self) -> Result<String, ShrinkError>;

    fn write_output(&mut self, output: &str) -> Result<(), ShrinkError>;
}

/// Reads one file and writes the result to another (or the same) path.
#[derive(Debug, Clone)]
pub struct FileSource {
    input: PathBuf,
    output: PathBuf,
}

impl FileSource {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Overwrite the input file with the result.
    pub fn in_place(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            output: path.clone(),
            input: path,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl ContentSource for FileSource {
    fn input_content(&self) -> Result<String, ShrinkError> {
        Ok(fs::read_to_string(&self.input)?)
    }

    fn write_output(&mut self, output: &str) -> Result<(), ShrinkError> {
        if let Some(parent) = self.output.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.output, output)?;
        Ok(())
    }
}

/// In-memory source; the output is kept for the caller to collect.
#[derive(Debug, Clone, Default)]
pub struct StringSource {
    input: String,
    output: Option<String>,
}

impl StringSource {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: None,
        }
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn into_output(self) -> Option<String> {
        self.output
    }
}

impl ContentSource for StringSource {
    fn input_content(&self) -> Result<String, ShrinkError> {
        Ok(self.input.clone())
    }

    fn write_output(&mut self, output: &str) -> Result<(), ShrinkError> {
        self.output = Some(output.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_source() {
        let mut source = StringSource::new("<svg/>");
        assert_eq!(source.input_content().unwrap(), "<svg/>");
        assert_eq!(source.output(), None);
        source.write_output("<svg></svg>").unwrap();
        assert_eq!(source.into_output().as_deref(), Some("<svg></svg>"));
    }

    #[test]
    fn test_file_source_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.svg");
        fs::write(&input, "<svg/>").unwrap();
        let output = dir.path().join("out/nested/in.svg");

        let mut source = FileSource::new(&input, &output);
        assert_eq!(source.input_content().unwrap(), "<svg/>");
        source.write_output("<svg></svg>").unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "<svg></svg>");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = FileSource::in_place("/nonexistent/file.svg");
        assert!(matches!(source.input_content(), Err(ShrinkError::Io(_))));
    }
}
