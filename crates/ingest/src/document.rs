//! Corpus file loading.
//!
//! The server answers questions against exactly one plain-text file, read
//! once at startup and immutable for the process lifetime.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read corpus file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read the corpus file as UTF-8 text. A missing or unreadable file is fatal
/// at startup — the server must not run with no corpus.
pub fn load_corpus(path: &Path) -> Result<String, IngestError> {
    std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "alpha beta gamma").unwrap();
        let text = load_corpus(file.path()).unwrap();
        assert_eq!(text, "alpha beta gamma");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_corpus(Path::new("/nonexistent/docs.txt")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/docs.txt"));
    }
}
