//! Test utilities shared by the source and REPL tests.

use std::io::Write;
use tempfile::NamedTempFile;

/// Writes `content` to a fresh temporary `.mepa` file.
pub fn source_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".mepa")
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}
