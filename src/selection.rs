// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! In-memory store for the user's current file selection

use std::path::Path;
use tracing::debug;

use crate::config::SelectionConfig;
use crate::Result;

/// A file chosen for submission: name plus raw bytes
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Holds the current selection; pure state, no I/O
#[derive(Debug, Default)]
pub struct SelectionStore {
    files: Vec<SelectedFile>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current selection wholesale (no merge/append semantics)
    pub fn set_selection(&mut self, files: Vec<SelectedFile>) {
        debug!("Selection replaced: {} file(s)", files.len());
        self.files = files;
    }

    /// Files in selection order
    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

/// Check if a path looks like a submittable image
pub fn is_supported(path: &Path, config: &SelectionConfig) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => e,
        None => return false,
    };

    config
        .formats
        .iter()
        .any(|f| f.eq_ignore_ascii_case(ext))
}

/// Read paths into selected files (the CLI stand-in for a file picker).
///
/// Unsupported extensions are skipped with a log line; an unreadable path is
/// an error, since the user named it explicitly.
pub fn read_selection(paths: &[impl AsRef<Path>], config: &SelectionConfig) -> Result<Vec<SelectedFile>> {
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        if !is_supported(path, config) {
            tracing::warn!("Skipping unsupported file: {:?}", path);
            continue;
        }

        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        debug!("Read {} ({} bytes)", name, bytes.len());
        files.push(SelectedFile::new(name, bytes));
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample(name: &str) -> SelectedFile {
        SelectedFile::new(name, vec![0xFF, 0xD8, 0xFF])
    }

    #[test]
    fn test_set_selection_replaces() {
        let mut store = SelectionStore::new();
        store.set_selection(vec![sample("a.jpg"), sample("b.jpg")]);
        assert_eq!(store.len(), 2);

        store.set_selection(vec![sample("c.jpg")]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.files()[0].name, "c.jpg");
    }

    #[test]
    fn test_empty_by_default() {
        let store = SelectionStore::new();
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_selection_can_clear() {
        let mut store = SelectionStore::new();
        store.set_selection(vec![sample("a.jpg")]);
        store.set_selection(Vec::new());
        assert!(store.is_empty());
    }

    #[test]
    fn test_is_supported() {
        let config = SelectionConfig::default();
        assert!(is_supported(&PathBuf::from("cells.jpg"), &config));
        assert!(is_supported(&PathBuf::from("cells.TIF"), &config));
        assert!(!is_supported(&PathBuf::from("notes.txt"), &config));
        assert!(!is_supported(&PathBuf::from("no_extension"), &config));
    }

    #[test]
    fn test_read_selection_skips_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let img = dir.path().join("well_a1.png");
        let txt = dir.path().join("notes.txt");
        std::fs::write(&img, b"pngdata").unwrap();
        std::fs::write(&txt, b"text").unwrap();

        let config = SelectionConfig::default();
        let files = read_selection(&[img, txt], &config).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "well_a1.png");
        assert_eq!(files[0].bytes, b"pngdata");
    }

    #[test]
    fn test_read_selection_missing_file_errors() {
        let config = SelectionConfig::default();
        let missing = [PathBuf::from("/nonexistent/cells.jpg")];
        assert!(read_selection(&missing, &config).is_err());
    }
}
