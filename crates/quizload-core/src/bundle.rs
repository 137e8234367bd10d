//! Reading question bundles into named text blobs.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::BundleError;

/// Result type for bundle operations.
pub type Result<T> = std::result::Result<T, BundleError>;

/// One named text member of a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    /// Member name (archive path, or file path for directories).
    pub name: String,
    pub text: String,
}

impl SourceText {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Read a bundle from a directory, a `.zip` archive, or a single file.
///
/// Directory and archive members are kept only when their name ends with
/// `suffix`. A single file is always read.
pub fn read_bundle(path: &Path, suffix: &str) -> Result<Vec<SourceText>> {
    if !path.exists() {
        return Err(BundleError::NotFound(path.display().to_string()));
    }

    let sources = if path.is_dir() {
        read_dir(path, suffix)?
    } else if is_zip(path) {
        read_zip(path, suffix)?
    } else {
        let bytes = fs::read(path)?;
        vec![decode(path.display().to_string(), bytes)?]
    };

    info!("Read {} members from {}", sources.len(), path.display());
    Ok(sources)
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
}

fn read_dir(root: &Path, suffix: &str) -> Result<Vec<SourceText>> {
    let mut files = Vec::new();
    collect_files(root, &mut files)?;
    files.sort();

    files
        .into_iter()
        .filter(|path| path.to_string_lossy().ends_with(suffix))
        .map(|path| {
            let name = path
                .strip_prefix(root)
                .unwrap_or(path.as_path())
                .to_string_lossy()
                .into_owned();
            decode(name, fs::read(&path)?)
        })
        .collect()
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

fn read_zip(path: &Path, suffix: &str) -> Result<Vec<SourceText>> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    let mut sources = Vec::new();

    for index in 0..archive.len() {
        let mut member = archive.by_index(index)?;
        if member.is_dir() || !member.name().ends_with(suffix) {
            debug!("Skipping archive member {}", member.name());
            continue;
        }

        let name = member.name().to_string();
        let mut bytes = Vec::new();
        member.read_to_end(&mut bytes)?;
        sources.push(decode(name, bytes)?);
    }

    Ok(sources)
}

fn decode(name: String, bytes: Vec<u8>) -> Result<SourceText> {
    match String::from_utf8(bytes) {
        Ok(text) => Ok(SourceText { name, text }),
        Err(_) => Err(BundleError::Utf8 { name }),
    }
}
