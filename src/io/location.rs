//! Location classification and resolution.
//!
//! A location string is one of:
//! - `-`, the standard input/output stream
//! - a URL such as `https://host/data.json`
//! - a local filesystem path

use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use super::{FileInput, FileOutput, InputProvider, OutputTarget, StdinInput, StdoutOutput};
use crate::error::{Stage, StageError};

/// The marker standing for stdin on the source side and stdout on the target side.
pub const STDIO_MARKER: &str = "-";

/// A classified location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Stdio,
    Url(Url),
    File(PathBuf),
}

impl Location {
    /// Classify a raw location string.
    ///
    /// Fails only when the string looks like a URL but cannot be parsed as one.
    pub fn classify(raw: &str) -> Result<Self, url::ParseError> {
        if raw == STDIO_MARKER {
            return Ok(Location::Stdio);
        }
        if is_url(raw) {
            return Url::parse(raw).map(Location::Url);
        }
        Ok(Location::File(PathBuf::from(raw)))
    }
}

/// Returns true if `raw` starts with a URL scheme followed by `:/`.
///
/// The scheme must be purely alphabetic and at least two characters long, so
/// `C:/data.csv` stays a local path.
pub fn is_url(raw: &str) -> bool {
    let mut scheme_len = 0;
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c == ':' {
            return scheme_len >= 2 && chars.next() == Some('/');
        }
        if !c.is_alphabetic() {
            return false;
        }
        scheme_len += 1;
    }

    false
}

/// Resolve a source location into an input provider.
///
/// Local paths and `file:` URLs must name an existing regular file. Other
/// URLs must use `http` or `https`.
pub fn resolve_source(raw: &str) -> Result<Arc<dyn InputProvider>, StageError> {
    let stage = Stage::ResolveSource;
    let location = Location::classify(raw).map_err(|e| StageError::new(stage, raw, e))?;

    match location {
        Location::Stdio => Ok(Arc::new(StdinInput::new())),
        Location::Url(url) if url.scheme() == "file" => source_file(raw, file_url_path(stage, raw, &url)?),
        Location::Url(url) => {
            check_network_scheme(stage, raw, &url)?;
            url_input(raw, url)
        }
        Location::File(path) => source_file(raw, path),
    }
}

/// Resolve a target location into an output target.
///
/// Missing parent directories of local paths and `file:` URLs are created;
/// existing file content is left alone until the target is opened.
pub fn resolve_target(raw: &str) -> Result<Arc<dyn OutputTarget>, StageError> {
    let stage = Stage::ResolveTarget;
    let location = Location::classify(raw).map_err(|e| StageError::new(stage, raw, e))?;

    match location {
        Location::Stdio => Ok(Arc::new(StdoutOutput::new())),
        Location::Url(url) if url.scheme() == "file" => target_file(raw, file_url_path(stage, raw, &url)?),
        Location::Url(url) => {
            check_network_scheme(stage, raw, &url)?;
            url_output(raw, url)
        }
        Location::File(path) => target_file(raw, path),
    }
}

fn source_file(raw: &str, path: PathBuf) -> Result<Arc<dyn InputProvider>, StageError> {
    if !path.is_file() {
        return Err(StageError::new(
            Stage::ResolveSource,
            raw,
            format!("File not found: {raw}"),
        ));
    }
    Ok(Arc::new(FileInput::new(path)))
}

fn target_file(raw: &str, path: PathBuf) -> Result<Arc<dyn OutputTarget>, StageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tracing::debug!(dir = %parent.display(), "creating target directory");
            std::fs::create_dir_all(parent)
                .map_err(|e| StageError::new(Stage::ResolveTarget, raw, e))?;
        }
    }
    Ok(Arc::new(FileOutput::new(path)))
}

fn file_url_path(stage: Stage, raw: &str, url: &Url) -> Result<PathBuf, StageError> {
    url.to_file_path()
        .map_err(|()| StageError::new(stage, raw, format!("Not a local file URL: {raw}")))
}

fn check_network_scheme(stage: Stage, raw: &str, url: &Url) -> Result<(), StageError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(StageError::new(
            stage,
            raw,
            format!("Unsupported URL scheme: {other}"),
        )),
    }
}

#[cfg(feature = "http")]
fn url_input(_raw: &str, url: Url) -> Result<Arc<dyn InputProvider>, StageError> {
    Ok(Arc::new(super::UrlInput::new(url)))
}

#[cfg(not(feature = "http"))]
fn url_input(raw: &str, _url: Url) -> Result<Arc<dyn InputProvider>, StageError> {
    Err(StageError::new(
        Stage::ResolveSource,
        raw,
        "network locations require the `http` feature",
    ))
}

#[cfg(feature = "http")]
fn url_output(_raw: &str, url: Url) -> Result<Arc<dyn OutputTarget>, StageError> {
    Ok(Arc::new(super::UrlOutput::new(url)))
}

#[cfg(not(feature = "http"))]
fn url_output(raw: &str, _url: Url) -> Result<Arc<dyn OutputTarget>, StageError> {
    Err(StageError::new(
        Stage::ResolveTarget,
        raw,
        "network locations require the `http` feature",
    ))
}
