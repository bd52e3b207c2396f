//! Local endpoints: the process's standard streams and filesystem paths.

use std::fs::File;
use std::io::{self, BufWriter, Read};
use std::path::{Path, PathBuf};

use super::{InputProvider, OutputStream, OutputTarget, STDIO_MARKER};

/// Records read from the process's standard input, named `-`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinInput;

impl StdinInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputProvider for StdinInput {
    fn id(&self) -> &str {
        STDIO_MARKER
    }

    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(io::stdin()))
    }
}

/// Records written to the process's standard output, named `-`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutOutput;

impl StdoutOutput {
    pub fn new() -> Self {
        Self
    }
}

impl OutputTarget for StdoutOutput {
    fn id(&self) -> &str {
        STDIO_MARKER
    }

    fn open(&self) -> io::Result<Box<dyn OutputStream>> {
        Ok(Box::new(BufWriter::new(io::stdout())))
    }
}

/// A filesystem path together with the name it is reported under.
#[derive(Debug, Clone)]
struct LocalPath {
    path: PathBuf,
    shown: String,
}

impl From<PathBuf> for LocalPath {
    fn from(path: PathBuf) -> Self {
        let shown = path.display().to_string();
        Self { path, shown }
    }
}

/// A source file. Existence is checked by
/// [`resolve_source`](super::resolve_source); opening fails if it has
/// disappeared since.
#[derive(Debug, Clone)]
pub struct FileInput(LocalPath);

impl FileInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(LocalPath::from(path.into()))
    }

    pub fn path(&self) -> &Path {
        &self.0.path
    }
}

impl InputProvider for FileInput {
    fn id(&self) -> &str {
        &self.0.shown
    }

    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        tracing::trace!(path = %self.0.shown, "opening source file");
        File::open(self.path()).map(|file| Box::new(file) as Box<dyn Read + Send>)
    }
}

/// A target file, truncated when opened.
///
/// The parent directory must already exist; the location resolver creates it.
#[derive(Debug, Clone)]
pub struct FileOutput(LocalPath);

impl FileOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(LocalPath::from(path.into()))
    }

    pub fn path(&self) -> &Path {
        &self.0.path
    }
}

impl OutputTarget for FileOutput {
    fn id(&self) -> &str {
        &self.0.shown
    }

    fn open(&self) -> io::Result<Box<dyn OutputStream>> {
        tracing::trace!(path = %self.0.shown, "creating target file");
        let file = File::create(self.path())?;
        Ok(Box::new(BufWriter::new(file)))
    }
}
