//! Output target trait definition.

use std::fmt::Debug;
use std::io::{BufWriter, Write};

/// A writable stream returned by an [`OutputTarget`].
///
/// Dropping the stream only flushes on a best-effort basis and ignores any
/// error; call [`OutputStream::finish`] on the success path to commit and
/// observe failures. Streams that commit on finish, such as an HTTP upload,
/// send nothing when dropped.
pub trait OutputStream: Write + Send {
    /// Flush and commit everything written so far, then release the stream.
    fn finish(mut self: Box<Self>) -> std::io::Result<()> {
        self.flush()
    }
}

impl<W: Write + Send> OutputStream for BufWriter<W> {}

/// Trait for synchronous output targets.
///
/// Implementors provide a way to open a writable stream to various destinations
/// such as files, stdout, network endpoints, or in-memory buffers.
pub trait OutputTarget: Send + Sync + Debug {
    /// Returns a unique identifier for this output target.
    ///
    /// This is used for error messages and logging.
    /// Convention: "-" for stdout, file path for files, the URL for network targets.
    fn id(&self) -> &str;

    /// Open the target for writing, replacing any existing content.
    fn open(&self) -> std::io::Result<Box<dyn OutputStream>>;
}
