//! Network locations over HTTP(S).

use std::io::{self, Read, Write};

use url::Url;

use super::{InputProvider, OutputStream, OutputTarget};

/// Input provider that streams the body of an HTTP GET response.
#[derive(Debug, Clone)]
pub struct UrlInput {
    id: String,
    url: Url,
}

impl UrlInput {
    pub fn new(url: Url) -> Self {
        Self {
            id: url.to_string(),
            url,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl InputProvider for UrlInput {
    fn id(&self) -> &str {
        &self.id
    }

    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        let response = reqwest::blocking::get(self.url.clone())
            .and_then(|r| r.error_for_status())
            .map_err(io::Error::other)?;
        Ok(Box::new(response))
    }
}

/// Output target that uploads everything written to it as one HTTP POST body.
///
/// The request is sent when the stream is finished; a stream dropped on an
/// error path sends nothing.
#[derive(Debug, Clone)]
pub struct UrlOutput {
    id: String,
    url: Url,
}

impl UrlOutput {
    pub fn new(url: Url) -> Self {
        Self {
            id: url.to_string(),
            url,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl OutputTarget for UrlOutput {
    fn id(&self) -> &str {
        &self.id
    }

    fn open(&self) -> io::Result<Box<dyn OutputStream>> {
        Ok(Box::new(HttpUpload {
            url: self.url.clone(),
            body: Vec::new(),
        }))
    }
}

struct HttpUpload {
    url: Url,
    body: Vec<u8>,
}

impl Write for HttpUpload {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl OutputStream for HttpUpload {
    fn finish(self: Box<Self>) -> io::Result<()> {
        let HttpUpload { url, body } = *self;
        tracing::debug!(%url, bytes = body.len(), "uploading converted records");
        reqwest::blocking::Client::new()
            .post(url)
            .body(body)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(io::Error::other)?;
        Ok(())
    }
}
