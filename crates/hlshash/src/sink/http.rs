//! # HTTP PUT Sink
//!
//! Uploads each artifact with `PUT {base_url}{path}` to a plain HTTP object
//! store. Upload credentials belong in [`HttpPutSink::with_headers`], which
//! only applies them to uploads, never to reads sharing the same client.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use tracing::debug;
use url::Url;

use super::provider::{Sink, SinkError, validate_relative_path};
use crate::hash::ArtifactKind;

/// Longest response body kept in a rejection error
const MAX_ERROR_BODY: usize = 256;

#[derive(Debug, Clone)]
pub struct HttpPutSink {
    client: Client,
    base_url: Url,
    headers: HeaderMap,
}

impl HttpPutSink {
    pub fn new(client: Client, mut base_url: Url) -> Self {
        // Treat the base as a directory so joins append rather than replace
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            client,
            base_url,
            headers: HeaderMap::new(),
        }
    }

    /// Headers sent with every upload request, e.g. `Authorization`
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Public URL of an artifact once uploaded
    pub fn url_for(&self, path: &str) -> Result<Url, SinkError> {
        self.base_url
            .join(path)
            .map_err(|e| SinkError::InvalidPath(format!("{path}: {e}")))
    }
}

#[async_trait]
impl Sink for HttpPutSink {
    async fn write(&self, path: &str, content: Bytes) -> Result<(), SinkError> {
        validate_relative_path(path)?;
        let url = self.url_for(path)?;
        let len = content.len();

        let mut request = self
            .client
            .put(url.clone())
            .headers(self.headers.clone())
            .body(content);
        if let Some(kind) = ArtifactKind::from_path(path) {
            request = request.header(CONTENT_TYPE, kind.content_type());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(SinkError::Rejected { status, body });
        }

        debug!("Uploaded {} bytes to {}", len, url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConverterConfig, create_client};
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_base_url_is_treated_as_directory() {
        let client = create_client(&ConverterConfig::default()).unwrap();
        let base = Url::parse("https://store.example.com/bucket").unwrap();
        let sink = HttpPutSink::new(client, base);
        assert_eq!(sink.base_url().as_str(), "https://store.example.com/bucket/");
        assert_eq!(
            sink.url_for("abc.ts").unwrap().as_str(),
            "https://store.example.com/bucket/abc.ts"
        );
    }

    #[tokio::test]
    async fn test_put_with_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/media/abc.m3u8"))
            .and(header("content-type", "application/vnd.apple.mpegurl"))
            .and(body_bytes(b"#EXTM3U\n".to_vec()))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_client(&ConverterConfig::default()).unwrap();
        let base = Url::parse(&format!("{}/media", server.uri())).unwrap();
        let sink = HttpPutSink::new(client, base);

        sink.write("abc.m3u8", Bytes::from_static(b"#EXTM3U\n"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_upload_headers_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/abc.ts"))
            .and(header("authorization", "Bearer upload-secret"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer upload-secret".parse().unwrap());
        let client = create_client(&ConverterConfig::default()).unwrap();
        let sink = HttpPutSink::new(client, Url::parse(&server.uri()).unwrap()).with_headers(headers);

        sink.write("abc.ts", Bytes::from_static(b"data")).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_upload() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(413).set_body_string("too large"))
            .mount(&server)
            .await;

        let client = create_client(&ConverterConfig::default()).unwrap();
        let sink = HttpPutSink::new(client, Url::parse(&server.uri()).unwrap());

        let err = sink
            .write("abc.ts", Bytes::from_static(b"data"))
            .await
            .unwrap_err();
        match err {
            SinkError::Rejected { status, body } => {
                assert_eq!(status.as_u16(), 413);
                assert_eq!(body, "too large");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
