use std::sync::Arc;

use hlshash_engine::{
    ArtifactKind, ConverterConfig, HttpPutSink, OnEvent, PlaylistConverter, create_client,
};
use reqwest::header::HeaderMap;
use tracing::info;
use url::Url;

use super::attach_events;
use crate::error::AppError;
use crate::output::ReportingSink;

/// Convert the tree at `input`, upload every artifact below `server` and
/// return the URL of the root playlist. `upload_headers` are sent to
/// `server` only.
pub async fn run_upload(
    input: &str,
    server: &str,
    config: ConverterConfig,
    upload_headers: HeaderMap,
    on_event: Option<OnEvent>,
) -> Result<Url, AppError> {
    let base = Url::parse(server)
        .map_err(|e| AppError::InvalidInput(format!("Invalid server URL '{server}': {e}")))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(AppError::InvalidInput(format!(
            "Server must be an http(s) URL: {server}"
        )));
    }

    // One connection pool; credentials are attached per upload request
    let client = create_client(&config)?;
    let converter = attach_events(PlaylistConverter::with_client(config, client.clone()), on_event);
    let store = Arc::new(HttpPutSink::new(client, base).with_headers(upload_headers));
    let sink = ReportingSink::new(
        store.clone(),
        Box::new(|path: &str, len: usize| info!("Uploaded {} ({} bytes)", path, len)),
    );

    let hash = converter.convert(input, &sink).await?;
    let url = store
        .url_for(&hash.file_name(ArtifactKind::Playlist))
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    println!("Uploaded HLS playlists, open {url}");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_upload_tree() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/media/[0-9a-f]{64}\.(ts|m3u8)$"))
            .respond_with(ResponseTemplate::new(201))
            .expect(3)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let media = "#EXTM3U\n#EXT-X-TARGETDURATION:4\n#EXTINF:4.0,\na.ts\n#EXTINF:4.0,\nb.ts\n";
        std::fs::write(dir.path().join("index.m3u8"), media).unwrap();
        std::fs::write(dir.path().join("a.ts"), b"a").unwrap();
        std::fs::write(dir.path().join("b.ts"), b"b").unwrap();

        let url = run_upload(
            dir.path().join("index.m3u8").to_str().unwrap(),
            &format!("{}/media", server.uri()),
            ConverterConfig::default(),
            HeaderMap::new(),
            None,
        )
        .await
        .unwrap();

        assert!(url.as_str().starts_with(&format!("{}/media/", server.uri())));
        assert!(url.as_str().ends_with(".m3u8"));
    }

    #[tokio::test]
    async fn test_upload_credentials_stay_with_the_upload_server() {
        let origin = MockServer::start().await;
        let media = "#EXTM3U\n#EXT-X-TARGETDURATION:4\n#EXTINF:4.0,\na.ts\n";
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer upload-secret"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&origin)
            .await;
        Mock::given(method("GET"))
            .and(path("/live/index.m3u8"))
            .respond_with(ResponseTemplate::new(200).set_body_string(media))
            .expect(1)
            .mount(&origin)
            .await;
        Mock::given(method("GET"))
            .and(path("/live/a.ts"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"a".to_vec()))
            .expect(1)
            .mount(&origin)
            .await;

        let store = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(header("authorization", "Bearer upload-secret"))
            .respond_with(ResponseTemplate::new(201))
            .expect(2)
            .mount(&store)
            .await;

        let mut upload_headers = HeaderMap::new();
        upload_headers.insert("authorization", "Bearer upload-secret".parse().unwrap());

        run_upload(
            &format!("{}/live/index.m3u8", origin.uri()),
            &store.uri(),
            ConverterConfig::default(),
            upload_headers,
            None,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_rejects_non_http_server() {
        let err = run_upload(
            "index.m3u8",
            "ftp://store.example.com",
            ConverterConfig::default(),
            HeaderMap::new(),
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
