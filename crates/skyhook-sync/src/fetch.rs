//! Streamed archive download.

use std::io;
use std::path::PathBuf;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::info;

use skyhook_core::config::Config;

/// Transient name of the downloaded archive inside staging.
pub const ARCHIVE_FILE_NAME: &str = "bundle.zip";

const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = "skyhook-updater";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error fetching the bundle archive")]
    Network(#[source] reqwest::Error),

    #[error("bundle endpoint rejected the credential ({status})")]
    Auth { status: StatusCode },

    #[error("bundle endpoint returned {status}")]
    Status { status: StatusCode },

    #[error("failed to write the archive to {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Download the bundle archive into the staging directory and return its
/// path.
///
/// The response body is streamed chunk by chunk straight to disk; the
/// bundle can be arbitrarily large and must never be held in memory. The
/// download only counts as complete once the destination file has been
/// flushed. On error the partial file is left behind in staging; callers
/// must not proceed past a failed fetch.
pub async fn fetch(cfg: &Config) -> Result<PathBuf, FetchError> {
    let url = format!(
        "{}/repos/{}/{}/zipball/{}",
        cfg.api_base.trim_end_matches('/'),
        cfg.bundle.owner,
        cfg.bundle.name,
        cfg.bundle.branch
    );

    info!(branch = %cfg.bundle.branch, "fetching latest bundle build");

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(FetchError::Network)?;

    let resp = client
        .get(&url)
        .header(AUTHORIZATION, format!("token {}", cfg.token))
        .header(ACCEPT, ACCEPT_HEADER)
        .send()
        .await
        .map_err(FetchError::Network)?;

    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(FetchError::Auth { status });
    }
    if !status.is_success() {
        return Err(FetchError::Status { status });
    }

    let archive_path = cfg.staging_dir.join(ARCHIVE_FILE_NAME);
    let io_err = |source| FetchError::Io {
        path: archive_path.clone(),
        source,
    };

    let mut out = tokio::fs::File::create(&archive_path)
        .await
        .map_err(io_err)?;

    let mut stream = resp.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        out.write_all(&chunk).await.map_err(io_err)?;
    }
    out.flush().await.map_err(io_err)?;

    info!("bundle archive downloaded");
    Ok(archive_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyhook_core::config::BundleDescriptor;
    use std::path::Path;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(api_base: String, staging: &Path) -> Config {
        Config {
            token: "t0k3n".into(),
            bundle: BundleDescriptor {
                owner: "acme".into(),
                name: "widget".into(),
                branch: "main".into(),
            },
            api_base,
            staging_dir: staging.to_path_buf(),
            target_dir: staging.join("widget-main"),
            overlay_source: staging.join("config.js"),
            overlay_file: "config.js".into(),
            runner: "node".into(),
            entry_point: "index.js".into(),
        }
    }

    #[tokio::test]
    async fn streams_archive_to_staging() {
        let server = MockServer::start().await;
        let body: Vec<u8> = (0..64 * 1024).map(|i| (i % 251) as u8).collect();
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/zipball/main"))
            .and(header("authorization", "token t0k3n"))
            .and(header("accept", ACCEPT_HEADER))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let cfg = test_config(server.uri(), tmp.path());

        let archive = fetch(&cfg).await.unwrap();

        assert_eq!(archive, tmp.path().join(ARCHIVE_FILE_NAME));
        assert_eq!(std::fs::read(&archive).unwrap(), body);
    }

    #[tokio::test]
    async fn rejected_credential_is_an_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let cfg = test_config(server.uri(), tmp.path());

        let err = fetch(&cfg).await.unwrap_err();
        match err {
            FetchError::Auth { status } => assert_eq!(status, StatusCode::UNAUTHORIZED),
            other => panic!("expected an auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_ref_is_a_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let cfg = test_config(server.uri(), tmp.path());

        let err = fetch(&cfg).await.unwrap_err();
        match err {
            FetchError::Status { status } => assert_eq!(status, StatusCode::NOT_FOUND),
            other => panic!("expected a status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let tmp = tempfile::tempdir().unwrap();
        // Nothing listens on port 1.
        let cfg = test_config("http://127.0.0.1:1".into(), tmp.path());

        let err = fetch(&cfg).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}
