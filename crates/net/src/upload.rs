//! Archive delivery with failover across discovered servers

use crate::client::NetClient;
use ferry_config::UploadConfig;
use ferry_errors::{Error, NetworkError};
use ferry_events::{AppEvent, EventEmitter, EventSender, UploadEvent};
use ferry_types::ArchiveArtifact;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::Deserialize;

/// Placeholder in the upload URL template replaced by the server name
const SERVER_PLACEHOLDER: &str = "{server}";

/// Payload status marking an accepted upload
const STATUS_OK: &str = "ok";

/// Ordered upload candidates for a single delivery attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointPool {
    pub servers: Vec<String>,
}

impl EndpointPool {
    #[must_use]
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

/// Result of trying one candidate
#[derive(Debug)]
pub enum CandidateOutcome {
    Link(String),
    Failed(Error),
}

/// Why a delivery produced no link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadFailure {
    /// The discovery request failed, so no candidate was tried
    Discovery { reason: String },
    /// Every candidate was tried and none accepted the archive
    Exhausted { attempted: usize },
}

/// Outcome of a delivery. Never partially populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    Delivered { server: String, link: String },
    Failed(UploadFailure),
}

impl UploadResult {
    /// The retrieval link, if delivery succeeded
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        match self {
            Self::Delivered { link, .. } => Some(link),
            Self::Failed(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DiscoveryResponse {
    #[serde(default)]
    data: DiscoveryData,
}

#[derive(Debug, Default, Deserialize)]
struct DiscoveryData {
    #[serde(default)]
    servers: Vec<ServerEntry>,
    #[serde(default, rename = "serversAllZone")]
    servers_all_zone: Vec<ServerEntry>,
}

#[derive(Debug, Deserialize)]
struct ServerEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    status: String,
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    #[serde(rename = "downloadPage")]
    download_page: Option<String>,
}

/// Uploads an archive to the first discovered server that accepts it
#[derive(Clone)]
pub struct UploadDistributor {
    client: NetClient,
    discovery_url: String,
    url_template: String,
}

impl UploadDistributor {
    #[must_use]
    pub fn new(
        client: NetClient,
        discovery_url: impl Into<String>,
        url_template: impl Into<String>,
    ) -> Self {
        Self {
            client,
            discovery_url: discovery_url.into(),
            url_template: url_template.into(),
        }
    }

    #[must_use]
    pub fn from_config(client: NetClient, config: &UploadConfig) -> Self {
        Self::new(client, &config.discovery_url, &config.url_template)
    }

    /// Upload URL for one candidate server
    #[must_use]
    pub fn upload_url(&self, server: &str) -> String {
        self.url_template.replace(SERVER_PLACEHOLDER, server)
    }

    /// Fetch the candidate pool: `servers` followed by `serversAllZone`,
    /// in listed order, duplicates kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not a success,
    /// or the body is not the expected JSON.
    pub async fn discover(&self) -> Result<EndpointPool, Error> {
        let response = self.client.get(&self.discovery_url).await?;

        if !response.status().is_success() {
            return Err(NetworkError::HttpError {
                status: response.status().as_u16(),
                message: response.status().to_string(),
            }
            .into());
        }

        let body: DiscoveryResponse = response
            .json()
            .await
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;

        let servers = body
            .data
            .servers
            .into_iter()
            .chain(body.data.servers_all_zone)
            .map(|entry| entry.name)
            .collect();

        Ok(EndpointPool { servers })
    }

    /// Deliver the archive.
    ///
    /// Candidates are tried strictly in order and the first link wins. A
    /// failing candidate is reported and skipped. This never returns an
    /// error: every failure ends up in [`UploadResult::Failed`].
    pub async fn upload(&self, archive: ArchiveArtifact, tx: &EventSender) -> UploadResult {
        tx.emit(AppEvent::Upload(UploadEvent::DiscoveryStarted {
            url: self.discovery_url.clone(),
        }));

        let pool = match self.discover().await {
            Ok(pool) => pool,
            Err(e) => {
                tx.emit(AppEvent::Upload(UploadEvent::DiscoveryFailed {
                    url: self.discovery_url.clone(),
                    error: e.to_string(),
                }));
                return UploadResult::Failed(UploadFailure::Discovery {
                    reason: e.to_string(),
                });
            }
        };

        tx.emit(AppEvent::Upload(UploadEvent::PoolDiscovered {
            servers: pool.servers.clone(),
        }));

        for (index, server) in pool.servers.iter().enumerate() {
            let url = self.upload_url(server);
            tx.emit(AppEvent::Upload(UploadEvent::CandidateStarted {
                server: server.clone(),
                attempt: index + 1,
                url: url.clone(),
            }));

            match self.try_candidate(&url, &archive).await {
                CandidateOutcome::Link(link) => {
                    tx.emit(AppEvent::Upload(UploadEvent::Delivered {
                        server: server.clone(),
                        link: link.clone(),
                    }));
                    return UploadResult::Delivered {
                        server: server.clone(),
                        link,
                    };
                }
                CandidateOutcome::Failed(e) => {
                    tx.emit(AppEvent::Upload(UploadEvent::CandidateFailed {
                        server: server.clone(),
                        error: e.to_string(),
                    }));
                }
            }
        }

        tx.emit(AppEvent::Upload(UploadEvent::Exhausted {
            attempted: pool.len(),
        }));
        UploadResult::Failed(UploadFailure::Exhausted {
            attempted: pool.len(),
        })
    }

    /// Stream the archive to one candidate and interpret its reply
    pub async fn try_candidate(&self, url: &str, archive: &ArchiveArtifact) -> CandidateOutcome {
        match self.send_archive(url, archive).await {
            Ok(link) => CandidateOutcome::Link(link),
            Err(e) => CandidateOutcome::Failed(e),
        }
    }

    async fn send_archive(&self, url: &str, archive: &ArchiveArtifact) -> Result<String, Error> {
        let file = tokio::fs::File::open(archive.path())
            .await
            .map_err(|e| Error::io_with_path(&e, archive.path()))?;
        let length = file
            .metadata()
            .await
            .map_err(|e| Error::io_with_path(&e, archive.path()))?
            .len();

        let part = Part::stream_with_length(Body::from(file), length)
            .file_name(archive.file_name())
            .mime_str("application/zip")
            .map_err(|e| NetworkError::RequestFailed(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self.client.post_multipart(url, form).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::HttpError {
                status: status.as_u16(),
                message: status.to_string(),
            }
            .into());
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;

        if body.status != STATUS_OK {
            return Err(
                NetworkError::InvalidResponse(format!("upload status {:?}", body.status)).into(),
            );
        }

        body.data
            .and_then(|data| data.download_page)
            .ok_or_else(|| NetworkError::InvalidResponse("missing downloadPage".to_string()).into())
    }
}
