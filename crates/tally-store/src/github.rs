use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tally_types::LedgerDocument;

use crate::error::{StoreError, StoreResult};
use crate::traits::{DocumentStore, StoredDocument};

/// Public GitHub REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Where the ledger file lives inside a GitHub repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GithubLocation {
    pub owner: String,
    pub repo: String,
    pub path: String,
}

impl GithubLocation {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            path: path.into(),
        }
    }

    /// Contents API URL for this file under `api_base`.
    pub fn contents_url(&self, api_base: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            api_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.path.trim_start_matches('/'),
        )
    }
}

/// Document store backed by a file in a GitHub repository.
///
/// Every save is a commit made through the contents API. The blob `sha`
/// returned on load is the revision token; GitHub refuses a write whose `sha`
/// no longer matches the file, which surfaces as [`StoreError::Conflict`].
pub struct GithubDocumentStore {
    client: Client,
    location: GithubLocation,
    contents_url: String,
    token: String,
}

#[derive(Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

#[derive(Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Deserialize)]
struct PutContentsResponse {
    content: PutContentsEntry,
}

#[derive(Deserialize)]
struct PutContentsEntry {
    sha: String,
}

impl GithubDocumentStore {
    pub fn new(location: GithubLocation, token: impl Into<String>) -> StoreResult<Self> {
        Self::with_api_base(DEFAULT_API_BASE, location, token)
    }

    /// Point the store at a non-default API host (GitHub Enterprise, tests).
    pub fn with_api_base(
        api_base: &str,
        location: GithubLocation,
        token: impl Into<String>,
    ) -> StoreResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("tally/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let contents_url = location.contents_url(api_base);
        Ok(Self {
            client,
            location,
            contents_url,
            token: token.into(),
        })
    }

    pub fn location(&self) -> &GithubLocation {
        &self.location
    }

    fn auth_header(&self) -> String {
        format!("token {}", self.token)
    }
}

#[async_trait]
impl DocumentStore for GithubDocumentStore {
    async fn load(&self) -> StoreResult<StoredDocument> {
        let response = self
            .client
            .get(&self.contents_url)
            .header(AUTHORIZATION, self.auth_header())
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "GitHub load error");
            return Err(StoreError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let contents: ContentsResponse = response.json().await?;
        let bytes = decode_content(&contents.content)?;
        let document = LedgerDocument::from_json(&bytes)?;
        tracing::debug!(sha = %contents.sha, items = document.item_count(), "loaded document from GitHub");
        Ok(StoredDocument::new(document, Some(contents.sha)))
    }

    async fn save(
        &self,
        document: &LedgerDocument,
        revision: Option<&str>,
        message: &str,
    ) -> StoreResult<Option<String>> {
        let body = PutContentsRequest {
            message,
            content: encode_content(document)?,
            sha: revision,
        };

        let response = self
            .client
            .put(&self.contents_url)
            .header(AUTHORIZATION, self.auth_header())
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            tracing::error!(sha = ?revision, "GitHub save conflict");
            return Err(StoreError::Conflict {
                expected: revision.map(str::to_owned),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "GitHub save error");
            return Err(StoreError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let new_sha = match response.json::<PutContentsResponse>().await {
            Ok(body) => Some(body.content.sha),
            Err(e) => {
                tracing::warn!(error = %e, "GitHub save response unreadable, new sha unknown");
                None
            }
        };
        tracing::debug!(sha = ?new_sha, commit = message, "saved document to GitHub");
        Ok(new_sha)
    }

    fn describe(&self) -> String {
        format!(
            "github:{}/{}/{}",
            self.location.owner, self.location.repo, self.location.path
        )
    }
}

impl std::fmt::Debug for GithubDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubDocumentStore")
            .field("location", &self.location)
            .field("contents_url", &self.contents_url)
            .finish_non_exhaustive()
    }
}

/// Decode the contents API payload. GitHub wraps base64 at 60 columns.
fn decode_content(encoded: &str) -> StoreResult<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| StoreError::Encoding(e.to_string()))
}

fn encode_content(document: &LedgerDocument) -> StoreResult<String> {
    Ok(STANDARD.encode(document.to_json_pretty()?))
}
