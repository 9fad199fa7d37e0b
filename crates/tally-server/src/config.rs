use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tally_ledger::COOLDOWN_WINDOW_MS;
use tally_store::{
    DocumentStore, FileDocumentStore, GithubDocumentStore, GithubLocation,
    InMemoryDocumentStore, DEFAULT_API_BASE,
};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub enable_cors: bool,
    pub cooldown_ms: u64,
    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            enable_cors: true,
            cooldown_ms: COOLDOWN_WINDOW_MS,
            store: StoreConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read a TOML config file.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> ServerResult<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`.
    ///
    /// `PORT` replaces the bind port. `GITHUB_TOKEN`, `GITHUB_OWNER`,
    /// `GITHUB_REPO` and `VOTES_PATH` together select the GitHub backend;
    /// `VOTES_PATH` alone moves a local store.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> ServerResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|e| ServerError::Config(format!("invalid PORT {port:?}: {e}")))?;
            self.bind_addr.set_port(port);
        }

        let token = lookup("GITHUB_TOKEN");
        let owner = lookup("GITHUB_OWNER");
        let repo = lookup("GITHUB_REPO");
        let votes_path = lookup("VOTES_PATH");

        match (token, owner, repo, votes_path) {
            (Some(token), Some(owner), Some(repo), Some(path)) => {
                let api_base = match &self.store {
                    StoreConfig::Github { api_base, .. } => api_base.clone(),
                    _ => None,
                };
                self.store = StoreConfig::Github {
                    owner,
                    repo,
                    path,
                    token,
                    api_base,
                };
            }
            (_, _, _, Some(path)) => {
                if let StoreConfig::Local { path: local } = &mut self.store {
                    *local = PathBuf::from(path);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Where the ledger document is kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    Memory,
    Local {
        #[serde(default = "default_votes_path")]
        path: PathBuf,
    },
    Github {
        owner: String,
        repo: String,
        path: String,
        token: String,
        #[serde(default)]
        api_base: Option<String>,
    },
}

fn default_votes_path() -> PathBuf {
    PathBuf::from("votes.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Local {
            path: default_votes_path(),
        }
    }
}

impl StoreConfig {
    /// Construct the configured backend.
    pub fn open(&self) -> ServerResult<Arc<dyn DocumentStore>> {
        let store: Arc<dyn DocumentStore> = match self {
            Self::Memory => Arc::new(InMemoryDocumentStore::new()),
            Self::Local { path } => Arc::new(FileDocumentStore::new(path)),
            Self::Github {
                owner,
                repo,
                path,
                token,
                api_base,
            } => {
                if token.is_empty() {
                    return Err(ServerError::Config("github backend requires a token".into()));
                }
                let location = GithubLocation::new(owner, repo, path);
                let base = api_base.as_deref().unwrap_or(DEFAULT_API_BASE);
                Arc::new(GithubDocumentStore::with_api_base(base, location, token.clone())?)
            }
        };
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert!(c.enable_cors);
        assert_eq!(c.cooldown_ms, 2_592_000_000);
        assert_eq!(
            c.store,
            StoreConfig::Local {
                path: PathBuf::from("votes.json")
            }
        );
    }

    #[test]
    fn parses_toml() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "127.0.0.1:8080"
            enable_cors = false

            [store]
            backend = "github"
            owner = "acme"
            repo = "site"
            path = "data/votes.json"
            token = "t"
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
        assert!(!c.enable_cors);
        assert_eq!(c.cooldown_ms, COOLDOWN_WINDOW_MS);
        assert!(matches!(c.store, StoreConfig::Github { ref owner, .. } if owner == "acme"));
    }

    #[test]
    fn local_store_path_defaults() {
        let c = ServerConfig::from_toml_str("[store]\nbackend = \"local\"\n").unwrap();
        assert_eq!(c.store, StoreConfig::default());
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = ServerConfig::from_toml_str("[store]\nbackend = \"s3\"\n").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn env_port_override() {
        let mut c = ServerConfig::default();
        c.apply_env_from(env(&[("PORT", "8123")])).unwrap();
        assert_eq!(c.bind_addr.port(), 8123);

        let err = c.apply_env_from(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn env_selects_github_backend() {
        let mut c = ServerConfig::default();
        c.apply_env_from(env(&[
            ("GITHUB_TOKEN", "tok"),
            ("GITHUB_OWNER", "acme"),
            ("GITHUB_REPO", "site"),
            ("VOTES_PATH", "votes.json"),
        ]))
        .unwrap();
        assert_eq!(
            c.store,
            StoreConfig::Github {
                owner: "acme".into(),
                repo: "site".into(),
                path: "votes.json".into(),
                token: "tok".into(),
                api_base: None,
            }
        );
    }

    #[test]
    fn env_votes_path_moves_local_store() {
        let mut c = ServerConfig::default();
        c.apply_env_from(env(&[("VOTES_PATH", "/data/v.json")])).unwrap();
        assert_eq!(
            c.store,
            StoreConfig::Local {
                path: PathBuf::from("/data/v.json")
            }
        );
    }

    #[test]
    fn github_without_token_is_rejected() {
        let store = StoreConfig::Github {
            owner: "o".into(),
            repo: "r".into(),
            path: "p".into(),
            token: String::new(),
            api_base: None,
        };
        assert!(matches!(store.open(), Err(ServerError::Config(_))));
    }

    #[test]
    fn opens_each_backend() {
        assert_eq!(StoreConfig::Memory.open().unwrap().describe(), "memory");
        assert_eq!(
            StoreConfig::default().open().unwrap().describe(),
            "file:votes.json"
        );
    }
}
