// ABOUTME: Token store backed by a tokens file with one bearer token per line.
// ABOUTME: Tokens are matched verbatim; `#` lines are comments and a failed read leaves the set empty.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::{StoreError, data_lines};

/// An immutable set of accepted tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    tokens: HashSet<String>,
}

impl TokenSet {
    /// Build a token set from raw file contents. Every line that is neither
    /// empty nor a comment is a token, surrounding whitespace included.
    ///
    /// Lines that are not valid UTF-8 can never match a request token; they
    /// are left out and their line numbers returned.
    pub fn parse(contents: &[u8]) -> (Self, Vec<usize>) {
        let mut tokens = HashSet::new();
        let mut rejected = Vec::new();
        for (line_no, line) in data_lines(contents) {
            match line {
                Ok(token) => {
                    tokens.insert(token.to_string());
                }
                Err(_) => rejected.push(line_no),
            }
        }
        (Self { tokens }, rejected)
    }

    /// Read and parse a tokens file, warning about every undecodable line.
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        let contents = tokio::fs::read(path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let (set, rejected) = Self::parse(&contents);
        for line in rejected {
            tracing::warn!(path = %path.display(), line, "skipping token line that is not valid UTF-8");
        }
        Ok(set)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Shared, reloadable token set.
pub struct TokenStore {
    path: PathBuf,
    current: RwLock<Arc<TokenSet>>,
    /// Held across read and swap so reloads install in the order they read.
    reload_lock: Mutex<()>,
}

impl TokenStore {
    /// Create a store for the given tokens file. The store starts empty until
    /// the first `reload`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            current: RwLock::new(Arc::new(TokenSet::default())),
            reload_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the tokens file and install the result as the active set.
    ///
    /// On a read failure the active set becomes empty, so every request is
    /// refused until a later reload succeeds. Returns the number of tokens
    /// loaded.
    pub async fn reload(&self) -> Result<usize, StoreError> {
        let _reloading = self.reload_lock.lock().await;
        let (next, result) = match TokenSet::load(&self.path).await {
            Ok(set) => {
                let count = set.len();
                (set, Ok(count))
            }
            Err(e) => (TokenSet::default(), Err(e)),
        };
        *self.current.write().await = Arc::new(next);
        result
    }

    pub async fn contains(&self, token: &str) -> bool {
        self.current.read().await.contains(token)
    }
}
