//! Token store: generate once, persist, load thereafter.

use crate::adapters::atomic::write_exclusive;
use crate::domain::error::TokenStoreError;
use crate::domain::token::ApiToken;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

/// Owner read/write only.
const TOKEN_FILE_MODE: u32 = 0o600;

/// Load the token at `path`, creating and persisting a new one if absent.
///
/// An existing file is trusted as-is (surrounding whitespace stripped, no
/// format checks). Any I/O failure is returned; callers treat it as fatal.
pub fn load_or_create(path: &Path) -> Result<ApiToken, TokenStoreError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(loaded(path, &contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => create(path),
        Err(source) => Err(read_error(path, source)),
    }
}

fn loaded(path: &Path, contents: &str) -> ApiToken {
    let token = ApiToken::new(contents.trim());
    if token.is_empty() {
        warn!(path = %path.display(), "Token file is empty; any bearer header with an empty token will be accepted");
    }
    info!(path = %path.display(), "Loaded API token");
    token
}

fn read_error(path: &Path, source: std::io::Error) -> TokenStoreError {
    TokenStoreError::Read {
        path: path.to_path_buf(),
        source,
    }
}

/// Generate and persist a token. Never replaces an existing file: if another
/// process created one first, that token is loaded and returned instead.
fn create(path: &Path) -> Result<ApiToken, TokenStoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| TokenStoreError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let token = ApiToken::generate();
    match write_exclusive(path, token.as_str().as_bytes(), Some(TOKEN_FILE_MODE)) {
        Ok(()) => {
            info!(path = %path.display(), "Generated new API token");
            Ok(token)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            warn!(path = %path.display(), "Token file created concurrently; using the existing token");
            let contents = fs::read_to_string(path).map_err(|source| read_error(path, source))?;
            Ok(loaded(path, &contents))
        }
        Err(source) => Err(TokenStoreError::Write {
            path: path.to_path_buf(),
            source,
        }),
    }
}
