// ABOUTME: In-memory configuration stores for myipd, loaded from plain-text files.
// ABOUTME: Each store swaps in a fully built snapshot on reload so readers never see partial state.

pub mod extras;
pub mod tokens;

use std::path::PathBuf;
use std::str::Utf8Error;

use thiserror::Error;

pub use extras::{ExtrasStore, load_extras, parse_extras};
pub use tokens::{TokenSet, TokenStore};

/// Errors that can occur while reading a configuration file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Lines starting with `#` are comments in both config files.
fn is_comment(line: &[u8]) -> bool {
    line.starts_with(b"#")
}

/// Split raw file contents into the lines that carry data, with their 1-based
/// line numbers. Lines end at `\n` with an optional `\r` before it. Empty and
/// comment lines are dropped before decoding, so a stray non-UTF-8 byte only
/// affects the line it sits on.
pub(crate) fn data_lines(
    contents: &[u8],
) -> impl Iterator<Item = (usize, Result<&str, Utf8Error>)> {
    contents
        .split(|b| *b == b'\n')
        .enumerate()
        .filter_map(|(idx, line)| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.is_empty() || is_comment(line) {
                return None;
            }
            Some((idx + 1, std::str::from_utf8(line)))
        })
}
