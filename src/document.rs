//! Markdown documents with a YAML front matter block.
//!
//! ```text
//! ---
//! title: My post
//! tags: [rust, cli]
//! ---
//! Body in Markdown...
//! ```
//!
//! Only `title` and `tags` are read from the block. A file that does not
//! start with a `---` line has no metadata and is all body.

use serde::Deserialize;
use std::path::{Path, PathBuf};

const DELIMITER: &str = "---";

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    #[error("Front matter block is not closed by a `---` line")]
    Unterminated,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub tags: Vec<String>,
    /// Markdown body, verbatim
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontMatter {
    title: String,
    tags: Vec<String>,
}

impl Document {
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let Some((block, body)) = split_front_matter(text)? else {
            log::debug!("no front matter block found");
            return Ok(Document {
                content: text.to_string(),
                ..Document::default()
            });
        };

        let meta: FrontMatter = if block.trim().is_empty() {
            FrontMatter::default()
        } else {
            serde_yaml::from_str(block)?
        };

        Ok(Document {
            title: meta.title,
            tags: meta.tags,
            content: body.to_string(),
        })
    }
}

// Returns (block, body) when the text opens with a delimiter line.
fn split_front_matter(text: &str) -> Result<Option<(&str, &str)>, DocumentError> {
    let mut lines = text.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return Ok(None);
    };
    if !is_delimiter(first) {
        return Ok(None);
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if is_delimiter(line) {
            return Ok(Some((&text[start..offset], &text[offset + line.len()..])));
        }
        offset += line.len();
    }

    Err(DocumentError::Unterminated)
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']) == DELIMITER
}
