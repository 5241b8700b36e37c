//! Publish Markdown documents with YAML front matter to Medium as drafts.

pub mod api;
pub mod commands;
pub mod config;
pub mod document;
pub mod util;
