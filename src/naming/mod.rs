pub mod parser;
pub mod render;
pub mod splitter;

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub use parser::{FeaturingMode, Layout, ParseOptions, Parser, ReleaseBound};
pub use render::{join_credits, render};
pub use splitter::ArtistSplitter;

/// Separator between the artist and title regions of a release filename.
pub const SEPARATOR: &str = " - ";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Artist-title separator not found: {name}")]
    MissingSeparator { name: String },
    #[error("No artists before the featuring clause: {name}")]
    NoArtists { name: String },
    #[error("Featuring clause is never closed: {name}")]
    UnclosedFeaturing { name: String },
}

/// Structured credits parsed from a release filename.
///
/// `PartialEq` compares every field. Catalog lookups only care about the
/// primary artists and title; use [`ParsedName::same_credit`] for that.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ParsedName {
    pub artists: Vec<String>,
    pub title: String,
    pub featuring: Vec<String>,
    /// Verbatim "(...)" run, parentheses included. Empty when absent.
    pub remix_tag: String,
    /// Verbatim "[...]" run, brackets included. Empty when absent.
    pub release_tag: String,
}

impl ParsedName {
    /// Same primary artists (in order) and same title.
    pub fn same_credit(&self, other: &ParsedName) -> bool {
        self.artists == other.artists && self.title == other.title
    }

    /// Everyone credited on the track: primary artists, then featured ones.
    pub fn performers(&self) -> Vec<String> {
        self.artists
            .iter()
            .chain(self.featuring.iter())
            .cloned()
            .collect()
    }

    /// Title as written into audio tags: "Title (Remix) [Release]".
    pub fn tag_title(&self) -> String {
        let mut title = self.title.clone();
        for tag in [&self.remix_tag, &self.release_tag] {
            if !tag.trim().is_empty() {
                title.push(' ');
                title.push_str(tag);
            }
        }
        title
    }

    /// Case-insensitive title match plus case-insensitive, order-independent
    /// artist set match against a catalog entry.
    pub fn matches_catalog<S: AsRef<str>>(&self, title: &str, artists: &[S]) -> bool {
        if self.title.to_lowercase() != title.to_lowercase() {
            return false;
        }
        let ours: HashSet<String> = self.artists.iter().map(|a| a.to_lowercase()).collect();
        let theirs: HashSet<String> = artists.iter().map(|a| a.as_ref().to_lowercase()).collect();
        ours == theirs
    }

    /// Directory a file is filed under: the first primary artist.
    pub fn lead_artist(&self) -> Option<&str> {
        self.artists.first().map(String::as_str)
    }
}

impl fmt::Display for ParsedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}
