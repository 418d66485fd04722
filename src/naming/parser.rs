use serde::{Deserialize, Serialize};

use super::{ArtistSplitter, FormatError, ParsedName, SEPARATOR};
use crate::aliases::AliasTable;

/// Which side of the separator holds the artists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// "Artists - Title"
    #[default]
    Standard,
    /// "Title - Artists", with "feat"/"ft" written without the dot.
    TitleFirst,
}

impl Layout {
    /// Featuring tokens, in scan order.
    fn featuring_tokens(self) -> &'static [&'static str] {
        match self {
            Self::Standard => &["feat.", "ft."],
            Self::TitleFirst => &["feat", "ft"],
        }
    }
}

/// How featuring clauses are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeaturingMode {
    /// Bare "ft. x" and "(ft. x)" both count; an unclosed clause ends at the
    /// next tag or the end of the name.
    #[default]
    Tolerant,
    /// Only "(ft. x)" counts, and it must be closed before any tag starts.
    Strict,
}

/// Where the closing `]` of the release tag is searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseBound {
    /// After the release tag's own `[`.
    #[default]
    Independent,
    /// After the remix tag's `(`, as older normalized libraries were produced.
    /// A bracket group written before the parentheses is dropped.
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub layout: Layout,
    pub featuring: FeaturingMode,
    pub release_bound: ReleaseBound,
}

/// Byte span of a featuring clause plus the artists it credits.
/// `end` is one past the clause, where tag scanning resumes.
#[derive(Debug)]
struct Clause {
    begin: usize,
    end: usize,
    artists: Vec<String>,
}

/// Half-open byte span of a remix or release tag.
#[derive(Debug, Clone, Copy)]
struct Span {
    begin: usize,
    end: usize,
}

/// Release filename grammar:
/// `<artists> [ft. <featuring>] - <title> [(ft. <featuring>)] [(<remix>)...] [[<release>]...]`
///
/// Regions are located independently by substring search and the title is
/// whatever precedes the first of them. Every search works on ASCII bytes, so
/// all indices fall on char boundaries.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    splitter: ArtistSplitter,
    options: ParseOptions,
}

impl Parser {
    pub fn new(aliases: AliasTable, options: ParseOptions) -> Self {
        Self {
            splitter: ArtistSplitter::new(aliases),
            options,
        }
    }

    pub fn splitter(&self) -> &ArtistSplitter {
        &self.splitter
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Parse a filename with its extension already removed.
    pub fn parse(&self, file_stem: &str) -> Result<ParsedName, FormatError> {
        let (left, right) =
            file_stem
                .split_once(SEPARATOR)
                .ok_or_else(|| FormatError::MissingSeparator {
                    name: file_stem.to_string(),
                })?;
        let (artists_region, title_region) = match self.options.layout {
            Layout::Standard => (left, right),
            Layout::TitleFirst => (right, left),
        };

        let front = self.find_featuring(artists_region, file_stem)?;
        let artists_region = match &front {
            Some(clause) => artists_region[..clause.begin].trim_end(),
            None => artists_region,
        };
        let artists = self.splitter.split(artists_region);
        if artists.is_empty() {
            return Err(FormatError::NoArtists {
                name: file_stem.to_string(),
            });
        }
        log::trace!("Artists: {}", artists.join("; "));
        log::trace!("Name: {}", title_region);

        let back = self.find_featuring(title_region, file_stem)?;
        let scan_from = back.as_ref().map_or(0, |c| c.end);

        let remix_open = find_from(title_region, scan_from, b'(');
        let remix = remix_open.and_then(|begin| close_tag(title_region, begin, begin + 1, b')'));

        let release = find_from(title_region, scan_from, b'[').and_then(|begin| {
            let window = match self.options.release_bound {
                ReleaseBound::Independent => begin + 1,
                ReleaseBound::Legacy => remix_open.map_or(0, |r| r + 1),
            };
            close_tag(title_region, begin, window, b']')
        });

        // A clause opening the title region precedes the title instead of cutting it.
        let title_start = back.as_ref().filter(|c| c.begin == 0).map_or(0, |c| c.end);
        let title_end = [
            back.as_ref().map(|c| c.begin).filter(|&b| b > 0),
            remix.map(|s| s.begin),
            release.map(|s| s.begin),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(title_region.len())
        .max(title_start);

        let mut featuring = front.map(|c| c.artists).unwrap_or_default();
        if let Some(back) = back {
            featuring.extend(back.artists);
        }

        let parsed = ParsedName {
            artists,
            title: title_region[title_start..title_end].trim().to_string(),
            featuring,
            remix_tag: remix.map_or_else(String::new, |s| title_region[s.begin..s.end].to_string()),
            release_tag: release.map_or_else(String::new, |s| title_region[s.begin..s.end].to_string()),
        };
        log::debug!("Parsed {:?} -> {:?}", file_stem, parsed);
        Ok(parsed)
    }

    /// Collect every featuring clause in a region. Tokens are tried in order;
    /// the merged clause spans from the earliest begin to the latest end.
    fn find_featuring(&self, region: &str, file_stem: &str) -> Result<Option<Clause>, FormatError> {
        let lower = region.to_ascii_lowercase();
        let bytes = region.as_bytes();
        let mut merged: Option<Clause> = None;

        for token in self.options.layout.featuring_tokens() {
            let Some(at) = self.find_token(&lower, token) else {
                continue;
            };
            let begin = if bytes[at - 1] == b'(' { at - 1 } else { at };
            let mut start = at + token.len();
            if !token.ends_with('.') && bytes.get(start) == Some(&b'.') {
                start += 1;
            }

            let end = self.clause_end(region, start).ok_or_else(|| FormatError::UnclosedFeaturing {
                name: file_stem.to_string(),
            })?;
            let artists = self.splitter.split(&region[start..end]);
            let resume = (end + 1).min(region.len());

            match merged.as_mut() {
                Some(clause) => {
                    clause.begin = clause.begin.min(begin);
                    clause.end = clause.end.max(resume);
                    clause.artists.extend(artists);
                }
                None => {
                    merged = Some(Clause {
                        begin,
                        end: resume,
                        artists,
                    })
                }
            }
        }

        Ok(merged)
    }

    /// First occurrence of `token` that opens a clause. Never at index 0; must
    /// follow "(" (or whitespace, when tolerant). Dotless tokens must also be
    /// followed by "." or whitespace so that words like "after" don't match.
    ///
    /// This is stricter than a plain "anywhere but index 0" scan: a token glued
    /// to the previous word, as in "Left." or "Swift.", is part of that word.
    fn find_token(&self, lower: &str, token: &str) -> Option<usize> {
        let bytes = lower.as_bytes();
        lower.match_indices(token).map(|(i, _)| i).find(|&i| {
            if i == 0 {
                return false;
            }
            let prev = bytes[i - 1];
            let opens = match self.options.featuring {
                FeaturingMode::Strict => prev == b'(',
                FeaturingMode::Tolerant => prev == b'(' || prev.is_ascii_whitespace(),
            };
            let ends = token.ends_with('.')
                || bytes
                    .get(i + token.len())
                    .is_some_and(|&b| b == b'.' || b.is_ascii_whitespace());
            opens && ends
        })
    }

    /// End of a clause's artist list, starting the search at `start`.
    /// `None` only in strict mode, when the clause is not closed in time.
    fn clause_end(&self, region: &str, start: usize) -> Option<usize> {
        let rest = &region[start..];
        let close = rest.find(')');
        let remix = rest.find(" (");
        let release = rest.find(" [");

        let end = match self.options.featuring {
            FeaturingMode::Strict => close.filter(|&c| {
                remix.is_none_or(|r| c < r) && release.is_none_or(|b| c < b)
            })?,
            FeaturingMode::Tolerant => [close, remix]
                .into_iter()
                .flatten()
                .min()
                .or(release)
                .unwrap_or(rest.len()),
        };
        Some(start + end)
    }
}

/// Index of the first `needle` at or after `from`.
fn find_from(region: &str, from: usize, needle: u8) -> Option<usize> {
    region
        .as_bytes()
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|i| from + i)
}

/// Extend a tag opened at `begin` through the last `close` at or after
/// `window`. A tag at index 0 is never a tag: the title can't be empty.
fn close_tag(region: &str, begin: usize, window: usize, close: u8) -> Option<Span> {
    if begin == 0 {
        return None;
    }
    let end = region
        .as_bytes()
        .get(window..)?
        .iter()
        .rposition(|&b| b == close)
        .map(|i| window + i + 1)?;
    (end > begin).then_some(Span { begin, end })
}
