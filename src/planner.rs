use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;

use crate::naming::{FormatError, ParsedName, Parser};

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("No file name in {0}")]
    NoFileName(PathBuf),
    #[error("File name is not valid UTF-8: {0}")]
    NonUtf8(PathBuf),
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// A rename that would bring a file's name into canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Split a path into (stem, ".ext") where the extension part may be empty.
fn stem_and_extension(path: &Path) -> Result<(&str, String), PlanError> {
    let stem = path
        .file_stem()
        .ok_or_else(|| PlanError::NoFileName(path.to_path_buf()))?
        .to_str()
        .ok_or_else(|| PlanError::NonUtf8(path.to_path_buf()))?;
    let extension = match path.extension() {
        Some(ext) => format!(
            ".{}",
            ext.to_str()
                .ok_or_else(|| PlanError::NonUtf8(path.to_path_buf()))?
        ),
        None => String::new(),
    };
    Ok((stem, extension))
}

/// Parse the name of an audio file (extension ignored).
pub fn parse_path(path: &Path, parser: &Parser) -> Result<ParsedName, PlanError> {
    let (stem, _) = stem_and_extension(path)?;
    Ok(parser.parse(stem)?)
}

/// Canonical file name (with the original extension) for `path`.
pub fn normalized_file_name(path: &Path, parser: &Parser) -> Result<String, PlanError> {
    let (stem, extension) = stem_and_extension(path)?;
    let parsed = parser.parse(stem)?;
    Ok(format!("{}{}", parsed, extension))
}

/// `None` when the file is already canonically named.
pub fn plan_rename(path: &Path, parser: &Parser) -> Result<Option<Rename>, PlanError> {
    let normalized = normalized_file_name(path, parser)?;
    if path.file_name().and_then(|n| n.to_str()) == Some(normalized.as_str()) {
        return Ok(None);
    }
    Ok(Some(Rename {
        from: path.to_path_buf(),
        to: path.with_file_name(normalized),
    }))
}

/// `root/<lead artist>/<file name>`.
pub fn destination(path: &Path, root: &Path, parser: &Parser) -> Result<PathBuf, PlanError> {
    let parsed = parse_path(path, parser)?;
    let file_name = path
        .file_name()
        .ok_or_else(|| PlanError::NoFileName(path.to_path_buf()))?;
    // parse() guarantees at least one artist
    let artist = parsed.lead_artist().unwrap_or_default();
    Ok(root.join(artist).join(file_name))
}

/// Plan renames for many files in parallel. Output order follows input order;
/// one bad name never stops the rest.
pub fn plan_batch<P>(paths: &[P], parser: &Parser) -> Vec<(PathBuf, Result<Option<Rename>, PlanError>)>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|p| {
            let path = p.as_ref();
            let planned = plan_rename(path, parser);
            if let Err(e) = &planned {
                log::warn!("Skipping {}: {}", path.display(), e);
            }
            (path.to_path_buf(), planned)
        })
        .collect()
}

/// Whether a path has one of the audio extensions we handle.
pub fn is_audio_file(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    crate::AUDIO_EXTENSIONS.contains(&ext.as_str())
}
