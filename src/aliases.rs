use std::collections::HashMap;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::naming::splitter::DELIMITERS;

#[derive(Error, Debug)]
pub enum AliasError {
    #[error("Alias name is empty")]
    EmptyName,
    #[error("Placeholder {placeholder:?} for {name:?} contains an artist delimiter")]
    UnsafePlaceholder { name: String, placeholder: String },
    #[error("Placeholder {placeholder:?} is used by both {first:?} and {second:?}")]
    DuplicatePlaceholder {
        placeholder: String,
        first: String,
        second: String,
    },
    #[error("Invalid alias pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Config file alias definition (deserialized from TOML).
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CustomAlias {
    pub name: String,
    /// Derived from the name when omitted.
    #[serde(default)]
    pub placeholder: Option<String>,
}

/// An artist name that contains a delimiter and must survive splitting intact.
#[derive(Debug, Clone)]
pub struct Alias {
    pub name: String,
    pub placeholder: String,
    pattern: Regex,
}

/// Ordered, immutable set of protected artist names.
///
/// Entries are applied in insertion order when encoding, so an earlier entry
/// wins over a later one that overlaps it.
#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<Alias>,
    /// Maps placeholder → index in `entries`
    placeholder_to_index: HashMap<String, usize>,
}

const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("T & Sugah", "__t_and_sugah__"),
    ("Zeus X Crona", "__zeus_x_crona__"),
    ("Raven & Kreyn", "__raven_and_kreyn__"),
];

impl AliasTable {
    /// Build a table from `(name, placeholder)` pairs, in order.
    pub fn new<I, N, P>(pairs: I) -> Result<Self, AliasError>
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<String>,
    {
        let mut table = Self::empty();
        for (name, placeholder) in pairs {
            table.push(name.into(), placeholder.into())?;
        }
        Ok(table)
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            placeholder_to_index: HashMap::new(),
        }
    }

    /// The built-in aliases only.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_ALIASES.iter().copied()).unwrap_or_else(|e| {
            log::error!("Built-in alias table rejected: {}", e);
            Self::empty()
        })
    }

    /// Built-in aliases followed by the custom ones from config.
    /// A custom name that is already present (case-insensitive) is skipped.
    pub fn with_custom(custom: &[CustomAlias]) -> Result<Self, AliasError> {
        let mut table = Self::new(BUILTIN_ALIASES.iter().copied())?;
        for alias in custom {
            if table.contains(&alias.name) {
                log::debug!("Alias {:?} already defined, skipping", alias.name);
                continue;
            }
            let placeholder = alias
                .placeholder
                .clone()
                .unwrap_or_else(|| derive_placeholder(&alias.name));
            table.push(alias.name.clone(), placeholder)?;
        }
        Ok(table)
    }

    fn push(&mut self, name: String, placeholder: String) -> Result<(), AliasError> {
        if name.trim().is_empty() {
            return Err(AliasError::EmptyName);
        }
        if placeholder.trim().is_empty()
            || placeholder != placeholder.trim()
            || DELIMITERS.iter().any(|d| placeholder.contains(d))
        {
            return Err(AliasError::UnsafePlaceholder { name, placeholder });
        }
        if let Some(&i) = self.placeholder_to_index.get(&placeholder) {
            return Err(AliasError::DuplicatePlaceholder {
                placeholder,
                first: self.entries[i].name.clone(),
                second: name,
            });
        }

        let pattern = Regex::new(&format!("(?i){}", regex::escape(&name)))?;
        self.placeholder_to_index
            .insert(placeholder.clone(), self.entries.len());
        self.entries.push(Alias {
            name,
            placeholder,
            pattern,
        });
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.entries.iter().any(|a| a.name.to_lowercase() == lower)
    }

    pub fn entries(&self) -> &[Alias] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace every case-insensitive occurrence of each alias with its placeholder.
    ///
    /// An occurrence only counts when it stands as a whole credit: each side
    /// touches the start or end of the text or a delimiter, so "Art & Sugah"
    /// is left alone. Text already replaced by an earlier entry is never
    /// matched again, so a later alias cannot eat into an earlier placeholder.
    pub fn encode(&self, text: &str) -> String {
        // (text, protected)
        let mut segments: Vec<(String, bool)> = vec![(text.to_string(), false)];

        for alias in &self.entries {
            if !segments.iter().any(|(s, protected)| {
                !protected && alias.pattern.find_iter(s).any(|m| is_whole_credit(s, m.start(), m.end()))
            }) {
                continue;
            }

            let mut next = Vec::with_capacity(segments.len() + 2);
            for (segment, protected) in segments {
                if protected {
                    next.push((segment, true));
                    continue;
                }
                let mut last = 0;
                for m in alias.pattern.find_iter(&segment) {
                    if !is_whole_credit(&segment, m.start(), m.end()) {
                        continue;
                    }
                    if m.start() > last {
                        next.push((segment[last..m.start()].to_string(), false));
                    }
                    next.push((alias.placeholder.clone(), true));
                    last = m.end();
                }
                if last < segment.len() {
                    next.push((segment[last..].to_string(), false));
                }
            }
            segments = next;
        }

        segments.into_iter().map(|(s, _)| s).collect()
    }

    /// Restore the configured name (and casing) for an exact placeholder.
    /// Any other fragment is returned unchanged.
    pub fn decode(&self, fragment: &str) -> String {
        match self.placeholder_to_index.get(fragment) {
            Some(&i) => self.entries[i].name.clone(),
            None => fragment.to_string(),
        }
    }
}

/// Whether `text[start..end]` is bounded on both sides by the edge of the
/// text or a delimiter (surrounding whitespace ignored).
fn is_whole_credit(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].trim_end();
    let after = text[end..].trim_start();
    let opens = before.is_empty() || DELIMITERS.iter().any(|d| before.ends_with(d.trim_end()));
    let closes = after.is_empty() || DELIMITERS.iter().any(|d| after.starts_with(d.trim_start()));
    opens && closes
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// "Camo & Krooked" → "__camo_krooked__"
pub fn derive_placeholder(name: &str) -> String {
    let mut slug = String::from("__");
    let mut pending_sep = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_sep && slug.len() > 2 {
                slug.push('_');
            }
            pending_sep = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug.push_str("__");
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_three_entries_in_order() {
        let table = AliasTable::builtin();
        let names: Vec<&str> = table.entries().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["T & Sugah", "Zeus X Crona", "Raven & Kreyn"]);
    }

    #[test]
    fn encode_is_case_insensitive() {
        let table = AliasTable::builtin();
        assert_eq!(
            table.encode("zeus x crona & Someone"),
            "__zeus_x_crona__ & Someone"
        );
        assert_eq!(table.encode("ZEUS X CRONA"), "__zeus_x_crona__");
    }

    #[test]
    fn encode_replaces_every_occurrence() {
        let table = AliasTable::builtin();
        assert_eq!(
            table.encode("T & Sugah, t & sugah"),
            "__t_and_sugah__, __t_and_sugah__"
        );
    }

    #[test]
    fn decode_exact_placeholder_restores_configured_casing() {
        let table = AliasTable::builtin();
        assert_eq!(table.decode("__zeus_x_crona__"), "Zeus X Crona");
        assert_eq!(table.decode("Someone"), "Someone");
    }

    #[test]
    fn decode_leaves_other_fragments_alone() {
        let table = AliasTable::builtin();
        assert_eq!(table.decode("__raven_and_kreyn__ Live"), "__raven_and_kreyn__ Live");
        assert_eq!(table.decode("zeus x crona"), "zeus x crona");
    }

    #[test]
    fn encode_ignores_matches_inside_longer_names() {
        let table = AliasTable::builtin();
        assert_eq!(table.encode("Art & Sugah"), "Art & Sugah");
        assert_eq!(table.encode("Zeus X Cronacle"), "Zeus X Cronacle");
        assert_eq!(table.encode("Raven & Kreyn Live"), "Raven & Kreyn Live");
        assert_eq!(table.encode("Bart & Sugah & T & Sugah"), "Bart & Sugah & __t_and_sugah__");
    }

    #[test]
    fn encode_matches_next_to_any_delimiter() {
        let table = AliasTable::builtin();
        assert_eq!(
            table.encode("a,  t & sugah x Zeus X Crona X b"),
            "a,  __t_and_sugah__ x __zeus_x_crona__ X b"
        );
    }

    #[test]
    fn earlier_entry_wins_on_overlap() {
        let table = AliasTable::new([("T & Sugah", "__first__"), ("Sugah", "__second__")]).unwrap();
        assert_eq!(table.encode("T & Sugah"), "__first__");

        let reversed = AliasTable::new([("Sugah", "__second__"), ("T & Sugah", "__first__")]).unwrap();
        assert_eq!(reversed.encode("T & Sugah"), "T & __second__");
    }

    #[test]
    fn later_entry_never_matches_inside_placeholder() {
        let table = AliasTable::new([("T & Sugah", "__t_and_sugah__"), ("Sugah", "__sugah__")]).unwrap();
        assert_eq!(table.encode("T & Sugah & sugah"), "__t_and_sugah__ & __sugah__");
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let table = AliasTable::new([("A.B & C", "__abc__")]).unwrap();
        assert_eq!(table.encode("AxB & C"), "AxB & C");
        assert_eq!(table.encode("a.b & c"), "__abc__");
    }

    #[test]
    fn placeholder_with_delimiter_is_rejected() {
        let err = AliasTable::new([("Foo & Bar", "foo & bar")]).unwrap_err();
        assert!(matches!(err, AliasError::UnsafePlaceholder { .. }));
    }

    #[test]
    fn duplicate_placeholder_is_rejected() {
        let err = AliasTable::new([("A & B", "__ab__"), ("A x B", "__ab__")]).unwrap_err();
        assert!(matches!(err, AliasError::DuplicatePlaceholder { .. }));
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = AliasTable::new([("  ", "__x__")]).unwrap_err();
        assert!(matches!(err, AliasError::EmptyName));
    }

    #[test]
    fn custom_aliases_append_after_builtin() {
        let custom = vec![
            CustomAlias {
                name: "Camo & Krooked".to_string(),
                placeholder: None,
            },
            CustomAlias {
                name: "zeus x crona".to_string(),
                placeholder: Some("__other__".to_string()),
            },
        ];
        let table = AliasTable::with_custom(&custom).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.entries()[3].name, "Camo & Krooked");
        assert_eq!(table.entries()[3].placeholder, "__camo_krooked__");
    }

    #[test]
    fn derive_placeholder_slugs_name() {
        assert_eq!(derive_placeholder("Zeus X Crona"), "__zeus_x_crona__");
        assert_eq!(derive_placeholder("Camo & Krooked"), "__camo_krooked__");
        assert_eq!(derive_placeholder("  Dimension, Ltd. "), "__dimension_ltd__");
    }
}
