use crate::aliases::AliasTable;

/// Literal separators between artist names. `" X "` and `" x "` are distinct
/// case-sensitive delimiters; a lone capital or lowercase "x" inside a name is
/// left alone.
pub const DELIMITERS: &[&str] = &[", ", " & ", " X ", " x "];

/// Splits "A, B & C x D" style credit lists, protecting aliased names.
#[derive(Debug, Clone, Default)]
pub struct ArtistSplitter {
    aliases: AliasTable,
}

impl ArtistSplitter {
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Split a credit list into trimmed artist names, left to right.
    pub fn split(&self, text: &str) -> Vec<String> {
        let encoded = self.aliases.encode(text);
        split_on_delimiters(&encoded)
            .into_iter()
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .map(|fragment| self.aliases.decode(fragment))
            .collect()
    }
}

/// Split at every delimiter occurrence. When two delimiters start at the same
/// index the one listed first in `DELIMITERS` is used.
fn split_on_delimiters(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;

    loop {
        let next = DELIMITERS
            .iter()
            .filter_map(|d| text[start..].find(d).map(|i| (start + i, d.len())))
            .min_by_key(|&(i, _)| i);

        match next {
            Some((i, len)) => {
                parts.push(&text[start..i]);
                start = i + len;
            }
            None => {
                parts.push(&text[start..]);
                break;
            }
        }
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter() -> ArtistSplitter {
        ArtistSplitter::default()
    }

    #[test]
    fn splits_comma_and_ampersand() {
        assert_eq!(splitter().split("a, b, c, d & e"), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn splits_both_x_forms() {
        assert_eq!(splitter().split("alpha x beta X gamma"), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn x_inside_name_is_not_a_delimiter() {
        assert_eq!(splitter().split("Xilent & Maxx"), vec!["Xilent", "Maxx"]);
    }

    #[test]
    fn single_artist_passes_through() {
        assert_eq!(splitter().split("Someone"), vec!["Someone"]);
    }

    #[test]
    fn empty_and_blank_fragments_are_dropped() {
        assert_eq!(splitter().split(", a & b, , c, "), vec!["a", "b", "c"]);
        assert!(splitter().split("").is_empty());
        assert!(splitter().split("   ").is_empty());
    }

    #[test]
    fn fragments_are_trimmed() {
        assert_eq!(splitter().split("  a  &  b  "), vec!["a", "b"]);
        assert_eq!(splitter().split(" alpha x beta"), vec!["alpha", "beta"]);
    }

    #[test]
    fn casing_of_plain_names_is_preserved() {
        assert_eq!(splitter().split("dEaDmAu5 & KASKADE"), vec!["dEaDmAu5", "KASKADE"]);
    }

    #[test]
    fn no_deduplication() {
        assert_eq!(splitter().split("a & a"), vec!["a", "a"]);
    }

    #[test]
    fn aliased_names_survive_split() {
        assert_eq!(
            splitter().split("Zeus X Crona, T & Sugah & Raven & Kreyn"),
            vec!["Zeus X Crona", "T & Sugah", "Raven & Kreyn"]
        );
    }

    #[test]
    fn aliased_names_get_configured_casing() {
        assert_eq!(splitter().split("zeus x crona x Other"), vec!["Zeus X Crona", "Other"]);
    }

    #[test]
    fn alias_inside_longer_name_does_not_merge_credits() {
        assert_eq!(splitter().split("Art & Sugah"), vec!["Art", "Sugah"]);
        assert_eq!(splitter().split("Zeus X Cronacle"), vec!["Zeus", "Cronacle"]);
        assert_eq!(
            splitter().split("Bart & Sugah & t & sugah"),
            vec!["Bart", "Sugah", "T & Sugah"]
        );
    }

    #[test]
    fn alias_order_decides_overlap() {
        let table = AliasTable::new([("T & Sugah", "__t_and_sugah__"), ("Sugah", "__sugah__")]).unwrap();
        assert_eq!(ArtistSplitter::new(table).split("T & Sugah & Sugah"), vec!["T & Sugah", "Sugah"]);

        let table = AliasTable::new([("Sugah", "__sugah__"), ("T & Sugah", "__t_and_sugah__")]).unwrap();
        assert_eq!(ArtistSplitter::new(table).split("T & Sugah & Sugah"), vec!["T", "Sugah", "Sugah"]);
    }

    #[test]
    fn without_aliases_delimiter_names_split() {
        let splitter = ArtistSplitter::new(AliasTable::empty());
        assert_eq!(splitter.split("Zeus X Crona"), vec!["Zeus", "Crona"]);
    }

    #[test]
    fn earliest_delimiter_wins() {
        assert_eq!(split_on_delimiters("a & b, c"), vec!["a", "b", "c"]);
        assert_eq!(split_on_delimiters("a, & b"), vec!["a", "& b"]);
    }
}
