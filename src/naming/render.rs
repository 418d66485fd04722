use super::{ParsedName, SEPARATOR};

/// "A", "A & B", "A, B & C".
pub fn join_credits<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|s| s.as_ref()).collect();
            format!("{} & {}", head.join(", "), last.as_ref())
        }
    }
}

/// Render the canonical filename stem for a parsed name.
///
/// `artists - title (ft. featuring) remix_tag release_tag`, where the
/// featuring clause and both tags are omitted when empty. Tags are written
/// verbatim; only the single space in front of each one is added here.
pub fn render(name: &ParsedName) -> String {
    let mut out = join_credits(&name.artists);
    out.push_str(SEPARATOR);
    out.push_str(&name.title);

    if !name.featuring.is_empty() {
        out.push_str(" (ft. ");
        out.push_str(&join_credits(&name.featuring));
        out.push(')');
    }
    if !name.remix_tag.trim().is_empty() {
        out.push(' ');
        out.push_str(&name.remix_tag);
    }
    if !name.release_tag.trim().is_empty() {
        out.push(' ');
        out.push_str(&name.release_tag);
    }

    out
}
