//! Node name and dag-path helpers.
//!
//! The host's name grammar: word characters and underscores only, no leading
//! digit. Dag paths join names with `|`; a leading `|` anchors the path at
//! the scene root. `ls`-style patterns use `*` as a word wildcard.

use regex_lite::Regex;

/// Conform a node name by dropping invalid characters and leading digits.
/// Returns an empty string when nothing valid remains.
pub fn conform_node_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    cleaned.trim_start_matches(|c: char| c.is_ascii_digit()).to_string()
}

/// Split a name into its stem and any trailing digits, the host's
/// disambiguation convention: `pCube12` -> (`pCube`, Some(12)).
pub fn split_trailing_digits(name: &str) -> (&str, Option<u64>) {
    let stem_end = name
        .rfind(|c: char| !c.is_ascii_digit())
        .map(|i| i + name[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);
    let (stem, digits) = name.split_at(stem_end);
    (stem, digits.parse().ok())
}

/// Join two dag path fragments.
pub fn join(left: &str, right: &str) -> String {
    let joined = format!("{}|{}", left.trim_matches('|'), right.trim_matches('|'));
    if left.starts_with('|') {
        format!("|{}", joined)
    } else {
        joined
    }
}

/// Compile an `ls`-style pattern into a regex over dag paths.
///
/// - `name`  matches `name` at any depth
/// - `name*` matches any name with that prefix, at any depth
/// - `|a|b`  matches that absolute path only
pub fn pattern_to_regex(pattern: &str) -> Regex {
    let mut regex = String::new();
    if pattern.starts_with('|') {
        regex.push('^');
    } else {
        regex.push_str(r"(^|.*\|)");
    }
    for c in pattern.chars() {
        match c {
            '*' => regex.push_str(r"\w*"),
            '|' => regex.push_str(r"\|"),
            c if c.is_ascii_alphanumeric() || c == '_' => regex.push(c),
            c => {
                // Anything else is literal-escaped rather than rejected.
                regex.push('\\');
                regex.push(c);
            }
        }
    }
    regex.push('$');
    Regex::new(&regex).unwrap_or_else(|_| Regex::new("$^").unwrap())
}
