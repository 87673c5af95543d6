//! Plug path parsing: `node.attr` and `node.attr[index]`.

/// A parsed plug path, borrowing from the input.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct PlugPath<'a> {
    pub node: &'a str,
    pub attr: &'a str,
    pub index: Option<u32>,
}

/// Split a `node.attr[index]` path. The node part may itself be a dag path.
/// Returns `None` when the shape is not a plug path at all.
pub(crate) fn parse_plug_path(path: &str) -> Option<PlugPath<'_>> {
    let (node, attr_part) = path.split_once('.')?;
    if node.is_empty() || attr_part.is_empty() {
        return None;
    }
    let (attr, index) = match attr_part.split_once('[') {
        Some((attr, rest)) => {
            let digits = rest.strip_suffix(']')?;
            (attr, Some(digits.parse().ok()?))
        }
        None => (attr_part, None),
    };
    if attr.is_empty() {
        return None;
    }
    Some(PlugPath { node, attr, index })
}
