//! Locating `name<...>` template occurrences inside type strings
//!
//! The `ck_tile::` qualifier is optional both in the query and in the text: a
//! debugger may print either form depending on how much context it already
//! elided. A name only matches at an identifier boundary, so looking for
//! `tuple` never hits `tuple_object<` and `merge` never hits `unmerge<`.

use super::brackets::find_matching_close;

/// Namespace qualifier used by every ck_tile type
pub const NAMESPACE: &str = "ck_tile::";

/// Byte positions of one template occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSpan {
    /// Start of the template name (after any qualifier)
    pub name_start: usize,
    /// Position of the opening `<`
    pub open: usize,
    /// Position of the matching `>`
    pub close: usize,
}

impl TemplateSpan {
    /// Text between the brackets
    pub fn content<'a>(&self, text: &'a str) -> &'a str {
        &text[self.open + 1..self.close]
    }

    /// The whole `name<...>` text, without any qualifier
    pub fn full<'a>(&self, text: &'a str) -> &'a str {
        &text[self.name_start..=self.close]
    }

    /// The whole occurrence re-qualified with `ck_tile::`
    pub fn qualified(&self, text: &str) -> String {
        format!("{}{}", NAMESPACE, self.full(text))
    }
}

/// Strip an optional `ck_tile::` qualifier from a template name
pub fn bare_name(name: &str) -> &str {
    name.strip_prefix(NAMESPACE).unwrap_or(name)
}

pub(crate) fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// True when `pos` does not continue an identifier that started earlier
pub(crate) fn at_ident_boundary(text: &str, pos: usize) -> bool {
    pos == 0 || !is_ident_byte(text.as_bytes()[pos - 1])
}

/// Find the first occurrence of `name<` at or after `from`
///
/// Occurrences whose brackets never close are skipped.
pub fn find_template(text: &str, name: &str, from: usize) -> Option<TemplateSpan> {
    let bare = bare_name(name);
    if bare.is_empty() || from > text.len() {
        return None;
    }

    let needle = format!("{}<", bare);
    let mut search = from;

    while let Some(offset) = text.get(search..).and_then(|rest| rest.find(&needle)) {
        let name_start = search + offset;
        let open = name_start + bare.len();
        search = name_start + 1;

        if !at_ident_boundary(text, name_start) {
            continue;
        }
        if let Some(close) = find_matching_close(text, open) {
            return Some(TemplateSpan {
                name_start,
                open,
                close,
            });
        }
    }

    None
}

/// True when `name<` opens somewhere in `text`, closed or not
pub fn mentions_template(text: &str, name: &str) -> bool {
    let bare = bare_name(name);
    if bare.is_empty() {
        return false;
    }
    let needle = format!("{}<", bare);
    text.match_indices(&needle)
        .any(|(name_start, _)| at_ident_boundary(text, name_start))
}

/// Extract the content of the first `name<...>` occurrence
pub fn extract_template<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    find_template(text, name, 0).map(|span| span.content(text))
}

/// Extract the full text of the first `name<...>` occurrence, re-qualified
pub fn extract_full_template(text: &str, name: &str) -> Option<String> {
    find_template(text, name, 0).map(|span| span.qualified(text))
}

/// Extract the content of every non-overlapping `name<...>` occurrence, left to right
pub fn extract_all_templates<'a>(text: &'a str, name: &str) -> Vec<&'a str> {
    let mut contents = Vec::new();
    let mut from = 0;

    while let Some(span) = find_template(text, name, from) {
        contents.push(span.content(text));
        from = span.close + 1;
    }

    contents
}

/// If `param` is itself a `name<...>` template (optionally qualified), return its content
///
/// Unlike [`extract_template`] this requires the template to span the whole
/// parameter, which is how positional layouts are read.
pub fn template_argument<'a>(param: &'a str, name: &str) -> Option<&'a str> {
    let param = param.trim();
    let unqualified = param.strip_prefix(NAMESPACE).unwrap_or(param);
    let offset = param.len() - unqualified.len();
    let bare = bare_name(name);

    if !unqualified.starts_with(bare) || unqualified.as_bytes().get(bare.len()) != Some(&b'<') {
        return None;
    }

    let open = offset + bare.len();
    let close = find_matching_close(param, open)?;
    if close + 1 != param.len() {
        return None;
    }
    Some(&param[open + 1..close])
}

/// Name of the outermost template, without qualifiers, cv-qualifiers or references
///
/// `const ck_tile::tuple<int> &` gives `tuple`. Returns `None` when the string
/// has no template argument list.
pub fn outer_template_name(type_str: &str) -> Option<&str> {
    let open = type_str.find('<')?;
    let head = type_str[..open].trim_end();
    let name_start = head
        .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .map(|pos| pos + 1)
        .unwrap_or(0);
    let name = &head[name_start..];
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
