//! Minimal reader for the HTML fragments rustdoc embeds in implementor tables.
//!
//! Rustdoc only emits a handful of constructs here: anchors carrying a
//! `title="<kind> <path>"` attribute, a where-clause wrapper, line breaks and
//! escaped text. This module flattens a fragment into plain text while
//! remembering where each anchor landed in that text.
//!
//! The where-clause wrapper is `<div class="where">` in current rustdoc and
//! `<span class="where fmt-newline">` (with `<br>` and `&nbsp;` for layout) in
//! the releases that wrote object-shaped table entries.

use regex::Regex;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<a\b([^>]*)>(.*?)</a>|<[^>]*>").unwrap());

static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\btitle="([^"]*)""#).unwrap());

static WHERE_OPEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<(div|span) class="where(?: [^"]*)?">"#).unwrap());

fn is_line_break(tag: &str) -> bool {
    tag.len() > 3 && tag[..3].eq_ignore_ascii_case("<br")
}

/// An anchor found in a fragment, with its byte span in the flattened text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Link {
    /// Item kind from the title attribute (`trait`, `struct`, `type`, ...)
    pub(crate) kind: String,
    /// Fully qualified item path from the title attribute
    pub(crate) path: String,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

/// Plain text of a fragment plus the anchors inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Fragment {
    pub(crate) text: String,
    pub(crate) links: Vec<Link>,
}

impl Fragment {
    /// First link starting inside `range` that satisfies `accept`.
    pub(crate) fn link_in(
        &self,
        range: std::ops::Range<usize>,
        accept: impl Fn(&Link) -> bool,
    ) -> Option<&Link> {
        self.links
            .iter()
            .find(|link| range.contains(&link.start) && accept(link))
    }
}

/// Flatten an HTML fragment into text, recording anchor positions.
pub(crate) fn parse_fragment(html: &str) -> Fragment {
    let mut fragment = Fragment::default();
    let mut last = 0;

    for caps in TAG_REGEX.captures_iter(html) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        fragment
            .text
            .push_str(&decode_entities(&html[last..whole.start()]));

        if let Some(inner) = caps.get(2) {
            let start = fragment.text.len();
            fragment
                .text
                .push_str(&decode_entities(&strip_tags(inner.as_str())));
            let end = fragment.text.len();

            let attrs = caps.get(1).map_or("", |a| a.as_str());
            let title = TITLE_REGEX
                .captures(attrs)
                .and_then(|t| t.get(1))
                .map(|t| decode_entities(t.as_str()));
            if let Some((kind, path)) = title.as_deref().and_then(|t| t.split_once(' ')) {
                fragment.links.push(Link {
                    kind: kind.to_string(),
                    path: path.trim().to_string(),
                    start,
                    end,
                });
            }
        } else if is_line_break(whole.as_str()) {
            fragment.text.push(' ');
        }

        last = whole.end();
    }

    fragment.text.push_str(&decode_entities(&html[last..]));
    fragment
}

/// Split a description into the impl header and the body of its where clause.
pub(crate) fn split_where(html: &str) -> (&str, Option<&str>) {
    let Some(caps) = WHERE_OPEN_REGEX.captures(html) else {
        return (html, None);
    };
    let (Some(open), Some(tag)) = (caps.get(0), caps.get(1)) else {
        return (html, None);
    };
    let body = &html[open.end()..];
    let close = format!("</{}>", tag.as_str());
    let body = body.rfind(&close).map_or(body, |end| &body[..end]);
    (&html[..open.start()], Some(body))
}

/// Remove every tag from a fragment, keeping only its text.
pub(crate) fn strip_tags(html: &str) -> String {
    TAG_REGEX
        .replace_all(html, |caps: &regex::Captures<'_>| {
            match caps.get(2) {
                Some(inner) => strip_tags(inner.as_str()),
                None if caps.get(0).is_some_and(|tag| is_line_break(tag.as_str())) => {
                    " ".to_string()
                }
                None => String::new(),
            }
        })
        .into_owned()
}

/// Decode the character references rustdoc produces.
pub(crate) fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&rest[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}
