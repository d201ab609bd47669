//! Implementor records and the impl signatures described by their HTML.

use super::html::{self, Fragment};
use std::fmt;

/// Link kinds that can name the implementing type.
const TYPE_KINDS: &[&str] = &["struct", "enum", "union", "type", "primitive", "foreigntype"];

/// One entry of an implementor table: a rendered `impl` block for a trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplementorRecord {
    /// HTML description exactly as rustdoc emitted it
    html: String,
    /// Whether rustdoc marked the impl as synthetic (auto traits)
    synthetic: bool,
    /// Type aliases rustdoc attached to this impl
    aliases: Vec<String>,
    /// Structured view of the description, if it could be read
    signature: Option<ImplSignature>,
}

impl ImplementorRecord {
    /// Create a plain (non-synthetic, alias-free) record.
    pub fn new(html: impl Into<String>) -> Self {
        Self::with_metadata(html, false, Vec::new())
    }

    /// Create a record carrying rustdoc's extra entry fields.
    pub fn with_metadata(html: impl Into<String>, synthetic: bool, aliases: Vec<String>) -> Self {
        let html = html.into();
        let signature = match ImplSignature::parse(&html) {
            Ok(signature) => Some(signature),
            Err(e) => {
                tracing::warn!(error = %e, html = %html, "Unreadable implementor description");
                None
            }
        };
        Self {
            html,
            synthetic,
            aliases,
            signature,
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub const fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub const fn signature(&self) -> Option<&ImplSignature> {
        self.signature.as_ref()
    }

    /// Human-readable declaration, falling back to the tag-stripped HTML.
    pub fn plain_text(&self) -> String {
        match &self.signature {
            Some(signature) => signature.to_string(),
            None => html::decode_entities(&html::strip_tags(&self.html))
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Error returned when an implementor description is not an impl header.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("description does not start with `impl`")]
    MissingImpl,
    #[error("unbalanced generic parameter list")]
    UnbalancedGenerics,
    #[error("no ` for ` separating trait and implementing type")]
    MissingFor,
}

/// Structured form of `impl<..> Trait for Type where ..`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplSignature {
    pub is_unsafe: bool,
    /// `impl !Trait for Type`
    pub is_negative: bool,
    /// Impl generic parameter list including angle brackets, e.g. `<C>`
    pub generics: Option<String>,
    /// Trait as written, e.g. `IvSizeUser` or `From<T>`
    pub trait_ref: String,
    /// Trait name without arguments
    pub trait_name: String,
    /// Fully qualified trait path, when the trait was linked
    pub trait_path: Option<String>,
    /// Implementing type as written, e.g. `Decryptor<C>`
    pub self_type: String,
    /// Implementing type without generic arguments
    pub self_name: String,
    /// Fully qualified path of the implementing type, when linked
    pub self_path: Option<String>,
    /// Where-clause predicates, one per entry
    pub bounds: Vec<String>,
}

impl ImplSignature {
    pub fn parse(html: &str) -> Result<Self, SignatureError> {
        let (header_html, where_html) = html::split_where(html);
        let header = html::parse_fragment(header_html);
        let text = header.text.as_str();

        let mut pos = text.len() - text.trim_start().len();
        let mut is_unsafe = false;
        if text[pos..].starts_with("unsafe ") {
            is_unsafe = true;
            pos = skip_whitespace(text, pos + "unsafe".len());
        }

        if !text[pos..].starts_with("impl") {
            return Err(SignatureError::MissingImpl);
        }
        pos += "impl".len();

        let generics = if text[pos..].starts_with('<') {
            let len = matching_angle(&text[pos..]).ok_or(SignatureError::UnbalancedGenerics)?;
            let generics = text[pos..pos + len].to_string();
            pos += len;
            Some(generics)
        } else {
            None
        };
        pos = skip_whitespace(text, pos);

        let is_negative = text[pos..].starts_with('!');
        if is_negative {
            pos += 1;
        }

        let for_at = pos + find_top_level(&text[pos..], " for ").ok_or(SignatureError::MissingFor)?;
        let self_start = for_at + " for ".len();

        let trait_ref = text[pos..for_at].trim().to_string();
        let trait_name = leading_name(&trait_ref);
        let trait_path = header
            .link_in(pos..for_at, |link| link.kind.starts_with("trait"))
            .map(|link| link.path.clone());

        // Without a wrapper element the clause is plain text after the type.
        let (self_end, bounds) = match where_html {
            Some(where_html) => (text.len(), parse_bounds(where_html)),
            None => match find_top_level(&text[self_start..], " where ") {
                Some(at) => (
                    self_start + at,
                    bounds_from_text(&text[self_start + at..]),
                ),
                None => (text.len(), Vec::new()),
            },
        };

        let self_type = text[self_start..self_end].trim().to_string();
        let self_name = leading_name(&self_type);
        let self_path = type_link(&header, self_start..self_end).map(|link| link.path.clone());

        Ok(Self {
            is_unsafe,
            is_negative,
            generics,
            trait_ref,
            trait_name,
            trait_path,
            self_type,
            self_name,
            self_path,
            bounds,
        })
    }

    /// Bounds declared inline on the impl's generic parameters, e.g.
    /// `T: IvSizeUser + BlockSizeUser` from `impl<T: IvSizeUser + BlockSizeUser>`.
    pub fn inline_bounds(&self) -> Vec<String> {
        let Some(generics) = &self.generics else {
            return Vec::new();
        };
        let inner = generics
            .strip_prefix('<')
            .and_then(|g| g.strip_suffix('>'))
            .unwrap_or(generics);
        split_top_level(inner, ',')
            .into_iter()
            .filter(|param| param.contains(':'))
            .collect()
    }

    /// Inline and where-clause bounds together.
    pub fn all_bounds(&self) -> Vec<String> {
        let mut bounds = self.inline_bounds();
        bounds.extend(self.bounds.iter().cloned());
        bounds
    }
}

impl fmt::Display for ImplSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unsafe {
            write!(f, "unsafe ")?;
        }
        write!(f, "impl{} ", self.generics.as_deref().unwrap_or(""))?;
        if self.is_negative {
            write!(f, "!")?;
        }
        write!(f, "{} for {}", self.trait_ref, self.self_type)?;
        if !self.bounds.is_empty() {
            write!(f, " where {}", self.bounds.join(", "))?;
        }
        Ok(())
    }
}

fn type_link(fragment: &Fragment, range: std::ops::Range<usize>) -> Option<&html::Link> {
    fragment
        .link_in(range.clone(), |link| TYPE_KINDS.contains(&link.kind.as_str()))
        .or_else(|| fragment.link_in(range, |_| true))
}

fn parse_bounds(where_html: &str) -> Vec<String> {
    bounds_from_text(&html::parse_fragment(where_html).text)
}

fn bounds_from_text(text: &str) -> Vec<String> {
    let text = text.trim_start();
    let text = text.strip_prefix("where").unwrap_or(text);
    split_top_level(text, ',')
}

fn skip_whitespace(text: &str, pos: usize) -> usize {
    let rest = &text[pos..];
    pos + (rest.len() - rest.trim_start().len())
}

/// Name part of a path-like type: everything before generic arguments, with
/// whitespace collapsed.
fn leading_name(text: &str) -> String {
    let end = text.find(['<', '(']).unwrap_or(text.len());
    text[..end].split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Byte length of the `<...>` group starting at the beginning of `text`.
fn matching_angle(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut prev = '\0';
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if prev != '-' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        prev = c;
    }
    None
}

/// Find `pattern` outside any bracket nesting.
fn find_top_level(text: &str, pattern: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut prev = '\0';
    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' if prev != '-' => depth -= 1,
            ')' | ']' => depth -= 1,
            _ => {}
        }
        if depth == 0 && text[i..].starts_with(pattern) {
            return Some(i);
        }
        prev = c;
    }
    None
}

/// Split on `separator` outside any bracket nesting, trimming and collapsing
/// whitespace in each non-empty part.
fn split_top_level(text: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut prev = '\0';
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' if prev != '-' => depth -= 1,
            ')' | ']' => depth -= 1,
            c if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
        prev = c;
    }
    parts.push(&text[start..]);

    parts
        .into_iter()
        .map(|part| part.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|part| !part.is_empty())
        .collect()
}
