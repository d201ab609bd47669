//! Shared identifier types.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Crate-qualified path of a documented trait, e.g. `crypto_common::IvSizeUser`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TraitPath {
    segments: Vec<String>,
}

impl TraitPath {
    /// Build a path from its segments. Returns `None` if there are fewer than two
    /// segments or any segment is empty.
    pub fn from_segments<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.len() < 2 || segments.iter().any(String::is_empty) {
            return None;
        }
        Some(Self { segments })
    }

    /// Derive the trait path from a file location relative to `trait.impl/`.
    ///
    /// `crypto_common/trait.IvSizeUser.js` becomes `crypto_common::IvSizeUser`.
    /// Anything that is not a `trait.<Name>.js` file yields `None`.
    pub fn from_relative_file(relative: &Path) -> Option<Self> {
        let file_name = relative.file_name()?.to_str()?;
        let name = file_name.strip_prefix("trait.")?.strip_suffix(".js")?;

        let mut segments: Vec<String> = relative
            .parent()?
            .components()
            .map(|c| c.as_os_str().to_str().map(str::to_string))
            .collect::<Option<_>>()?;
        segments.push(name.to_string());

        Self::from_segments(segments)
    }

    /// Name of the crate that defines the trait.
    pub fn crate_name(&self) -> &str {
        &self.segments[0]
    }

    /// The trait's own name (last segment).
    pub fn name(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Location of this trait's implementor file relative to the doc root.
    pub fn relative_file(&self) -> std::path::PathBuf {
        let mut path = std::path::PathBuf::from("trait.impl");
        for segment in &self.segments[..self.segments.len() - 1] {
            path.push(segment);
        }
        path.push(format!("trait.{}.js", self.name()));
        path
    }
}

impl fmt::Display for TraitPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("::"))
    }
}

/// Error returned when a string is not a crate-qualified path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a crate-qualified trait path")]
pub struct ParseTraitPathError(pub String);

impl FromStr for TraitPath {
    type Err = ParseTraitPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::from_segments(trimmed.split("::").map(str::trim))
            .ok_or_else(|| ParseTraitPathError(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    #[rstest]
    #[case("crypto_common/trait.IvSizeUser.js", "crypto_common::IvSizeUser")]
    #[case("cipher/block/trait.BlockCipher.js", "cipher::block::BlockCipher")]
    #[case("core/fmt/trait.Debug.js", "core::fmt::Debug")]
    fn test_from_relative_file(#[case] file: &str, #[case] expected: &str) {
        let_assert!(Some(path) = TraitPath::from_relative_file(Path::new(file)));
        check!(path.to_string() == expected);
    }

    #[rstest]
    #[case("trait.Orphan.js")]
    #[case("cbc/struct.Decryptor.js")]
    #[case("cbc/trait.IvSizeUser.html")]
    fn test_from_relative_file_rejects(#[case] file: &str) {
        check!(TraitPath::from_relative_file(Path::new(file)).is_none());
    }

    #[test]
    fn test_accessors_and_file_location() {
        let path: TraitPath = "cipher::block::BlockDecryptMut".parse().unwrap();
        check!(path.crate_name() == "cipher");
        check!(path.name() == "BlockDecryptMut");
        check!(
            path.relative_file()
                == Path::new("trait.impl/cipher/block/trait.BlockDecryptMut.js")
        );
    }

    #[rstest]
    #[case("IvSizeUser")]
    #[case("")]
    #[case("cipher::")]
    fn test_parse_rejects_unqualified(#[case] input: &str) {
        let_assert!(Err(ParseTraitPathError(_)) = input.parse::<TraitPath>());
    }
}
