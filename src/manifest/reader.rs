use crate::error::{Result, ShortlistError};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Separator between names in a manifest file. There is no escaping.
pub const MANIFEST_DELIMITER: char = '|';

/// Splits manifest text into its raw tokens, untrimmed.
pub fn raw_tokens(content: &str) -> Vec<&str> {
    content.split(MANIFEST_DELIMITER).collect()
}

/// Turns manifest text into unique, extension-qualified file names.
///
/// A token keeps its text as-is when it already *contains* `extension`
/// anywhere (ignoring case), so `foo.jpgx` counts as carrying `.jpg`.
/// Everything else gets `extension` appended after trimming.
pub fn parse_target_names(extension: &str, content: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    normalized_tokens(extension, content)
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Every manifest token in its qualified form, repeats included.
pub fn normalized_tokens(extension: &str, content: &str) -> Vec<String> {
    let extension_lower = extension.to_lowercase();

    raw_tokens(content)
        .into_iter()
        .map(|token| normalize_token(token, extension, &extension_lower))
        .collect()
}

/// Reads the whole text of `directory/manifest_name`.
pub fn read_manifest<P: AsRef<Path>>(manifest_name: &str, directory: P) -> Result<String> {
    let path = directory.as_ref().join(manifest_name);
    fs::read_to_string(&path).map_err(|source| ShortlistError::ManifestRead { path, source })
}

/// Reads `directory/manifest_name` and parses it with [`parse_target_names`].
pub fn read_target_names<P: AsRef<Path>>(
    extension: &str,
    manifest_name: &str,
    directory: P,
) -> Result<Vec<String>> {
    let content = read_manifest(manifest_name, directory)?;
    Ok(parse_target_names(extension, &content))
}

fn normalize_token(token: &str, extension: &str, extension_lower: &str) -> String {
    let trimmed = token.trim();
    if token.to_lowercase().contains(extension_lower) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, extension)
    }
}

/// The file names a run is looking for.
///
/// Names are unique by exact comparison; lookups ignore case.
#[derive(Debug, Clone)]
pub struct TargetSet {
    extension: String,
    names: Vec<String>,
    lowercase: HashSet<String>,
}

impl TargetSet {
    pub fn new<S: Into<String>>(extension: S, names: Vec<String>) -> Self {
        let mut seen = HashSet::new();
        let names: Vec<String> = names
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .collect();
        let lowercase = names.iter().map(|name| name.to_lowercase()).collect();

        Self {
            extension: extension.into(),
            names,
            lowercase,
        }
    }

    pub fn from_content(extension: &str, content: &str) -> Self {
        Self::new(extension, parse_target_names(extension, content))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// True when `basename` equals one of the targets, ignoring case.
    pub fn matches(&self, basename: &str) -> bool {
        self.lowercase.contains(&basename.to_lowercase())
    }

    /// An empty manifest parses to a lone bare extension, which is almost
    /// never a real file name.
    pub fn is_degenerate(&self) -> bool {
        self.names.iter().any(|name| name == &self.extension)
    }

    /// Targets that none of `found` matches, in manifest order.
    pub fn missing<'a, I>(&self, found: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let found: HashSet<String> = found.into_iter().map(|name| name.to_lowercase()).collect();
        self.names
            .iter()
            .filter(|name| !found.contains(&name.to_lowercase()))
            .cloned()
            .collect()
    }
}
