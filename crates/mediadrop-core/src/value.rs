//! The controlled value shared between a parent form and an uploader.

use serde::{Deserialize, Serialize};

use crate::types::UploadedFile;

/// The value a parent form hands to an uploader and receives back.
///
/// Serializes the way the form layer expects: `null`, a single URL
/// string, or an array of URL strings.
///
/// In single-file mode an uploader only ever emits [`Empty`](Self::Empty)
/// or [`Single`](Self::Single). In multi-file mode it emits
/// [`Multi`](Self::Multi), except that removing the last remaining file
/// emits [`Empty`](Self::Empty).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadValue {
    /// No file (`null`).
    #[default]
    Empty,
    /// One file URL.
    Single(String),
    /// A list of file URLs.
    Multi(Vec<String>),
}

impl UploadValue {
    /// Whether the value holds no URLs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Single(url) => url.is_empty(),
            Self::Multi(urls) => urls.is_empty(),
        }
    }

    /// URLs held by the value, read for a widget allowing `max_files`.
    ///
    /// Accepts any shape: a lone string in multi-file mode counts as a
    /// one-element list, and a list in single-file mode contributes only
    /// its first element. Empty strings are skipped and the result never
    /// holds more than `max_files` URLs.
    #[must_use]
    pub fn urls(&self, max_files: usize) -> Vec<String> {
        let all: Vec<String> = match self {
            Self::Empty => Vec::new(),
            Self::Single(url) => vec![url.clone()],
            Self::Multi(urls) => urls.clone(),
        };
        all.into_iter()
            .filter(|u| !u.is_empty())
            .take(max_files.max(1))
            .collect()
    }

    /// First URL, if any.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Single(url) => Some(url.as_str()),
            Self::Multi(urls) => urls.first().map(String::as_str),
        }
        .filter(|u| !u.is_empty())
    }

    /// Build the value an uploader emits for `urls` in the given mode.
    ///
    /// Multi-file mode always yields a list (possibly empty); single-file
    /// mode yields the first URL or [`Empty`](Self::Empty).
    #[must_use]
    pub fn from_urls(mut urls: Vec<String>, max_files: usize) -> Self {
        if max_files > 1 {
            Self::Multi(urls)
        } else if urls.is_empty() {
            Self::Empty
        } else {
            Self::Single(urls.swap_remove(0))
        }
    }
}

impl From<Option<String>> for UploadValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Empty, Self::Single)
    }
}

impl From<Vec<String>> for UploadValue {
    fn from(value: Vec<String>) -> Self {
        Self::Multi(value)
    }
}

/// What an uploader's `on_change` receives.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueChange {
    /// The new controlled value.
    pub value: UploadValue,
    /// File names parallel to the value's URLs, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_names: Option<Vec<String>>,
}

impl ValueChange {
    /// A change with no file names.
    #[must_use]
    pub const fn value(value: UploadValue) -> Self {
        Self {
            value,
            file_names: None,
        }
    }
}

/// Derive the normalised file list from a value and its parallel names.
///
/// Names are matched by index; missing or empty names become `None`.
#[must_use]
pub fn normalize(
    value: &UploadValue,
    file_names: Option<&[String]>,
    max_files: usize,
) -> Vec<UploadedFile> {
    value
        .urls(max_files)
        .into_iter()
        .enumerate()
        .map(|(i, url)| UploadedFile {
            url,
            name: file_names
                .and_then(|names| names.get(i))
                .filter(|n| !n.is_empty())
                .cloned(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn single_string_reads_as_list_in_multi_mode() {
        let value = UploadValue::Single("https://x/a.png".into());
        assert_eq!(value.urls(3), urls(&["https://x/a.png"]));
    }

    #[test]
    fn list_reads_as_first_in_single_mode() {
        let value = UploadValue::Multi(urls(&["a", "b"]));
        assert_eq!(value.urls(1), urls(&["a"]));
        assert_eq!(value.first(), Some("a"));
    }

    #[test]
    fn over_capacity_list_is_truncated() {
        let value = UploadValue::Multi(urls(&["u0", "u1", "u2", "u3", "u4"]));
        assert_eq!(value.urls(3), urls(&["u0", "u1", "u2"]));
        assert_eq!(normalize(&value, None, 3).len(), 3);
    }

    #[test]
    fn empty_strings_are_skipped() {
        assert!(UploadValue::Single(String::new()).is_empty());
        assert!(UploadValue::Single(String::new()).urls(1).is_empty());
        assert_eq!(UploadValue::Multi(urls(&["", "b"])).urls(3), urls(&["b"]));
        assert_eq!(UploadValue::Single(String::new()).first(), None);
    }

    #[test]
    fn from_urls_respects_mode() {
        assert_eq!(UploadValue::from_urls(Vec::new(), 1), UploadValue::Empty);
        assert_eq!(
            UploadValue::from_urls(urls(&["a", "b"]), 1),
            UploadValue::Single("a".into())
        );
        assert_eq!(
            UploadValue::from_urls(Vec::new(), 2),
            UploadValue::Multi(Vec::new())
        );
    }

    #[test]
    fn normalize_pairs_names_by_index() {
        let value = UploadValue::Multi(urls(&["u1", "u2", "u3"]));
        let names = urls(&["one.png", ""]);
        let files = normalize(&value, Some(&names), 3);
        assert_eq!(
            files,
            vec![
                UploadedFile::named("u1", "one.png"),
                UploadedFile::new("u2"),
                UploadedFile::new("u3"),
            ]
        );
    }

    #[test]
    fn serializes_like_the_form_layer() {
        assert_eq!(serde_json::to_string(&UploadValue::Empty).unwrap(), "null");
        assert_eq!(
            serde_json::to_string(&UploadValue::Single("a".into())).unwrap(),
            r#""a""#
        );
        let parsed: UploadValue = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(parsed, UploadValue::Multi(urls(&["a", "b"])));
        let parsed: UploadValue = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, UploadValue::Empty);
    }
}
