//! Header to source-path mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maps output column headers to dotted source paths.
///
/// Headers without an entry resolve to themselves, so an empty mapping
/// reads each column from the field of the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping {
    paths: BTreeMap<String, String>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, header: impl Into<String>, path: impl Into<String>) {
        self.paths.insert(header.into(), path.into());
    }

    /// Explicitly mapped path for a header.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.paths.get(header).map(String::as_str)
    }

    /// Source path for a header, defaulting to the header itself.
    pub fn path_for<'a>(&'a self, header: &'a str) -> &'a str {
        self.get(header).filter(|path| !path.is_empty()).unwrap_or(header)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<H: Into<String>, P: Into<String>> FromIterator<(H, P)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (H, P)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (header, path) in iter {
            mapping.insert(header, path);
        }
        mapping
    }
}
