//! Output file naming.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rtm_model::{Emission, EmissionKind, ListIndex};

/// Lowercase, turn whitespace runs into `_`, keep only `[a-z0-9_-]`.
pub fn sanitize_list_name(name: &str) -> String {
    let mut out = String::new();
    let mut in_space = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('_');
                in_space = true;
            }
            continue;
        }
        in_space = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' || ch == '-' {
            out.push(ch);
        }
    }
    out
}

/// `dir/base.ext` becomes `dir/base_{suffix}.ext`.
pub fn suffixed_output_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{stem}_{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{suffix}"),
    };
    path.with_file_name(file_name)
}

/// The list name shared by every emitted task that has one.
///
/// `None` when no task has a named list or the names differ.
pub fn single_list_name<'a>(emissions: &[Emission<'_>], lists: &'a ListIndex) -> Option<&'a str> {
    let names: BTreeSet<&str> = emissions
        .iter()
        .filter(|emission| emission.kind == EmissionKind::Task)
        .filter_map(|emission| lists.name_for(emission.record))
        .collect();
    if names.len() == 1 {
        names.into_iter().next()
    } else {
        None
    }
}

/// Suffix for output files, from the single list name when there is one.
pub fn list_suffix(emissions: &[Emission<'_>], lists: &ListIndex) -> Option<String> {
    single_list_name(emissions, lists)
        .map(sanitize_list_name)
        .filter(|suffix| !suffix.is_empty())
}
