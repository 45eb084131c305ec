//! Destination naming
//!
//! Composes local paths, object keys and URLs from a configured prefix, a
//! namespace and a destination name. Every join is lexical and normalised:
//! empty and `.` segments are dropped, separators are never doubled, and a
//! `..` segment can only remove segments that were added below the prefix,
//! so nothing composed here points outside the prefix it was joined onto.

use crate::error::{LabelsyncError, Result};
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Join `parts` below `root` as a filesystem path.
pub fn join_path(root: impl AsRef<Path>, parts: &[&str]) -> PathBuf {
    let mut below: Vec<&std::ffi::OsStr> = Vec::new();
    for part in parts {
        for component in Path::new(part).components() {
            match component {
                Component::Normal(segment) => below.push(segment),
                Component::ParentDir => {
                    below.pop();
                },
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {},
            }
        }
    }

    let mut path = root.as_ref().to_path_buf();
    for segment in below {
        path.push(segment);
    }
    path
}

/// Join `parts` below `prefix` as a `/`-separated object key.
///
/// A leading `/` on the prefix is trimmed, since object keys are relative to
/// the bucket root.
pub fn join_key(prefix: &str, parts: &[&str]) -> String {
    let mut segments = normalize_segments(prefix.split('/'));
    let below = normalize_segments(parts.iter().flat_map(|part| part.split('/')));
    segments.extend(below);
    segments.join("/")
}

/// Join `rel` onto a URL-style prefix.
///
/// When `prefix` is an absolute URL its path component is replaced by the
/// normalised join while scheme, host and query are preserved. Anything that
/// is not an absolute URL is treated as a plain path prefix.
pub fn join_url(prefix: &str, rel: &str) -> Result<String> {
    match Url::parse(prefix) {
        Ok(mut url) => {
            if url.cannot_be_a_base() {
                return Err(LabelsyncError::invalid_url(prefix, "URL cannot carry a path"));
            }

            // `gs://` style prefixes with no host: the first segment becomes the host
            if url.host_str().map_or(true, str::is_empty) && url.path().is_empty() {
                return Ok(format!("{}{}", prefix, join_key("", &[rel])));
            }

            let joined = join_key(url.path(), &[rel]);
            url.set_path(&format!("/{}", joined));
            Ok(url.to_string())
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let joined = join_key(prefix, &[rel]);
            if prefix.starts_with('/') {
                Ok(format!("/{}", joined))
            } else {
                Ok(joined)
            }
        },
        Err(e) => Err(LabelsyncError::invalid_url(prefix, e)),
    }
}

/// Destination file name for a download: `name` plus the extension of the
/// source URL's decoded path. The extension is taken from the text after the
/// last `/`, so a path ending in `/` has none. Query strings and fragments
/// never contribute.
pub fn file_name_with_extension(name: &str, source_url: &str) -> String {
    let raw_path = match Url::parse(source_url) {
        Ok(url) => url.path().to_string(),
        Err(_) => source_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    let url_path = urlencoding::decode(&raw_path)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(raw_path);

    let last = url_path.rsplit('/').next().unwrap_or_default();
    match last.rfind('.') {
        Some(dot) => format!("{}{}", name, &last[dot..]),
        None => name.to_string(),
    }
}

fn normalize_segments<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut segments = Vec::new();
    for segment in raw {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop();
            },
            other => segments.push(other),
        }
    }
    segments
}
