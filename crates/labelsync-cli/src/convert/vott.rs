//! VoTT export conversion
//!
//! Reads the per-asset JSON files written by VoTT and produces AutoML
//! object-detection rows. Each tagged region becomes one row holding its
//! first tag and the four corners of its bounding rectangle, normalised by
//! the asset size: `(x1,y1) (x2,y1) (x2,y2) (x1,y2)`.

use super::list::AutomlObjectDetection;
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VottDocument {
    pub asset: VottAsset,
    #[serde(default)]
    pub regions: Vec<VottRegion>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VottAsset {
    pub format: String,
    pub id: String,
    pub name: String,
    pub path: String,
    pub size: VottSize,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct VottSize {
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VottRegion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tags: Vec<String>,
    pub points: Vec<VottPoint>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct VottPoint {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned bounds of a point set
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    fn of(points: &[VottPoint]) -> Option<Self> {
        let first = points.first()?;
        let init = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(points.iter().fold(init, |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    fn is_degenerate(&self) -> bool {
        self.min_x == self.max_x || self.min_y == self.max_y
    }
}

impl VottRegion {
    /// A region needs at least two points spanning a non-zero area
    pub fn has_valid_bounding_box(&self) -> bool {
        self.points.len() >= 2 && Bounds::of(&self.points).is_some_and(|b| !b.is_degenerate())
    }

    /// First tag followed by the eight normalised corner coordinates, or
    /// `None` for an untagged region
    pub fn label_data(&self, size: VottSize) -> Option<String> {
        let tag = self.tags.first()?;
        let b = Bounds::of(&self.points)?;
        let (w, h) = (size.width as f64, size.height as f64);

        let corners = [
            b.min_x / w,
            b.min_y / h,
            b.max_x / w,
            b.min_y / h,
            b.max_x / w,
            b.max_y / h,
            b.min_x / w,
            b.max_y / h,
        ];
        let mut fields = vec![tag.clone()];
        fields.extend(corners.iter().map(|v| v.to_string()));
        Some(fields.join(","))
    }
}

impl VottDocument {
    pub fn has_valid_bounding_box(&self) -> bool {
        self.regions.iter().all(VottRegion::has_valid_bounding_box)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| CliError::json_parse(path.display().to_string(), e))
    }

    /// AutoML rows for every tagged region
    pub fn rows(&self, formatter: &AutomlObjectDetection) -> Vec<String> {
        self.regions
            .iter()
            .filter_map(|region| region.label_data(self.asset.size))
            .map(|data| formatter.format(&self.asset.name, &data))
            .collect()
    }
}

/// `.json` files in `dir`, descending into sub directories when `recursive`
pub fn find_json_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CliError::NotADirectory(dir.display().to_string()));
    }

    let mut walker = walkdir::WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        let is_json = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if entry.file_type().is_file() && is_json {
            files.push(entry.into_path());
        }
    }
    debug!(dir = %dir.display(), count = files.len(), "Found VoTT exports");
    Ok(files)
}

/// Convert every export in `files` into AutoML rows, in file order
pub fn convert_files(files: &[PathBuf], formatter: &AutomlObjectDetection) -> Result<Vec<String>> {
    let mut rows = Vec::new();
    for path in files {
        let doc = VottDocument::load(path)?;
        if !doc.has_valid_bounding_box() {
            warn!(path = %path.display(), "Invalid bounding box");
        }
        if doc.asset.size.width <= 0 || doc.asset.size.height <= 0 {
            warn!(path = %path.display(), "Asset has no size, regions skipped");
            continue;
        }
        rows.extend(doc.rows(formatter));
    }
    Ok(rows)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EXPORT: &str = r#"{
        "asset": {
            "format": "jpg",
            "id": "abc",
            "name": "cat.jpg",
            "path": "file:/images/cat.jpg",
            "size": { "width": 200, "height": 100 },
            "state": 2,
            "type": 1
        },
        "regions": [
            {
                "id": "r1",
                "type": "RECTANGLE",
                "tags": ["cat", "animal"],
                "boundingBox": { "height": 50, "width": 100, "left": 20, "top": 10 },
                "points": [
                    { "x": 20, "y": 10 },
                    { "x": 120, "y": 10 },
                    { "x": 120, "y": 60 },
                    { "x": 20, "y": 60 }
                ]
            },
            {
                "id": "r2",
                "type": "RECTANGLE",
                "tags": [],
                "points": [{ "x": 0, "y": 0 }, { "x": 10, "y": 10 }]
            }
        ]
    }"#;

    #[test]
    fn test_rows_for_tagged_regions() {
        let doc: VottDocument = serde_json::from_str(EXPORT).unwrap();
        assert!(doc.has_valid_bounding_box());

        let rows = doc.rows(&AutomlObjectDetection::new("gs://bucket/"));
        assert_eq!(
            rows,
            vec!["UNASSIGNED,gs://bucket/cat.jpg,cat,0.1,0.1,0.6,0.1,0.6,0.6,0.1,0.6"]
        );
    }

    #[test]
    fn test_degenerate_region() {
        let region = VottRegion {
            tags: vec!["x".to_string()],
            points: vec![VottPoint { x: 5.0, y: 1.0 }, VottPoint { x: 5.0, y: 9.0 }],
            ..Default::default()
        };
        assert!(!region.has_valid_bounding_box());

        let single = VottRegion {
            points: vec![VottPoint { x: 1.0, y: 1.0 }],
            ..Default::default()
        };
        assert!(!single.has_valid_bounding_box());
    }

    #[test]
    fn test_find_and_convert_files() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("nested")).unwrap();
        std::fs::write(temp.path().join("a.json"), EXPORT).unwrap();
        std::fs::write(temp.path().join("nested/b.JSON"), EXPORT).unwrap();
        std::fs::write(temp.path().join("readme.txt"), "").unwrap();

        let flat = find_json_files(temp.path(), false).unwrap();
        assert_eq!(flat.len(), 1);

        let all = find_json_files(temp.path(), true).unwrap();
        assert_eq!(all.len(), 2);

        let rows = convert_files(&all, &AutomlObjectDetection::new("gs://")).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("UNASSIGNED,gs://cat.jpg,cat,"));
    }

    #[test]
    fn test_invalid_json_is_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = convert_files(&[path], &AutomlObjectDetection::default()).unwrap_err();
        assert!(matches!(err, CliError::JsonParse { .. }));
    }
}
