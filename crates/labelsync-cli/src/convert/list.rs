//! Image list formats

use crate::error::Result;
use clap::ValueEnum;
use labelsync_common::naming::join_url;
use labelsync_common::WorkItem;

/// Line format of `labelsync list` output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// `<url>,<label>`
    #[default]
    Csv,
    /// SageMaker Ground Truth manifest: `{"source-ref": "<url>"}`
    Sagemaker,
}

impl ListFormat {
    pub fn format(&self, url: &str, label: &str) -> Result<String> {
        match self {
            ListFormat::Csv => Ok(format!("{},{}", url, label)),
            ListFormat::Sagemaker => {
                let quoted = serde_json::to_string(url)
                    .map_err(|e| crate::error::CliError::Internal(e.to_string()))?;
                Ok(format!("{{\"source-ref\": {}}}", quoted))
            },
        }
    }

    /// Line for one file found by a tree walk; the label is its namespace
    pub fn line_for(&self, prefix: &str, item: &WorkItem) -> Result<String> {
        let relative = if item.namespace.is_empty() {
            item.destination_name.clone()
        } else {
            format!("{}/{}", item.namespace, item.destination_name)
        };
        let url = join_url(prefix, &relative)?;
        self.format(&url, &item.namespace)
    }
}

impl std::fmt::Display for ListFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListFormat::Csv => write!(f, "csv"),
            ListFormat::Sagemaker => write!(f, "sagemaker"),
        }
    }
}

/// AutoML Vision object-detection row
///
/// `<set>,<prefix><path>,<label data>`; the set defaults to `UNASSIGNED`.
#[derive(Debug, Clone, Default)]
pub struct AutomlObjectDetection {
    pub path_prefix: String,
    pub default_set: Option<String>,
}

impl AutomlObjectDetection {
    pub fn new(path_prefix: impl Into<String>) -> Self {
        Self {
            path_prefix: path_prefix.into(),
            default_set: None,
        }
    }

    pub fn format(&self, path: &str, label_data: &str) -> String {
        let set = self.default_set.as_deref().unwrap_or("UNASSIGNED");
        format!("{},{}{},{}", set, self.path_prefix, path, label_data)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_line() {
        let item = WorkItem::new("/data/cats/a.jpg", "cats", "a.jpg");
        assert_eq!(
            ListFormat::Csv.line_for("gs://bucket/train", &item).unwrap(),
            "gs://bucket/train/cats/a.jpg,cats"
        );
    }

    #[test]
    fn test_sagemaker_line_escapes_url() {
        let item = WorkItem::new("/data/top.png", "", "top.png");
        assert_eq!(
            ListFormat::Sagemaker.line_for("s3://bucket", &item).unwrap(),
            r#"{"source-ref": "s3://bucket/top.png"}"#
        );
        assert_eq!(
            ListFormat::Sagemaker.format("a\"b", "").unwrap(),
            r#"{"source-ref": "a\"b"}"#
        );
    }

    #[test]
    fn test_list_format_parse() {
        assert_eq!(ListFormat::from_str("SageMaker", true).unwrap(), ListFormat::Sagemaker);
        assert!(ListFormat::from_str("tsv", true).is_err());
    }

    #[test]
    fn test_automl_row() {
        let fmt = AutomlObjectDetection::new("gs://bucket/");
        assert_eq!(
            fmt.format("img.jpg", "cat,0.1,0.2"),
            "UNASSIGNED,gs://bucket/img.jpg,cat,0.1,0.2"
        );

        let fmt = AutomlObjectDetection {
            default_set: Some("TRAIN".to_string()),
            ..fmt
        };
        assert!(fmt.format("img.jpg", "cat").starts_with("TRAIN,"));
    }
}
