use chrono::Local;
use serde::{Deserialize, Serialize};

/// Display format of the creation timestamp.
pub const DATE_TIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Free-form provenance of a parameter-set file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub date_time: Option<String>,
    pub creator: Option<String>,
    pub tool_name: Option<String>,
    pub tool_version: Option<String>,
    pub project_name: Option<String>,
    pub project_version: Option<String>,
    pub user_comment: Option<String>,
}

impl FileInfo {
    /// File info stamped with the current local time and the writing tool.
    #[must_use]
    pub fn stamped(tool_name: impl Into<String>, tool_version: impl Into<String>) -> Self {
        Self {
            date_time: Some(Local::now().format(DATE_TIME_FORMAT).to_string()),
            tool_name: Some(tool_name.into()),
            tool_version: Some(tool_version.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    #[must_use]
    pub fn with_project(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self.project_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_user_comment(mut self, comment: impl Into<String>) -> Self {
        self.user_comment = Some(comment.into());
        self
    }

    /// True when every field is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_some())
    }

    /// Fields paired with display labels, in file order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, Option<&str>); 7] {
        [
            ("Date/time", self.date_time.as_deref()),
            ("Creator", self.creator.as_deref()),
            ("Tool name", self.tool_name.as_deref()),
            ("Tool version", self.tool_version.as_deref()),
            ("Project name", self.project_name.as_deref()),
            ("Project version", self.project_version.as_deref()),
            ("User comment", self.user_comment.as_deref()),
        ]
    }
}
