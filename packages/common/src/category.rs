use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Content category of an uploaded file.
///
/// Each category maps to one folder in a user's blob namespace and to one
/// partition of the metadata index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Images,
    Videos,
    Audios,
    Others,
}

impl Category {
    /// Every category, in the order searches and scans visit them.
    pub const ALL: [Category; 4] = [
        Category::Images,
        Category::Videos,
        Category::Audios,
        Category::Others,
    ];

    /// Classify a declared MIME type by its top-level prefix.
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("image/") {
            Category::Images
        } else if mime.starts_with("video/") {
            Category::Videos
        } else if mime.starts_with("audio/") {
            Category::Audios
        } else {
            Category::Others
        }
    }

    /// Folder name inside a user's namespace, also used as the stored partition name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::Videos => "videos",
            Category::Audios => "audios",
            Category::Others => "others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown content category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
