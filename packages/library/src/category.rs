use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Grouping shown in the component library, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Basic,
    Layout,
    Components,
    Forms,
    Pro,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Basic,
        Category::Layout,
        Category::Components,
        Category::Forms,
        Category::Pro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Basic => "Basic",
            Category::Layout => "Layout",
            Category::Components => "Components",
            Category::Forms => "Forms",
            Category::Pro => "Pro",
        }
    }

    /// Parse a filter value where `"all"` (or an empty string) means no filter
    pub fn parse_filter(s: &str) -> Result<Option<Category>, UnknownCategory> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown component category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
