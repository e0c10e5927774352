//! Classification output types.
//!
//! Category and priority are closed enumerations; anything a classifier
//! produces outside them is rejected, never coerced.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ticket category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Bug,
    Billing,
    FeatureRequest,
    General,
}

impl Category {
    /// All categories in the fixed reporting order.
    pub const ALL: [Category; 4] = [
        Category::Bug,
        Category::Billing,
        Category::FeatureRequest,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bug => "bug",
            Category::Billing => "billing",
            Category::FeatureRequest => "feature_request",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bug" => Ok(Category::Bug),
            "billing" => Ok(Category::Billing),
            "feature_request" => Ok(Category::FeatureRequest),
            "general" => Ok(Category::General),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

/// Ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

/// The category/priority/rationale triple produced for one ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub priority: Priority,
    pub reasoning: String,
}
