//! Hearing category: selects which ledger partition holds the candidates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of hearing categories.
///
/// Closed enumeration: a request that does not name one of these labels is
/// rejected up front with `DocketError::InvalidCategory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Civel,
    Criminal,
    Juri,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Civel, Category::Criminal, Category::Juri];

    /// Match a display label case-insensitively. `None` for anything outside
    /// the enumeration (including the partition keys themselves; requesters
    /// speak labels, not partition names).
    pub fn parse_label(label: &str) -> Option<Category> {
        match label.trim().to_lowercase().as_str() {
            "cível" => Some(Category::Civel),
            "criminal" => Some(Category::Criminal),
            "tribunal do júri" => Some(Category::Juri),
            _ => None,
        }
    }

    /// Display label shown to requesters and candidates.
    pub fn label(self) -> &'static str {
        match self {
            Category::Civel => "Cível",
            Category::Criminal => "Criminal",
            Category::Juri => "Tribunal do Júri",
        }
    }

    /// Key of the ledger partition holding this category's candidates.
    pub fn partition_name(self) -> &'static str {
        match self {
            Category::Civel => "Civel",
            Category::Criminal => "Criminal",
            Category::Juri => "Juri",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
