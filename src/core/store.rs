//! Filter and sort shapes shared by every store adapter

use regex::Regex;

use crate::core::entity::Record;

/// Filter over a record collection
///
/// `find` and `count` take the same filter, so page contents and the
/// page count always agree.
#[derive(Debug, Clone, Default)]
pub enum Filter {
    /// Match every record
    #[default]
    All,

    /// Match no record
    Nothing,

    /// Match records whose `field` matches `pattern` anywhere in its text
    Contains { field: String, pattern: Regex },
}

/// Whether `name` can be a top-level record field
///
/// Empty names, operator-like names (`$...`) and dotted paths never are.
pub fn is_field_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('$') && !name.contains(['.', '\0'])
}

impl Filter {
    /// Evaluate the filter against a record in memory
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        match self {
            Filter::All => true,
            Filter::Nothing => false,
            Filter::Contains { field, pattern } => record
                .field_text(field)
                .is_some_and(|text| pattern.is_match(&text)),
        }
    }
}

/// Ordering of a listing, by insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sort {
    /// Most recently inserted first
    #[default]
    NewestFirst,

    /// Insertion order
    OldestFirst,
}
