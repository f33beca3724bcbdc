//! Feed query criteria
//!
//! Turns the raw feed arguments into a storage-neutral description of the
//! query: a text predicate, a window and an ordered list of sort keys.
//! Storage backends translate these into their own query language.

use crate::pagination::Window;
use crate::types::{LinkOrderByInput, Sort};

/// Predicate over links
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkPredicate {
    /// No constraint
    MatchAll,

    /// Description or url contains the text
    TextContains(String),
}

impl LinkPredicate {
    /// Build the predicate for an optional free-text filter.
    ///
    /// The empty string is kept as a filter; it matches every link.
    pub fn from_filter(filter: Option<&str>) -> Self {
        match filter {
            Some(text) => LinkPredicate::TextContains(text.to_string()),
            None => LinkPredicate::MatchAll,
        }
    }

    /// Evaluate the predicate against link fields
    pub fn matches(&self, description: &str, url: &str) -> bool {
        match self {
            LinkPredicate::MatchAll => true,
            LinkPredicate::TextContains(text) => {
                description.contains(text.as_str()) || url.contains(text.as_str())
            }
        }
    }
}

/// Sortable link field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Description,
    Url,
    CreatedAt,
}

/// Everything the feed listing needs from storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedCriteria {
    pub predicate: LinkPredicate,
    pub window: Window,
    pub order: Vec<(SortField, Sort)>,
}

impl FeedCriteria {
    /// Assemble criteria from feed arguments.
    ///
    /// Fails before touching storage when the window or ordering is invalid.
    pub fn from_args(
        filter: Option<&str>,
        skip: Option<i32>,
        take: Option<i32>,
        order_by: Option<&[LinkOrderByInput]>,
    ) -> crate::Result<Self> {
        Ok(Self {
            predicate: LinkPredicate::from_filter(filter),
            window: Window::from_args(skip, take)?,
            order: sort_keys(order_by.unwrap_or_default())?,
        })
    }
}

/// Flatten order inputs into sort keys, keeping list order.
pub fn sort_keys(inputs: &[LinkOrderByInput]) -> crate::Result<Vec<(SortField, Sort)>> {
    inputs
        .iter()
        .enumerate()
        .map(|(idx, input)| {
            let set: Vec<(SortField, Sort)> = [
                (SortField::Description, input.description),
                (SortField::Url, input.url),
                (SortField::CreatedAt, input.created_at),
            ]
            .into_iter()
            .filter_map(|(field, sort)| sort.map(|s| (field, s)))
            .collect();

            match set.as_slice() {
                [key] => Ok(*key),
                _ => Err(crate::LinkError::InvalidArgument(format!(
                    "orderBy[{}] must set exactly one field, got {}",
                    idx,
                    set.len()
                ))),
            }
        })
        .collect()
}
