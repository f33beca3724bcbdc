//! Offset pagination
//!
//! The feed pages with a plain `skip`/`take` pair. Either side may be
//! absent, in which case no offset or no limit is applied.

/// Offset/limit window applied to the feed listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    /// Number of matching links to skip
    pub skip: Option<u64>,

    /// Maximum number of links to return
    pub take: Option<u64>,
}

impl Window {
    /// Validate raw GraphQL arguments into a window
    pub fn from_args(skip: Option<i32>, take: Option<i32>) -> crate::Result<Self> {
        Ok(Self {
            skip: non_negative("skip", skip)?,
            take: non_negative("take", take)?,
        })
    }

    /// Apply the window to an already ordered sequence
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let skipped = items.into_iter().skip(to_usize(self.skip.unwrap_or(0)));
        match self.take {
            Some(take) => skipped.take(to_usize(take)).collect(),
            None => skipped.collect(),
        }
    }
}

fn non_negative(name: &str, value: Option<i32>) -> crate::Result<Option<u64>> {
    match value {
        Some(v) if v < 0 => Err(crate::LinkError::InvalidArgument(format!(
            "'{}' must be non-negative",
            name
        ))),
        Some(v) => Ok(Some(u64::from(v.unsigned_abs()))),
        None => Ok(None),
    }
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
