//! Backend list replies.

use serde::Deserialize;

/// A list endpoint reply: either a bare array or a paginated envelope
/// (`{"count": .., "next": .., "results": [..]}`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Bare(Vec<T>),
    Paged { results: Vec<T> },
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Paged { results: items } => items,
        }
    }
}
