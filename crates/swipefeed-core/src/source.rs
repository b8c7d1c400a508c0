//! The data-layer contract the controller drives

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Result of one `load_more` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageOutcome {
    /// No further pages exist
    pub exhausted: bool,
}

/// Supplies fresh and additional feed content.
///
/// Both operations may take arbitrarily long and may have side effects; the
/// controller never cancels them, it only ignores results that arrive after
/// the view was disposed.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn refresh(&self) -> Result<()>;

    async fn load_more(&self) -> Result<PageOutcome>;
}
