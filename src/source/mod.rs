pub mod remote;
pub mod snapshot;

pub use remote::RemoteRenderSource;
pub use snapshot::SnapshotSource;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::RawBlock;

/// An incrementally loading caller page.
#[async_trait]
pub trait CallSource: Send {
    /// Load the page for `caller`; errors if no record ever shows up.
    async fn navigate(&mut self, caller: &str) -> Result<()>;

    /// Record blocks currently visible, newest first.
    async fn materialized_blocks(&mut self) -> Result<Vec<RawBlock>>;

    /// Press "load more". Returns false when the control is absent or not actionable.
    async fn reveal_more(&mut self) -> Result<bool>;
}
