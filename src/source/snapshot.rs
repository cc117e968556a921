use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use crate::models::RawBlock;
use crate::parsing::call_blocks;
use crate::source::CallSource;

/// Replays a saved caller page. A cursor controls how many blocks are
/// visible; each reveal uncovers one more page of them.
pub struct SnapshotSource {
    blocks: Vec<RawBlock>,
    visible: usize,
    page_size: usize,
}

impl SnapshotSource {
    pub fn new(blocks: Vec<RawBlock>, page_size: usize) -> Self {
        Self {
            blocks,
            visible: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn from_html(html: &str, page_size: usize) -> Self {
        Self::new(call_blocks(html), page_size)
    }

    pub fn load(path: impl AsRef<Path>, page_size: usize) -> Result<Self> {
        let path = path.as_ref();
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let source = Self::from_html(&html, page_size);
        info!(
            "Loaded snapshot {} ({} call blocks)",
            path.display(),
            source.total()
        );
        Ok(source)
    }

    pub fn total(&self) -> usize {
        self.blocks.len()
    }

    pub fn visible(&self) -> usize {
        self.visible
    }
}

#[async_trait]
impl CallSource for SnapshotSource {
    async fn navigate(&mut self, caller: &str) -> Result<()> {
        if self.blocks.is_empty() {
            anyhow::bail!("snapshot has no call blocks for '{}'", caller);
        }
        self.visible = self.page_size.min(self.blocks.len());
        Ok(())
    }

    async fn materialized_blocks(&mut self) -> Result<Vec<RawBlock>> {
        Ok(self.blocks[..self.visible].to_vec())
    }

    async fn reveal_more(&mut self) -> Result<bool> {
        if self.visible >= self.blocks.len() {
            return Ok(false);
        }
        self.visible = (self.visible + self.page_size).min(self.blocks.len());
        Ok(true)
    }
}
