// src/blocks/mod.rs
//! MDF block structures.
//!
//! Generic machinery ([`BlockHeader`], [`Link`], [`LazyChain`]) plus the
//! block kinds needed to walk from the file header down to the channel
//! groups. Every other kind is reachable as a [`RawBlock`].

mod chain;
mod channel_group_block;
mod common;
mod data_group_block;
mod header_block;
mod identification_block;
mod link;
mod raw_block;
mod text_block;

// Re-export common types
pub use chain::{ChainElement, ChainIter, LazyChain};
pub use common::{BlockHeader, BlockId, BlockParse, HEADER_SIZE, LINK_SIZE};
pub use link::Link;

// Re-export block types
pub use channel_group_block::ChannelGroupBlock;
pub use data_group_block::DataGroupBlock;
pub use header_block::HeaderBlock;
pub use identification_block::IdentificationBlock;
pub use raw_block::RawBlock;
pub use text_block::{MetadataBlock, TextBasedBlock, TextBlock};
