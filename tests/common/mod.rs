//! Synthetic MDF file layouts for integration tests.

#![allow(dead_code)]

use mdf4_blocks::blocks::{BlockHeader, BlockId};

/// Appends blocks to an in-memory file, 8-byte aligned, and returns their
/// offsets.
pub struct FileBuilder {
    pub bytes: Vec<u8>,
}

impl FileBuilder {
    /// Starts a file with an identification block.
    pub fn new(version: &[u8; 8]) -> Self {
        let mut bytes = Vec::with_capacity(4096);
        bytes.extend_from_slice(b"MDF     ");
        bytes.extend_from_slice(version);
        bytes.extend_from_slice(b"tests   ");
        bytes.extend_from_slice(&[0u8; 4]);
        bytes.extend_from_slice(&410u16.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 34]);
        assert_eq!(bytes.len(), 64);
        Self { bytes }
    }

    /// Empty file without identification block.
    pub fn raw() -> Self {
        Self { bytes: Vec::new() }
    }

    pub fn position(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn block(&mut self, id: BlockId, links: &[u64], payload: &[u8]) -> u64 {
        let at = self.position();
        let header = BlockHeader::new(id, links.to_vec(), payload.len() as u64);
        self.bytes.extend(header.to_bytes());
        self.bytes.extend_from_slice(payload);
        while self.bytes.len() % 8 != 0 {
            self.bytes.push(0);
        }
        at
    }

    /// Overwrites link `index` of the block at `at`.
    pub fn patch_link(&mut self, at: u64, index: usize, target: u64) {
        let pos = at as usize + 24 + 8 * index;
        self.bytes[pos..pos + 8].copy_from_slice(&target.to_le_bytes());
    }

    pub fn text(&mut self, text: &str) -> u64 {
        let mut payload = text.as_bytes().to_vec();
        payload.push(0);
        self.block(BlockId::TX, &[], &payload)
    }

    pub fn header(&mut self, first_dg: u64, comment: u64) -> u64 {
        let mut payload = Vec::with_capacity(32);
        payload.extend_from_slice(&0u64.to_le_bytes());
        payload.extend_from_slice(&[0u8; 8]);
        payload.extend_from_slice(&0f64.to_le_bytes());
        payload.extend_from_slice(&0f64.to_le_bytes());
        self.block(BlockId::HD, &[first_dg, 0, 0, 0, 0, comment], &payload)
    }

    pub fn data_group(&mut self, next: u64, first_cg: u64, record_id_size: u8) -> u64 {
        let mut payload = vec![record_id_size];
        payload.extend_from_slice(&[0u8; 7]);
        self.block(BlockId::DG, &[next, first_cg, 0, 0], &payload)
    }

    pub fn channel_group(&mut self, next: u64, name: u64, record_id: u64, data_bytes: u32) -> u64 {
        let mut payload = Vec::with_capacity(32);
        payload.extend_from_slice(&record_id.to_le_bytes());
        payload.extend_from_slice(&10u64.to_le_bytes());
        payload.extend_from_slice(&0u16.to_le_bytes());
        payload.extend_from_slice(&0u16.to_le_bytes());
        payload.extend_from_slice(&[0u8; 4]);
        payload.extend_from_slice(&data_bytes.to_le_bytes());
        payload.extend_from_slice(&0u32.to_le_bytes());
        self.block(BlockId::CG, &[next, 0, name, 0, 0, 0], &payload)
    }
}
