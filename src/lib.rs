#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]

//! # mdf4-blocks
//!
//! Block-level reading of ASAM MDF 4 (Measurement Data Format) files.
//!
//! An MDF4 file is a flat byte array of self-describing blocks that
//! reference each other by absolute file offset. This crate provides the
//! generic machinery every block kind shares:
//!
//! - **Framing**: [`BlockHeader`](blocks::BlockHeader) parses and validates
//!   the tag, length and link table of any block
//! - **Links**: [`Link<T>`](blocks::Link) is a typed, lazily resolved offset
//! - **Chains**: [`LazyChain<T>`](blocks::LazyChain) walks linked lists of
//!   blocks one element at a time
//! - **Flags**: [`BitFlags<E>`](flags::BitFlags) types raw flag fields
//! - **Value types**: [`ValueType`](datatypes::ValueType) describes how
//!   record bytes decode into values
//!
//! plus the block kinds needed to walk a file from its header to its
//! channel groups.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mdf4_blocks::{FileSource, Result};
//! use mdf4_blocks::blocks::{BlockParse, HeaderBlock, IdentificationBlock};
//!
//! fn main() -> Result<()> {
//!     let mut source = FileSource::open("recording.mf4")?;
//!     let id = IdentificationBlock::parse(&mut source)?;
//!     println!("MDF {}", id.version);
//!
//!     let header = HeaderBlock::link().resolve(&mut source)?.expect("header link is never nil");
//!     let groups: Vec<_> = header.data_groups().iter(&mut source).collect::<Result<_>>()?;
//!     for dg in &groups {
//!         for cg in dg.channel_groups().iter(&mut source) {
//!             let cg = cg?;
//!             println!("{} records of {} bytes", cg.cycle_count, cg.data_bytes);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`io`] | Positioned byte sources |
//! | [`blocks`] | Block framing, links, chains and block kinds |
//! | [`flags`] | Typed bit-flag sets |
//! | [`datatypes`] | Value type descriptions |
//! | [`version`] | Format version marker |
//! | [`error`] | Error types and [`Result`] alias |
//!
//! ## Features
//!
//! - `std` (default): file and `Read + Seek` sources, `std::error::Error`
//! - `serde`: `Serialize`/`Deserialize` for value types, flags and links
//!
//! Without `std` the crate is `no_std` and needs only `alloc`. Serde
//! support is tested with `cargo test --features serde`.

extern crate alloc;

pub mod blocks;
pub mod datatypes;
pub mod error;
pub mod flags;
pub mod io;
pub mod version;

// Re-export commonly used types at the crate root
pub use datatypes::ValueType;
pub use error::{Error, ErrorKind, Result};
pub use flags::BitFlags;
#[cfg(feature = "std")]
pub use io::{FileSource, ReaderSource};
pub use io::{ByteSource, SliceSource};
pub use version::FormatVersion;
