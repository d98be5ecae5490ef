//! Lazy traversal of linked block lists.
//!
//! Data groups, channel groups and channels form singly linked lists
//! through a "next" link in each block. [`LazyChain`] walks such a list one
//! block at a time: nothing past the current element is read, nothing is
//! cached, and every call to [`LazyChain::iter`] starts over from the first
//! link.
//!
//! Chains are assumed to be acyclic, as the format requires. A cyclic chain
//! in a corrupt file iterates forever; bound the iteration with
//! [`Iterator::take`] when reading untrusted files.

use core::fmt;

use crate::{Error, Result, blocks::BlockParse, blocks::Link, io::ByteSource};

/// A block kind that is a member of a singly linked list.
pub trait ChainElement: BlockParse {
    /// Link to the following element; nil on the last one.
    fn next_link(&self) -> Link<Self>;
}

/// A restartable chain starting at a given link.
pub struct LazyChain<T> {
    start: Link<T>,
}

impl<T> LazyChain<T> {
    pub const fn new(start: Link<T>) -> Self {
        Self { start }
    }

    pub const fn start(&self) -> Link<T> {
        self.start
    }

    /// `true` when the chain has no elements.
    pub const fn is_empty(&self) -> bool {
        self.start.is_nil()
    }
}

impl<T: ChainElement> LazyChain<T> {
    /// Starts a fresh traversal over `source`.
    pub fn iter<'s, S: ByteSource + ?Sized>(&self, source: &'s mut S) -> ChainIter<'s, T, S> {
        ChainIter {
            current: self.start,
            source,
        }
    }
}

impl<T> Clone for LazyChain<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for LazyChain<T> {}

impl<T> fmt::Debug for LazyChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyChain")
            .field("start", &self.start)
            .finish()
    }
}

/// Cursor of one traversal. Yields `Err` at most once, then ends.
pub struct ChainIter<'s, T, S: ?Sized> {
    current: Link<T>,
    source: &'s mut S,
}

impl<T, S: ?Sized> ChainIter<'_, T, S> {
    /// `true` while the cursor link is not nil.
    pub fn has_next(&self) -> bool {
        !self.current.is_nil()
    }

    /// Link the next call to `next` will resolve.
    pub fn cursor(&self) -> Link<T> {
        self.current
    }
}

impl<T: ChainElement, S: ByteSource + ?Sized> Iterator for ChainIter<'_, T, S> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        let link = self.current;
        // Fuse on error: the cursor only advances past successfully parsed blocks.
        self.current = Link::nil();
        let element = match link.resolve(&mut *self.source) {
            Ok(Some(element)) => element,
            Ok(None) => {
                return Some(Err(Error::UnresolvedLink {
                    address: link.address(),
                }));
            }
            Err(e) => return Some(Err(e)),
        };
        self.current = element.next_link();
        log::trace!(
            "chain step {:#x} -> {:?}",
            link.address(),
            self.current
        );
        Some(Ok(element))
    }
}

impl<T, S: ?Sized> fmt::Debug for ChainIter<'_, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainIter")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}
