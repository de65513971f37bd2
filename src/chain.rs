//! Bucket chains: singly linked, single-owner entry nodes.
//!
//! Each bucket slot owns the head node of its chain and every node owns
//! its successor. Nodes, key copies and value copies are all allocated
//! through the table's allocator, so dropping a node releases all three.
//! Chains are walked front-to-back; nothing points backwards.

use crate::error::MapError;
use allocator_api2::alloc::Allocator;
use allocator_api2::boxed::Box;
use allocator_api2::vec::Vec;
use tracing::warn;

/// A bucket slot: the head of a chain, or empty.
pub(crate) type Link<A> = Option<Box<Node<A>, A>>;

pub(crate) struct Node<A: Allocator> {
    pub(crate) key: Vec<u8, A>,
    pub(crate) value: Vec<u8, A>,
    pub(crate) next: Link<A>,
}

impl<A: Allocator + Clone> Node<A> {
    /// Copy `key` and `value` into a fresh, unlinked node. Anything already
    /// acquired is released again if a later acquisition fails.
    pub(crate) fn try_new(key: &[u8], value: &[u8], alloc: &A) -> Result<Box<Self, A>, MapError> {
        let node = Node {
            key: copy_blob(key, alloc)?,
            value: copy_blob(value, alloc)?,
            next: None,
        };
        Box::try_new_in(node, alloc.clone()).map_err(|_| {
            let requested = core::mem::size_of::<Node<A>>();
            warn!(requested, "entry node allocation refused");
            MapError::Allocation { requested }
        })
    }
}

/// Owned copy of `bytes` in storage acquired from `alloc`.
pub(crate) fn copy_blob<A: Allocator + Clone>(bytes: &[u8], alloc: &A) -> Result<Vec<u8, A>, MapError> {
    let mut blob = Vec::new_in(alloc.clone());
    if blob.try_reserve_exact(bytes.len()).is_err() {
        warn!(requested = bytes.len(), "blob allocation refused");
        return Err(MapError::Allocation {
            requested: bytes.len(),
        });
    }
    blob.extend_from_slice(bytes);
    Ok(blob)
}

/// Link `node` in as the new head of the chain.
pub(crate) fn push_front<A: Allocator>(head: &mut Link<A>, mut node: Box<Node<A>, A>) {
    node.next = head.take();
    *head = Some(node);
}

pub(crate) fn find<'a, A: Allocator>(head: &'a Link<A>, key: &[u8]) -> Option<&'a Node<A>> {
    let mut cur = head.as_deref();
    while let Some(node) = cur {
        if node.key.as_slice() == key {
            return Some(node);
        }
        cur = node.next.as_deref();
    }
    None
}

pub(crate) fn find_mut<'a, A: Allocator>(head: &'a mut Link<A>, key: &[u8]) -> Option<&'a mut Node<A>> {
    let mut cur = head.as_deref_mut();
    while let Some(node) = cur {
        if node.key.as_slice() == key {
            return Some(node);
        }
        cur = node.next.as_deref_mut();
    }
    None
}

/// Detach the node holding `key`, splicing its successor into its place.
/// The chain is consistent again before the caller drops the node.
pub(crate) fn unlink<A: Allocator>(head: &mut Link<A>, key: &[u8]) -> Option<Box<Node<A>, A>> {
    let mut cursor = head;
    while cursor
        .as_deref()
        .is_some_and(|node| node.key.as_slice() != key)
    {
        cursor = &mut cursor.as_mut()?.next;
    }
    let mut node = cursor.take()?;
    *cursor = node.next.take();
    Some(node)
}

/// Release every node in the chain, one at a time. Returns how many
/// nodes were released.
///
/// Dropping a head with its successors still attached would recurse once
/// per node; long chains must not be able to overflow the stack.
pub(crate) fn drain<A: Allocator>(head: &mut Link<A>) -> usize {
    let mut released = 0;
    let mut next = head.take();
    while let Some(mut node) = next {
        next = node.next.take();
        released += 1;
    }
    released
}

pub(crate) fn len<A: Allocator>(head: &Link<A>) -> usize {
    Iter::new(head).count()
}

/// Front-to-back walk over one chain.
pub(crate) struct Iter<'a, A: Allocator> {
    cur: Option<&'a Node<A>>,
}

impl<'a, A: Allocator> Iter<'a, A> {
    pub(crate) fn new(head: &'a Link<A>) -> Self {
        Self { cur: head.as_deref() }
    }
}

impl<'a, A: Allocator> Iterator for Iter<'a, A> {
    type Item = &'a Node<A>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cur?;
        self.cur = node.next.as_deref();
        Some(node)
    }
}
