/*!
 * Class FIFOs
 * Four intrusive doubly-linked lanes over one generational slot arena
 *
 * Every queued request lives in exactly one slot and is linked into exactly
 * one lane. Append, head removal, arbitrary unlink, splice and neighbour
 * lookup are all O(1).
 */

use super::request::Request;
use crate::core::types::{RequestClass, RqHandle};
use std::collections::TryReserveError;

#[derive(Debug)]
struct Node {
    request: Request,
    lane: RequestClass,
    prev: Option<u32>,
    next: Option<u32>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Lane {
    head: Option<u32>,
    tail: Option<u32>,
    len: usize,
}

/// The four class FIFOs
#[derive(Debug, Default)]
pub(crate) struct FifoSet {
    slots: Vec<Slot>,
    free: Vec<u32>,
    lanes: [Lane; 4],
    len: usize,
}

impl FifoSet {
    /// Create with `capacity` slots reserved up front
    pub fn with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity)?;
        let mut free = Vec::new();
        free.try_reserve_exact(capacity)?;
        Ok(Self {
            slots,
            free,
            lanes: [Lane::default(); 4],
            len: 0,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn lane_len(&self, lane: RequestClass) -> usize {
        self.lanes[lane.index()].len
    }

    #[inline]
    pub fn lane_is_empty(&self, lane: RequestClass) -> bool {
        self.lanes[lane.index()].head.is_none()
    }

    /// Append to the tail of `lane`
    pub fn push_back(&mut self, lane: RequestClass, request: Request) -> RqHandle {
        let tail = self.lanes[lane.index()].tail;
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: None,
                });
                (self.slots.len() - 1) as u32
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.node = Some(Node {
            request,
            lane,
            prev: tail,
            next: None,
        });
        let handle = RqHandle::new(index, slot.generation);

        match tail.and_then(|t| self.node_at_mut(t)) {
            Some(prev) => prev.next = Some(index),
            None => self.lanes[lane.index()].head = Some(index),
        }
        let entry = &mut self.lanes[lane.index()];
        entry.tail = Some(index);
        entry.len += 1;
        self.len += 1;

        handle
    }

    /// Handle of the oldest request in `lane`
    #[inline]
    pub fn front(&self, lane: RequestClass) -> Option<RqHandle> {
        self.lanes[lane.index()]
            .head
            .and_then(|index| self.handle_at(index))
    }

    /// Remove and return the oldest request in `lane`
    #[cfg(test)]
    pub fn pop_front(&mut self, lane: RequestClass) -> Option<Request> {
        let handle = self.front(lane)?;
        self.remove(handle)
    }

    /// Unlink a request from wherever it is queued and release its slot
    pub fn remove(&mut self, handle: RqHandle) -> Option<Request> {
        self.node(handle)?;
        let index = handle.index() as u32;
        self.unlink(index);

        let slot = &mut self.slots[handle.index()];
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.len -= 1;

        Some(node.request)
    }

    /// Move `handle` to directly after `anchor`, adopting `anchor`'s lane
    ///
    /// Returns false if either handle is stale or they are the same request.
    pub fn move_after(&mut self, handle: RqHandle, anchor: RqHandle) -> bool {
        if handle == anchor || self.node(handle).is_none() {
            return false;
        }
        let (lane, after) = match self.node(anchor) {
            Some(node) => (node.lane, node.next),
            None => return false,
        };

        let index = handle.index() as u32;
        let anchor_index = anchor.index() as u32;
        self.unlink(index);

        // `anchor.next` may have been `handle` itself
        let after = if after == Some(index) {
            self.node_at(anchor_index).and_then(|n| n.next)
        } else {
            after
        };

        if let Some(node) = self.node_at_mut(index) {
            node.lane = lane;
            node.prev = Some(anchor_index);
            node.next = after;
        }
        if let Some(node) = self.node_at_mut(anchor_index) {
            node.next = Some(index);
        }
        match after.and_then(|a| self.node_at_mut(a)) {
            Some(node) => node.prev = Some(index),
            None => self.lanes[lane.index()].tail = Some(index),
        }
        self.lanes[lane.index()].len += 1;

        true
    }

    /// Predecessor within the same lane
    #[inline]
    pub fn prev(&self, handle: RqHandle) -> Option<RqHandle> {
        self.node(handle)?.prev.and_then(|i| self.handle_at(i))
    }

    /// Successor within the same lane
    #[inline]
    pub fn next(&self, handle: RqHandle) -> Option<RqHandle> {
        self.node(handle)?.next.and_then(|i| self.handle_at(i))
    }

    #[inline]
    pub fn get(&self, handle: RqHandle) -> Option<&Request> {
        self.node(handle).map(|n| &n.request)
    }

    #[inline]
    pub fn get_mut(&mut self, handle: RqHandle) -> Option<&mut Request> {
        self.node_mut(handle).map(|n| &mut n.request)
    }

    /// Lane the request is currently linked into
    #[inline]
    pub fn lane_of(&self, handle: RqHandle) -> Option<RequestClass> {
        self.node(handle).map(|n| n.lane)
    }

    /// Requests of `lane` in FIFO order
    pub fn iter_lane(&self, lane: RequestClass) -> LaneIter<'_> {
        LaneIter {
            set: self,
            cursor: self.lanes[lane.index()].head,
        }
    }

    fn node(&self, handle: RqHandle) -> Option<&Node> {
        let slot = self.slots.get(handle.index())?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, handle: RqHandle) -> Option<&mut Node> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.node.as_mut()
    }

    #[inline]
    fn node_at(&self, index: u32) -> Option<&Node> {
        self.slots.get(index as usize)?.node.as_ref()
    }

    #[inline]
    fn node_at_mut(&mut self, index: u32) -> Option<&mut Node> {
        self.slots.get_mut(index as usize)?.node.as_mut()
    }

    #[inline]
    fn handle_at(&self, index: u32) -> Option<RqHandle> {
        let slot = self.slots.get(index as usize)?;
        slot.node.as_ref()?;
        Some(RqHandle::new(index, slot.generation))
    }

    /// Detach a linked node from its lane, leaving it in its slot
    fn unlink(&mut self, index: u32) {
        let (lane, prev, next) = match self.node_at_mut(index) {
            Some(node) => {
                let links = (node.lane, node.prev, node.next);
                node.prev = None;
                node.next = None;
                links
            }
            None => return,
        };

        let entry = &mut self.lanes[lane.index()];
        if entry.head == Some(index) {
            entry.head = next;
        }
        if entry.tail == Some(index) {
            entry.tail = prev;
        }
        entry.len -= 1;

        if let Some(node) = prev.and_then(|p| self.node_at_mut(p)) {
            node.next = next;
        }
        if let Some(node) = next.and_then(|n| self.node_at_mut(n)) {
            node.prev = prev;
        }
    }
}

/// Iterator over one lane, head to tail
pub(crate) struct LaneIter<'a> {
    set: &'a FifoSet,
    cursor: Option<u32>,
}

impl<'a> Iterator for LaneIter<'a> {
    type Item = &'a Request;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.set.node_at(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.request)
    }
}
