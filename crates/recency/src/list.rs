//! Recency list: a doubly-linked list stored in a slot arena
//!
//! Entries live in `Vec<Option<Node>>` and link to each other by slot index,
//! so the key index can hold plain `Slot` values instead of pointers. Freed
//! slots go on a free list and are reused by the next push.

use std::iter::FusedIterator;

/// Stable handle to an entry in a [`RecencyList`]
///
/// Valid until the entry is removed or evicted. A stale slot is detected
/// (the arena cell is vacant) unless it has already been reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Slot(usize);

/// Node in the recency list
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Entries ordered from most recently used (front) to least (back)
pub(crate) struct RecencyList<K, V> {
    nodes: Vec<Option<Node<K, V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    /// Create an empty list with room for `capacity` entries
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recently used slot
    #[cfg(any(test, debug_assertions))]
    pub(crate) fn front(&self) -> Option<Slot> {
        self.head.map(Slot)
    }

    /// Least recently used slot
    #[cfg(any(test, debug_assertions))]
    pub(crate) fn back(&self) -> Option<Slot> {
        self.tail.map(Slot)
    }

    /// Insert a new entry as the most recently used one
    pub(crate) fn push_front(&mut self, key: K, value: V) -> Slot {
        let idx = self.alloc_node();
        self.nodes[idx] = Some(Node {
            key,
            value,
            prev: None,
            next: None,
        });
        self.link_front(idx);
        self.len += 1;
        Slot(idx)
    }

    /// Detach an entry and hand back its key and value
    ///
    /// Returns `None` without touching the list if `slot` is vacant.
    pub(crate) fn remove(&mut self, slot: Slot) -> Option<(K, V)> {
        let idx = slot.0;
        if !self.is_occupied(idx) {
            return None;
        }

        self.unlink(idx);
        self.len -= 1;
        self.free_list.push(idx);
        self.nodes[idx].take().map(|node| (node.key, node.value))
    }

    /// Move an existing entry to the front, reusing its slot
    pub(crate) fn promote(&mut self, slot: Slot) {
        let idx = slot.0;
        if self.head == Some(idx) || !self.is_occupied(idx) {
            return;
        }

        self.unlink(idx);
        self.link_front(idx);
    }

    /// Remove the least recently used entry
    pub(crate) fn evict_back(&mut self) -> Option<(K, V)> {
        let tail = self.tail?;
        self.remove(Slot(tail))
    }

    pub(crate) fn get(&self, slot: Slot) -> Option<&V> {
        self.node(slot.0).map(|node| &node.value)
    }

    pub(crate) fn get_mut(&mut self, slot: Slot) -> Option<&mut V> {
        self.nodes
            .get_mut(slot.0)
            .and_then(Option::as_mut)
            .map(|node| &mut node.value)
    }

    #[cfg(any(test, debug_assertions))]
    pub(crate) fn key(&self, slot: Slot) -> Option<&K> {
        self.node(slot.0).map(|node| &node.key)
    }

    /// Iterate entries from front to back
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    fn node(&self, idx: usize) -> Option<&Node<K, V>> {
        self.nodes.get(idx).and_then(Option::as_ref)
    }

    fn is_occupied(&self, idx: usize) -> bool {
        self.node(idx).is_some()
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(head_idx) => {
                if let Some(head) = &mut self.nodes[head_idx] {
                    head.prev = Some(idx);
                }
            }
            None => {
                self.tail = Some(idx);
            }
        }

        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match &mut self.nodes[idx] {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }

    /// Walk the links in both directions and check them against `len`
    #[cfg(any(test, debug_assertions))]
    pub(crate) fn debug_validate(&self) {
        let mut forward = 0;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.node(idx).expect("linked slot must be occupied");
            assert_eq!(node.prev, prev, "prev link of slot {} is broken", idx);
            prev = Some(idx);
            cursor = node.next;
            forward += 1;
            assert!(forward <= self.len, "cycle in recency list");
        }
        assert_eq!(prev, self.tail, "tail does not match last linked slot");
        assert_eq!(forward, self.len, "linked entries differ from len");

        let occupied = self.nodes.iter().filter(|n| n.is_some()).count();
        assert_eq!(occupied, self.len, "orphaned slots in arena");
        assert_eq!(
            self.nodes.len() - occupied,
            self.free_list.len(),
            "free list out of sync with vacant slots"
        );
    }
}

/// Front-to-back iterator over a [`RecencyList`]
pub(crate) struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &RecencyList<u32, &str>) -> Vec<u32> {
        list.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_push_front_order() {
        let mut list = RecencyList::with_capacity(4);
        list.push_front(1, "a");
        list.push_front(2, "b");
        list.push_front(3, "c");

        assert_eq!(keys(&list), vec![3, 2, 1]);
        assert_eq!(list.len(), 3);
        list.debug_validate();
    }

    #[test]
    fn test_empty_list() {
        let mut list: RecencyList<u32, &str> = RecencyList::with_capacity(0);

        assert!(list.is_empty());
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert_eq!(list.evict_back(), None);
        list.debug_validate();
    }

    #[test]
    fn test_single_entry_remove_clears_ends() {
        let mut list = RecencyList::with_capacity(1);
        let slot = list.push_front(1, "a");

        assert_eq!(list.front(), Some(slot));
        assert_eq!(list.back(), Some(slot));

        assert_eq!(list.remove(slot), Some((1, "a")));
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert!(list.is_empty());
        list.debug_validate();
    }

    #[test]
    fn test_remove_middle_and_ends() {
        let mut list = RecencyList::with_capacity(4);
        let one = list.push_front(1, "a");
        let two = list.push_front(2, "b");
        let three = list.push_front(3, "c");
        let four = list.push_front(4, "d");

        list.remove(two);
        assert_eq!(keys(&list), vec![4, 3, 1]);
        list.remove(four);
        assert_eq!(keys(&list), vec![3, 1]);
        assert_eq!(list.front(), Some(three));
        list.remove(one);
        assert_eq!(keys(&list), vec![3]);
        assert_eq!(list.back(), Some(three));
        list.debug_validate();
    }

    #[test]
    fn test_remove_vacant_slot_is_noop() {
        let mut list = RecencyList::with_capacity(2);
        let slot = list.push_front(1, "a");
        list.push_front(2, "b");

        assert!(list.remove(slot).is_some());
        assert_eq!(list.remove(slot), None);
        assert_eq!(keys(&list), vec![2]);
        list.debug_validate();
    }

    #[test]
    fn test_promote() {
        let mut list = RecencyList::with_capacity(3);
        let one = list.push_front(1, "a");
        list.push_front(2, "b");
        let three = list.push_front(3, "c");

        list.promote(one);
        assert_eq!(keys(&list), vec![1, 3, 2]);

        // already at front
        list.promote(one);
        assert_eq!(keys(&list), vec![1, 3, 2]);

        list.promote(three);
        assert_eq!(keys(&list), vec![3, 1, 2]);
        list.debug_validate();
    }

    #[test]
    fn test_promote_single_entry() {
        let mut list = RecencyList::with_capacity(1);
        let slot = list.push_front(7, "x");
        list.promote(slot);

        assert_eq!(list.front(), Some(slot));
        assert_eq!(list.back(), Some(slot));
        list.debug_validate();
    }

    #[test]
    fn test_evict_back() {
        let mut list = RecencyList::with_capacity(3);
        list.push_front(1, "a");
        list.push_front(2, "b");
        list.push_front(3, "c");

        assert_eq!(list.evict_back(), Some((1, "a")));
        assert_eq!(list.evict_back(), Some((2, "b")));
        assert_eq!(keys(&list), vec![3]);
        list.debug_validate();
    }

    #[test]
    fn test_slot_reuse() {
        let mut list = RecencyList::with_capacity(2);
        list.push_front(1, "a");
        list.push_front(2, "b");
        list.evict_back();
        let slot = list.push_front(3, "c");

        assert_eq!(slot, Slot(0));
        assert_eq!(list.key(slot), Some(&3));
        assert_eq!(list.get(slot), Some(&"c"));
        list.debug_validate();
    }

    #[test]
    fn test_get_mut_in_place() {
        let mut list = RecencyList::with_capacity(1);
        let slot = list.push_front(1, "a");
        *list.get_mut(slot).unwrap() = "z";

        assert_eq!(list.get(slot), Some(&"z"));
    }

    #[test]
    fn test_iter_len() {
        let mut list = RecencyList::with_capacity(3);
        list.push_front(1, "a");
        list.push_front(2, "b");

        assert_eq!(list.iter().len(), 2);
    }
}
