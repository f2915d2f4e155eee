use std::ops::{Index, IndexMut};

use crate::arena::Handle;

//=====================================================================
// Append-only record arena with intrusive doubly-linked lists.
//
// Records live in one contiguous Vec and are addressed by Handle.
// List membership is stored inside the records themselves through the
// Linked trait, which keeps duplicate-and-splice cheap: a copy of a
// record lands at the end of the Vec and is stitched in right after
// its source, so list order survives even though storage order does
// not. Several independent lists can share one arena; each owner
// tracks its own head handle.
//=====================================================================

/// Implemented by record types that carry their own list links.
pub trait Linked: Sized {
    fn next(&self) -> Option<Handle<Self>>;
    fn prev(&self) -> Option<Handle<Self>>;
    fn set_next(&mut self, next: Option<Handle<Self>>);
    fn set_prev(&mut self, prev: Option<Handle<Self>>);
}

pub struct RecordArena<T: Linked> {
    records: Vec<T>,
    ceiling: usize,
}

impl<T: Linked> RecordArena<T> {
    pub fn new(ceiling: usize) -> Self {
        RecordArena {
            records: Vec::new(),
            ceiling,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Place a record in the arena without linking it to any list.
    ///
    /// Running into the ceiling means the loader was configured below
    /// the size of its own input, which nothing downstream can recover
    /// from, so it aborts rather than returning an error.
    pub fn alloc(&mut self, record: T) -> Handle<T> {
        if self.records.len() >= self.ceiling {
            panic!("record arena ceiling exceeded ({} records)", self.ceiling);
        }
        let handle = Handle::new(self.records.len());
        self.records.push(record);
        handle
    }

    /// Allocate a record and link it at the tail of the list that
    /// starts at `head`.
    pub fn append(&mut self, head: Handle<T>, record: T) -> Handle<T> {
        let mut tail = head;
        while let Some(next) = self[tail].next() {
            tail = next;
        }
        let handle = self.alloc(record);
        self[handle].set_prev(Some(tail));
        self[handle].set_next(None);
        self[tail].set_next(Some(handle));
        handle
    }

    /// Clone the record at `source` and splice the copy in directly
    /// after it. Every field of the copy except the list links is
    /// identical to the source; callers patch what must differ.
    pub fn duplicate(&mut self, source: Handle<T>) -> Handle<T>
    where
        T: Clone,
    {
        let copy = self[source].clone();
        let handle = self.alloc(copy);
        let after = self[source].next();
        self[handle].set_prev(Some(source));
        self[handle].set_next(after);
        self[source].set_next(Some(handle));
        if let Some(after) = after {
            self[after].set_prev(Some(handle));
        }
        handle
    }

    /// Unlink a record from its list. The record stays in the arena
    /// and its handle stays indexable; only the list no longer reaches
    /// it. Unlinking a list head is the caller's problem: the head
    /// pointer they hold must be moved to `next` first.
    pub fn remove(&mut self, handle: Handle<T>) {
        let prev = self[handle].prev();
        let next = self[handle].next();
        if let Some(prev) = prev {
            self[prev].set_next(next);
        }
        if let Some(next) = next {
            self[next].set_prev(prev);
        }
        self[handle].set_prev(None);
        self[handle].set_next(None);
    }

    pub fn next(&self, handle: Handle<T>) -> Option<Handle<T>> {
        self[handle].next()
    }

    pub fn prev(&self, handle: Handle<T>) -> Option<Handle<T>> {
        self[handle].prev()
    }

    /// Walk a list from its head in link order.
    pub fn iter(&self, head: Option<Handle<T>>) -> ListIter<'_, T> {
        ListIter {
            arena: self,
            cursor: head,
        }
    }
}

impl<T: Linked> Index<Handle<T>> for RecordArena<T> {
    type Output = T;

    fn index(&self, handle: Handle<T>) -> &T {
        &self.records[handle.index()]
    }
}

impl<T: Linked> IndexMut<Handle<T>> for RecordArena<T> {
    fn index_mut(&mut self, handle: Handle<T>) -> &mut T {
        &mut self.records[handle.index()]
    }
}

pub struct ListIter<'a, T: Linked> {
    arena: &'a RecordArena<T>,
    cursor: Option<Handle<T>>,
}

impl<T: Linked> Iterator for ListIter<'_, T> {
    type Item = Handle<T>;

    fn next(&mut self) -> Option<Handle<T>> {
        let handle = self.cursor?;
        self.cursor = self.arena[handle].next();
        Some(handle)
    }
}
