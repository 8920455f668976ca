//! Paged slab allocator for [`Value`]s.
//!
//! Values live in fixed-size pages that are only ever appended, so a slot
//! never moves once it has been handed out. Reclaimed slots are threaded onto
//! an intrusive free list. When the free list runs dry a new page is added,
//! each one twice the size of the previous up to a maximum.
//!
//! Handles are generation-checked indices: releasing a slot bumps its
//! generation so any outstanding [`ValueId`] for it stops resolving instead of
//! aliasing whatever is allocated there next.

use crate::Vec;
use crate::values::Value;

/// Handle to a value owned by a [`ValueArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueId {
    index: u32,
    generation: u32,
}

static_assertions::assert_eq_size!(ValueId, u64);

impl ValueId {
    pub fn index(&self) -> u32 {
        self.index
    }
}

#[derive(Debug)]
enum Slot {
    Occupied { generation: u32, value: Value },
    Vacant { generation: u32, next_free: Option<u32> },
}

impl Slot {
    fn generation(&self) -> u32 {
        match self {
            Slot::Occupied { generation, .. } | Slot::Vacant { generation, .. } => *generation,
        }
    }
}

#[derive(Debug)]
pub struct ValueArena {
    pages: Vec<Vec<Slot>>,
    /// Global index of the first slot of each page.
    page_starts: Vec<u32>,
    free_head: Option<u32>,
    initial_capacity: usize,
    next_page_size: usize,
    max_page_size: usize,
    /// Generation given to the slots of newly created pages.
    base_generation: u32,
    live: usize,
}

impl ValueArena {
    /// Create an empty arena. No memory is allocated until the first
    /// [`acquire`](Self::acquire).
    ///
    /// The first page holds `initial_capacity` slots and every following page
    /// doubles in size, capped at `max_capacity`.
    pub fn new(initial_capacity: usize, max_capacity: usize) -> Self {
        let max_page_size = max_capacity.max(1);
        let initial_capacity = initial_capacity.clamp(1, max_page_size);
        Self {
            pages: Vec::new(),
            page_starts: Vec::new(),
            free_head: None,
            initial_capacity,
            next_page_size: initial_capacity,
            max_page_size,
            base_generation: 0,
            live: 0,
        }
    }

    /// Number of values currently allocated.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Total number of slots across all pages.
    pub fn capacity(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Store `value` in a free slot and return its handle.
    pub fn acquire(&mut self, value: impl Into<Value>) -> ValueId {
        let index = match self.free_head {
            Some(index) => index,
            None => self.grow(),
        };
        let slot = self.slot_mut(index);
        let (generation, next_free) = match *slot {
            Slot::Vacant {
                generation,
                next_free,
            } => (generation, next_free),
            Slot::Occupied { .. } => unreachable!("free list points at an occupied slot"),
        };
        *slot = Slot::Occupied {
            generation,
            value: value.into(),
        };
        self.free_head = next_free;
        self.live += 1;
        ValueId { index, generation }
    }

    /// Destroy the value behind `id` and return its slot to the free list.
    ///
    /// Returns the released value, or `None` if `id` is stale. Elements of a
    /// released list are not touched.
    pub fn release(&mut self, id: ValueId) -> Option<Value> {
        self.get(id)?;
        let free_head = self.free_head;
        let slot = self.slot_mut(id.index);
        let old = core::mem::replace(
            slot,
            Slot::Vacant {
                generation: id.generation.wrapping_add(1),
                next_free: free_head,
            },
        );
        self.free_head = Some(id.index);
        self.live -= 1;
        match old {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get(&self, id: ValueId) -> Option<&Value> {
        match self.slot(id.index)? {
            Slot::Occupied { generation, value } if *generation == id.generation => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: ValueId) -> Option<&mut Value> {
        let (page, offset) = self.locate(id.index)?;
        match &mut self.pages[page][offset] {
            Slot::Occupied { generation, value } if *generation == id.generation => Some(value),
            _ => None,
        }
    }

    pub fn contains(&self, id: ValueId) -> bool {
        self.get(id).is_some()
    }

    /// Release every value but keep all pages for reuse.
    ///
    /// Every previously issued handle becomes stale.
    pub fn reclaim(&mut self) {
        let mut next_free = None;
        for (page, &start) in self.pages.iter_mut().zip(&self.page_starts).rev() {
            for (offset, slot) in page.iter_mut().enumerate().rev() {
                let generation = match slot {
                    Slot::Occupied { generation, .. } => generation.wrapping_add(1),
                    Slot::Vacant { generation, .. } => *generation,
                };
                *slot = Slot::Vacant {
                    generation,
                    next_free,
                };
                next_free = Some(start + offset as u32);
            }
        }
        self.free_head = next_free;
        tracing::debug!(
            released = self.live,
            capacity = self.capacity(),
            "Reclaimed value arena"
        );
        self.live = 0;
    }

    /// Release every value and return all pages to the system.
    pub fn clear(&mut self) {
        // Handles issued before the clear must not resolve against new pages.
        let max_generation = self
            .pages
            .iter()
            .flatten()
            .map(Slot::generation)
            .max()
            .unwrap_or(self.base_generation);
        self.base_generation = max_generation.wrapping_add(1);
        self.pages.clear();
        self.page_starts.clear();
        self.free_head = None;
        self.next_page_size = self.initial_capacity;
        self.live = 0;
    }

    fn grow(&mut self) -> u32 {
        let size = self.next_page_size;
        self.next_page_size = (size * 2).min(self.max_page_size);

        let start = self.capacity() as u32;
        let generation = self.base_generation;
        let mut page = Vec::with_capacity(size);
        for offset in 0..size as u32 {
            let next_free = if offset + 1 < size as u32 {
                Some(start + offset + 1)
            } else {
                self.free_head
            };
            page.push(Slot::Vacant {
                generation,
                next_free,
            });
        }
        self.pages.push(page);
        self.page_starts.push(start);
        self.free_head = Some(start);

        tracing::debug!(
            page = self.pages.len(),
            size,
            capacity = self.capacity(),
            "Grew value arena"
        );
        start
    }

    fn locate(&self, index: u32) -> Option<(usize, usize)> {
        let page = self.page_starts.partition_point(|&start| start <= index);
        let page = page.checked_sub(1)?;
        let offset = (index - self.page_starts[page]) as usize;
        (offset < self.pages[page].len()).then_some((page, offset))
    }

    fn slot(&self, index: u32) -> Option<&Slot> {
        let (page, offset) = self.locate(index)?;
        Some(&self.pages[page][offset])
    }

    fn slot_mut(&mut self, index: u32) -> &mut Slot {
        let (page, offset) = self
            .locate(index)
            .unwrap_or_else(|| unreachable!("slot index {} out of range", index));
        &mut self.pages[page][offset]
    }
}

impl Default for ValueArena {
    fn default() -> Self {
        Self::new(64, 512)
    }
}

#[cfg(test)]
#[path = "arena_test.rs"]
mod arena_test;
