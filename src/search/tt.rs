use cozy_chess::{Board, Move};

use crate::search::SearchError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Clone, Copy, Debug)]
pub struct Entry {
    pub key: u64,
    pub depth: u32,
    pub score: i32,
    pub best: Option<Move>,
    pub bound: Bound,
    pub gen: u32,
}

impl Entry {
    /// Whether this entry answers a query at `depth` with window `(alpha, beta)`.
    pub fn usable(&self, depth: u32, alpha: i32, beta: i32) -> bool {
        if self.depth < depth { return false; }
        match self.bound {
            Bound::Exact => true,
            Bound::Lower => self.score >= beta,
            Bound::Upper => self.score <= alpha,
        }
    }
}

const DEFAULT_WAYS: usize = 4;
pub const DEFAULT_CAPACITY: usize = 1 << 16;

#[derive(Default, Clone, Copy)]
struct Bucket {
    slots: [Option<Entry>; DEFAULT_WAYS],
}

/// Bounded, depth-preferred transposition cache.
#[derive(Default)]
pub struct Tt {
    buckets: Vec<Bucket>,
    gen: u32,
}

impl Tt {
    pub fn with_capacity_entries(cap: usize) -> Self {
        let mut tt = Self { buckets: Vec::new(), gen: 0 };
        tt.set_capacity_entries(cap);
        tt
    }

    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|b| *b = Bucket::default());
        self.gen = 0;
    }

    fn bucket_index(&self, key: u64) -> usize {
        let mixed = key ^ (key >> 32);
        (mixed as usize) % self.buckets.len().max(1)
    }

    pub fn get(&self, key: u64) -> Option<Entry> {
        if self.buckets.is_empty() { return None; }
        self.buckets[self.bucket_index(key)].slots.iter().flatten().find(|e| e.key == key).copied()
    }

    /// Looks up `key` and checks the hit against `board`. A stored move that
    /// is not legal in `board` means the slot belongs to a different position.
    pub fn probe(&self, key: u64, board: &Board) -> Result<Option<Entry>, SearchError> {
        match self.get(key) {
            Some(Entry { best: Some(mv), .. }) if !board.is_legal(mv) => Err(SearchError::CacheCorruption { key }),
            hit => Ok(hit),
        }
    }

    pub fn remove(&mut self, key: u64) {
        if self.buckets.is_empty() { return; }
        let idx = self.bucket_index(key);
        for slot in &mut self.buckets[idx].slots {
            if slot.map_or(false, |e| e.key == key) { *slot = None; }
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.slots.iter().flatten().count()).sum()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn capacity(&self) -> usize { self.buckets.len() * DEFAULT_WAYS }

    pub fn set_capacity_entries(&mut self, cap: usize) {
        let entries = cap.max(DEFAULT_WAYS);
        let buckets = (entries + DEFAULT_WAYS - 1) / DEFAULT_WAYS;
        self.buckets.clear();
        self.buckets.resize_with(buckets, Bucket::default);
    }

    pub fn set_capacity_mb(&mut self, mb: usize) {
        let entries = (mb.saturating_mul(1024 * 1024) / std::mem::size_of::<Entry>()).max(DEFAULT_WAYS);
        self.set_capacity_entries(entries);
    }

    pub fn put(&mut self, e: Entry) {
        if self.buckets.is_empty() { return; }
        let idx = self.bucket_index(e.key);
        let e = Entry { gen: self.gen, ..e };
        let bucket = &mut self.buckets[idx];
        // Replace same key if at least as deep
        for slot in &mut bucket.slots {
            if let Some(cur) = *slot {
                if cur.key == e.key {
                    if e.depth >= cur.depth { *slot = Some(e); }
                    return;
                }
            }
        }
        if let Some(slot) = bucket.slots.iter_mut().find(|s| s.is_none()) {
            *slot = Some(e);
            return;
        }
        // Evict lowest depth, then oldest generation
        let victim = bucket.slots.iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|cur| (cur.depth, cur.gen, i)))
            .min()
            .map_or(0, |(_, _, i)| i);
        bucket.slots[victim] = Some(e);
    }

    pub fn bump_generation(&mut self) { self.gen = self.gen.wrapping_add(1); }
}
