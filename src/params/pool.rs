// Reusable buffer pools for captured parameters

use parking_lot::{const_mutex, Mutex};

use super::cache::CacheEntry;
use super::range_cache::RangeEntry;

/// Buffers parked per pool before extras are simply dropped
const SHARED_MAX_RETAINED: usize = 64;

static SHARED: ParameterPool = ParameterPool::new(SHARED_MAX_RETAINED);

/// A buffer that can be emptied and handed out again.
pub trait Reusable {
    fn with_capacity(capacity: usize) -> Self;
    fn capacity(&self) -> usize;
    fn clear(&mut self);
}

impl<T> Reusable for Vec<T> {
    fn with_capacity(capacity: usize) -> Self {
        Vec::with_capacity(capacity)
    }

    fn capacity(&self) -> usize {
        Vec::capacity(self)
    }

    fn clear(&mut self) {
        Vec::clear(self)
    }
}

impl Reusable for String {
    fn with_capacity(capacity: usize) -> Self {
        String::with_capacity(capacity)
    }

    fn capacity(&self) -> usize {
        String::capacity(self)
    }

    fn clear(&mut self) {
        String::clear(self)
    }
}

/// Thread-safe pool of reusable buffers.
pub struct BufferPool<B> {
    retained: Mutex<Vec<B>>,
    max_retained: usize,
}

impl<B> BufferPool<B> {
    pub const fn new(max_retained: usize) -> Self {
        Self {
            retained: const_mutex(Vec::new()),
            max_retained,
        }
    }

    /// Number of buffers currently parked in the pool
    pub fn retained(&self) -> usize {
        self.retained.lock().len()
    }
}

impl<B: Reusable> BufferPool<B> {
    /// Take a buffer with room for at least `capacity` items, allocating one
    /// if nothing suitable is parked.
    pub fn rent(&self, capacity: usize) -> B {
        let mut retained = self.retained.lock();
        if let Some(index) = retained.iter().position(|b| b.capacity() >= capacity) {
            return retained.swap_remove(index);
        }
        drop(retained);

        B::with_capacity(capacity)
    }

    /// Park a buffer for reuse. Past `max_retained` it is dropped instead.
    pub fn give_back(&self, mut buffer: B) {
        buffer.clear();
        let mut retained = self.retained.lock();
        if retained.len() < self.max_retained {
            retained.push(buffer);
        }
    }

    /// Rent a buffer that returns itself when released or dropped.
    pub fn rent_scoped(&self, capacity: usize) -> Rental<'_, B> {
        Rental {
            pool: self,
            buffer: Some(self.rent(capacity)),
        }
    }
}

/// A rented buffer. Goes back to its pool exactly once, on the first
/// [`Rental::release`] or on drop.
pub struct Rental<'p, B: Reusable> {
    pool: &'p BufferPool<B>,
    buffer: Option<B>,
}

impl<'p, B: Reusable> Rental<'p, B> {
    /// `None` once released
    pub fn get(&self) -> Option<&B> {
        self.buffer.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut B> {
        self.buffer.as_mut()
    }

    pub fn is_released(&self) -> bool {
        self.buffer.is_none()
    }

    pub fn release(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.give_back(buffer);
        }
    }
}

impl<'p, T> Rental<'p, Vec<T>> {
    /// Swap in a buffer `increment` items larger, moving the contents over and
    /// returning the old buffer to the pool.
    pub fn grow(&mut self, increment: usize) {
        if let Some(current) = self.buffer.as_mut() {
            let mut larger = self.pool.rent(current.capacity() + increment);
            larger.append(current);
            let old = std::mem::replace(current, larger);
            self.pool.give_back(old);
        }
    }
}

impl<'p, B: Reusable> Drop for Rental<'p, B> {
    fn drop(&mut self) {
        self.release();
    }
}

/// The pools backing parameter caches.
pub struct ParameterPool {
    pub(crate) entries: BufferPool<Vec<CacheEntry>>,
    pub(crate) text: BufferPool<String>,
    pub(crate) ranges: BufferPool<Vec<RangeEntry>>,
}

impl ParameterPool {
    pub const fn new(max_retained: usize) -> Self {
        Self {
            entries: BufferPool::new(max_retained),
            text: BufferPool::new(max_retained),
            ranges: BufferPool::new(max_retained),
        }
    }

    /// Process-wide pool used by [`crate::ParameterCache::rent`] and friends
    pub fn shared() -> &'static ParameterPool {
        &SHARED
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            entry_buffers: self.entries.retained(),
            text_buffers: self.text.retained(),
            range_buffers: self.ranges.retained(),
        }
    }
}

/// Buffers parked in a [`ParameterPool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub entry_buffers: usize,
    pub text_buffers: usize,
    pub range_buffers: usize,
}
