use core::fmt;

use crate::error::{check_window, Result};

/// Fixed-capacity sliding window (overwrite-oldest when full).
///
/// - O(1) push; the evicted value is handed back so running aggregates can
///   subtract it.
/// - Never grows past `capacity`.
#[derive(Clone)]
pub struct SeriesBuffer<T: Copy + Default> {
    capacity: usize,
    len: usize,
    head: usize, // next write index
    data: Vec<T>,
}

impl<T: Copy + Default> fmt::Debug for SeriesBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeriesBuffer")
            .field("capacity", &self.capacity)
            .field("len", &self.len)
            .field("head", &self.head)
            .finish_non_exhaustive()
    }
}

impl<T: Copy + Default> SeriesBuffer<T> {
    pub fn new(capacity: usize) -> Result<Self> {
        check_window(capacity)?;
        Ok(Self {
            capacity,
            len: 0,
            head: 0,
            data: vec![T::default(); capacity],
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
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
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Index (in `data`) of the oldest element.
    #[inline]
    fn start(&self) -> usize {
        (self.head + self.capacity - self.len) % self.capacity
    }

    /// Appends `v`. Returns the element it displaced once the buffer is full.
    #[inline]
    pub fn push(&mut self, v: T) -> Option<T> {
        let evicted = if self.is_full() {
            Some(self.data[self.head])
        } else {
            self.len += 1;
            None
        };
        self.data[self.head] = v;
        self.head = (self.head + 1) % self.capacity;
        evicted
    }

    /// Element by index from oldest (0 = oldest).
    #[inline]
    pub fn get(&self, i: usize) -> Option<T> {
        if i >= self.len {
            return None;
        }
        Some(self.data[(self.start() + i) % self.capacity])
    }

    /// The element the next push will evict, once full.
    #[inline]
    pub fn oldest(&self) -> Option<T> {
        self.get(0)
    }

    #[inline]
    pub fn newest(&self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        Some(self.data[(self.head + self.capacity - 1) % self.capacity])
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter { buf: self, i: 0 }
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

/// Oldest-to-newest iterator.
pub struct Iter<'a, T: Copy + Default> {
    buf: &'a SeriesBuffer<T>,
    i: usize,
}

impl<'a, T: Copy + Default> Iterator for Iter<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let v = self.buf.get(self.i)?;
        self.i += 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buf.len - self.i;
        (remaining, Some(remaining))
    }
}

impl<'a, T: Copy + Default> ExactSizeIterator for Iter<'a, T> {}
