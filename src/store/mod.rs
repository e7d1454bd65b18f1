//! Fixed-capacity circular byte store.
//!
//! [`RingStore`] keeps a contiguous, power-of-two sized array and masks its
//! read and write cursors instead of taking a modulo. Every operation runs
//! inside a single critical section. The zero-copy read is the exception:
//! it snapshots the cursors, releases the lock, runs the caller's consumer
//! and only then re-acquires the lock to commit. The consumer may therefore
//! call back into the same store without deadlocking.
//!
//! Writes are all-or-nothing. There is no eviction policy: a write that does
//! not fit in the free space is rejected with
//! [`StoreError::BufferOverflow`] and leaves the store untouched.

use std::{
    fmt,
    sync::{Arc, PoisonError},
};

#[cfg(loom)]
use loom::sync::{Mutex, MutexGuard};
#[cfg(not(loom))]
use std::sync::{Mutex, MutexGuard};

use log::debug;

mod error;

pub use error::{CapacityError, StoreError};

/// Capacity used by [`RingStore::default`].
pub const DEFAULT_CAPACITY: usize = 2048;

/// Cursor state guarded by the store's lock.
struct Ring {
    storage: Arc<[u8]>,
    read_index: usize,
    write_index: usize,
    buffered: usize,
    // Bumped by every operation that consumes bytes. A zero-copy read only
    // commits when the epoch it snapshotted is still current.
    read_epoch: u64,
}

impl Ring {
    fn new(capacity: usize) -> Self {
        Self {
            storage: Arc::from(vec![0u8; capacity]),
            read_index: 0,
            write_index: 0,
            buffered: 0,
            read_epoch: 0,
        }
    }

    fn capacity(&self) -> usize { self.storage.len() }

    fn mask(&self) -> usize { self.capacity() - 1 }

    fn remaining(&self) -> usize { self.capacity() - self.buffered }

    fn copy_in(&mut self, data: &[u8]) {
        let start = self.write_index;
        let first = data.len().min(self.capacity() - start);
        let (head, tail) = data.split_at(first);

        // Copies the storage when a zero-copy view is still outstanding.
        let storage = Arc::make_mut(&mut self.storage);
        storage[start..start + head.len()].copy_from_slice(head);
        storage[..tail.len()].copy_from_slice(tail);

        self.write_index = (start + data.len()) & self.mask();
        self.buffered += data.len();
    }

    fn copy_out(&self, dst: &mut [u8]) {
        let start = self.read_index;
        let first = dst.len().min(self.capacity() - start);
        let (head, tail) = dst.split_at_mut(first);
        head.copy_from_slice(&self.storage[start..start + head.len()]);
        tail.copy_from_slice(&self.storage[..tail.len()]);
    }

    fn consume(&mut self, count: usize) {
        debug_assert!(count <= self.buffered);
        self.read_index = (self.read_index + count) & self.mask();
        self.buffered -= count;
        self.read_epoch = self.read_epoch.wrapping_add(1);
    }

    fn view(&self, count: usize) -> View {
        if self.read_index + count <= self.capacity() {
            View::Shared {
                storage: Arc::clone(&self.storage),
                start: self.read_index,
                len: count,
            }
        } else {
            let mut scratch = vec![0u8; count];
            self.copy_out(&mut scratch);
            View::Assembled(scratch)
        }
    }

    fn hex(&self) -> String {
        let mask = self.mask();
        (0..self.buffered)
            .map(|offset| format!("{:02x}", self.storage[(self.read_index + offset) & mask]))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Bytes handed to a zero-copy consumer.
enum View {
    /// Range of the live storage; no bytes were copied.
    Shared {
        storage: Arc<[u8]>,
        start: usize,
        len: usize,
    },
    /// Wrapped range assembled into a private scratch buffer.
    Assembled(Vec<u8>),
}

impl View {
    fn as_slice(&self) -> &[u8] {
        match self {
            Self::Shared {
                storage,
                start,
                len,
            } => &storage[*start..*start + *len],
            Self::Assembled(bytes) => bytes,
        }
    }
}

/// Thread-safe fixed-capacity ring buffer over raw bytes.
///
/// # Examples
///
/// ```
/// use ringframe::store::RingStore;
///
/// let store = RingStore::new(16);
/// store.write(b"hello").expect("fits");
///
/// let mut out = [0u8; 8];
/// assert_eq!(store.read(&mut out), 5);
/// assert_eq!(&out[..5], b"hello");
/// assert!(store.is_empty());
/// ```
pub struct RingStore {
    capacity: usize,
    ring: Mutex<Ring>,
}

impl RingStore {
    /// Create a store holding exactly `capacity` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or not a power of two. Use
    /// [`try_new`](Self::try_new) for capacities supplied at runtime.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(store) => store,
            Err(err) => panic!("invalid ring store capacity: {err}"),
        }
    }

    /// Fallible constructor validating the capacity.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `capacity` is zero or not a power of two.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringframe::store::{CapacityError, RingStore};
    ///
    /// assert!(RingStore::try_new(1024).is_ok());
    /// assert_eq!(
    ///     RingStore::try_new(1000).err(),
    ///     Some(CapacityError::NotPowerOfTwo(1000))
    /// );
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, CapacityError> {
        if capacity == 0 {
            return Err(CapacityError::Zero);
        }
        if !capacity.is_power_of_two() {
            return Err(CapacityError::NotPowerOfTwo(capacity));
        }
        Ok(Self {
            capacity,
            ring: Mutex::new(Ring::new(capacity)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Ring> {
        // No user code runs under the lock, so a poisoned guard still holds
        // consistent cursors.
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `data` to the store.
    ///
    /// The write is all-or-nothing: when `data` does not fit in the free
    /// space nothing is copied and the buffered count is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidParameter`] if `data` is empty, or
    /// [`StoreError::BufferOverflow`] if it exceeds the free space.
    pub fn write(&self, data: &[u8]) -> Result<(), StoreError> {
        if data.is_empty() {
            return Err(StoreError::InvalidParameter);
        }

        let mut ring = self.lock();
        let available = ring.remaining();
        if data.len() > available {
            debug!(
                "ring store rejected write: requested={}, available={available}",
                data.len()
            );
            return Err(StoreError::BufferOverflow {
                requested: data.len(),
                available,
            });
        }
        ring.copy_in(data);
        Ok(())
    }

    /// Copy up to `out.len()` buffered bytes into `out`.
    ///
    /// Returns the number of bytes produced, which is zero when `out` is
    /// empty or nothing is buffered.
    pub fn read(&self, out: &mut [u8]) -> usize {
        if out.is_empty() {
            return 0;
        }

        let mut ring = self.lock();
        let count = out.len().min(ring.buffered);
        if count == 0 {
            return 0;
        }
        ring.copy_out(&mut out[..count]);
        ring.consume(count);
        count
    }

    /// Expose up to `length` buffered bytes to `consumer` without copying
    /// them out of the store.
    ///
    /// The consumer receives a direct view of the storage when the range is
    /// contiguous; a wrapped range is first assembled into a private scratch
    /// buffer. The lock is released while `consumer` runs.
    ///
    /// The read commits only if `consumer` returns `true`. On `false` nothing
    /// is consumed and the same bytes remain available. Zero is also returned
    /// if another read, drain or clear consumed bytes while the consumer was
    /// running; the bytes are never consumed twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringframe::store::RingStore;
    ///
    /// let store = RingStore::new(8);
    /// store.write(b"abc").expect("fits");
    ///
    /// assert_eq!(store.read_with(3, |bytes| bytes == b"xyz"), 0);
    /// assert_eq!(store.len(), 3);
    /// assert_eq!(store.read_with(3, |bytes| bytes == b"abc"), 3);
    /// assert!(store.is_empty());
    /// ```
    pub fn read_with<F>(&self, length: usize, consumer: F) -> usize
    where
        F: FnOnce(&[u8]) -> bool,
    {
        let (view, epoch) = {
            let ring = self.lock();
            let count = length.min(ring.buffered);
            if count == 0 {
                return 0;
            }
            (ring.view(count), ring.read_epoch)
        };

        if !consumer(view.as_slice()) {
            return 0;
        }

        let count = view.as_slice().len();
        drop(view);
        let mut ring = self.lock();
        if ring.read_epoch != epoch {
            debug!("ring store skipped stale commit of {count} bytes");
            return 0;
        }
        ring.consume(count);
        count
    }

    /// Discard up to `length` buffered bytes without exposing them.
    ///
    /// Returns the number of bytes discarded.
    pub fn drain(&self, length: usize) -> usize {
        let mut ring = self.lock();
        let count = length.min(ring.buffered);
        if count > 0 {
            ring.consume(count);
        }
        count
    }

    /// Reset both cursors and the buffered count.
    ///
    /// Storage is not zeroed; stale bytes are inert until overwritten.
    pub fn clear(&self) {
        let mut ring = self.lock();
        ring.read_index = 0;
        ring.write_index = 0;
        ring.buffered = 0;
        ring.read_epoch = ring.read_epoch.wrapping_add(1);
    }

    /// Total number of bytes the store can hold.
    #[must_use]
    pub fn capacity(&self) -> usize { self.capacity }

    /// Number of unread bytes currently buffered.
    #[must_use]
    pub fn len(&self) -> usize { self.lock().buffered }

    /// Free space available to the next write.
    #[must_use]
    pub fn remaining(&self) -> usize { self.lock().remaining() }

    /// Returns true when nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.lock().buffered == 0 }

    /// Returns true when no free space remains.
    #[must_use]
    pub fn is_full(&self) -> bool { self.lock().buffered == self.capacity }

    /// Render the buffered bytes, oldest first, as space-separated hex.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringframe::store::RingStore;
    ///
    /// let store = RingStore::new(4);
    /// store.write(&[0x0a, 0xff]).expect("fits");
    /// assert_eq!(store.hex_dump(), "0a ff");
    /// ```
    #[must_use]
    pub fn hex_dump(&self) -> String { self.lock().hex() }
}

impl Default for RingStore {
    fn default() -> Self { Self::new(DEFAULT_CAPACITY) }
}

impl fmt::Debug for RingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ring = self.lock();
        f.debug_struct("RingStore")
            .field("capacity", &self.capacity)
            .field("len", &ring.buffered)
            .field("bytes", &ring.hex())
            .finish()
    }
}
