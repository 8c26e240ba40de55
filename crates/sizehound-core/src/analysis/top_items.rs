/// Bounded best-of-stream selection.
///
/// `TopItemsTracker<T>` keeps the `capacity` best items seen so far under a
/// caller-supplied ordering. Items that compare `Less` are *better* and sort
/// first, so a descending-by-size tracker uses `|a, b| b.size.cmp(&a.size)`.
///
/// Many workers call [`TopItemsTracker::add`] concurrently; every mutation
/// happens inside one `parking_lot::Mutex` critical section. Insertion is
/// O(capacity) worst case, and usually O(1) because most candidates on a
/// real file system are rejected against the current worst item.
use crate::error::ScanError;
use parking_lot::Mutex;
use std::cmp::Ordering;
use std::fmt;

type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

struct Inner<T> {
    /// Kept items, best first. Never longer than `capacity`.
    items: Vec<T>,
    disposed: bool,
}

/// Fixed-capacity, order-maintaining top-N selector.
pub struct TopItemsTracker<T> {
    capacity: usize,
    compare: Comparator<T>,
    inner: Mutex<Inner<T>>,
}

impl<T> TopItemsTracker<T> {
    /// Create a tracker keeping at most `capacity` items.
    ///
    /// Fails with [`ScanError::InvalidArgument`] when `capacity` is zero.
    pub fn new<F>(capacity: usize, compare: F) -> Result<Self, ScanError>
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        if capacity == 0 {
            return Err(ScanError::invalid("tracker capacity must be positive"));
        }
        Ok(Self {
            capacity,
            compare: Box::new(compare),
            inner: Mutex::new(Inner {
                items: Vec::with_capacity(capacity),
                disposed: false,
            }),
        })
    }

    /// Maximum number of items kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Offer a candidate. `None` is ignored without error.
    ///
    /// Ties never displace an existing item: a candidate must be strictly
    /// better than the current worst to get in, and it settles *after* any
    /// kept item it compares equal to.
    pub fn add(&self, item: impl Into<Option<T>>) -> Result<(), ScanError> {
        let Some(item) = item.into() else {
            return Ok(());
        };

        let mut inner = self.inner.lock();
        if inner.disposed {
            return Err(ScanError::Disposed);
        }
        let compare = &self.compare;
        let items = &mut inner.items;

        if items.len() < self.capacity {
            let pos = items.partition_point(|kept| compare(kept, &item) != Ordering::Greater);
            items.insert(pos, item);
            return Ok(());
        }

        let last = items.len() - 1;
        if compare(&item, &items[last]) != Ordering::Less {
            return Ok(());
        }
        items[last] = item;

        let mut i = last;
        while i > 0 && compare(&items[i], &items[i - 1]) == Ordering::Less {
            items.swap(i, i - 1);
            i -= 1;
        }
        Ok(())
    }

    /// Number of items currently kept.
    pub fn len(&self) -> Result<usize, ScanError> {
        let inner = self.inner.lock();
        if inner.disposed {
            return Err(ScanError::Disposed);
        }
        Ok(inner.items.len())
    }

    /// `true` if nothing has been kept yet.
    pub fn is_empty(&self) -> Result<bool, ScanError> {
        Ok(self.len()? == 0)
    }

    /// Empty the kept set.
    pub fn clear(&self) -> Result<(), ScanError> {
        let mut inner = self.inner.lock();
        if inner.disposed {
            return Err(ScanError::Disposed);
        }
        inner.items.clear();
        Ok(())
    }

    /// Release the kept items. Every later call returns [`ScanError::Disposed`].
    ///
    /// Disposing twice is a no-op.
    pub fn dispose(&self) {
        let mut inner = self.inner.lock();
        inner.disposed = true;
        inner.items = Vec::new();
    }

    /// Consume the tracker and return the kept items, best first.
    pub fn into_sorted_vec(self) -> Result<Vec<T>, ScanError> {
        let inner = self.inner.into_inner();
        if inner.disposed {
            return Err(ScanError::Disposed);
        }
        Ok(inner.items)
    }
}

impl<T: Clone> TopItemsTracker<T> {
    /// Snapshot of the kept items, best first. Safe to call while other
    /// threads are still adding.
    pub fn get_top(&self) -> Result<Vec<T>, ScanError> {
        let inner = self.inner.lock();
        if inner.disposed {
            return Err(ScanError::Disposed);
        }
        Ok(inner.items.clone())
    }
}

impl<T> fmt::Debug for TopItemsTracker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("TopItemsTracker")
            .field("capacity", &self.capacity)
            .field("len", &inner.items.len())
            .field("disposed", &inner.disposed)
            .finish()
    }
}
