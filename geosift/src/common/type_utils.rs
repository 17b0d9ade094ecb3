use parking_lot::RwLock;
use std::sync::Arc;

/// A shared, lock-protected value.
pub type Atomic<T> = Arc<RwLock<T>>;

#[inline]
pub fn atomic<T>(t: T) -> Atomic<T> {
    Arc::new(RwLock::new(t))
}
