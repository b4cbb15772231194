use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use smallvec::SmallVec;

#[cfg(not(feature = "dense-slotmap"))]
use slotmap::SlotMap;

#[cfg(feature = "dense-slotmap")]
use slotmap::DenseSlotMap;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Arena backing the cell and vertex stores.
///
/// `DenseSlotMap` by default (feature `dense-slotmap`), `SlotMap` with
/// `--no-default-features`. Not exposed in public signatures.
#[cfg(not(feature = "dense-slotmap"))]
pub type StorageMap<K, V> = SlotMap<K, V>;

#[cfg(feature = "dense-slotmap")]
pub type StorageMap<K, V> = DenseSlotMap<K, V>;

// =============================================================================
// CORE OPTIMIZED TYPES
// =============================================================================

/// `HashMap` with `FxHasher`, for internal keys only (not DoS-resistant).
///
/// ```rust
/// use triangulation3::core::collections::FastHashMap;
///
/// let mut map: FastHashMap<u64, usize> = FastHashMap::default();
/// map.insert(123, 456);
/// ```
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// Build hasher shared by [`FastHashMap`] and [`FastHashSet`].
pub type FastBuildHasher = FxBuildHasher;

/// `HashSet` with `FxHasher`, for internal keys only.
pub type FastHashSet<T> = FxHashSet<T>;

/// Small-optimized Vec: inline for up to `N` elements, heap beyond.
///
/// ```rust
/// use triangulation3::core::collections::SmallBuffer;
///
/// let mut buffer: SmallBuffer<i32, 4> = SmallBuffer::new();
/// buffer.extend([1, 2, 3]);
/// assert!(!buffer.spilled());
/// ```
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

/// Maximum number of vertex slots in a cell (ambient dimension 3).
pub const MAX_CELL_SLOTS: usize = 4;
