//! Hash container aliases used throughout the crate.

use rapidhash::{RapidHashMap, RapidHashSet};

/// Make it easier to switch between different hash backends.
pub type KeyMap<K, V> = RapidHashMap<K, V>;
/// Alias for the default hash set.
pub type KeySet<K> = RapidHashSet<K>;
