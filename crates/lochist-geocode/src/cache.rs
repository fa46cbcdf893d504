//! Bounded memo of geocoding results keyed by rounded coordinates

use lochist_core::geo::GeoPoint;
use std::collections::HashMap;
use std::sync::Mutex;

/// Decimal places kept in a cache key (about 0.1 m)
const KEY_PRECISION: f64 = 1e6;

type CacheKey = (i64, i64);

/// Size-bounded cache with no eviction-order guarantee.
///
/// When full, an arbitrary entry is dropped to make room. A capacity of zero
/// disables caching.
#[derive(Debug)]
pub struct GeocodeCache<V> {
    capacity: usize,
    entries: Mutex<HashMap<CacheKey, V>>,
}

impl<V: Clone> GeocodeCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(HashMap::with_capacity(capacity.min(1024))),
        }
    }

    pub fn get(&self, point: GeoPoint) -> Option<V> {
        let entries = self.entries.lock().ok()?;
        entries.get(&key(point)).cloned()
    }

    pub fn insert(&self, point: GeoPoint, value: V) {
        if self.capacity == 0 {
            return;
        }

        let Ok(mut entries) = self.entries.lock() else {
            return;
        };

        let key = key(point);
        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            if let Some(victim) = entries.keys().next().copied() {
                entries.remove(&victim);
            }
        }
        entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn key(point: GeoPoint) -> CacheKey {
    (
        (point.lat * KEY_PRECISION).round() as i64,
        (point.lon * KEY_PRECISION).round() as i64,
    )
}
