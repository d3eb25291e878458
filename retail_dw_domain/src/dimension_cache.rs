//! # DimensionCache (C2)
//!
//! A bounded, write-through cache mapping each dimension's natural key to
//! its surrogate key, so the resolver only round-trips to Postgres on a
//! miss. Namespaced per dimension (customer/product/date); each
//! namespace evicts its oldest 20% of entries (by insertion order) once
//! it reaches capacity (spec §4.4).
//!
//! Deliberately has no TTL: the original implementation's cache expires
//! entries after a fixed duration, but dimension rows in this warehouse
//! are looked up by natural key that doesn't change meaning over a run,
//! so a size-bounded, insertion-order eviction policy is the resolved
//! behavior for this redesign (spec §9 open question).

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

struct BoundedCache<K> {
    capacity: usize,
    map: HashMap<K, i64>,
    order: VecDeque<K>,
}

impl<K: Eq + Hash + Clone> BoundedCache<K> {
    fn new(capacity: usize) -> Self {
        BoundedCache {
            capacity: capacity.max(1),
            map: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn get(&self, key: &K) -> Option<i64> {
        self.map.get(key).copied()
    }

    fn put(&mut self, key: K, surrogate_key: i64) {
        if self.map.contains_key(&key) {
            self.map.insert(key, surrogate_key);
            return;
        }
        if self.map.len() >= self.capacity {
            self.evict_oldest();
        }
        self.order.push_back(key.clone());
        self.map.insert(key, surrogate_key);
    }

    fn evict_oldest(&mut self) {
        let evict_count = ((self.capacity as f64) * 0.2).ceil() as usize;
        for _ in 0..evict_count.max(1) {
            if let Some(oldest) = self.order.pop_front() {
                self.map.remove(&oldest);
            } else {
                break;
            }
        }
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

/// Default per-namespace capacity; tuned so a single day's batch of
/// distinct customers/products fits without eviction churn.
const DEFAULT_CAPACITY: usize = 10_000;

pub struct DimensionCache {
    customer: BoundedCache<String>,
    product: BoundedCache<String>,
    date: BoundedCache<i32>,
}

impl DimensionCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        DimensionCache {
            customer: BoundedCache::new(capacity),
            product: BoundedCache::new(capacity),
            date: BoundedCache::new(capacity),
        }
    }

    pub fn get_customer_key(&self, customer_id: &str) -> Option<i64> {
        self.customer.get(&customer_id.to_string())
    }

    pub fn put_customer_key(&mut self, customer_id: &str, customer_key: i64) {
        self.customer.put(customer_id.to_string(), customer_key);
    }

    pub fn get_product_key(&self, stock_code: &str) -> Option<i64> {
        self.product.get(&stock_code.to_string())
    }

    pub fn put_product_key(&mut self, stock_code: &str, product_key: i64) {
        self.product.put(stock_code.to_string(), product_key);
    }

    pub fn get_date_key(&self, date_key: i32) -> Option<i64> {
        self.date.get(&date_key)
    }

    pub fn put_date_key(&mut self, date_key: i32, surrogate_key: i64) {
        self.date.put(date_key, surrogate_key);
    }

    pub fn customer_len(&self) -> usize {
        self.customer.len()
    }

    pub fn product_len(&self) -> usize {
        self.product.len()
    }

    pub fn date_len(&self) -> usize {
        self.date.len()
    }
}

impl Default for DimensionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caches_and_returns_surrogate_keys() {
        let mut cache = DimensionCache::with_capacity(10);
        assert!(cache.get_customer_key("17850").is_none());
        cache.put_customer_key("17850", 42);
        assert_eq!(cache.get_customer_key("17850"), Some(42));
    }

    #[test]
    fn evicts_oldest_twenty_percent_on_overflow() {
        let mut cache = DimensionCache::with_capacity(10);
        for i in 0..10 {
            cache.put_product_key(&format!("SKU{i}"), i as i64);
        }
        assert_eq!(cache.product_len(), 10);
        cache.put_product_key("SKU10", 10);
        // 20% of 10 = 2 evicted, one inserted: net shrink by one.
        assert_eq!(cache.product_len(), 9);
        assert!(cache.get_product_key("SKU0").is_none());
        assert!(cache.get_product_key("SKU1").is_none());
        assert_eq!(cache.get_product_key("SKU9"), Some(9));
    }

    #[test]
    fn updating_existing_key_does_not_evict() {
        let mut cache = DimensionCache::with_capacity(3);
        cache.put_date_key(20100101, 1);
        cache.put_date_key(20100102, 2);
        cache.put_date_key(20100103, 3);
        cache.put_date_key(20100101, 99);
        assert_eq!(cache.date_len(), 3);
        assert_eq!(cache.get_date_key(20100101), Some(99));
    }
}
