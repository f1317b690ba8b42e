//! Property Tests for the 2Q Cache
//!
//! Random operation sequences are replayed against `TwoQCache` and against a
//! small reference model built from `VecDeque`s. After every step the cache
//! must agree with the model and pass its own invariant check.

use proptest::prelude::*;
use std::collections::{HashMap, VecDeque};
use twoq_cache::{QueueKind, TwoQCache, TwoQCacheConfig};

#[derive(Debug, Clone)]
enum Op {
    Put(u8, u32),
    Get(u8),
    Peek(u8),
    Remove(u8),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0u8..32, any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
        4 => (0u8..32).prop_map(Op::Get),
        1 => (0u8..32).prop_map(Op::Peek),
        1 => (0u8..32).prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

/// Straightforward 2Q over deques; front is newest / most recently used.
struct Model {
    capacity: usize,
    kin: usize,
    kout: usize,
    probationary: VecDeque<u8>,
    protected: VecDeque<u8>,
    ghost: VecDeque<u8>,
    pending: VecDeque<u8>,
    values: HashMap<u8, u32>,
}

impl Model {
    fn new(config: &TwoQCacheConfig) -> Self {
        Self {
            capacity: config.capacity,
            kin: config.probationary_capacity(),
            kout: config.ghost_capacity(),
            probationary: VecDeque::new(),
            protected: VecDeque::new(),
            ghost: VecDeque::new(),
            pending: VecDeque::new(),
            values: HashMap::new(),
        }
    }

    fn unlink(queue: &mut VecDeque<u8>, key: u8) -> bool {
        match queue.iter().position(|&k| k == key) {
            Some(pos) => {
                queue.remove(pos);
                true
            }
            None => false,
        }
    }

    fn ensure_space(&mut self, readmission: bool) {
        if self.probationary.len() + self.protected.len() < self.capacity {
            return;
        }
        let p = self.probationary.len();
        let prefer = p > 0 && (p > self.kin || (p == self.kin && !readmission));
        if prefer || self.protected.is_empty() {
            if let Some(k) = self.probationary.pop_back() {
                self.values.remove(&k);
                self.ghost.push_front(k);
                while self.ghost.len() > self.kout {
                    self.ghost.pop_back();
                }
            }
        } else if let Some(k) = self.protected.pop_back() {
            self.values.remove(&k);
        }
    }

    fn put(&mut self, key: u8, value: u32) -> Option<u32> {
        if Self::unlink(&mut self.protected, key) || Self::unlink(&mut self.probationary, key) {
            self.protected.push_front(key);
            return self.values.insert(key, value);
        }
        if Self::unlink(&mut self.ghost, key) || Self::unlink(&mut self.pending, key) {
            self.ensure_space(true);
            self.protected.push_front(key);
            self.values.insert(key, value);
            return None;
        }
        self.ensure_space(false);
        self.probationary.push_front(key);
        self.values.insert(key, value);
        None
    }

    fn get(&mut self, key: u8) -> Option<u32> {
        if Self::unlink(&mut self.protected, key) || Self::unlink(&mut self.probationary, key) {
            self.protected.push_front(key);
            return self.values.get(&key).copied();
        }
        if Self::unlink(&mut self.ghost, key) {
            self.pending.push_front(key);
            while self.pending.len() > self.kout {
                self.pending.pop_back();
            }
        }
        None
    }

    fn remove(&mut self, key: u8) -> Option<u32> {
        Self::unlink(&mut self.ghost, key);
        Self::unlink(&mut self.pending, key);
        if Self::unlink(&mut self.protected, key) || Self::unlink(&mut self.probationary, key) {
            return self.values.remove(&key);
        }
        None
    }

    fn clear(&mut self) {
        self.probationary.clear();
        self.protected.clear();
        self.ghost.clear();
        self.pending.clear();
        self.values.clear();
    }

    fn keys(&self) -> Vec<u8> {
        self.protected
            .iter()
            .chain(self.probationary.iter())
            .copied()
            .collect()
    }
}

fn config_strategy() -> impl Strategy<Value = TwoQCacheConfig> {
    (1usize..24, 0u32..=4, 0u32..=4).prop_map(|(cap, r, g)| {
        TwoQCacheConfig::new(cap)
            .with_recent_ratio(f64::from(r) * 0.25)
            .with_ghost_ratio(f64::from(g) * 0.25)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_matches_reference_model(
        config in config_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..400),
    ) {
        let mut cache: TwoQCache<u8, u32> = TwoQCache::init(config, None).unwrap();
        let mut model = Model::new(&config);

        for op in ops {
            match op {
                Op::Put(k, v) => prop_assert_eq!(cache.put(k, v), model.put(k, v)),
                Op::Get(k) => prop_assert_eq!(cache.get(&k).copied(), model.get(k)),
                Op::Peek(k) => {
                    let before = cache.keys();
                    prop_assert_eq!(cache.peek(&k).copied(), model.values.get(&k).copied());
                    prop_assert_eq!(cache.keys(), before);
                }
                Op::Remove(k) => prop_assert_eq!(cache.remove(&k), model.remove(k)),
                Op::Clear => {
                    cache.clear();
                    model.clear();
                }
            }

            prop_assert!(cache.len() <= config.capacity);
            prop_assert!(cache.ghost_len() <= config.ghost_capacity());
            prop_assert_eq!(cache.keys(), model.keys());
            prop_assert_eq!(cache.ghost_len(), model.ghost.len());
            prop_assert_eq!(cache.pending_len(), model.pending.len());
            prop_assert!(cache.check_invariants().is_ok());
        }

        for &k in &model.ghost {
            prop_assert_eq!(cache.queue_of(&k), Some(QueueKind::Ghost));
        }
        for &k in &model.pending {
            prop_assert_eq!(cache.queue_of(&k), Some(QueueKind::Pending));
        }
    }

    #[test]
    fn prop_each_key_in_at_most_one_queue(
        keys in prop::collection::vec(0u16..64, 1..500),
        cap in 1usize..32,
    ) {
        let mut cache: TwoQCache<u16, u16> = TwoQCache::new(cap).unwrap();
        for (i, k) in keys.iter().enumerate() {
            if i % 3 == 0 {
                cache.get(k);
            } else {
                cache.put(*k, *k);
            }
            let resident = cache.keys();
            let mut dedup = resident.clone();
            dedup.sort_unstable();
            dedup.dedup();
            prop_assert_eq!(dedup.len(), resident.len());
            prop_assert_eq!(resident.len(), cache.len());
            for r in &resident {
                let queue = cache.queue_of(r);
                prop_assert!(queue.map_or(false, QueueKind::is_resident));
            }
        }
    }
}
