//! Memoisation of derived charts by snapshot identity.

use crate::chart::types::Chart;
use crate::engine::{DerivedChart, HoraryEngine};
use crate::reasoning::ReasoningInput;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

pub const DEFAULT_CAPACITY: usize = 256;

type CacheKey = (Uuid, Vec<ReasoningInput>);

#[derive(Debug)]
struct Entry {
    now: Option<DateTime<Utc>>,
    derived: Arc<DerivedChart>,
    stored: u64,
}

#[derive(Debug, Default)]
struct Entries {
    map: HashMap<CacheKey, Entry>,
    clock: u64,
}

/// Shared, thread-safe cache in front of [`HoraryEngine::derive`].
///
/// One entry per snapshot and reasoning list. A call with a different
/// reference time replaces that entry. Past `capacity` the oldest stored
/// entry is evicted.
#[derive(Debug)]
pub struct DerivationCache {
    entries: RwLock<Entries>,
    capacity: usize,
}

impl Default for DerivationCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl DerivationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            capacity: capacity.max(1),
        }
    }

    pub fn get_or_derive(
        &self,
        engine: &HoraryEngine,
        chart: &Chart,
        reasoning: &[ReasoningInput],
        now: Option<DateTime<Utc>>,
    ) -> Arc<DerivedChart> {
        let key: CacheKey = (chart.id, reasoning.to_vec());

        if let Ok(entries) = self.entries.read() {
            if let Some(hit) = entries.map.get(&key).filter(|e| e.now == now) {
                log::debug!("derivation cache hit for {}", chart.id);
                return Arc::clone(&hit.derived);
            }
        }

        let derived = Arc::new(engine.derive(chart, reasoning, now));
        match self.entries.write() {
            Ok(mut entries) => {
                if !entries.map.contains_key(&key) && entries.map.len() >= self.capacity {
                    let oldest = entries
                        .map
                        .iter()
                        .min_by_key(|(_, e)| e.stored)
                        .map(|(k, _)| k.clone());
                    if let Some(oldest) = oldest {
                        entries.map.remove(&oldest);
                    }
                }
                entries.clock += 1;
                let stored = entries.clock;
                entries.map.insert(
                    key,
                    Entry {
                        now,
                        derived: Arc::clone(&derived),
                        stored,
                    },
                );
            }
            Err(_) => log::warn!("derivation cache lock poisoned; result not stored"),
        }
        derived
    }

    /// Drop every entry for one snapshot.
    pub fn invalidate(&self, chart: Uuid) {
        if let Ok(mut entries) = self.entries.write() {
            entries.map.retain(|(id, _), _| *id != chart);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.map.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::types::{Planet, PlanetPosition};
    use chrono::{Duration, TimeZone};
    use std::thread;

    fn chart() -> Chart {
        Chart::new(
            vec![
                PlanetPosition::new(Planet::Sun, 10.0, 1.0),
                PlanetPosition::new(Planet::Moon, 100.0, 13.0),
            ],
            0.0,
        )
    }

    #[test]
    fn test_hit_returns_same_arc() {
        let cache = DerivationCache::new();
        let engine = HoraryEngine::default();
        let chart = chart();
        let a = cache.get_or_derive(&engine, &chart, &[], None);
        let b = cache.get_or_derive(&engine, &chart, &[], None);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_reasoning_changes_key() {
        let cache = DerivationCache::new();
        let engine = HoraryEngine::default();
        let chart = chart();
        cache.get_or_derive(&engine, &chart, &["Chart is radical".into()], None);
        let b = cache.get_or_derive(&engine, &chart, &["Chart is not radical".into()], None);
        assert_eq!(cache.len(), 2);
        assert_eq!(b.reasoning.total_weight, -1);
    }

    #[test]
    fn test_invalidate() {
        let cache = DerivationCache::new();
        let engine = HoraryEngine::default();
        let first = chart();
        let second = chart();
        cache.get_or_derive(&engine, &first, &[], None);
        cache.get_or_derive(&engine, &second, &[], None);
        cache.invalidate(first.id);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = Arc::new(DerivationCache::new());
        let engine = Arc::new(HoraryEngine::default());
        let chart = Arc::new(chart());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let (cache, engine, chart) = (cache.clone(), engine.clone(), chart.clone());
                thread::spawn(move || cache.get_or_derive(&engine, &chart, &[], None).chart_id)
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), chart.id);
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_refreshes_replace_entry() {
        let cache = DerivationCache::new();
        let engine = HoraryEngine::default();
        let chart = chart();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let mut last = None;
        for second in 0..200 {
            let now = start + Duration::seconds(second);
            last = Some(cache.get_or_derive(&engine, &chart, &[], Some(now)));
        }
        assert_eq!(cache.len(), 1);

        // the stored entry belongs to the latest refresh
        let now = start + Duration::seconds(199);
        let again = cache.get_or_derive(&engine, &chart, &[], Some(now));
        assert!(Arc::ptr_eq(&again, &last.unwrap()));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = DerivationCache::with_capacity(3);
        let engine = HoraryEngine::default();
        let charts: Vec<Chart> = (0..5).map(|_| chart()).collect();
        for c in &charts {
            cache.get_or_derive(&engine, c, &[], None);
        }
        assert_eq!(cache.len(), 3);

        let first = cache.get_or_derive(&engine, &charts[4], &[], None);
        let second = cache.get_or_derive(&engine, &charts[4], &[], None);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_distinct_reasoning_never_shares_entry() {
        let cache = DerivationCache::new();
        let engine = HoraryEngine::default();
        let chart = chart();
        let radical = cache.get_or_derive(&engine, &chart, &["Chart is radical".into()], None);
        let general = cache.get_or_derive(&engine, &chart, &["Querent is hopeful".into()], None);
        assert_eq!(radical.reasoning.total_weight, 1);
        assert_eq!(general.reasoning.total_weight, 0);
        assert_eq!(general.reasoning.stages[0].items[0].rule, "Querent is hopeful");
    }
}
