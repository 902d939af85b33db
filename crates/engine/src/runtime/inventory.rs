use std::collections::BTreeMap;

use serde::Serialize;

/// Item counts keyed by sprite name. Counts never drop below zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Inventory {
    counts: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `delta`, clamping at zero. Returns the new count.
    pub fn add(&mut self, item: &str, delta: i64) -> u32 {
        let current = i64::from(self.get(item));
        let next = current.saturating_add(delta).clamp(0, i64::from(u32::MAX)) as u32;
        self.counts.insert(item.to_string(), next);
        next
    }

    pub fn get(&self, item: &str) -> u32 {
        self.counts.get(item).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(item, count)| (item.as_str(), *count))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.values().all(|count| *count == 0)
    }
}
