//! Best-score bookkeeping
//!
//! A single process-wide scalar, read once at startup and written back only
//! when a finished session beats it. Where it lives is up to the host.

/// Storage for the best score
pub trait ScoreStore {
    /// Stored best score, 0 when none
    fn load(&self) -> u64;
    /// Persist a new best score
    fn store(&mut self, best: u64);
}

/// In-memory store (native runs and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub value: u64,
    /// Number of writes, so callers can verify write-on-improvement
    pub writes: u32,
}

impl MemoryStore {
    pub fn with_value(value: u64) -> Self {
        Self { value, writes: 0 }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> u64 {
        self.value
    }

    fn store(&mut self, best: u64) {
        self.value = best;
        self.writes += 1;
    }
}

/// Parse a stored best score; anything malformed counts as no score
pub fn parse_best(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or(0)
}

/// Cached best score backed by a store
#[derive(Debug)]
pub struct BestScore<S: ScoreStore> {
    value: u64,
    store: S,
}

impl<S: ScoreStore> BestScore<S> {
    /// Read the stored value once
    pub fn load(store: S) -> Self {
        let value = store.load();
        log::info!("Best score: {}", value);
        Self { value, store }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Whether `score` would be a new record
    pub fn beats(&self, score: u64) -> bool {
        score > self.value
    }

    /// Record a finished session; returns true on a new record
    pub fn record(&mut self, score: u64) -> bool {
        if !self.beats(score) {
            return false;
        }
        self.value = score;
        self.store.store(score);
        log::info!("New best score: {}", score);
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_only_on_improvement() {
        let mut best = BestScore::load(MemoryStore::with_value(120));
        assert_eq!(best.value(), 120);

        assert!(best.record(150));
        assert_eq!(best.value(), 150);
        assert_eq!(best.store().value, 150);

        assert!(!best.record(100));
        assert_eq!(best.value(), 150);
        assert_eq!(best.store().value, 150);
        assert_eq!(best.store().writes, 1);
    }

    #[test]
    fn test_tie_is_not_a_record() {
        let mut best = BestScore::load(MemoryStore::with_value(80));
        assert!(!best.record(80));
        assert_eq!(best.store().writes, 0);
    }

    #[test]
    fn test_parse_best() {
        assert_eq!(parse_best("150"), 150);
        assert_eq!(parse_best(" 42\n"), 42);
        assert_eq!(parse_best("abc"), 0);
        assert_eq!(parse_best("-3"), 0);
        assert_eq!(parse_best(""), 0);
    }
}
