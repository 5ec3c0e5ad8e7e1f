//! Lookup and load counters for one engine instance.

use serde::Serialize;

#[derive(Debug, Clone, Default)]
pub struct LoadMetrics {
    /// Translation files read from disk (eager and lazy)
    files_read: usize,

    /// Lazy single-file loads
    lazy_loads: usize,

    /// Lookups answered by the current locale
    hits: usize,

    /// Lookups answered by the fallback locale
    fallback_hits: usize,

    /// Lookups answered by neither locale
    misses: usize,

    /// Lazy lookups with no backing file
    missing_files: usize,
}

impl LoadMetrics {
    /// Create a zeroed counter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` files read by a bulk load.
    pub fn record_files_read(&mut self, count: usize) {
        self.files_read += count;
    }

    /// A lazy load is one file read as well.
    pub fn record_lazy_load(&mut self) {
        self.lazy_loads += 1;
        self.files_read += 1;
    }

    /// Record a lookup answered by the current locale.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Record a lookup answered by the fallback locale.
    pub fn record_fallback_hit(&mut self) {
        self.fallback_hits += 1;
    }

    /// Record a lookup answered by neither locale.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Record a lazy lookup with no backing file.
    pub fn record_missing_file(&mut self) {
        self.missing_files += 1;
    }

    /// Get the number of files read.
    pub fn files_read(&self) -> usize {
        self.files_read
    }

    /// Get the number of lazy single-file loads.
    pub fn lazy_loads(&self) -> usize {
        self.lazy_loads
    }

    /// Get the number of current-locale hits.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Get the number of fallback-locale hits.
    pub fn fallback_hits(&self) -> usize {
        self.fallback_hits
    }

    /// Get the number of misses.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Get the number of lazy lookups without a backing file.
    pub fn missing_files(&self) -> usize {
        self.missing_files
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let lookups = self.hits + self.fallback_hits + self.misses;
        let resolved_rate = if lookups > 0 {
            ((self.hits + self.fallback_hits) as f64 / lookups as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            files_read: self.files_read,
            lazy_loads: self.lazy_loads,
            lookups,
            hits: self.hits,
            fallback_hits: self.fallback_hits,
            misses: self.misses,
            missing_files: self.missing_files,
            resolved_rate,
        }
    }
}

/// Snapshot of [`LoadMetrics`].
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub files_read: usize,
    pub lazy_loads: usize,
    pub lookups: usize,
    pub hits: usize,
    pub fallback_hits: usize,
    pub misses: usize,
    pub missing_files: usize,

    /// Share of lookups answered by either locale, as a percentage (0-100)
    pub resolved_rate: f64,
}
