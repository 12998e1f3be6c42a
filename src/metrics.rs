//! Process metrics
//!
//! Atomic counters and gauges with Prometheus text exposition, served from
//! the pool binary.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Counter metric (monotonically increasing)
pub struct Counter {
    value: AtomicU64,
    name: String,
    help: String,
}

impl Counter {
    /// Create a new counter
    pub fn new(name: &str, help: &str) -> Self {
        Self {
            value: AtomicU64::new(0),
            name: name.into(),
            help: help.into(),
        }
    }

    /// Increment by 1
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current value
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Format as Prometheus metric
    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP {} {}\n# TYPE {} counter\n{} {}\n",
            self.name, self.help, self.name, self.name, self.get()
        )
    }
}

/// Gauge metric (can go up or down)
pub struct Gauge {
    value: AtomicI64,
    name: String,
    help: String,
}

impl Gauge {
    /// Create a new gauge
    pub fn new(name: &str, help: &str) -> Self {
        Self {
            value: AtomicI64::new(0),
            name: name.into(),
            help: help.into(),
        }
    }

    /// Set value
    pub fn set(&self, val: i64) {
        self.value.store(val, Ordering::Relaxed);
    }

    /// Get current value
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Format as Prometheus metric
    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP {} {}\n# TYPE {} gauge\n{} {}\n",
            self.name, self.help, self.name, self.name, self.get()
        )
    }
}

/// Standard foreman metrics
pub mod standard {
    use super::*;
    use std::sync::LazyLock;

    pub static ITEMS_PRODUCED: LazyLock<Counter> = LazyLock::new(|| {
        Counter::new(
            "foreman_items_produced_total",
            "Items pushed onto the work queue by this process",
        )
    });

    pub static ITEMS_CONSUMED: LazyLock<Counter> = LazyLock::new(|| {
        Counter::new(
            "foreman_items_consumed_total",
            "Items popped from the work queue by this process",
        )
    });

    pub static LEASES_ACQUIRED: LazyLock<Counter> = LazyLock::new(|| {
        Counter::new(
            "foreman_leases_acquired_total",
            "Times this process won the producer lease",
        )
    });

    pub static HANDLER_FAULTS: LazyLock<Counter> = LazyLock::new(|| {
        Counter::new(
            "foreman_handler_faults_total",
            "Items the handler classified as errored",
        )
    });

    pub static IS_LEADER: LazyLock<Gauge> = LazyLock::new(|| {
        Gauge::new(
            "foreman_is_leader",
            "Whether this process currently holds the producer lease",
        )
    });
}

/// Helper to gather all standard metrics
pub fn gather_metrics() -> String {
    let mut output = String::new();

    output.push_str(&standard::ITEMS_PRODUCED.to_prometheus());
    output.push_str(&standard::ITEMS_CONSUMED.to_prometheus());
    output.push_str(&standard::LEASES_ACQUIRED.to_prometheus());
    output.push_str(&standard::HANDLER_FAULTS.to_prometheus());
    output.push_str(&standard::IS_LEADER.to_prometheus());

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter() {
        let counter = Counter::new("test_counter", "Test counter");
        assert_eq!(counter.get(), 0);

        counter.inc();
        counter.inc();
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_gauge() {
        let gauge = Gauge::new("test_gauge", "Test gauge");
        gauge.set(1);
        assert_eq!(gauge.get(), 1);

        gauge.set(0);
        assert_eq!(gauge.get(), 0);
    }

    #[test]
    fn test_prometheus_format() {
        let counter = Counter::new("test_total", "Help text");
        counter.inc();

        let text = counter.to_prometheus();
        assert!(text.contains("# TYPE test_total counter"));
        assert!(text.contains("test_total 1"));
    }
}
