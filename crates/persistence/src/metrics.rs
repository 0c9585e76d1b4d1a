//! Query timing metrics for the persistence layer.

use std::time::Instant;

/// Records a `database_query_duration_seconds` histogram sample when
/// dropped, so early returns and `?` are covered.
pub(crate) struct QueryTimer {
    name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub(crate) fn start(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }
}

impl Drop for QueryTimer {
    fn drop(&mut self) {
        metrics::histogram!(
            "database_query_duration_seconds",
            "query" => self.name
        )
        .record(self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_timer_records_on_drop() {
        // No recorder installed in unit tests; this just exercises the path.
        let timer = QueryTimer::start("test_query");
        drop(timer);
    }
}
