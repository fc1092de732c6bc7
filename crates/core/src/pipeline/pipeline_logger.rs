use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for pipeline orchestration events.
///
/// Decouples use cases from specific output mechanisms so each caller can
/// observe pipeline behavior without changing the orchestration code.
pub trait PipelineLogger: Send {
    /// Record how long a named pipeline stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. faces in the current frame).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Count one fully processed frame. Default: no-op.
    fn frame_completed(&mut self) {}

    /// Emit an end-of-pipeline summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Running count and sum of one stage's timings or one metric's values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunningStat {
    count: u64,
    total: f64,
}

impl RunningStat {
    fn record(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Aggregates per-stage timings and metrics, and reports them through the
/// `log` facade when the pipeline finishes.
///
/// Keeps one `RunningStat` per name, so a live session of any length holds
/// a fixed amount of state.
pub struct LogPipelineLogger {
    timings: HashMap<String, RunningStat>,
    metrics: HashMap<String, RunningStat>,
    start_time: Instant,
    frames: usize,
}

impl LogPipelineLogger {
    pub fn new() -> Self {
        Self {
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            frames: 0,
        }
    }

    /// Returns the formatted summary string, or `None` if no data recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.frames;
        let mut lines = Vec::new();

        lines.push(format!(
            "Pipeline summary ({frames} frames, {:.1}s total):",
            elapsed_ms / 1000.0
        ));

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let stat = &self.timings[stage];
            let total_ms = stat.total();
            let avg_ms = stat.mean();
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms  ({pct:4.1}%)"
            ));
        }

        let mut metric_names: Vec<_> = self.metrics.keys().collect();
        metric_names.sort();
        for name in metric_names {
            lines.push(format!("  {name}: avg {:.1}", self.metrics[name].mean()));
        }

        if frames > 0 && elapsed_ms > 0.0 {
            let fps = frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    pub fn timing_stat(&self, stage: &str) -> Option<RunningStat> {
        self.timings.get(stage).copied()
    }

    pub fn metric_stat(&self, name: &str) -> Option<RunningStat> {
        self.metrics.get(name).copied()
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Number of distinct stages and metrics being tracked.
    pub fn tracked_names(&self) -> usize {
        self.timings.len() + self.metrics.len()
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn timing(&mut self, stage: &str, duration_ms: f64) {
        record(&mut self.timings, stage, duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        record(&mut self.metrics, name, value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn frame_completed(&mut self) {
        self.frames += 1;
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

fn record(stats: &mut HashMap<String, RunningStat>, name: &str, value: f64) {
    match stats.get_mut(name) {
        Some(stat) => stat.record(value),
        None => {
            let mut stat = RunningStat::default();
            stat.record(value);
            stats.insert(name.to_string(), stat);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.timing("detect", 5.0);
        logger.metric("faces", 3.0);
        logger.info("hello");
        logger.frame_completed();
        logger.summary();
    }

    #[test]
    fn test_timing_accumulates_per_stage() {
        let mut logger = LogPipelineLogger::new();
        logger.timing("detect", 20.0);
        logger.timing("detect", 30.0);
        logger.timing("display", 5.0);

        let detect = logger.timing_stat("detect").unwrap();
        assert_eq!(detect.count(), 2);
        assert_relative_eq!(detect.total(), 50.0);
        assert_relative_eq!(detect.mean(), 25.0);
        assert_eq!(logger.timing_stat("display").unwrap().count(), 1);
        assert!(logger.timing_stat("read").is_none());
    }

    #[test]
    fn test_metric_average() {
        let mut logger = LogPipelineLogger::new();
        logger.metric("faces", 3.0);
        logger.metric("faces", 4.0);

        assert_relative_eq!(logger.metric_stat("faces").unwrap().mean(), 3.5);
    }

    #[test]
    fn test_empty_stat_mean_is_zero() {
        assert_relative_eq!(RunningStat::default().mean(), 0.0);
    }

    #[test]
    fn test_long_session_keeps_fixed_state() {
        let mut logger = LogPipelineLogger::new();
        let frames = 108_000; // one hour at 30 fps
        for _ in 0..frames {
            logger.timing("read", 1.0);
            logger.timing("detect", 20.0);
            logger.timing("display", 2.0);
            logger.metric("faces", 1.0);
            logger.frame_completed();
        }

        assert_eq!(logger.tracked_names(), 4);
        assert_eq!(logger.timing_stat("detect").unwrap().count(), frames as u64);
        assert_relative_eq!(logger.timing_stat("read").unwrap().mean(), 1.0);
        assert_eq!(logger.frames(), frames);
    }

    #[test]
    fn test_summary_lists_stages_metrics_and_fps() {
        let mut logger = LogPipelineLogger::new();
        for _ in 0..10 {
            logger.frame_completed();
        }
        logger.timing("read", 2.0);
        logger.timing("detect", 20.0);
        logger.timing("display", 5.0);
        logger.metric("faces", 1.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Pipeline summary (10 frames"));
        assert!(summary.contains("read"));
        assert!(summary.contains("detect"));
        assert!(summary.contains("display"));
        assert!(summary.contains("faces: avg 1.0"));
        assert!(summary.contains("fps"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(LogPipelineLogger::new().summary_string().is_none());
    }

    #[test]
    fn test_frames_are_counted() {
        let mut logger = LogPipelineLogger::new();
        logger.frame_completed();
        logger.frame_completed();
        assert_eq!(logger.frames(), 2);
    }

    #[test]
    fn test_info_does_not_record() {
        let mut logger = LogPipelineLogger::new();
        logger.info("hello world");
        assert_eq!(logger.tracked_names(), 0);
        assert!(logger.summary_string().is_none());
    }
}
