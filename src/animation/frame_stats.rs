//! Rolling frame-time statistics for the animation loop
//!
//! Samples are tick deltas rather than wall-clock measurements, so the numbers
//! describe the cadence the host actually delivers.

use std::collections::VecDeque;

/// Snapshot of the rolling window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMetrics {
    /// Total frames recorded since the last reset
    pub frame_count: u64,
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    pub min_frame_time_ms: f32,
    pub max_frame_time_ms: f32,
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self {
            frame_count: 0,
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: f32::MAX,
            max_frame_time_ms: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrameStats {
    /// Ring buffer of recent deltas in seconds
    frame_times: VecDeque<f32>,
    max_samples: usize,
    report_interval: f32,
    since_report: f32,
    metrics: FrameMetrics,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::with_config(120, 1.0)
    }
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// `max_samples` deltas are averaged; a debug line is logged every
    /// `report_interval` seconds of accumulated delta
    pub fn with_config(max_samples: usize, report_interval: f32) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            report_interval,
            since_report: 0.0,
            metrics: FrameMetrics::default(),
        }
    }

    /// Adds one frame; returns true when a report was logged
    pub fn record(&mut self, delta: f32) -> bool {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(delta);
        self.metrics.frame_count += 1;
        self.update_metrics();

        self.since_report += delta;
        if self.report_interval > 0.0 && self.since_report >= self.report_interval {
            self.since_report = 0.0;
            log::debug!(
                "frame {}: {:.1} fps ({:.2} ms avg, {:.2}..{:.2} ms)",
                self.metrics.frame_count,
                self.metrics.fps,
                self.metrics.frame_time_ms,
                self.metrics.min_frame_time_ms,
                self.metrics.max_frame_time_ms
            );
            return true;
        }
        false
    }

    fn update_metrics(&mut self) {
        let total: f32 = self.frame_times.iter().sum();
        let average_ms = total / self.frame_times.len() as f32 * 1000.0;
        self.metrics.frame_time_ms = average_ms;
        self.metrics.fps = if average_ms > 0.0 {
            1000.0 / average_ms
        } else {
            0.0
        };
        let (min, max) = self
            .frame_times
            .iter()
            .fold((f32::MAX, 0.0f32), |(min, max), &t| (min.min(t), max.max(t)));
        self.metrics.min_frame_time_ms = min * 1000.0;
        self.metrics.max_frame_time_ms = max * 1000.0;
    }

    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }

    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.since_report = 0.0;
        self.metrics = FrameMetrics::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_fps() {
        let mut stats = FrameStats::with_config(4, 0.0);
        for _ in 0..4 {
            stats.record(0.02);
        }
        let metrics = stats.metrics();
        assert_eq!(metrics.frame_count, 4);
        assert!((metrics.fps - 50.0).abs() < 1e-2);
        assert!((metrics.frame_time_ms - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_window_drops_old_samples() {
        let mut stats = FrameStats::with_config(2, 0.0);
        stats.record(1.0);
        stats.record(0.01);
        stats.record(0.01);
        assert!((stats.metrics().max_frame_time_ms - 10.0).abs() < 1e-3);
        assert_eq!(stats.metrics().frame_count, 3);
    }

    #[test]
    fn test_reports_on_interval() {
        let mut stats = FrameStats::with_config(10, 0.5);
        assert!(!stats.record(0.25));
        assert!(stats.record(0.25));
        assert!(!stats.record(0.25));
    }
}
