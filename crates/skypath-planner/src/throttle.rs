//! Replanning throttle for agents following a moving target.
//!
//! The search engine cannot be interrupted, so callers tracking a target
//! decide how often to ask for a new route: never faster than a minimum
//! interval, only once the target has moved far enough, and less often the
//! further away the target is.

use skypath_core::Position;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ReplanThrottle {
    min_interval: Duration,
    max_interval: Duration,
    distance_threshold: f32,
    backoff_distance: f32,
    last_plan_at: Option<Instant>,
    last_target: Option<Position>,
}

impl ReplanThrottle {
    pub fn new(
        min_interval: Duration,
        max_interval: Duration,
        distance_threshold: f32,
        backoff_distance: f32,
    ) -> Self {
        let max_interval = max_interval.max(min_interval);
        Self {
            min_interval,
            max_interval,
            distance_threshold: distance_threshold.max(0.0),
            backoff_distance,
            last_plan_at: None,
            last_target: None,
        }
    }

    /// Interval to wait between plans when the target is `distance` away.
    pub fn interval_for(&self, distance: f32) -> Duration {
        if !self.backoff_distance.is_finite() || self.backoff_distance <= 0.0 || !distance.is_finite() {
            return self.min_interval;
        }
        let scale = 1.0 + f64::from(distance.max(0.0)) / f64::from(self.backoff_distance);
        let secs = (self.min_interval.as_secs_f64() * scale).min(self.max_interval.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    pub fn should_replan(&self, now: Instant, agent: Position, target: Position) -> bool {
        let (Some(last_at), Some(last_target)) = (self.last_plan_at, self.last_target) else {
            return true;
        };
        if target.planar_distance(&last_target) < self.distance_threshold {
            return false;
        }
        now.saturating_duration_since(last_at) >= self.interval_for(agent.planar_distance(&target))
    }

    /// Note that a plan toward `target` was issued at `now`.
    pub fn record(&mut self, now: Instant, target: Position) {
        self.last_plan_at = Some(now);
        self.last_target = Some(target);
    }

    /// Forget history so the next check always replans.
    pub fn reset(&mut self) {
        self.last_plan_at = None;
        self.last_target = None;
    }
}
