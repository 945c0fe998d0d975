//! Planner configuration from environment.

use skypath_core::{BoundaryPolicy, SearchConfig};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::throttle::ReplanThrottle;

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Search workers, each owning one engine.
    pub workers: usize,
    /// Pending jobs per worker before `plan` waits.
    pub queue_depth: usize,
    pub fly_cost_multiplier: f32,
    pub clamp_endpoints: bool,
    pub max_iterations: Option<usize>,
    pub min_replan_interval_ms: u64,
    pub max_replan_interval_ms: u64,
    /// Target movement (world units) required before a replan.
    pub replan_distance_threshold: f32,
    /// Every this many world units between agent and target adds one more
    /// minimum interval of backoff.
    pub replan_backoff_distance: f32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            queue_depth: 64,
            fly_cost_multiplier: 10.0,
            clamp_endpoints: true,
            max_iterations: None,
            min_replan_interval_ms: 250,
            max_replan_interval_ms: 2_000,
            replan_distance_threshold: 1.0,
            replan_backoff_distance: 50.0,
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            workers: env_or("SKYPATH_WORKERS", defaults.workers).max(1),
            queue_depth: env_or("SKYPATH_QUEUE_DEPTH", defaults.queue_depth).max(1),
            fly_cost_multiplier: env_or("SKYPATH_FLY_COST_MULTIPLIER", defaults.fly_cost_multiplier),
            clamp_endpoints: env_flag("SKYPATH_CLAMP_ENDPOINTS", defaults.clamp_endpoints),
            max_iterations: env::var("SKYPATH_MAX_ITERATIONS")
                .ok()
                .and_then(|s| s.parse().ok()),
            min_replan_interval_ms: env_or(
                "SKYPATH_MIN_REPLAN_INTERVAL_MS",
                defaults.min_replan_interval_ms,
            ),
            max_replan_interval_ms: env_or(
                "SKYPATH_MAX_REPLAN_INTERVAL_MS",
                defaults.max_replan_interval_ms,
            ),
            replan_distance_threshold: env_or(
                "SKYPATH_REPLAN_DISTANCE_THRESHOLD",
                defaults.replan_distance_threshold,
            ),
            replan_backoff_distance: env_or(
                "SKYPATH_REPLAN_BACKOFF_DISTANCE",
                defaults.replan_backoff_distance,
            ),
        }
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            max_iterations: self.max_iterations,
            max_path_length: None,
            boundary: if self.clamp_endpoints {
                BoundaryPolicy::Clamp
            } else {
                BoundaryPolicy::Reject
            },
        }
    }

    pub fn throttle(&self) -> ReplanThrottle {
        ReplanThrottle::new(
            Duration::from_millis(self.min_replan_interval_ms),
            Duration::from_millis(self.max_replan_interval_ms),
            self.replan_distance_threshold,
            self.replan_backoff_distance,
        )
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => parse_flag(&value).unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
