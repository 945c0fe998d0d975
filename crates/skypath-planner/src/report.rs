//! JSON route reports for the CLI and benchmarks.

use chrono::{DateTime, Utc};
use serde::Serialize;
use skypath_core::{BoundaryResolver, Coord, Path, PathRequest, Position};

use crate::service::PlanError;

#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    pub ok: bool,
    pub planned_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<u64>,
    pub start: Coord,
    pub end: Coord,
    pub fly_cost_multiplier: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f32>,
    pub expanded: usize,
    pub cells: Vec<Coord>,
    pub waypoints: Vec<Position>,
    pub errors: Vec<String>,
}

impl RouteReport {
    pub fn new(
        request: &PathRequest,
        result: &Result<Path, PlanError>,
        resolver: &BoundaryResolver,
        y_offset: f32,
    ) -> Self {
        let mut report = Self {
            ok: false,
            planned_at: Utc::now(),
            request_id: None,
            start: request.start,
            end: request.end,
            fly_cost_multiplier: request.fly_cost_multiplier,
            total_cost: None,
            expanded: 0,
            cells: Vec::new(),
            waypoints: Vec::new(),
            errors: Vec::new(),
        };
        match result {
            Ok(path) => {
                report.ok = true;
                report.request_id = Some(path.request_id());
                report.total_cost = Some(path.total_cost());
                report.expanded = path.expanded();
                report.cells = path.cells().to_vec();
                report.waypoints = path.to_world(resolver, y_offset);
            }
            Err(err) => report.errors.push(err.to_string()),
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skypath_core::SearchError;

    #[test]
    fn failed_plan_carries_error_text() {
        let request = PathRequest::new((0, 0), (5, 5), 1.0);
        let resolver = BoundaryResolver::new(4, 4, 1.0, Position::default());
        let result = Err(PlanError::Search(SearchError::InvalidEndpoint {
            coord: Coord::new(5, 5),
        }));
        let report = RouteReport::new(&request, &result, &resolver, 0.0);

        assert!(!report.ok);
        assert!(report.waypoints.is_empty());
        assert_eq!(report.errors, vec!["endpoint (5, 5) is out of bounds or unwalkable"]);

        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("total_cost").is_none());
        assert_eq!(value["end"]["x"], 5);
    }
}
