//! Routing service data contract and the ingested route.

use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};

/// Maneuver at the start of a step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Maneuver {
    /// depart, turn, roundabout, arrive, on ramp, ...
    #[serde(rename = "type")]
    pub maneuver_type: String,
    #[serde(default)]
    pub modifier: Option<String>,
    #[serde(default)]
    pub instruction: String,
}

/// Arrow shown on the heading panel for a maneuver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManeuverDirection {
    UTurn,
    Straight,
    Right,
    Left,
    RoundAbout,
    None,
}

impl Maneuver {
    pub fn direction(&self) -> ManeuverDirection {
        let kind = self.maneuver_type.as_str();
        match kind {
            "depart" | "arrive" => ManeuverDirection::None,
            "roundabout" | "rotary" => ManeuverDirection::RoundAbout,
            _ if kind == "turn" || kind.contains("ramp") => {
                let modifier = self.modifier.as_deref().unwrap_or("");
                if modifier.contains("right") {
                    ManeuverDirection::Right
                } else if modifier.contains("uturn") {
                    ManeuverDirection::UTurn
                } else if modifier == "straight" {
                    ManeuverDirection::Straight
                } else {
                    ManeuverDirection::Left
                }
            }
            _ => ManeuverDirection::None,
        }
    }
}

/// One maneuver-bounded segment of a route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub geometry: Vec<Coordinate>,
    pub maneuver: Maneuver,
    /// Metres
    #[serde(default)]
    pub distance: f64,
    /// Seconds
    #[serde(default)]
    pub duration: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    #[serde(default)]
    pub steps: Vec<RouteStep>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteAlternative {
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

/// Answer of the routing service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingResponse {
    #[serde(default)]
    pub routes: Vec<RouteAlternative>,
}

impl RoutingResponse {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Steps to walk plus where they lead.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub steps: Vec<RouteStep>,
    pub destination: Coordinate,
}

impl Route {
    /// Build the route from the first alternative of `response`.
    ///
    /// Legs are concatenated in order. The final step loses its last
    /// coordinate, which is where the destination marker goes instead of a
    /// trail marker. Returns `None` when the response has no steps.
    pub fn from_response(response: &RoutingResponse, destination: Coordinate) -> Option<Self> {
        let alternative = response.routes.first()?;
        let mut steps: Vec<RouteStep> = alternative
            .legs
            .iter()
            .flat_map(|leg| leg.steps.iter().cloned())
            .collect();

        let last = steps.last_mut()?;
        last.geometry.pop();

        Some(Self { steps, destination })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Where step `index` ends: its last coordinate, or the destination
    /// when the geometry is empty.
    pub fn step_end(&self, index: usize) -> Coordinate {
        self.steps
            .get(index)
            .and_then(|s| s.geometry.last().copied())
            .unwrap_or(self.destination)
    }

    /// Point the trail should aim for after step `index`: the first
    /// coordinate of the following step, or the destination from the final
    /// step onward.
    pub fn next_point(&self, index: usize) -> Coordinate {
        if index + 1 >= self.steps.len() {
            return self.destination;
        }
        self.steps[index + 1]
            .geometry
            .first()
            .copied()
            .unwrap_or(self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maneuver(kind: &str, modifier: Option<&str>) -> Maneuver {
        Maneuver {
            maneuver_type: kind.to_string(),
            modifier: modifier.map(str::to_string),
            instruction: String::new(),
        }
    }

    fn step(points: &[(f64, f64)]) -> RouteStep {
        RouteStep {
            geometry: points.iter().map(|&(a, b)| Coordinate::new(a, b)).collect(),
            maneuver: maneuver("turn", Some("left")),
            distance: 0.0,
            duration: 0.0,
        }
    }

    #[test]
    fn classifies_maneuvers() {
        assert_eq!(maneuver("depart", None).direction(), ManeuverDirection::None);
        assert_eq!(maneuver("arrive", Some("right")).direction(), ManeuverDirection::None);
        assert_eq!(maneuver("turn", Some("slight right")).direction(), ManeuverDirection::Right);
        assert_eq!(maneuver("turn", Some("left")).direction(), ManeuverDirection::Left);
        assert_eq!(maneuver("turn", Some("uturn")).direction(), ManeuverDirection::UTurn);
        assert_eq!(maneuver("turn", Some("straight")).direction(), ManeuverDirection::Straight);
        assert_eq!(maneuver("off ramp", Some("right")).direction(), ManeuverDirection::Right);
        assert_eq!(maneuver("on ramp", None).direction(), ManeuverDirection::Left);
        assert_eq!(maneuver("roundabout", Some("right")).direction(), ManeuverDirection::RoundAbout);
        assert_eq!(maneuver("rotary", None).direction(), ManeuverDirection::RoundAbout);
        assert_eq!(maneuver("new name", Some("right")).direction(), ManeuverDirection::None);
    }

    #[test]
    fn deserializes_routing_json() {
        let json = r#"{
            "routes": [{
                "legs": [{
                    "steps": [{
                        "geometry": [{"latitude": 0.0, "longitude": 0.0}, {"latitude": 0.0, "longitude": 0.001}],
                        "maneuver": {"type": "depart", "instruction": "Head east"},
                        "distance": 111.2,
                        "duration": 20.0
                    }]
                }]
            }]
        }"#;

        let response = RoutingResponse::from_json(json).unwrap();
        let first = &response.routes[0].legs[0].steps[0];
        assert_eq!(first.maneuver.maneuver_type, "depart");
        assert_eq!(first.maneuver.modifier, None);
        assert_eq!(first.maneuver.instruction, "Head east");
        assert_eq!(first.geometry.len(), 2);
    }

    #[test]
    fn ingestion_flattens_legs_and_trims_final_coordinate() {
        let response = RoutingResponse {
            routes: vec![
                RouteAlternative {
                    legs: vec![
                        RouteLeg {
                            steps: vec![step(&[(0.0, 0.0), (0.0, 0.001)])],
                        },
                        RouteLeg {
                            steps: vec![step(&[(0.0, 0.001), (0.0, 0.002)])],
                        },
                    ],
                },
                RouteAlternative {
                    legs: vec![RouteLeg {
                        steps: vec![step(&[(5.0, 5.0)])],
                    }],
                },
            ],
        };

        let route = Route::from_response(&response, Coordinate::new(0.0, 0.002)).unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route.steps[0].geometry.len(), 2);
        assert_eq!(route.steps[1].geometry, vec![Coordinate::new(0.0, 0.001)]);
        assert_eq!(route.next_point(0), Coordinate::new(0.0, 0.001));
        assert_eq!(route.next_point(1), Coordinate::new(0.0, 0.002));
    }

    #[test]
    fn empty_geometry_ends_at_destination() {
        let response = RoutingResponse {
            routes: vec![RouteAlternative {
                legs: vec![RouteLeg {
                    steps: vec![step(&[(0.0, 0.0)])],
                }],
            }],
        };
        let destination = Coordinate::new(0.0, 0.0004);
        let route = Route::from_response(&response, destination).unwrap();

        assert!(route.steps[0].geometry.is_empty());
        assert_eq!(route.step_end(0), destination);
    }

    #[test]
    fn no_steps_means_no_route() {
        let empty = RoutingResponse::default();
        assert!(Route::from_response(&empty, Coordinate::new(0.0, 0.0)).is_none());

        let stepless = RoutingResponse {
            routes: vec![RouteAlternative {
                legs: vec![RouteLeg::default()],
            }],
        };
        assert!(Route::from_response(&stepless, Coordinate::new(0.0, 0.0)).is_none());
    }
}
