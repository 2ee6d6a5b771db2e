//! Fakes for the host collaborators.

#![allow(dead_code)]

use std::time::Duration;
use trailmark::core::Pending;
use trailmark::geo::Coordinate;
use trailmark::localization::PoseSample;
use trailmark::placement::{AnchorHandle, AnchorResolver, ResolveOutcome, ResolveRequest};
use trailmark::route::{
    Maneuver, RouteAlternative, RouteLeg, RouteQuery, RouteStep, RoutingError, RoutingResponse,
    RoutingService,
};
use trailmark::storage::{KeyValueStore, MemoryStore};
use trailmark::Navigator;

pub const FRAME: Duration = Duration::from_millis(100);

/// Resolves every request at once, failing the first `failures` of them.
#[derive(Debug, Default)]
pub struct ScriptedResolver {
    pub requests: Vec<ResolveRequest>,
    pub failures: usize,
}

impl ScriptedResolver {
    pub fn failing_first(failures: usize) -> Self {
        Self {
            requests: Vec::new(),
            failures,
        }
    }
}

impl AnchorResolver for ScriptedResolver {
    fn resolve(&mut self, request: ResolveRequest) -> Pending<ResolveOutcome> {
        self.requests.push(request);
        if self.requests.len() <= self.failures {
            Pending::ready(ResolveOutcome::Failed("no terrain data".to_string()))
        } else {
            Pending::ready(ResolveOutcome::Resolved(AnchorHandle(
                self.requests.len() as u64,
            )))
        }
    }
}

/// Answers every query with the same response.
#[derive(Debug, Default)]
pub struct FixedRouting {
    pub queries: Vec<RouteQuery>,
    pub response: RoutingResponse,
}

impl FixedRouting {
    pub fn answering(response: RoutingResponse) -> Self {
        Self {
            queries: Vec::new(),
            response,
        }
    }
}

impl RoutingService for FixedRouting {
    fn query(&mut self, query: RouteQuery) -> Pending<Result<RoutingResponse, RoutingError>> {
        self.queries.push(query);
        Pending::ready(Ok(self.response.clone()))
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn step(kind: &str, modifier: Option<&str>, geometry: &[(f64, f64)]) -> RouteStep {
    RouteStep {
        geometry: geometry
            .iter()
            .map(|&(lat, lon)| Coordinate::new(lat, lon))
            .collect(),
        maneuver: Maneuver {
            maneuver_type: kind.to_string(),
            modifier: modifier.map(str::to_string),
            instruction: format!("{kind} {}", modifier.unwrap_or_default()),
        },
        distance: 0.0,
        duration: 0.0,
    }
}

pub fn single_leg(steps: Vec<RouteStep>) -> RoutingResponse {
    RoutingResponse {
        routes: vec![RouteAlternative {
            legs: vec![RouteLeg { steps }],
        }],
    }
}

/// Two steps due east along the equator, ending at `(0, 0.002)`.
pub fn two_step_route() -> RoutingResponse {
    single_leg(vec![
        step("depart", None, &[(0.0, 0.0), (0.0, 0.001)]),
        step("turn", Some("straight"), &[(0.0, 0.001), (0.0, 0.002)]),
    ])
}

pub fn localized(position: Coordinate) -> PoseSample {
    PoseSample::tracked(position, 4.0, 2.5)
}

pub fn consented_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.set("has_displayed_privacy_prompt", "true".to_string());
    store
}

pub fn navigator<K: KeyValueStore>(
    store: K,
    resolver: ScriptedResolver,
    response: RoutingResponse,
) -> Navigator<K, ScriptedResolver, FixedRouting> {
    init_logging();
    Navigator::builder()
        .store(store)
        .resolver(resolver)
        .routing(FixedRouting::answering(response))
        .build()
        .expect("default config is valid")
}

/// Points from `from` to `to` inclusive, `count` segments apart.
pub fn walk(from: Coordinate, to: Coordinate, count: usize) -> Vec<Coordinate> {
    (0..=count)
        .map(|i| {
            let t = i as f64 / count as f64;
            Coordinate::new(
                from.latitude + (to.latitude - from.latitude) * t,
                from.longitude + (to.longitude - from.longitude) * t,
            )
        })
        .collect()
}
