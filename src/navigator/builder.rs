//! Builder for constructing a navigator.

use super::error::BuildError;
use super::Navigator;
use crate::config::NavigationConfig;
use crate::destination::{FirstCandidate, SlotPolicy};
use crate::placement::AnchorResolver;
use crate::route::RoutingService;
use crate::storage::KeyValueStore;

/// Builder for [`Navigator`] with a fluent API.
///
/// The store, resolver and routing service are required. Configuration
/// defaults to [`NavigationConfig::default`] and the parking policy to
/// [`FirstCandidate`].
pub struct NavigatorBuilder<K, R, S> {
    config: NavigationConfig,
    store: Option<K>,
    resolver: Option<R>,
    routing: Option<S>,
    policy: Option<Box<dyn SlotPolicy>>,
}

impl<K: KeyValueStore, R: AnchorResolver, S: RoutingService> NavigatorBuilder<K, R, S> {
    pub fn new() -> Self {
        Self {
            config: NavigationConfig::default(),
            store: None,
            resolver: None,
            routing: None,
            policy: None,
        }
    }

    pub fn config(mut self, config: NavigationConfig) -> Self {
        self.config = config;
        self
    }

    /// Persistence for the anchor history and the consent flag (required).
    pub fn store(mut self, store: K) -> Self {
        self.store = Some(store);
        self
    }

    /// Anchor resolution service (required).
    pub fn resolver(mut self, resolver: R) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Directions service (required).
    pub fn routing(mut self, routing: S) -> Self {
        self.routing = Some(routing);
        self
    }

    pub fn slot_policy(mut self, policy: impl SlotPolicy + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    /// Build the navigator.
    /// Returns an error if a collaborator is missing or the config is invalid.
    pub fn build(self) -> Result<Navigator<K, R, S>, BuildError> {
        self.config.validate()?;
        let store = self.store.ok_or(BuildError::MissingStore)?;
        let resolver = self.resolver.ok_or(BuildError::MissingResolver)?;
        let routing = self.routing.ok_or(BuildError::MissingRoutingService)?;
        let policy = self.policy.unwrap_or_else(|| Box::new(FirstCandidate));

        Ok(Navigator::assemble(self.config, store, resolver, routing, policy))
    }
}

impl<K: KeyValueStore, R: AnchorResolver, S: RoutingService> Default for NavigatorBuilder<K, R, S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Pending;
    use crate::placement::{ResolveOutcome, ResolveRequest};
    use crate::route::{RouteQuery, RoutingError, RoutingResponse};
    use crate::storage::MemoryStore;

    struct NoResolver;

    impl AnchorResolver for NoResolver {
        fn resolve(&mut self, _request: ResolveRequest) -> Pending<ResolveOutcome> {
            Pending::ready(ResolveOutcome::Failed("offline".to_string()))
        }
    }

    struct NoRoutes;

    impl RoutingService for NoRoutes {
        fn query(&mut self, _query: RouteQuery) -> Pending<Result<RoutingResponse, RoutingError>> {
            Pending::ready(Ok(RoutingResponse::default()))
        }
    }

    #[test]
    fn builds_with_all_collaborators() {
        let navigator = NavigatorBuilder::new()
            .store(MemoryStore::new())
            .resolver(NoResolver)
            .routing(NoRoutes)
            .build();
        assert!(navigator.is_ok());
    }

    #[test]
    fn missing_store_is_reported() {
        let result: Result<Navigator<MemoryStore, NoResolver, NoRoutes>, _> =
            NavigatorBuilder::new().resolver(NoResolver).routing(NoRoutes).build();
        assert!(matches!(result, Err(BuildError::MissingStore)));
    }

    #[test]
    fn missing_resolver_is_reported() {
        let result: Result<Navigator<MemoryStore, NoResolver, NoRoutes>, _> =
            NavigatorBuilder::new().store(MemoryStore::new()).routing(NoRoutes).build();
        assert!(matches!(result, Err(BuildError::MissingResolver)));
    }

    #[test]
    fn missing_routing_is_reported() {
        let result: Result<Navigator<MemoryStore, NoResolver, NoRoutes>, _> =
            NavigatorBuilder::new()
                .store(MemoryStore::new())
                .resolver(NoResolver)
                .build();
        assert!(matches!(result, Err(BuildError::MissingRoutingService)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = NavigationConfig::default();
        config.history.storage_limit = 0;
        let result = NavigatorBuilder::new()
            .config(config)
            .store(MemoryStore::new())
            .resolver(NoResolver)
            .routing(NoRoutes)
            .build();
        assert!(matches!(result, Err(BuildError::InvalidConfig(_))));
    }
}
