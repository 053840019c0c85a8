use std::collections::HashMap;
use std::sync::RwLock;

use medierp_auth::{Actor, ModuleKey, PermissionEvaluator};

use crate::config::ApiConfig;

/// Shared state behind every handler.
#[derive(Debug)]
pub struct AppServices {
    evaluator: PermissionEvaluator,
    cache: Option<DecisionCache>,
}

impl AppServices {
    pub fn new(evaluator: PermissionEvaluator, config: &ApiConfig) -> Self {
        let cache = config
            .decision_cache
            .then(|| DecisionCache::new(config.decision_cache_capacity));
        Self { evaluator, cache }
    }

    /// Services over the built-in role tables.
    pub fn standard(config: &ApiConfig) -> Self {
        Self::new(PermissionEvaluator::standard(), config)
    }

    pub fn evaluator(&self) -> &PermissionEvaluator {
        &self.evaluator
    }

    pub fn decision_cache(&self) -> Option<&DecisionCache> {
        self.cache.as_ref()
    }

    /// [`PermissionEvaluator::can_access_route`], memoized per normalized
    /// module when the cache is enabled. Absent actors are not cached; their
    /// answer is constant.
    pub fn can_access_route(&self, actor: Option<&Actor>, path: &str) -> bool {
        let (Some(cache), Some(actor)) = (&self.cache, actor) else {
            return self.evaluator.can_access_route(actor, path);
        };

        let module = ModuleKey::from_path(path);
        if let Some(allowed) = cache.get(actor, &module) {
            tracing::debug!(
                decision = "route",
                role = actor.role().as_str(),
                module = %module,
                outcome = if allowed { "allow" } else { "deny" },
                basis = "cached",
            );
            return allowed;
        }

        let allowed = self.evaluator.can_access_route(Some(actor), path);
        cache.insert(actor, module, allowed);
        allowed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DecisionKey {
    actor: Actor,
    module: ModuleKey,
}

/// Bounded memo of route decisions, keyed by actor and normalized module.
///
/// Entries never go stale: the registry is immutable for the life of the
/// process. When `capacity` is reached the whole map is cleared.
#[derive(Debug)]
pub struct DecisionCache {
    capacity: usize,
    entries: RwLock<HashMap<DecisionKey, bool>>,
}

impl DecisionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, actor: &Actor, module: &ModuleKey) -> Option<bool> {
        let key = DecisionKey {
            actor: actor.clone(),
            module: module.clone(),
        };
        // A poisoned lock only costs us the memo.
        self.entries.read().ok()?.get(&key).copied()
    }

    pub fn insert(&self, actor: &Actor, module: ModuleKey, allowed: bool) {
        let Ok(mut entries) = self.entries.write() else {
            return;
        };

        if entries.len() >= self.capacity {
            tracing::debug!(capacity = self.capacity, "decision cache full; clearing");
            entries.clear();
        }

        entries.insert(
            DecisionKey {
                actor: actor.clone(),
                module,
            },
            allowed,
        );
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
