use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::config::ResolverConfig;
use crate::hierarchy::{ClassId, ClassRegistry, DeclarationLookup, EnclosingLookup};
use crate::policy::Mode;
use crate::resolver::{Resolution, ResolutionCache};

/// Decides whether enclosing-class configuration is visible to a class.
///
/// The nearest explicit nesting policy, searched from the class itself
/// outward through its enclosing classes, decides. Classes without a policy
/// are transparent. If no policy exists anywhere in the chain, the
/// configured default mode applies.
///
/// Resolution never fails. Outcomes are cached per class identity; every
/// nested class passed during a walk is cached with the same outcome.
#[derive(Clone)]
pub struct EnclosingConfigurationResolver {
    declarations: Arc<dyn DeclarationLookup>,
    enclosing: Arc<dyn EnclosingLookup>,
    cache: Arc<ResolutionCache>,
    config: ResolverConfig,
}

impl EnclosingConfigurationResolver {
    /// Create a resolver with default config and a fresh cache.
    #[must_use]
    pub fn new(declarations: Arc<dyn DeclarationLookup>, enclosing: Arc<dyn EnclosingLookup>) -> Self {
        Self {
            declarations,
            enclosing,
            cache: Arc::new(ResolutionCache::new()),
            config: ResolverConfig::default(),
        }
    }

    /// Create a resolver backed by a [`ClassRegistry`] for both lookups.
    #[must_use]
    pub fn from_registry(registry: Arc<ClassRegistry>) -> Self {
        Self::new(registry.clone(), registry)
    }

    /// Replace the configuration.
    ///
    /// Outcomes already cached under the previous configuration are kept;
    /// pair this with a fresh cache when changing the default mode.
    #[must_use]
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Share an existing cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<ResolutionCache>) -> Self {
        self.cache = cache;
        self
    }

    /// The cache backing this resolver.
    #[must_use]
    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// True if `class` should receive configuration declared by its
    /// immediate enclosing class.
    #[must_use]
    pub fn is_configuration_inherited(&self, class: ClassId) -> bool {
        self.resolve(class).is_inherited()
    }

    /// Effective mode for `class`. Top-level classes report
    /// [`Mode::Override`].
    #[must_use]
    pub fn effective_mode(&self, class: ClassId) -> Mode {
        self.resolve(class).mode()
    }

    /// Classes whose configuration is visible to `class`, starting with the
    /// class itself and continuing outward while each level inherits.
    #[must_use]
    pub fn configuration_scope(&self, class: ClassId) -> Vec<ClassId> {
        let mut scope = vec![class];
        let mut seen: HashSet<ClassId> = HashSet::from([class]);
        let mut current = class;
        while let Resolution::Nested {
            enclosing,
            mode: Mode::Inherit,
        } = self.resolve(current)
        {
            if !seen.insert(enclosing) {
                break;
            }
            scope.push(enclosing);
            current = enclosing;
        }
        scope
    }

    /// Full outcome for `class`, from the cache when available.
    #[must_use]
    pub fn resolve(&self, class: ClassId) -> Resolution {
        self.cache.get_or_compute(class, || self.compute(class))
    }

    fn compute(&self, class: ClassId) -> Resolution {
        let Some(parent) = self.enclosing.enclosing_class(class) else {
            debug!(%class, "top-level class; nothing to inherit");
            return Resolution::TopLevel;
        };

        // Nested classes examined so far, with their enclosing class. They
        // carry no explicit policy (except possibly the last), so they share
        // the outcome.
        let mut walked: Vec<(ClassId, ClassId)> = Vec::new();
        let mut seen: HashSet<ClassId> = HashSet::from([class]);
        let mut current = class;
        let mut current_parent = Some(parent);

        let mode = loop {
            if let Some(p) = current_parent {
                walked.push((current, p));
            }

            if let Some(mode) = self.declarations.explicit_mode(current) {
                trace!(%current, %mode, "explicit nesting policy");
                break mode;
            }

            let Some(next) = current_parent else {
                trace!(%current, "enclosing chain exhausted");
                break self.config.default_mode;
            };

            // Every class on a cycle without a policy walks the same loop,
            // so the default is their common outcome.
            if !seen.insert(next) {
                warn!(%class, %next, "enclosing chain contains a cycle");
                break self.config.default_mode;
            }

            current = next;
            match self.cache.get(current) {
                Some(Resolution::Nested { mode, .. }) => {
                    trace!(%current, %mode, "reusing cached ancestor outcome");
                    break mode;
                }
                Some(Resolution::TopLevel) => current_parent = None,
                None => {
                    current_parent = self.enclosing.enclosing_class(current);
                    if current_parent.is_none() {
                        self.cache.insert_if_absent(current, Resolution::TopLevel);
                    }
                }
            }
        };

        // The origin is stored by the caller.
        for &(walked_class, walked_parent) in walked.iter().skip(1) {
            self.cache.insert_if_absent(
                walked_class,
                Resolution::Nested {
                    enclosing: walked_parent,
                    mode,
                },
            );
        }

        debug!(%class, %mode, depth = walked.len(), "resolved enclosing configuration");
        Resolution::Nested {
            enclosing: parent,
            mode,
        }
    }
}
