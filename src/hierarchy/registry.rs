//! In-memory class registry.
//!
//! Thread-safe, append-only store of class and annotation metadata. Every
//! reference (enclosing class, superclass, annotation, meta-annotation) must
//! already be registered, so hierarchies built here are acyclic.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use tracing::warn;

use crate::error::{NestError, NestResult, ValidationError};
use crate::hierarchy::{AnnotationId, ClassId, DeclarationLookup, EnclosingLookup};
use crate::policy::{DeclarationSite, Mode, NestingPolicy};

fn lock_err(context: &'static str) -> NestError {
    NestError::Internal {
        message: format!("poisoned lock: {context}"),
    }
}

fn validate_name(name: &str, err: ValidationError) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(err);
    }
    Ok(name.to_string())
}

/// Definition of an annotation type.
///
/// An annotation may carry a nesting policy itself and may be annotated
/// with other annotation types, which makes their policies meta-present on
/// any class using it.
#[derive(Debug, Clone)]
pub struct AnnotationDef {
    name: String,
    policy: Option<NestingPolicy>,
    meta: Vec<AnnotationId>,
}

impl AnnotationDef {
    /// Start a definition for an annotation type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            policy: None,
            meta: Vec::new(),
        }
    }

    /// Attach a nesting policy to the annotation type.
    #[must_use]
    pub fn policy(mut self, mode: Mode) -> Self {
        self.policy = Some(NestingPolicy::new(mode));
        self
    }

    /// Annotate this annotation type with another one.
    #[must_use]
    pub fn meta_annotated(mut self, annotation: AnnotationId) -> Self {
        self.meta.push(annotation);
        self
    }
}

/// Definition of a class.
#[derive(Debug, Clone)]
pub struct ClassDef {
    name: String,
    enclosing: Option<ClassId>,
    superclass: Option<ClassId>,
    policy: Option<NestingPolicy>,
    annotations: Vec<AnnotationId>,
    method_policies: Vec<(String, NestingPolicy)>,
}

impl ClassDef {
    /// Start a definition for a top-level class.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enclosing: None,
            superclass: None,
            policy: None,
            annotations: Vec::new(),
            method_policies: Vec::new(),
        }
    }

    /// Declare the class as nested inside `enclosing`.
    #[must_use]
    pub fn nested_in(mut self, enclosing: ClassId) -> Self {
        self.enclosing = Some(enclosing);
        self
    }

    /// Declare the superclass.
    #[must_use]
    pub fn extends(mut self, superclass: ClassId) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// Declare a nesting policy directly on the class.
    #[must_use]
    pub fn policy(mut self, mode: Mode) -> Self {
        self.policy = Some(NestingPolicy::new(mode));
        self
    }

    /// Apply an annotation type to the class.
    #[must_use]
    pub fn annotated(mut self, annotation: AnnotationId) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Declare a nesting policy on one of the class's methods.
    #[must_use]
    pub fn method_policy(mut self, method: impl Into<String>, mode: Mode) -> Self {
        self.method_policies
            .push((method.into(), NestingPolicy::new(mode)));
        self
    }
}

#[derive(Debug)]
struct ClassRecord {
    name: String,
    enclosing: Option<ClassId>,
    superclass: Option<ClassId>,
    policy: Option<NestingPolicy>,
    annotations: Vec<AnnotationId>,
    method_policies: HashMap<String, NestingPolicy>,
}

#[derive(Debug)]
struct AnnotationRecord {
    name: String,
    policy: Option<NestingPolicy>,
    meta: Vec<AnnotationId>,
}

#[derive(Debug, Default)]
struct RegistryState {
    classes: HashMap<ClassId, ClassRecord>,
    annotations: HashMap<AnnotationId, AnnotationRecord>,
}

/// Policies found at the closest meta distance of a single class.
struct ClosestPolicies {
    distance: usize,
    modes: Vec<Mode>,
}

impl ClosestPolicies {
    fn is_ambiguous(&self) -> bool {
        self.modes.windows(2).any(|pair| pair[0] != pair[1])
    }
}

/// Search one class (not its superclasses) breadth-first: the direct policy
/// is distance 0, policies on applied annotations distance 1, and so on.
fn closest_policies(state: &RegistryState, record: &ClassRecord) -> Option<ClosestPolicies> {
    if let Some(policy) = record.policy {
        return Some(ClosestPolicies {
            distance: 0,
            modes: vec![policy.mode()],
        });
    }

    let mut visited: HashSet<AnnotationId> = HashSet::new();
    let mut level: Vec<AnnotationId> = record
        .annotations
        .iter()
        .copied()
        .filter(|id| visited.insert(*id))
        .collect();
    let mut distance = 1;

    while !level.is_empty() {
        let mut modes = Vec::new();
        let mut next = Vec::new();
        for id in &level {
            let Some(annotation) = state.annotations.get(id) else {
                continue;
            };
            if let Some(policy) = annotation.policy {
                modes.push(policy.mode());
            }
            next.extend(annotation.meta.iter().copied().filter(|m| visited.insert(*m)));
        }
        if !modes.is_empty() {
            return Some(ClosestPolicies { distance, modes });
        }
        level = next;
        distance += 1;
    }

    None
}

/// Walk the class and its superclasses, returning the first class that
/// carries any policy along with the policies found on it.
fn search_type_hierarchy(
    state: &RegistryState,
    class: ClassId,
) -> Option<(&ClassRecord, ClosestPolicies)> {
    let mut queue = VecDeque::from([class]);
    while let Some(current) = queue.pop_front() {
        let record = state.classes.get(&current)?;
        if let Some(found) = closest_policies(state, record) {
            return Some((record, found));
        }
        if let Some(superclass) = record.superclass {
            queue.push_back(superclass);
        }
    }
    None
}

/// Thread-safe in-memory class registry.
///
/// Implements [`DeclarationLookup`] and [`EnclosingLookup`]. A policy is
/// searched on the class itself, then on its annotations and their
/// meta-annotations (closest first), then on its superclasses. Enclosing
/// classes are never consulted by the declaration search.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    state: RwLock<RegistryState>,
}

impl ClassRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        // Records are append-only, so a poisoned guard still holds consistent data.
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an annotation type.
    ///
    /// # Errors
    /// - `EmptyAnnotationName` if the name is blank
    /// - `UnknownAnnotation` if a meta-annotation is not registered
    pub fn register_annotation(&self, def: AnnotationDef) -> NestResult<AnnotationId> {
        let name = validate_name(&def.name, ValidationError::EmptyAnnotationName)?;

        let mut state = self
            .state
            .write()
            .map_err(|_| lock_err("register_annotation"))?;
        if let Some(missing) = def
            .meta
            .iter()
            .find(|id| !state.annotations.contains_key(id))
        {
            return Err(ValidationError::UnknownAnnotation { id: *missing }.into());
        }

        let id = AnnotationId::new();
        state.annotations.insert(
            id,
            AnnotationRecord {
                name,
                policy: def.policy,
                meta: def.meta,
            },
        );
        Ok(id)
    }

    /// Register a class.
    ///
    /// # Errors
    /// - `EmptyClassName` / `EmptyMethodName` for blank names
    /// - `UnknownClass` if the enclosing class or superclass is not registered
    /// - `UnknownAnnotation` if an applied annotation is not registered
    pub fn register(&self, def: ClassDef) -> NestResult<ClassId> {
        let name = validate_name(&def.name, ValidationError::EmptyClassName)?;
        let mut method_policies = HashMap::with_capacity(def.method_policies.len());
        for (method, policy) in def.method_policies {
            let method = validate_name(&method, ValidationError::EmptyMethodName)?;
            method_policies.insert(method, policy);
        }

        let mut state = self.state.write().map_err(|_| lock_err("register"))?;
        for referenced in def.enclosing.iter().chain(def.superclass.iter()) {
            if !state.classes.contains_key(referenced) {
                return Err(ValidationError::UnknownClass { id: *referenced }.into());
            }
        }
        if let Some(missing) = def
            .annotations
            .iter()
            .find(|id| !state.annotations.contains_key(id))
        {
            return Err(ValidationError::UnknownAnnotation { id: *missing }.into());
        }

        let id = ClassId::new();
        state.classes.insert(
            id,
            ClassRecord {
                name,
                enclosing: def.enclosing,
                superclass: def.superclass,
                policy: def.policy,
                annotations: def.annotations,
                method_policies,
            },
        );
        Ok(id)
    }

    /// Returns the class name, if registered.
    #[must_use]
    pub fn name(&self, class: ClassId) -> Option<String> {
        self.read().classes.get(&class).map(|r| r.name.clone())
    }

    /// Returns the annotation type name, if registered.
    #[must_use]
    pub fn annotation_name(&self, annotation: AnnotationId) -> Option<String> {
        self.read()
            .annotations
            .get(&annotation)
            .map(|r| r.name.clone())
    }

    /// Number of registered classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().classes.len()
    }

    /// Returns true if no classes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enclosing classes of `class`, innermost first.
    #[must_use]
    pub fn enclosing_chain(&self, class: ClassId) -> Vec<ClassId> {
        let state = self.read();
        let mut chain = Vec::new();
        let mut current = state.classes.get(&class).and_then(|r| r.enclosing);
        while let Some(id) = current {
            chain.push(id);
            current = state.classes.get(&id).and_then(|r| r.enclosing);
        }
        chain
    }

    /// Policies declared directly on the class and its methods.
    ///
    /// Meta-present and superclass policies are not included.
    #[must_use]
    pub fn declarations(&self, class: ClassId) -> Vec<(DeclarationSite, NestingPolicy)> {
        let state = self.read();
        let Some(record) = state.classes.get(&class) else {
            return Vec::new();
        };

        let mut out: Vec<(DeclarationSite, NestingPolicy)> = record
            .policy
            .map(|p| (DeclarationSite::Class, p))
            .into_iter()
            .collect();
        let mut methods: Vec<_> = record.method_policies.iter().collect();
        methods.sort_by(|a, b| a.0.cmp(b.0));
        out.extend(methods.into_iter().map(|(name, policy)| {
            (DeclarationSite::Method { name: name.clone() }, *policy)
        }));
        out
    }

    /// Policy declared on a method of `class`.
    #[must_use]
    pub fn method_policy(&self, class: ClassId, method: &str) -> Option<Mode> {
        self.read()
            .classes
            .get(&class)
            .and_then(|r| r.method_policies.get(method.trim()))
            .map(NestingPolicy::mode)
    }

    /// Strict policy search on exactly `class`.
    ///
    /// Unlike [`DeclarationLookup::explicit_mode`], disagreeing policies at
    /// the same meta distance are reported instead of tie-broken.
    ///
    /// # Errors
    /// - `UnknownClass` if `class` is not registered
    /// - `ConflictingDeclarations` if the closest declarations disagree
    pub fn find_policy(&self, class: ClassId) -> NestResult<Option<Mode>> {
        let state = self.read();
        if !state.classes.contains_key(&class) {
            return Err(ValidationError::UnknownClass { id: class }.into());
        }
        match search_type_hierarchy(&state, class) {
            None => Ok(None),
            Some((record, found)) if found.is_ambiguous() => {
                Err(ValidationError::ConflictingDeclarations {
                    class: record.name.clone(),
                    distance: found.distance,
                }
                .into())
            }
            Some((_, found)) => Ok(found.modes.first().copied()),
        }
    }
}

impl DeclarationLookup for ClassRegistry {
    fn explicit_mode(&self, class: ClassId) -> Option<Mode> {
        let state = self.read();
        let (record, found) = search_type_hierarchy(&state, class)?;
        let chosen = found.modes.first().copied();
        if found.is_ambiguous() {
            warn!(
                class = %record.name,
                distance = found.distance,
                chosen = ?chosen,
                "conflicting nesting policies; first declared wins"
            );
        }
        chosen
    }
}

impl EnclosingLookup for ClassRegistry {
    fn enclosing_class(&self, class: ClassId) -> Option<ClassId> {
        self.read().classes.get(&class).and_then(|r| r.enclosing)
    }
}
