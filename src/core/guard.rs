//! The `Guard` trait shared by every request check

use super::error::{ExtrasResult, MissingRequiredFieldError, RequirementKind};
use super::request::RequestView;
use indexmap::IndexMap;
use std::sync::Arc;

/// A check run against a request before its handler
///
/// Guards hold only their configuration. Everything per-request arrives
/// through the [`RequestView`].
pub trait Guard: Send + Sync + 'static {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Check the request, returning the rejection on failure
    fn check(&self, view: &RequestView) -> ExtrasResult<()>;

    /// Whether this guard needs the form body of the request
    fn needs_form(&self, _view: &RequestView) -> bool {
        false
    }
}

impl<G: Guard + ?Sized> Guard for Arc<G> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn check(&self, view: &RequestView) -> ExtrasResult<()> {
        (**self).check(view)
    }

    fn needs_form(&self, view: &RequestView) -> bool {
        (**self).needs_form(view)
    }
}

impl<G: Guard + ?Sized> Guard for Box<G> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn check(&self, view: &RequestView) -> ExtrasResult<()> {
        (**self).check(view)
    }

    fn needs_form(&self, view: &RequestView) -> bool {
        (**self).needs_form(view)
    }
}

/// Several guards run in order; the first rejection wins
#[derive(Clone, Default)]
pub struct GuardSet {
    guards: Vec<Arc<dyn Guard>>,
}

impl GuardSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a guard
    pub fn with(mut self, guard: impl Guard) -> Self {
        self.guards.push(Arc::new(guard));
        self
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Names of the contained guards, in check order
    pub fn names(&self) -> Vec<&'static str> {
        self.guards.iter().map(|g| g.name()).collect()
    }
}

impl Guard for GuardSet {
    fn name(&self) -> &'static str {
        "guard_set"
    }

    fn check(&self, view: &RequestView) -> ExtrasResult<()> {
        self.guards.iter().try_for_each(|guard| guard.check(view))
    }

    fn needs_form(&self, view: &RequestView) -> bool {
        self.guards.iter().any(|guard| guard.needs_form(view))
    }
}

/// Collapse repeated names into a requirement set, keeping the first
/// spelling of each in declaration order
///
/// With `ignore_case`, names differing only in ASCII case are one entry.
pub fn requirement_set<I, N>(names: I, ignore_case: bool) -> Arc<[String]>
where
    I: IntoIterator<Item = N>,
    N: Into<String>,
{
    let mut seen: IndexMap<String, String> = IndexMap::new();
    for name in names {
        let name: String = name.into();
        let key = if ignore_case {
            name.to_ascii_lowercase()
        } else {
            name.clone()
        };
        seen.entry(key).or_insert(name);
    }
    seen.into_values().collect()
}

/// Membership check: every required name must satisfy `present`
///
/// Missing names are reported in configuration order.
pub fn check_membership(
    kind: RequirementKind,
    required: &[String],
    present: impl Fn(&str) -> bool,
) -> Result<(), MissingRequiredFieldError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !present(name.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MissingRequiredFieldError::new(kind, missing))
    }
}
