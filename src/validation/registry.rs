//! Rule registry.
//!
//! Rules are collected on a [`RegistryBuilder`] during startup and sealed into
//! an immutable [`ValidationRegistry`] before the first event is dispatched.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::sync::Arc;

use super::rule::ValidationRule;
use super::types::WorkloadKind;

/// Startup-phase collection of rules.
#[derive(Default)]
pub struct RegistryBuilder {
    rules: Vec<Arc<dyn ValidationRule>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    pub fn register<R: ValidationRule + 'static>(&mut self, rule: R) -> &mut Self {
        log::debug!("Registered validation rule '{}'", rule.name());
        self.rules.push(Arc::new(rule));
        self
    }

    /// Run a fallible rule constructor and register the result.
    ///
    /// Construction failures are logged and the rule is left out; the rest of
    /// the registry is unaffected.
    pub fn register_with<R, E, F>(&mut self, name: &str, constructor: F) -> &mut Self
    where
        R: ValidationRule + 'static,
        E: Display,
        F: FnOnce() -> Result<R, E>,
    {
        match constructor() {
            Ok(rule) => {
                self.register(rule);
            }
            Err(e) => log::warn!("Failed to add validation rule '{}': {}", name, e),
        }
        self
    }

    /// Seal the registry.
    pub fn build(self) -> ValidationRegistry {
        ValidationRegistry { rules: self.rules }
    }
}

/// Immutable, ordered set of registered rules.
pub struct ValidationRegistry {
    rules: Vec<Arc<dyn ValidationRule>>,
}

impl ValidationRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// All rules in registration order.
    pub fn rules(&self) -> &[Arc<dyn ValidationRule>] {
        &self.rules
    }

    /// Rules that apply to `kind`, in registration order.
    pub fn rules_for(&self, kind: WorkloadKind) -> impl Iterator<Item = &Arc<dyn ValidationRule>> {
        self.rules
            .iter()
            .filter(move |rule| rule.applies_to().contains(&kind))
    }

    /// Union of every rule's applicability set.
    pub fn kinds(&self) -> BTreeSet<WorkloadKind> {
        self.rules
            .iter()
            .flat_map(|rule| rule.applies_to().iter().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
