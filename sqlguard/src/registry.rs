//! Named access control implementations.
//!
//! The host selects the implementation to run behind the boundary by name.
//! Factories are registered at link time by whoever assembles the plugin;
//! nothing is loaded dynamically.

use std::collections::HashMap;
use std::sync::Arc;

use sqlguard_engine::{
    AccessMediator, BootstrapError, Collaborators, PolicyEvaluator, SystemAccessControl,
};
use tracing::debug;

use crate::error::InstallError;

/// Registry name of the policy-mediated implementation.
pub const DEFAULT_IMPLEMENTATION: &str = "sqlguard-mediator";

/// Builds an implementation from the flat configuration map.
pub type Factory = Arc<
    dyn Fn(&HashMap<String, String>) -> Result<Box<dyn SystemAccessControl>, BootstrapError>
        + Send
        + Sync,
>;

#[derive(Default)]
pub struct ImplementationRegistry {
    factories: HashMap<String, Factory>,
}

impl ImplementationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the mediator registered under `DEFAULT_IMPLEMENTATION`.
    pub fn with_mediator<E>(collaborators: Collaborators<E>) -> Self
    where
        E: PolicyEvaluator + 'static,
    {
        let mut registry = Self::new();
        registry.register_mediator(DEFAULT_IMPLEMENTATION, collaborators);
        registry
    }

    /// Register a factory, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&HashMap<String, String>) -> Result<Box<dyn SystemAccessControl>, BootstrapError>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        debug!(implementation = %name, "registered access control implementation");
        self.factories.insert(name, Arc::new(factory));
    }

    /// Register an `AccessMediator` built from the given collaborators.
    pub fn register_mediator<E>(&mut self, name: impl Into<String>, collaborators: Collaborators<E>)
    where
        E: PolicyEvaluator + 'static,
    {
        self.register(name, move |config| {
            let mediator = AccessMediator::from_config(config, collaborators.clone())?;
            Ok(Box::new(mediator) as Box<dyn SystemAccessControl>)
        });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Construct the named implementation.
    pub fn create(
        &self,
        name: &str,
        config: &HashMap<String, String>,
    ) -> Result<Box<dyn SystemAccessControl>, InstallError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| InstallError::UnknownImplementation(name.to_string()))?;
        Ok(factory(config)?)
    }
}

impl std::fmt::Debug for ImplementationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImplementationRegistry")
            .field("implementations", &self.names())
            .finish()
    }
}
