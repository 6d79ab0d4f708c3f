use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use serde::Serialize;
use thiserror::Error;

use crate::engine::{AnalysisBackend, EngineCapabilities, EngineParams, ParameterError};

/// Builds a backend for one project; rejects parameters it does not understand.
pub type EngineFactory =
    Arc<dyn Fn(&EngineParams) -> Result<Box<dyn AnalysisBackend>, ParameterError> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Engine {0} is not registered")]
    NotRegistered(String),
    #[error("Engine {0} already registered")]
    AlreadyRegistered(String),
}

/// Registered engine: factory plus descriptive metadata.
#[derive(Clone)]
pub struct EngineRegistration {
    pub name: String,
    pub factory: EngineFactory,
    pub description: String,
    pub capabilities: Option<EngineCapabilities>,
}

impl EngineRegistration {
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&EngineParams) -> Result<Box<dyn AnalysisBackend>, ParameterError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            factory: Arc::new(factory),
            description: String::new(),
            capabilities: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_capabilities(mut self, capabilities: EngineCapabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    pub fn build(&self, params: &EngineParams) -> Result<Box<dyn AnalysisBackend>, ParameterError> {
        (self.factory)(params)
    }

    pub fn info(&self) -> EngineInfo {
        EngineInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            capabilities: self.capabilities,
        }
    }
}

impl std::fmt::Debug for EngineRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineRegistration")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

/// Serializable summary of a registration, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineInfo {
    pub name: String,
    pub description: String,
    pub capabilities: Option<EngineCapabilities>,
}

/// Registry for analysis engines; callers select by name.
#[derive(Default, Clone, Debug)]
pub struct EngineRegistry {
    engines: HashMap<String, EngineRegistration>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self { engines: HashMap::new() }
    }

    pub fn register(
        &mut self,
        registration: EngineRegistration,
        override_existing: bool,
    ) -> Result<&mut Self, RegistryError> {
        if self.engines.contains_key(&registration.name) && !override_existing {
            return Err(RegistryError::AlreadyRegistered(registration.name));
        }
        self.insert(registration);
        Ok(self)
    }

    /// Add or replace by name.
    fn insert(&mut self, registration: EngineRegistration) {
        tracing::debug!(engine = %registration.name, "registering engine");
        self.engines.insert(registration.name.clone(), registration);
    }

    pub fn get(&self, name: &str) -> Result<&EngineRegistration, RegistryError> {
        self.engines.get(name).ok_or_else(|| RegistryError::NotRegistered(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.engines.contains_key(name)
    }

    /// Return a sorted list of registered engine names for error messages/help.
    pub fn names(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.engines.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Registrations sorted by name.
    pub fn registrations(&self) -> Vec<&EngineRegistration> {
        let mut entries: Vec<&EngineRegistration> = self.engines.values().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}

static ENGINE_REGISTRY: Lazy<RwLock<EngineRegistry>> =
    Lazy::new(|| RwLock::new(EngineRegistry::new()));

fn with_global<T>(f: impl FnOnce(&EngineRegistry) -> T) -> T {
    match ENGINE_REGISTRY.read() {
        Ok(guard) => f(&guard),
        Err(poisoned) => f(&poisoned.into_inner()),
    }
}

fn with_global_mut<T>(f: impl FnOnce(&mut EngineRegistry) -> T) -> T {
    let mut guard = match ENGINE_REGISTRY.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    f(&mut guard)
}

/// Register an engine in the process-wide registry.
pub fn register_engine(
    registration: EngineRegistration,
    override_existing: bool,
) -> Result<(), RegistryError> {
    with_global_mut(|registry| registry.register(registration, override_existing).map(|_| ()))
}

/// Fetch a registration from the process-wide registry.
pub fn resolve_engine(name: &str) -> Result<EngineRegistration, RegistryError> {
    with_global(|registry| registry.get(name).cloned())
}

/// Copy of the process-wide registry as it stands now.
pub fn global_registry() -> EngineRegistry {
    with_global(|registry| registry.clone())
}

/// Registry holding every engine compiled into this build.
pub fn builtin_registry() -> EngineRegistry {
    #[allow(unused_mut)]
    let mut registry = EngineRegistry::new();
    #[cfg(feature = "slither-backend")]
    {
        for registration in crate::services::backends::slither::registrations() {
            registry.insert(registration);
        }
    }
    registry
}

/// Explicit startup step: add the builtin engines to the process-wide registry.
///
/// Existing registrations with the same names are replaced.
pub fn register_builtin_engines() {
    let builtins = builtin_registry();
    with_global_mut(|registry| {
        for registration in builtins.engines.into_values() {
            registry.insert(registration);
        }
    });
}
