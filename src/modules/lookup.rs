use std::collections::BTreeMap;

use super::catalog::{category_table, prefetch_descriptor};
use super::ModuleDescriptor;
use crate::config::{ModuleFlags, Platform};
use crate::error::ParserError;

/// Every known integration by identifier, for `-m`.
///
/// Ignores enable flags and platform: both prefetch variants are present.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, ModuleDescriptor>,
}

impl ModuleRegistry {
    pub fn builtin() -> Self {
        let mut registry = ModuleRegistry::default();
        let descriptors = category_table(&ModuleFlags::all(true), Platform::Linux)
            .into_iter()
            .flat_map(|(_, pairs)| pairs.into_iter().map(|(_, descriptor)| descriptor))
            .chain(std::iter::once(prefetch_descriptor(Platform::Windows)));

        for descriptor in descriptors {
            registry.modules.insert(descriptor.identifier.clone(), descriptor);
        }
        registry
    }

    #[cfg(test)]
    pub(crate) fn register(&mut self, descriptor: ModuleDescriptor) -> Result<(), ParserError> {
        if self.modules.contains_key(&descriptor.identifier) {
            return Err(ParserError::DuplicateModule(descriptor.identifier));
        }
        self.modules.insert(descriptor.identifier.clone(), descriptor);
        Ok(())
    }

    /// Exact, case-sensitive lookup
    pub fn lookup(&self, identifier: &str) -> Result<&ModuleDescriptor, ParserError> {
        self.modules
            .get(identifier)
            .ok_or_else(|| ParserError::ModuleNotFound(identifier.to_string()))
    }

    /// Sorted identifiers
    pub fn identifiers(&self) -> Vec<&str> {
        self.modules.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModuleResult;

    #[test]
    fn test_builtin_has_every_integration() {
        let registry = ModuleRegistry::builtin();

        assert_eq!(registry.len(), 19);
        assert!(registry.lookup("module_PECmd").is_ok());
        assert!(registry.lookup("module_prefetchruncounts").is_ok());
        assert_eq!(
            registry.lookup("module_RBCmd").unwrap().identifier,
            "module_RBCmd"
        );
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = ModuleRegistry::builtin();

        assert!(matches!(
            registry.lookup("module_rbcmd"),
            Err(ParserError::ModuleNotFound(name)) if name == "module_rbcmd"
        ));
        assert!(registry.lookup("RBCmd").is_err());
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = ModuleRegistry::default();
        assert!(registry.is_empty());

        registry
            .register(ModuleDescriptor::new("module_x", |_ctx| ModuleResult::failed()))
            .unwrap();
        let again = registry.register(ModuleDescriptor::new("module_x", |_ctx| ModuleResult::failed()));

        assert!(matches!(again, Err(ParserError::DuplicateModule(_))));
        assert_eq!(registry.identifiers(), vec!["module_x"]);
    }
}
