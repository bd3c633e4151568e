//! Registry mapping VTK cell-type codes to geometry handlers.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::handler::CellHandler;
use crate::wedge::Wedge;

/// VTK cell-type code of the 6-point wedge prism.
pub const VTK_WEDGE: i32 = 13;

/// Registry of cell handlers, keyed by the numeric VTK cell-type code.
///
/// New cell types are supported by registering a handler; no central
/// dispatch switch exists. Codes without a handler are unregistered-type
/// errors wherever the geometry engine meets them.
#[derive(Default)]
pub struct CellRegistry {
    handlers: HashMap<i32, Box<dyn CellHandler>>,
}

impl CellRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in handlers (wedge only).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(VTK_WEDGE, Box::new(Wedge));
        registry
    }

    /// Registers `handler` for `code`, replacing any previous handler.
    pub fn register(&mut self, code: i32, handler: Box<dyn CellHandler>) {
        self.handlers.insert(code, handler);
    }

    /// Looks up the handler for `code`.
    pub fn handler(&self, code: i32) -> Option<&dyn CellHandler> {
        self.handlers.get(&code).map(|h| h.as_ref())
    }

    /// True if `code` has a registered handler.
    pub fn contains(&self, code: i32) -> bool {
        self.handlers.contains_key(&code)
    }
}

static DEFAULT_REGISTRY: Lazy<CellRegistry> = Lazy::new(CellRegistry::with_defaults);

/// The process-wide registry of built-in handlers.
pub fn default_registry() -> &'static CellRegistry {
    &DEFAULT_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_register_wedge_only() {
        let registry = CellRegistry::with_defaults();
        assert!(registry.contains(VTK_WEDGE));
        assert!(!registry.contains(10)); // tetra has no handler
        assert!(registry.handler(VTK_WEDGE).is_some());
        assert!(registry.handler(0).is_none());
    }

    #[test]
    fn test_default_registry_is_shared() {
        assert!(default_registry().contains(VTK_WEDGE));
    }
}
