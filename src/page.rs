//! A trait's documentation page: the consumer side of the implementor hand-off.

use crate::error::LoadError;
use crate::registry::{Delivery, ImplementorRegistry};
use crate::script::parse_implementors_script;
use crate::table::ImplementorTable;
use crate::types::TraitPath;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// Implementor listing of one trait.
///
/// Scripts may be loaded before anyone looks at the page; the table then waits
/// in the page's registry until the first read attaches the renderer.
#[derive(Debug)]
pub struct TraitPage {
    trait_path: TraitPath,
    /// Script this page was loaded from, if it came from disk
    source: Option<PathBuf>,
    registry: ImplementorRegistry,
    /// Last table delivered to the renderer
    rendered: Arc<RwLock<Option<Arc<ImplementorTable>>>>,
}

impl TraitPage {
    pub fn new(trait_path: TraitPath) -> Self {
        Self {
            trait_path,
            source: None,
            registry: ImplementorRegistry::new(),
            rendered: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a page backed by a script file. Nothing is read until [`Self::reload`].
    pub fn with_source(trait_path: TraitPath, source: PathBuf) -> Self {
        Self {
            source: Some(source),
            ..Self::new(trait_path)
        }
    }

    pub fn is_attached(&self) -> bool {
        self.registry.has_callback()
    }

    /// Decode a script and hand its table to the registry.
    pub fn load_script(&self, script: &str) -> Result<Delivery, LoadError> {
        let table = parse_implementors_script(script).map_err(|source| LoadError::Script {
            trait_path: self.trait_path.to_string(),
            source,
        })?;
        Ok(self.registry.load(table))
    }

    /// Re-read the backing script file.
    pub fn reload(&self) -> Result<Delivery, LoadError> {
        let Some(path) = &self.source else {
            return Err(LoadError::NotFound {
                trait_path: self.trait_path.to_string(),
                path: self.trait_path.relative_file(),
            });
        };

        let bytes = std::fs::read(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound {
                    trait_path: self.trait_path.to_string(),
                    path: path.clone(),
                }
            } else {
                LoadError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        let script = String::from_utf8(bytes).map_err(|e| LoadError::NotText {
            path: path.clone(),
            valid_up_to: e.utf8_error().valid_up_to(),
        })?;
        self.load_script(&script)
    }

    /// Register the renderer, picking up a table that loaded earlier.
    /// Does nothing if the renderer is already attached.
    pub fn attach(&self) {
        if self.registry.has_callback() {
            return;
        }
        let rendered = Arc::clone(&self.rendered);
        let delivery = self.registry.register(move |table| {
            *rendered.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(table));
        });
        tracing::debug!(
            trait_path = %self.trait_path,
            picked_up_pending = delivery.is_some(),
            "Attached implementor renderer"
        );
    }

    /// Current implementor table, attaching the renderer first if needed.
    pub fn implementors(&self) -> Option<Arc<ImplementorTable>> {
        self.attach();
        self.rendered
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current table without attaching: the rendered table, else the one
    /// still waiting in the pending slot.
    pub fn snapshot(&self) -> Option<Arc<ImplementorTable>> {
        let rendered = self
            .rendered
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        rendered.or_else(|| self.registry.pending().map(Arc::new))
    }
}
