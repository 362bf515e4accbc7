//! Element registry and compiled template cache.
//!
//! A [`Registry`] maps names to elements and filters and caches compiled
//! templates by their exact source text. One lock guards all three maps.
//!
//! Bindings are captured when a template is first compiled. Registering an
//! element afterwards does not change templates already in the cache; use
//! [`Registry::recompile`] to rebuild one.
//!
//! Most programs share [`Registry::global`]. Tests and embedders that want
//! isolation create their own with [`Registry::new`] or
//! [`Registry::empty`].

use super::{parse, Callee, Template};
use crate::element::{builtin, color, Element, Filter};
use crate::error::Result;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::debug;

static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();

#[derive(Default)]
struct Inner {
    elements: HashMap<String, Arc<dyn Element>>,
    filters: HashMap<String, Arc<Filter>>,
    cache: HashMap<String, Arc<Template>>,
}

impl Inner {
    fn lookup(&self, name: &str) -> Option<Callee> {
        if let Some(element) = self.elements.get(name) {
            return Some(Callee::Element(Arc::clone(element)));
        }
        self.filters
            .get(name)
            .map(|filter| Callee::Filter(Arc::clone(filter)))
    }

    fn compile(&mut self, source: &str) -> Result<Arc<Template>> {
        let nodes = parse::parse(source)?;
        let template = Arc::new(Template::bind(source, nodes, |name| self.lookup(name))?);
        self.cache
            .insert(source.to_string(), Arc::clone(&template));
        Ok(template)
    }
}

/// Named elements, filters and the compiled template cache.
pub struct Registry {
    inner: Mutex<Inner>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        let mut elements: Vec<_> = inner.elements.keys().collect();
        elements.sort();
        let mut filters: Vec<_> = inner.filters.keys().collect();
        filters.sort();
        f.debug_struct("Registry")
            .field("elements", &elements)
            .field("filters", &filters)
            .field("cached_templates", &inner.cache.len())
            .finish()
    }
}

impl Registry {
    /// A registry with the built-in elements and filters.
    pub fn new() -> Self {
        let mut inner = Inner::default();
        for (name, element) in builtin::elements() {
            inner.elements.insert(name.to_string(), element);
        }
        for (name, filter) in color::filters() {
            inner.filters.insert(name.to_string(), filter);
        }
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// A registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    /// The process-wide registry, created with [`Registry::new`] on first
    /// use.
    pub fn global() -> Arc<Registry> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Registry::new())))
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an element under `name`, replacing any previous one.
    pub fn register_element<E>(&self, name: impl Into<String>, element: E)
    where
        E: Element + 'static,
    {
        self.lock().elements.insert(name.into(), Arc::new(element));
    }

    /// Register a filter under `name`, replacing any previous one.
    pub fn register_filter<F>(&self, name: impl Into<String>, filter: F)
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        self.lock().filters.insert(name.into(), Arc::new(filter));
    }

    /// Compile `source`, or return the cached template for identical text.
    ///
    /// Failed compilations are not cached.
    pub fn compile(&self, source: &str) -> Result<Arc<Template>> {
        let mut inner = self.lock();
        if let Some(template) = inner.cache.get(source) {
            debug!("Template cache hit");
            return Ok(Arc::clone(template));
        }
        debug!("Compiling template {:?}", source);
        inner.compile(source)
    }

    /// Compile `source` against the current registrations, replacing any
    /// cached entry.
    pub fn recompile(&self, source: &str) -> Result<Arc<Template>> {
        let mut inner = self.lock();
        inner.cache.remove(source);
        debug!("Recompiling template {:?}", source);
        inner.compile(source)
    }

    /// Return `true` if `source` has a compiled template in the cache.
    pub fn is_cached(&self, source: &str) -> bool {
        self.lock().cache.contains_key(source)
    }
}
