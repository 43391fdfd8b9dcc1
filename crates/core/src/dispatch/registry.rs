//! Hook registry facade - registration, resolution and lifecycle
//!
//! Both roots (the free function table and the class registry) sit behind a
//! single reader/writer lock. Resolution takes the read side and runs on the
//! interception hot path; registration and lifecycle take the write side.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, trace, warn};

use tracehook_sdk::{Callable, ClassScope};

use super::class_registry::ClassRegistry;
use super::entry::{fold_name, DispatchEntry, DispatchHandle};
use super::error::RegistryError;
use super::options::HookOptions;
use super::table::SymbolTable;

/// Classes visited before a method lookup gives up
///
/// The scope itself counts as the first. A hook registered on an ancestor
/// more than `MAX_HIERARCHY_DEPTH - 1` levels above the scope is not found,
/// even in an acyclic hierarchy. Hosts guarantee acyclicity; this only
/// bounds the walk if a custom [`ClassScope`] breaks that promise.
pub const MAX_HIERARCHY_DEPTH: usize = 256;

/// The two process-wide roots
#[derive(Debug, Default)]
struct Roots {
    functions: Option<SymbolTable>,
    classes: Option<ClassRegistry>,
}

/// Snapshot of registry contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Free function hooks
    pub functions: usize,
    /// Classes with at least one method table
    pub classes: usize,
    /// Method hooks across all classes
    pub methods: usize,
}

/// Function-call interception registry
///
/// Starts uninitialized: registration fails and resolution finds nothing
/// until [`HookRegistry::init`] runs.
#[derive(Debug, Default)]
pub struct HookRegistry {
    roots: RwLock<Roots>,
}

impl HookRegistry {
    /// Create an uninitialized registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with both roots allocated
    pub fn initialized() -> Self {
        let registry = Self::new();
        registry.init();
        registry
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Allocate any missing root; existing roots are left untouched
    pub fn init(&self) {
        let mut roots = self.roots.write();
        if roots.classes.is_none() {
            roots.classes = Some(ClassRegistry::new());
        }
        if roots.functions.is_none() {
            roots.functions = Some(SymbolTable::new());
        }
        debug!("Dispatch registry initialized");
    }

    /// Release both roots and everything in them
    pub fn destroy(&self) {
        let mut roots = self.roots.write();
        let had_roots = roots.classes.is_some() || roots.functions.is_some();
        roots.classes = None;
        roots.functions = None;
        if had_roots {
            info!("Dispatch registry destroyed");
        }
    }

    /// Empty both roots without deallocating them
    pub fn reset(&self) {
        let mut roots = self.roots.write();
        if let Some(classes) = roots.classes.as_mut() {
            classes.clear();
        }
        if let Some(functions) = roots.functions.as_mut() {
            functions.clear();
        }
        debug!("Dispatch registry reset");
    }

    /// Whether both roots are allocated
    pub fn is_initialized(&self) -> bool {
        let roots = self.roots.read();
        roots.classes.is_some() && roots.functions.is_some()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a hook from host values
    ///
    /// `class = None` targets a free function. Returns `false` when nothing
    /// was stored (empty name, uninitialized registry, allocation failure).
    pub fn trace(
        &self,
        class: Option<&str>,
        function: &str,
        callable: Option<&Callable>,
        options: HookOptions,
    ) -> bool {
        self.register_logged(class, function, callable.cloned(), options)
    }

    /// Register a hook from raw borrowed buffers
    ///
    /// Same semantics as [`HookRegistry::trace`]; a callable buffer becomes a
    /// [`Callable::Symbol`]. Buffers that are not UTF-8 are rejected.
    pub fn hook_callable(
        &self,
        class: Option<&[u8]>,
        function: &[u8],
        callable: Option<&[u8]>,
        options: u32,
    ) -> bool {
        let decoded = (|| -> Result<_, RegistryError> {
            let class = class.map(decode).transpose()?;
            let function = decode(function)?;
            let callable = callable.map(decode).transpose()?.map(Callable::symbol);
            Ok((class, function, callable))
        })();

        match decoded {
            Ok((class, function, callable)) => {
                self.register_logged(class, function, callable, HookOptions::from_raw(options))
            }
            Err(err) => {
                debug!("Rejected hook registration: {}", err);
                false
            }
        }
    }

    fn register_logged(
        &self,
        class: Option<&str>,
        function: &str,
        callable: Option<Callable>,
        options: HookOptions,
    ) -> bool {
        match self.register(class, function, callable, options) {
            Ok(()) => true,
            Err(err) => {
                debug!(
                    "Failed to register hook {}{}: {}",
                    class.map(|c| format!("{c}::")).unwrap_or_default(),
                    function,
                    err
                );
                false
            }
        }
    }

    /// Store a hook, replacing any hook already registered for the symbol
    pub fn register(
        &self,
        class: Option<&str>,
        function: &str,
        callable: Option<Callable>,
        options: HookOptions,
    ) -> Result<(), RegistryError> {
        if function.is_empty() || class.is_some_and(str::is_empty) {
            return Err(RegistryError::EmptyName);
        }

        let entry = Arc::new(DispatchEntry::new(function, callable, options));
        let mut roots = self.roots.write();

        let replaced = match class {
            Some(class_name) => {
                let classes = roots.classes.as_mut().ok_or(RegistryError::Uninitialized)?;
                let result = classes
                    .get_or_create(class_name)
                    .and_then(|table| table.insert(entry));
                if result.is_err() {
                    // Don't leave a table behind that only this call created
                    classes.remove_if_empty(class_name);
                }
                result?
            }
            None => roots
                .functions
                .as_mut()
                .ok_or(RegistryError::Uninitialized)?
                .insert(entry)?,
        };

        debug!(
            "Registered hook {}{} (options={:#x}{})",
            class.map(|c| format!("{c}::")).unwrap_or_default(),
            function,
            options.bits(),
            if replaced.is_some() { ", replaced" } else { "" }
        );
        Ok(())
    }

    /// Remove a hook; returns the removed entry
    pub fn unregister(&self, class: Option<&str>, function: &str) -> Option<DispatchHandle> {
        let mut roots = self.roots.write();
        match class {
            Some(class_name) => {
                let classes = roots.classes.as_mut()?;
                let entry = classes.lookup_mut(class_name)?.remove(function);
                classes.remove_if_empty(class_name);
                entry
            }
            None => roots.functions.as_mut()?.remove(function),
        }
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve the hook for a call target
    ///
    /// With a scope, walks the class and its ancestors and returns the first
    /// match (nearest ancestor wins). Method and function hooks are separate
    /// namespaces: a scoped lookup never consults the function table.
    pub fn find_dispatch(
        &self,
        scope: Option<&dyn ClassScope>,
        function: &str,
    ) -> Option<DispatchHandle> {
        match scope {
            Some(class) => self.find_method(class, function),
            None => self.find_function(function),
        }
    }

    /// Resolve a free function hook
    pub fn find_function(&self, function: &str) -> Option<DispatchHandle> {
        if function.is_empty() {
            return None;
        }
        let roots = self.roots.read();
        let found = roots.functions.as_ref()?.lookup(function).cloned();
        trace!("find_function({}) -> {}", function, found.is_some());
        found
    }

    /// Resolve a method hook through the class hierarchy
    pub fn find_method(&self, scope: &dyn ClassScope, function: &str) -> Option<DispatchHandle> {
        if function.is_empty() {
            return None;
        }
        let roots = self.roots.read();
        let classes = roots.classes.as_ref()?;
        let key = fold_name(function);

        let mut current = Some(scope);
        let mut depth = 0;
        while let Some(class) = current {
            if depth == MAX_HIERARCHY_DEPTH {
                warn!(
                    "Gave up resolving {}::{} after {} ancestors",
                    scope.class_name(),
                    function,
                    MAX_HIERARCHY_DEPTH
                );
                return None;
            }

            if let Some(entry) = classes
                .lookup(class.class_name())
                .and_then(|table| table.lookup_folded(&key))
            {
                trace!(
                    "find_method({}::{}) -> hit on {}",
                    scope.class_name(),
                    function,
                    class.class_name()
                );
                return Some(entry.clone());
            }

            current = class.parent();
            depth += 1;
        }

        trace!("find_method({}::{}) -> miss", scope.class_name(), function);
        None
    }

    /// Counts of registered hooks
    pub fn stats(&self) -> RegistryStats {
        let roots = self.roots.read();
        RegistryStats {
            functions: roots.functions.as_ref().map(SymbolTable::len).unwrap_or(0),
            classes: roots.classes.as_ref().map(ClassRegistry::len).unwrap_or(0),
            methods: roots
                .classes
                .as_ref()
                .map(ClassRegistry::hook_count)
                .unwrap_or(0),
        }
    }
}

fn decode(bytes: &[u8]) -> Result<&str, RegistryError> {
    std::str::from_utf8(bytes).map_err(|_| RegistryError::InvalidEncoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::table::fail_inserts;
    use tracehook_sdk::ClassEntry;

    fn class(name: &str) -> Arc<ClassEntry> {
        Arc::new(ClassEntry::root(name))
    }

    fn subclass(name: &str, parent: &Arc<ClassEntry>) -> Arc<ClassEntry> {
        Arc::new(ClassEntry::extending(name, parent.clone()))
    }

    fn scope(class: &ClassEntry) -> &dyn ClassScope {
        class
    }

    fn cb(name: &str) -> Callable {
        Callable::symbol(name)
    }

    fn callable_of(entry: &DispatchHandle) -> Option<&str> {
        entry.callable().and_then(Callable::as_symbol)
    }

    #[test]
    fn test_register_requires_init() {
        let registry = HookRegistry::new();
        assert!(!registry.is_initialized());
        assert!(!registry.trace(None, "curl_exec", None, HookOptions::empty()));
        assert!(!registry.trace(Some("PDO"), "exec", None, HookOptions::empty()));
        assert_eq!(
            registry.register(None, "curl_exec", None, HookOptions::empty()),
            Err(RegistryError::Uninitialized)
        );
        assert!(registry.find_function("curl_exec").is_none());
    }

    #[test]
    fn test_round_trip_integrity() {
        let registry = HookRegistry::initialized();
        let foo = class("Foo");

        assert!(registry.trace(Some("Foo"), "Bar", Some(&cb("cb")), HookOptions::from_raw(42)));

        let entry = registry.find_dispatch(Some(scope(&foo)), "BAR").unwrap();
        assert_eq!(entry.callable(), Some(&cb("cb")));
        assert_eq!(entry.options().bits(), 42);
        assert_eq!(entry.function_name(), "bar");
    }

    #[test]
    fn test_case_insensitive_resolution() {
        let registry = HookRegistry::initialized();
        registry.trace(None, "Curl_Exec", Some(&cb("f")), HookOptions::empty());
        registry.trace(Some("MyClass"), "doThing", Some(&cb("m")), HookOptions::empty());

        for variant in ["curl_exec", "CURL_EXEC", "cUrL_eXeC"] {
            let entry = registry.find_dispatch(None, variant).unwrap();
            assert_eq!(callable_of(&entry), Some("f"));
        }

        for class_name in ["MyClass", "myclass", "MYCLASS"] {
            let named = class(class_name);
            for variant in ["dothing", "DOTHING", "doThing"] {
                let entry = registry.find_dispatch(Some(scope(&named)), variant).unwrap();
                assert_eq!(callable_of(&entry), Some("m"));
            }
        }
    }

    #[test]
    fn test_nearest_ancestor_wins() {
        let registry = HookRegistry::initialized();
        let a = class("A");
        let b = subclass("B", &a);
        let c = class("C");

        registry.trace(Some("A"), "m", Some(&cb("from_a")), HookOptions::empty());
        registry.trace(Some("B"), "m", Some(&cb("from_b")), HookOptions::empty());

        let on_b = registry.find_dispatch(Some(scope(&b)), "m").unwrap();
        assert_eq!(callable_of(&on_b), Some("from_b"));

        let on_a = registry.find_dispatch(Some(scope(&a)), "m").unwrap();
        assert_eq!(callable_of(&on_a), Some("from_a"));

        assert!(registry.find_dispatch(Some(scope(&c)), "m").is_none());
    }

    #[test]
    fn test_inheritance_fallback() {
        let registry = HookRegistry::initialized();
        let a = class("A");
        let b = subclass("B", &a);
        let leaf = subclass("Leaf", &b);

        registry.trace(Some("a"), "M", Some(&cb("from_a")), HookOptions::empty());

        let on_b = registry.find_dispatch(Some(scope(&b)), "m").unwrap();
        assert_eq!(callable_of(&on_b), Some("from_a"));
        let on_leaf = registry.find_dispatch(Some(scope(&leaf)), "m").unwrap();
        assert_eq!(callable_of(&on_leaf), Some("from_a"));

        // Only hooked methods resolve, whatever the depth
        assert!(registry.find_dispatch(Some(scope(&leaf)), "other").is_none());
    }

    #[test]
    fn test_namespace_separation() {
        let registry = HookRegistry::initialized();
        let x = class("X");

        registry.trace(None, "f", Some(&cb("function")), HookOptions::empty());
        assert!(registry.find_dispatch(Some(scope(&x)), "f").is_none());

        registry.trace(Some("X"), "f", Some(&cb("method")), HookOptions::empty());
        let function = registry.find_dispatch(None, "f").unwrap();
        let method = registry.find_dispatch(Some(scope(&x)), "f").unwrap();
        assert_eq!(callable_of(&function), Some("function"));
        assert_eq!(callable_of(&method), Some("method"));

        registry.unregister(None, "f");
        assert!(registry.find_dispatch(None, "f").is_none());
        assert!(registry.find_dispatch(Some(scope(&x)), "f").is_some());
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let registry = HookRegistry::initialized();
        let foo = class("Foo");

        registry.trace(Some("Foo"), "bar", Some(&cb("first")), HookOptions::PREHOOK);
        registry.trace(Some("FOO"), "BAR", Some(&cb("second")), HookOptions::POSTHOOK);
        registry.trace(None, "baz", None, HookOptions::PREHOOK);
        registry.trace(None, "Baz", Some(&cb("second")), HookOptions::POSTHOOK);

        let method = registry.find_dispatch(Some(scope(&foo)), "bar").unwrap();
        assert_eq!(callable_of(&method), Some("second"));
        assert_eq!(method.options(), HookOptions::POSTHOOK);

        let function = registry.find_dispatch(None, "baz").unwrap();
        assert_eq!(callable_of(&function), Some("second"));

        assert_eq!(
            registry.stats(),
            RegistryStats {
                functions: 1,
                classes: 1,
                methods: 1
            }
        );
    }

    #[test]
    fn test_handle_survives_mutation() {
        let registry = HookRegistry::initialized();
        registry.trace(None, "exec", Some(&cb("old")), HookOptions::from_raw(3));

        let held = registry.find_function("exec").unwrap();
        registry.trace(None, "exec", Some(&cb("new")), HookOptions::empty());
        assert_eq!(callable_of(&held), Some("old"));

        registry.reset();
        registry.destroy();
        assert_eq!(callable_of(&held), Some("old"));
        assert_eq!(held.options().bits(), 3);
        assert_eq!(Arc::strong_count(&held), 1);
    }

    #[test]
    fn test_reset_clears_content_keeps_roots() {
        let registry = HookRegistry::initialized();
        let foo = class("Foo");
        registry.trace(None, "f", None, HookOptions::empty());
        registry.trace(Some("Foo"), "m", None, HookOptions::empty());

        registry.reset();
        assert!(registry.is_initialized());
        assert!(registry.find_dispatch(None, "f").is_none());
        assert!(registry.find_dispatch(Some(scope(&foo)), "m").is_none());
        assert_eq!(registry.stats(), RegistryStats::default());

        // No init needed after a reset
        assert!(registry.trace(Some("Foo"), "m", None, HookOptions::NON_TRACING));
        let entry = registry.find_dispatch(Some(scope(&foo)), "m").unwrap();
        assert!(entry.is_observer());
        assert_eq!(entry.options(), HookOptions::NON_TRACING);
    }

    #[test]
    fn test_destroy_then_init_is_fresh() {
        let registry = HookRegistry::initialized();
        let foo = class("Foo");
        registry.trace(None, "f", None, HookOptions::empty());
        registry.trace(Some("Foo"), "m", None, HookOptions::empty());

        registry.destroy();
        assert!(!registry.is_initialized());
        assert!(!registry.trace(None, "g", None, HookOptions::empty()));
        assert!(registry.find_dispatch(None, "f").is_none());

        registry.init();
        assert!(registry.is_initialized());
        assert_eq!(registry.stats(), RegistryStats::default());
        assert!(registry.find_dispatch(None, "f").is_none());
        assert!(registry.find_dispatch(Some(scope(&foo)), "m").is_none());
        assert!(registry.trace(None, "f", None, HookOptions::empty()));
    }

    #[test]
    fn test_lifecycle_calls_are_idempotent() {
        let registry = HookRegistry::new();
        registry.destroy();
        registry.reset();
        assert!(!registry.is_initialized());

        registry.init();
        registry.trace(None, "f", None, HookOptions::empty());
        // A second init must not wipe existing roots
        registry.init();
        assert!(registry.find_function("f").is_some());

        registry.destroy();
        registry.destroy();
        assert!(!registry.is_initialized());
    }

    #[test]
    fn test_empty_names_are_defined_failures() {
        let registry = HookRegistry::initialized();
        let foo = class("Foo");

        assert!(!registry.trace(None, "", Some(&cb("cb")), HookOptions::empty()));
        assert!(!registry.trace(Some("Foo"), "", Some(&cb("cb")), HookOptions::empty()));
        assert!(!registry.trace(Some(""), "m", Some(&cb("cb")), HookOptions::empty()));
        assert_eq!(
            registry.register(Some("Foo"), "", None, HookOptions::empty()),
            Err(RegistryError::EmptyName)
        );

        assert!(registry.find_dispatch(None, "").is_none());
        assert!(registry.find_dispatch(Some(scope(&foo)), "").is_none());
        assert_eq!(registry.stats(), RegistryStats::default());
    }

    #[test]
    fn test_hook_callable_raw_buffers() {
        let registry = HookRegistry::initialized();
        let pdo = class("pdo");

        assert!(registry.hook_callable(Some(b"PDO"), b"Exec", Some(b"trace_exec"), 5));
        assert!(registry.hook_callable(None, b"curl_exec", None, 0));

        let method = registry.find_dispatch(Some(scope(&pdo)), "exec").unwrap();
        assert_eq!(callable_of(&method), Some("trace_exec"));
        assert_eq!(method.options().bits(), 5);

        assert!(registry.find_function("CURL_EXEC").unwrap().is_observer());
    }

    #[test]
    fn test_hook_callable_rejects_bad_input() {
        let registry = HookRegistry::initialized();
        assert!(!registry.hook_callable(None, b"", None, 0));
        assert!(!registry.hook_callable(None, b"\xff\xfe", None, 0));
        assert!(!registry.hook_callable(Some(b"\xc3"), b"m", None, 0));
        assert!(!registry.hook_callable(None, b"f", Some(b"\x80"), 0));
        assert_eq!(registry.stats(), RegistryStats::default());

        let uninit = HookRegistry::new();
        assert!(!uninit.hook_callable(None, b"f", None, 0));
    }

    #[test]
    fn test_unregister_method_drops_empty_class_table() {
        let registry = HookRegistry::initialized();
        registry.trace(Some("Foo"), "m", None, HookOptions::empty());
        assert_eq!(registry.stats().classes, 1);

        assert!(registry.unregister(Some("foo"), "M").is_some());
        assert!(registry.unregister(Some("foo"), "M").is_none());
        assert!(registry.unregister(Some("Unknown"), "m").is_none());
        assert_eq!(registry.stats(), RegistryStats::default());
    }

    #[test]
    fn test_failed_insert_leaves_no_class_table() {
        let registry = HookRegistry::initialized();
        let fresh = class("Fresh");

        fail_inserts(true);
        let result = registry.register(Some("Fresh"), "m", None, HookOptions::empty());
        let traced = registry.trace(None, "f", None, HookOptions::empty());
        fail_inserts(false);

        assert!(matches!(result, Err(RegistryError::AllocationFailed(_))));
        assert!(!traced);
        assert_eq!(registry.stats(), RegistryStats::default());
        assert!(registry.find_dispatch(Some(scope(&fresh)), "m").is_none());
        assert!(registry.find_function("f").is_none());

        // A class that already had hooks keeps them
        registry.trace(Some("Fresh"), "kept", None, HookOptions::empty());
        fail_inserts(true);
        assert!(!registry.trace(Some("Fresh"), "m", None, HookOptions::empty()));
        fail_inserts(false);
        assert_eq!(registry.stats().classes, 1);
        assert!(registry.find_dispatch(Some(scope(&fresh)), "kept").is_some());
    }

    fn chain(levels: usize) -> Arc<ClassEntry> {
        let mut current = class("C0");
        for i in 1..levels {
            current = subclass(&format!("C{i}"), &current);
        }
        current
    }

    #[test]
    fn test_walk_depth_limit() {
        let registry = HookRegistry::initialized();
        registry.trace(Some("C0"), "Run", Some(&cb("root")), HookOptions::empty());

        let deepest_found = chain(MAX_HIERARCHY_DEPTH);
        let entry = registry.find_dispatch(Some(scope(&deepest_found)), "RUN").unwrap();
        assert_eq!(callable_of(&entry), Some("root"));

        let too_deep = chain(MAX_HIERARCHY_DEPTH + 1);
        assert!(registry.find_dispatch(Some(scope(&too_deep)), "run").is_none());
    }

    struct Cyclic;

    impl ClassScope for Cyclic {
        fn class_name(&self) -> &str {
            "Cyclic"
        }

        fn parent(&self) -> Option<&dyn ClassScope> {
            Some(self as &dyn ClassScope)
        }
    }

    #[test]
    fn test_cyclic_scope_terminates() {
        let registry = HookRegistry::initialized();
        registry.trace(Some("Other"), "m", None, HookOptions::empty());
        assert!(registry.find_dispatch(Some(&Cyclic as &dyn ClassScope), "m").is_none());
    }

    #[test]
    fn test_concurrent_readers_and_writer() {
        let registry = HookRegistry::initialized();
        let base = class("Base");
        let child = subclass("Child", &base);
        registry.trace(Some("Base"), "run", Some(&cb("base")), HookOptions::empty());

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..1_000 {
                        let entry = registry.find_dispatch(Some(scope(&child)), "run");
                        assert!(entry.is_some());
                    }
                });
            }
            s.spawn(|| {
                for i in 0..100 {
                    let name = format!("fn_{i}");
                    assert!(registry.trace(None, &name, None, HookOptions::empty()));
                }
            });
        });

        assert_eq!(registry.stats().functions, 100);
    }
}
