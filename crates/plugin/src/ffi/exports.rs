//! C-compatible exports called by the host

use std::ffi::c_char;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;

use tracing::instrument;
use tracing_subscriber::EnvFilter;

use tracehook_core::{classes, config, dispatch, ClassScope, TracerConfig};
use tracehook_sdk::{TracehookStr, ABI_VERSION, NO_DISPATCH};

use super::handles;

// Library metadata - static strings with null terminators for C compatibility
static NAME: &[u8] = b"tracehook\0";

/// Environment variable holding the log filter (`tracing_subscriber` syntax)
pub const LOG_ENV_VAR: &str = "TRACEHOOK_LOG";

/// Called once when the host loads the library
///
/// Initializes logging and the dispatch registry, then registers the hooks
/// from the config file. A null `config_path` uses `TRACEHOOK_CONFIG` or
/// `tracehook.toml` next to the host executable; a missing file means no
/// configured hooks. Returns `false` if the config could not be loaded (the
/// registry is still initialized).
///
/// # Safety
/// - `config_path` must be null or point to `len` readable bytes
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn tracehook_startup(config_path: TracehookStr) -> bool {
    let path = match config_path.as_bytes() {
        Some(bytes) => std::str::from_utf8(bytes)
            .map(PathBuf::from)
            .map_err(|_| "config path is not valid UTF-8".to_string()),
        None => config::config_path().map_err(|e| e.to_string()),
    };

    let loaded = path.and_then(|path| {
        if path.exists() {
            TracerConfig::load(&path).map_err(|e| format!("{}: {}", path.display(), e))
        } else {
            Ok(TracerConfig::default())
        }
    });

    init_logging(loaded.as_ref().map(|c| c.debug).unwrap_or(false));

    guarded(false, || match loaded {
        Ok(config) => {
            let report = tracehook_core::startup(&config);
            tracing::info!(
                "tracehook loaded ({} hooks registered, {} failed)",
                report.registered,
                report.failed
            );
            true
        }
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            dispatch::dispatch_init();
            false
        }
    })
}

/// Called once when the host unloads the library
///
/// Destroys the registry, releases every outstanding handle and forgets
/// all declared classes.
#[no_mangle]
#[instrument(skip_all)]
pub extern "C" fn tracehook_shutdown() -> bool {
    guarded(false, || {
        crate::shutdown();
        handles::release_all();
        true
    })
}

/// Allocate the registry roots (idempotent)
#[no_mangle]
pub extern "C" fn tracehook_init() {
    guarded((), dispatch::dispatch_init);
}

/// Release the registry roots and every hook in them
///
/// Handles obtained earlier stay valid until released.
#[no_mangle]
pub extern "C" fn tracehook_destroy() {
    guarded((), dispatch::dispatch_destroy);
}

/// Drop every hook, keeping the registry initialized
///
/// Call between units of work (e.g. at request shutdown).
#[no_mangle]
pub extern "C" fn tracehook_reset() {
    guarded((), dispatch::dispatch_reset);
}

/// Register a hook
///
/// A null `class_name` targets a free function; a null `callable` registers
/// an observation-only hook. Returns `false` if nothing was stored.
///
/// # Safety
/// - each string must be null or point to `len` readable bytes
#[no_mangle]
pub unsafe extern "C" fn tracehook_hook_callable(
    class_name: TracehookStr,
    function_name: TracehookStr,
    callable: TracehookStr,
    options: u32,
) -> bool {
    let Some(function) = function_name.as_bytes() else {
        return false;
    };
    let class = class_name.as_bytes();
    let callable = callable.as_bytes();

    guarded(false, || {
        dispatch::hook_callable(class, function, callable, options)
    })
}

/// Declare a host class and its parent
///
/// The parent (if any) must already be declared.
///
/// # Safety
/// - each string must be null or point to `len` readable bytes
#[no_mangle]
pub unsafe extern "C" fn tracehook_declare_class(
    class_name: TracehookStr,
    parent_name: TracehookStr,
) -> bool {
    let Some(name) = read_str(&class_name) else {
        return false;
    };
    let parent = if parent_name.is_null() {
        None
    } else {
        match read_str(&parent_name) {
            Some(parent) => Some(parent),
            None => return false,
        }
    };

    guarded(false, || match classes::declare_class(name, parent) {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!("Failed to declare class {}: {}", name, e);
            false
        }
    })
}

/// Resolve the hook for a call target
///
/// A null `class_name` looks up a free function. A class name resolves
/// through the declared hierarchy (undeclared classes have no parent).
/// Returns `0` when no hook applies, otherwise a handle the caller must
/// pass to [`tracehook_dispatch_release`].
///
/// # Safety
/// - each string must be null or point to `len` readable bytes
#[no_mangle]
pub unsafe extern "C" fn tracehook_find_dispatch(
    class_name: TracehookStr,
    function_name: TracehookStr,
) -> u64 {
    let Some(function) = read_str(&function_name) else {
        return NO_DISPATCH;
    };
    let class = if class_name.is_null() {
        None
    } else {
        match read_str(&class_name) {
            Some(class) => Some(class),
            None => return NO_DISPATCH,
        }
    };

    guarded(NO_DISPATCH, || {
        let found = match class {
            Some(class) => {
                let scope = classes::resolve_class(class);
                dispatch::find_dispatch(Some(&*scope as &dyn ClassScope), function)
            }
            None => dispatch::find_dispatch(None, function),
        };
        found.map(handles::pin).unwrap_or(NO_DISPATCH)
    })
}

/// Option bits of a resolved hook (`0` for unknown handles)
#[no_mangle]
pub extern "C" fn tracehook_dispatch_options(handle: u64) -> u32 {
    handles::with_entry(handle, |entry| entry.options().bits()).unwrap_or(0)
}

/// Callable name of a resolved hook
///
/// Null for unknown handles, observation hooks and non-symbol callables.
/// The buffer stays valid until the handle is released.
#[no_mangle]
pub extern "C" fn tracehook_dispatch_callable(handle: u64) -> TracehookStr {
    handles::with_entry(handle, |entry| {
        entry
            .callable()
            .and_then(|callable| callable.as_symbol())
            .map(TracehookStr::borrowed)
            .unwrap_or_default()
    })
    .unwrap_or_default()
}

/// Folded function name of a resolved hook
///
/// Null for unknown handles. The buffer stays valid until the handle is
/// released.
#[no_mangle]
pub extern "C" fn tracehook_dispatch_function_name(handle: u64) -> TracehookStr {
    handles::with_entry(handle, |entry| TracehookStr::borrowed(entry.function_name()))
        .unwrap_or_default()
}

/// Release a handle from [`tracehook_find_dispatch`]
///
/// Returns `false` if the handle was unknown or already released.
#[no_mangle]
pub extern "C" fn tracehook_dispatch_release(handle: u64) -> bool {
    handles::release(handle)
}

// Metadata exports - these return static strings for the host to display

#[no_mangle]
pub extern "C" fn tracehook_get_name() -> *const c_char {
    NAME.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn tracehook_get_version() -> *const c_char {
    ABI_VERSION.as_ptr() as *const c_char
}

/// Install the global tracing subscriber (first call wins)
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Run `f`, turning a panic into `default` so it never unwinds into the host
fn guarded<T>(default: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            tracing::error!("Panic caught at FFI boundary");
            default
        }
    }
}

/// Borrow a present, UTF-8 string argument
///
/// # Safety
/// - `s` must be null or point to `len` readable bytes
unsafe fn read_str<'a>(s: &TracehookStr) -> Option<&'a str> {
    s.as_bytes().and_then(|bytes| std::str::from_utf8(bytes).ok())
}
