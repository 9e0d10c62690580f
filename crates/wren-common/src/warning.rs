//! Pipeline warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the HTML, CSS, and layout components to report unsupported
//! features and recoverable parse oddities.

use std::collections::HashSet;
use std::sync::Mutex;

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an unsupported feature (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("CSS", "unknown color 'papayawhip' in background-color");
/// ```
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    if record(key) {
        eprintln!("{YELLOW}[Wren {component}] ⚠ {message}{RESET}");
    }
}

/// Record a warning key; true when it has not been seen since the last
/// [`clear_warnings`].
fn record(key: String) -> bool {
    WARNED
        .lock()
        .unwrap()
        .get_or_insert_with(HashSet::new)
        .insert(key)
}

/// Clear all recorded warnings (call when rendering a new document)
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap();
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_warnings_resets_deduplication() {
        let key = "[test] repeated condition";
        assert!(record(key.to_string()));
        assert!(!record(key.to_string()), "second occurrence deduplicated");
        clear_warnings();
        assert!(record(key.to_string()), "cleared key warns again");
    }
}
