//! Process-wide variable resolution.
//!
//! The generator substitutes a small fixed set of named variables into every
//! output block. Where those values come from is a platform concern, so the
//! store is an injected capability: a name-to-string lookup with three
//! outcomes (found, not found, error). Resolution never fails; missing and
//! erroring lookups become sentinel strings so downstream substitution is
//! unconditional.

use std::collections::BTreeMap;
use std::env;
use thiserror::Error;

/// Variable names required by the script generator.
pub const CBER_VARS: [&str; 2] = ["CBER_DATE", "CBER_NR"];

/// Lookup failure reported by a [`VarStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The store has no value under this name.
    #[error("variable not found")]
    NotFound,
    /// The store failed for any other reason.
    #[error("store error: {0}")]
    Backend(String),
}

/// An external name-to-string store.
///
/// Implementations query one name at a time; each name is resolved
/// independently of the others.
pub trait VarStore {
    fn lookup(&self, name: &str) -> Result<String, LookupError>;
}

/// Resolve one variable to a usable string. Never fails.
///
/// Found values pass through; a missing name resolves to
/// `[<name>_NOT_FOUND]` and any other store error to `[ERROR_<name>]`.
pub fn resolve(store: &dyn VarStore, name: &str) -> String {
    match store.lookup(name) {
        Ok(value) => value,
        Err(LookupError::NotFound) => format!("[{name}_NOT_FOUND]"),
        Err(LookupError::Backend(_)) => format!("[ERROR_{name}]"),
    }
}

/// Resolve a fixed set of names, each independently.
pub fn resolve_set(store: &dyn VarStore, names: &[&str]) -> BTreeMap<String, String> {
    names
        .iter()
        .map(|name| (name.to_string(), resolve(store, name)))
        .collect()
}

/// Production store backed by process environment variables.
pub struct EnvStore;

impl VarStore for EnvStore {
    fn lookup(&self, name: &str) -> Result<String, LookupError> {
        match env::var(name) {
            Ok(value) => Ok(value),
            Err(env::VarError::NotPresent) => Err(LookupError::NotFound),
            Err(e @ env::VarError::NotUnicode(_)) => Err(LookupError::Backend(e.to_string())),
        }
    }
}
