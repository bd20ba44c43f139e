//! The per-session handle table: named bindings from `name = expr`
//! statements to the [`QueryResult`] they produced.

use crate::result::QueryResult;

/// Slots a freshly created handle table starts with before it needs to
/// grow.
pub const DEFAULT_CONTEXT_HANDLES: usize = 32;

/// One named binding.
struct Handle {
    name: String,
    result: QueryResult,
}

/// A session's table of `name -> result` bindings. Lookup is a linear scan,
/// which is fine for the handle counts a single script produces.
pub struct HandleTable {
    handles: Vec<Handle>,
}

impl HandleTable {
    pub fn new() -> Self {
        HandleTable {
            handles: Vec::with_capacity(DEFAULT_CONTEXT_HANDLES),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&QueryResult> {
        self.handles.iter().find(|h| h.name == name).map(|h| &h.result)
    }

    /// Binds `result` to `name`. If `name` is already bound, the previous
    /// result is dropped in place before the new one is installed.
    pub fn bind(&mut self, name: &str, result: QueryResult) {
        if let Some(existing) = self.handles.iter_mut().find(|h| h.name == name) {
            existing.result = result;
        } else {
            self.handles.push(Handle {
                name: name.to_string(),
                result,
            });
        }
    }
}

impl Default for HandleTable {
    fn default() -> Self {
        Self::new()
    }
}
