//! Per-client session state.

use crate::handle::HandleTable;

/// Reserved for batched insert support; unused in the core.
#[derive(Default)]
pub struct BatchState;

/// A connected client's session: its handle table, plus a reserved slot
/// for batch state. A session is created when a client connects and
/// dropped when it disconnects; dropping it releases every bound result,
/// since `HandleTable` (and the `QueryResult`s it owns) are dropped along
/// with it.
#[derive(Default)]
pub struct Session {
    pub handles: HandleTable,
    #[allow(dead_code)]
    batch: Option<BatchState>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }
}
