//! Purpose: Internal JSON parsing boundary shared by the codec and CLI internals.
//! Exports: `parse` module with decode helpers and failure categorization.
//! Role: Single seam for the decode primitive so callsites avoid ad hoc decode logic.
//! Invariants: Runtime JSON decoding goes through this module.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub(crate) mod parse;
