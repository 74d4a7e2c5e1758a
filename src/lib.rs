//! Purpose: Shared library crate used by the `modjson` CLI and embedding hosts.
//! Exports: `api` (codec resolution, diagnostics log, errors), `notice`.
//! Role: Codec selection and per-run diagnostics for controller/module messaging.
//! Invariants: Diagnostics state lives in host-owned values, never in statics.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
mod core;
mod json;
pub mod notice;
mod result_json;
