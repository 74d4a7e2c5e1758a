//! Purpose: Define the stable public Rust API boundary for modjson.
//! Exports: Codec resolution, canonical dumps, the diagnostics log, and errors.
//! Role: Public, additive-only surface; hides the internal parse boundary.
//! Invariants: This module is the only public path to codec and diagnostics primitives.
//! Invariants: Legacy names stay reachable through `compat` until removed.

pub mod compat;

pub use crate::core::canonical::render as render_canonical;
pub use crate::core::codec::{
    CodecProfile, EncodeStyle, JsonDecoder, JsonEncoder, dump_canonical, resolve_decoder,
    resolve_encoder, resolve_module_decoder, resolve_module_encoder,
};
pub use crate::core::diagnostics::{Deprecation, DiagnosticsLog, SourceRef, Warning};
pub use crate::core::direction::Direction;
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::result_json::{diagnostics_json, finalize_result};
