// Core modules implementing codec selection, canonical dumps, diagnostics, and error modeling.
pub mod canonical;
pub mod codec;
pub mod diagnostics;
pub mod direction;
pub mod error;
