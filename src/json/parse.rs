//! Purpose: Provide the internal runtime JSON decode entrypoints.
//! Exports: `from_str`, `from_slice`, `ParseFailureCategory`, `categorize_error`, `hint_for_error`.
//! Role: Parser boundary that centralizes serde_json usage details.
//! Invariants: Category labels are stable; they appear in user-facing hints.
//! Invariants: Hints never echo payload bytes.
//! Notes: Error mapping to the crate error is done by callsites so domain context stays explicit.

use serde::de::DeserializeOwned;
use serde_json::error::Category;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ParseFailureCategory {
    Syntax,
    Eof,
    Data,
    DepthLimit,
    Io,
}

impl ParseFailureCategory {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Eof => "eof",
            ParseFailureCategory::Data => "data",
            ParseFailureCategory::DepthLimit => "depth-limit",
            ParseFailureCategory::Io => "io",
        }
    }

    fn advice(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => {
                "Check for trailing commas, unquoted keys, or stray characters."
            }
            ParseFailureCategory::Eof => "Input ended early; check for a truncated payload.",
            ParseFailureCategory::Data => {
                "JSON is well-formed but does not match the expected shape."
            }
            ParseFailureCategory::DepthLimit => "Nesting is deeper than the decoder allows.",
            ParseFailureCategory::Io => "Reading the payload failed.",
        }
    }
}

pub(crate) fn from_str<T: DeserializeOwned>(input: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(input)
}

pub(crate) fn from_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(input)
}

pub(crate) fn categorize_error(err: &serde_json::Error) -> ParseFailureCategory {
    match err.classify() {
        Category::Io => ParseFailureCategory::Io,
        Category::Eof => ParseFailureCategory::Eof,
        Category::Data => ParseFailureCategory::Data,
        Category::Syntax => categorize_message(&err.to_string()),
    }
}

// serde_json reports its recursion limit as a plain syntax error.
pub(crate) fn categorize_message(message: &str) -> ParseFailureCategory {
    if message.contains("recursion limit exceeded") {
        ParseFailureCategory::DepthLimit
    } else {
        ParseFailureCategory::Syntax
    }
}

pub(crate) fn hint_for_error(err: &serde_json::Error, context: &str) -> String {
    let category = categorize_error(err);
    format!(
        "parse category: {}; context: {context}. {}",
        category.as_str(),
        category.advice()
    )
}
