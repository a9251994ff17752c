//! Annotated-code generation from the decompiler's token-stream output.
//!
//! The external engine emits generated source code as a flat sequence of
//! tokens: address markers that set or clear the current address context, and
//! text tokens carrying a literal value plus a semantic kind. This module
//! flattens that stream back into source text and overlays it with byte-range
//! annotations a code browser can use for address correlation and syntax
//! coloring.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Translation map between the decompiler's token kinds and the display
/// categories understood by the code browser.
///
/// Intentionally partial: kinds with no useful coloring ("nl", "ws", "punc",
/// "op", ...) are absent and produce no highlight annotation.
static HIGHLIGHT_FOR_KIND: phf::Map<&'static str, HighlightType> = phf::phf_map! {
    "i_var" => HighlightType::GlobalVariable,
    "i_lab" => HighlightType::Keyword,
    "i_fnc" => HighlightType::FunctionName,
    "i_arg" => HighlightType::FunctionParameter,
    "keyw" => HighlightType::Keyword,
    "type" => HighlightType::Datatype,
    "preproc" => HighlightType::Keyword,
    "inc" => HighlightType::Comment,
    "l_bool" => HighlightType::ConstantVariable,
    "l_int" => HighlightType::ConstantVariable,
    "l_fp" => HighlightType::ConstantVariable,
    "l_str" => HighlightType::ConstantVariable,
    "l_sym" => HighlightType::ConstantVariable,
    "l_ptr" => HighlightType::ConstantVariable,
    "cmnt" => HighlightType::Comment,
};

/// Display categories for syntax highlighting, mirroring the set the code
/// browser understands. The kind table currently maps onto a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightType {
    Keyword,
    Comment,
    Datatype,
    FunctionName,
    FunctionParameter,
    LocalVariable,
    GlobalVariable,
    ConstantVariable,
}

/// Errors raised while turning raw decompiler output into annotated code.
///
/// Every variant aborts the whole transformation; no partial
/// [`AnnotatedCode`] is ever returned.
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// The raw output is not well-formed JSON.
    #[error("unable to parse decompiler output: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document or one of its tokens violates the expected schema.
    #[error("malformed decompiler output: {0}")]
    Schema(String),

    /// An address marker carries a string that is not valid base-16.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The output buffer could not grow to hold the flattened text.
    #[error("unable to allocate {0} additional bytes for the code buffer")]
    Allocation(usize),
}

/// One annotation over a half-open byte range `[start, end)` of the
/// flattened text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub kind: AnnotationKind,
}

/// The payload attached to an annotated range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnnotationKind {
    /// The range was generated from code at this source address.
    Offset { offset: u64 },
    /// The range should be colored as this category.
    SyntaxHighlight { highlight: HighlightType },
}

/// Flattened source text plus every annotation accumulated while
/// flattening, in emission order.
///
/// Successive text tokens append to the end of the buffer, so the emitted
/// ranges are non-decreasing and non-overlapping.
#[derive(Debug, Clone, Default)]
pub struct AnnotatedCode {
    pub code: String,
    pub annotations: Vec<Annotation>,
}

/// Look up the display category for a token kind.
fn highlight_for_kind(kind: &str) -> Option<HighlightType> {
    HIGHLIGHT_FOR_KIND.get(kind).copied()
}

/// Generate annotated code from the engine's raw JSON output.
///
/// A structural parse failure, a schema violation, an invalid address and an
/// allocation failure each map to their own [`AnnotateError`] variant so the
/// caller can react differently to each.
pub fn generate_output(raw: &str) -> Result<AnnotatedCode, AnnotateError> {
    let root: Value = serde_json::from_str(raw)?;
    provide_annotations(&root)
}

/// Walk the parsed token stream in order and build the annotated code.
fn provide_annotations(root: &Value) -> Result<AnnotatedCode, AnnotateError> {
    let tokens = root
        .get("tokens")
        .and_then(Value::as_array)
        .ok_or_else(|| AnnotateError::Schema("\"tokens\" is missing or not an array".into()))?;

    let mut out = AnnotatedCode::default();
    // Address context carried across text tokens until cleared or replaced.
    let mut last_addr: Option<u64> = None;

    for token in tokens {
        if let Some(addr) = token.get("addr") {
            let addr = addr.as_str().ok_or_else(|| {
                AnnotateError::Schema(format!("address marker is not a string: {token}"))
            })?;
            last_addr = if addr.is_empty() {
                None
            } else {
                Some(parse_address(addr)?)
            };
            continue;
        }

        match (
            token.get("val").and_then(Value::as_str),
            token.get("kind").and_then(Value::as_str),
        ) {
            (Some(val), Some(kind)) => {
                let bpos = out.code.len();
                out.code
                    .try_reserve(val.len())
                    .map_err(|_| AnnotateError::Allocation(val.len()))?;
                out.code.push_str(val);
                let epos = out.code.len();

                if let Some(offset) = last_addr {
                    out.annotations.push(Annotation {
                        start: bpos,
                        end: epos,
                        kind: AnnotationKind::Offset { offset },
                    });
                }
                if let Some(highlight) = highlight_for_kind(kind) {
                    out.annotations.push(Annotation {
                        start: bpos,
                        end: epos,
                        kind: AnnotationKind::SyntaxHighlight { highlight },
                    });
                }
            }
            _ => {
                return Err(AnnotateError::Schema(format!(
                    "token is neither an address marker nor a text token: {token}"
                )));
            }
        }
    }

    Ok(out)
}

/// Parse a marker's address string as base-16, tolerating an `0x` prefix.
fn parse_address(addr: &str) -> Result<u64, AnnotateError> {
    let digits = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr);
    u64::from_str_radix(digits, 16).map_err(|_| AnnotateError::InvalidAddress(addr.to_string()))
}
