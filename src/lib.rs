pub mod annotate;
pub mod config;
pub mod decompiler;

pub use annotate::{
    generate_output, AnnotateError, AnnotatedCode, Annotation, AnnotationKind, HighlightType,
};
pub use config::{ConfigError, DecompilerConfig};
pub use decompiler::{AddressRange, DecompileError, Decompiler};

/// Output format requested from the external decompiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain source text, suitable for direct printing.
    Plain,
    /// Token-stream JSON, suitable for annotation.
    #[default]
    Json,
}

impl OutputFormat {
    /// The value passed to the decompiler's output-format selector.
    pub fn as_arg(self) -> &'static str {
        match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Json => "json",
        }
    }
}
