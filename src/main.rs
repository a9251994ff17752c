use std::path::PathBuf;

use clap::Parser;
use retdec_annotate::{
    generate_output, AddressRange, AnnotateError, ConfigError, DecompileError, Decompiler,
    DecompilerConfig, OutputFormat,
};
use thiserror::Error;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // All failure kinds surface as one uniform diagnostic; none of them is
    // recoverable here.
    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(name = "retdec-annotate")]
#[command(about = "Decompile an address range and annotate the generated source")]
struct Args {
    /// Binary to decompile.
    input: PathBuf,

    /// Address range to decompile, e.g. 0x400000-0x400200.
    #[arg(long)]
    range: AddressRange,

    /// Path to the decompiler configuration (defaults to the installed copy).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the engine's plain source output without annotating.
    #[arg(long)]
    plain: bool,

    /// Also print the annotation list as JSON, one annotation per line.
    #[arg(long)]
    annotations: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Decompile(#[from] DecompileError),

    #[error(transparent)]
    Annotate(#[from] AnnotateError),

    #[error("unable to serialize annotations: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => DecompilerConfig::from_file(path)?,
        None => DecompilerConfig::load_default()?,
    };
    let decompiler = Decompiler::new(config);

    if args.plain {
        let source = decompiler.decompile(&args.input, args.range, OutputFormat::Plain)?;
        print!("{source}");
        return Ok(());
    }

    let raw = decompiler.decompile(&args.input, args.range, OutputFormat::Json)?;
    let annotated = generate_output(&raw)?;

    print!("{}", annotated.code);
    if args.annotations {
        if !annotated.code.is_empty() && !annotated.code.ends_with('\n') {
            println!();
        }
        for annotation in &annotated.annotations {
            println!("{}", serde_json::to_string(annotation)?);
        }
    }

    Ok(())
}
