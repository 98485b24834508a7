//! pycs - translate Python source files to C#.

mod config;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use pycs_csharp::{Diagnostic, translate};
use pycs_syntax::{ReadError, read_python};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Translate a Python module into a C# top-level-statements file
#[derive(Parser)]
#[command(name = "pycs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Python file to translate, or `-` to read stdin
    input: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Extra config file, applied over the global and project configs
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// What to print
    #[arg(long, value_enum, default_value_t = Emit::Csharp)]
    emit: Emit,

    /// How to print diagnostics on stderr
    #[arg(long, value_enum, default_value_t = DiagnosticFormat::Text)]
    diagnostics: DiagnosticFormat,

    /// Exit with status 2 if any construct needed a best-effort fallback
    #[arg(long)]
    strict: bool,

    /// Log more (-v for debug, -vv for trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Translated C# source
    Csharp,
    /// The parsed syntax tree as JSON
    Ast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DiagnosticFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let source = read_input(&cli.input)?;
    let display_name = cli.input.display().to_string();

    let module = match read_python(&source) {
        Ok(module) => module,
        Err(ReadError::Syntax(errors)) => {
            for error in &errors {
                eprintln!("{display_name}:{error}");
            }
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err).with_context(|| format!("reading {display_name}")),
    };
    tracing::debug!(statements = module.body.len(), "parsed {display_name}");

    if cli.emit == Emit::Ast {
        let json = serde_json::to_string_pretty(&module).context("serializing syntax tree")?;
        write_output(cli.output.as_deref(), &format!("{json}\n"))?;
        return Ok(ExitCode::SUCCESS);
    }

    let cwd = std::env::current_dir().context("finding the working directory")?;
    let options = config::load(&cwd, cli.config.as_deref())?;
    let translation =
        translate(&module, &options).with_context(|| format!("translating {display_name}"))?;
    write_output(cli.output.as_deref(), &translation.code)?;
    report(&display_name, &translation.diagnostics, cli.diagnostics)?;

    if cli.strict && !translation.diagnostics.is_empty() {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("reading stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn report(display_name: &str, diagnostics: &[Diagnostic], format: DiagnosticFormat) -> Result<()> {
    match format {
        DiagnosticFormat::Text => {
            for diagnostic in diagnostics {
                eprintln!("{display_name}:{diagnostic}");
            }
        }
        DiagnosticFormat::Json => {
            if !diagnostics.is_empty() {
                let json = serde_json::to_string(diagnostics).context("serializing diagnostics")?;
                eprintln!("{json}");
            }
        }
    }
    Ok(())
}
