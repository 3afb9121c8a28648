//! rathc: The rath compiler front end CLI.
//!
//! Usage:
//!   rathc [options] [file...]
//!
//! Compiles each file (or the `--expr` source) and prints the folded tree,
//! stopping at the first diagnostic.

use clap::Parser as ClapParser;
use miette::{LabeledSpan, MietteDiagnostic, NamedSource, Report};
use rath_compiler::{Compiler, PhaseTimings};
use rath_diagnostics::Diagnostic;
use rath_options::{CompilerOptions, RathConfig, CONFIG_FILE_NAME};
use std::path::{Path, PathBuf};
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "rathc", about = "rathc - front end for the rath expression language", disable_version_flag = true)]
struct Cli {
    /// rath source files to compile.
    #[arg(value_name = "FILE")]
    files: Vec<String>,

    /// Compile this source text instead of files.
    #[arg(short = 'e', long = "expr", value_name = "SRC")]
    expr: Option<String>,

    /// Print the token stream instead of the tree.
    #[arg(long)]
    tokens: bool,

    /// Skip constant folding.
    #[arg(long = "no-fold")]
    no_fold: bool,

    /// Indent the tree dump and render diagnostics graphically.
    #[arg(long)]
    pretty: bool,

    /// Path to rath.json.
    #[arg(short = 'p', long = "config", value_name = "PATH")]
    config: Option<String>,

    /// Print per-phase timings to stderr.
    #[arg(long)]
    time: bool,

    /// Print the compiler version.
    #[arg(short = 'v', long)]
    version: bool,
}

/// One unit of input: a display name and its source text.
struct Input {
    name: String,
    source: String,
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() {
    let cli = Cli::parse();

    if cli.version {
        println!("rathc Version {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let exit_code = run_compile(&cli);
    process::exit(exit_code);
}

fn run_compile(cli: &Cli) -> i32 {
    let config = match load_config(cli) {
        Ok(config) => config,
        Err(msg) => {
            print_error(&msg);
            return 1;
        }
    };

    let inputs = match resolve_inputs(cli, config.as_ref()) {
        Ok(inputs) => inputs,
        Err(msg) => {
            print_error(&msg);
            return 1;
        }
    };
    if inputs.is_empty() {
        print_error("No input files found.");
        return 1;
    }

    let file_options = config.as_ref().map(|(_, c)| c.options()).unwrap_or_default();
    let compiler = Compiler::new(file_options.merge(cli_options(cli)));
    let use_color = atty_is_terminal();

    for input in &inputs {
        match compiler.run_timed(&input.name, &input.source) {
            Ok(output) => {
                if let Some(text) = output.text {
                    println!("{}", text);
                }
                if cli.time {
                    print_timings(&input.name, &output.timings, use_color);
                }
            }
            Err(diag) => {
                print_diagnostic(&diag, &input.source, cli.pretty, use_color);
                return 1;
            }
        }
    }

    0
}

/// Options set on the command line; unset flags leave the file's value alone.
fn cli_options(cli: &Cli) -> CompilerOptions {
    CompilerOptions {
        fold: cli.no_fold.then_some(false),
        print_tokens: cli.tokens.then_some(true),
        pretty: cli.pretty.then_some(true),
        grammar: None,
    }
}

/// The explicit `--config` file, else `rath.json` in the working directory.
fn load_config(cli: &Cli) -> Result<Option<(PathBuf, RathConfig)>, String> {
    let path = match cli.config {
        Some(ref path) => PathBuf::from(path),
        None if Path::new(CONFIG_FILE_NAME).exists() => PathBuf::from(CONFIG_FILE_NAME),
        None => return Ok(None),
    };
    let path_str = path.to_string_lossy().to_string();
    rath_options::parse_config_file(&path_str)
        .map(|config| Some((path, config)))
        .map_err(|e| format!("Failed to read config '{}': {}", path_str, e))
}

fn resolve_inputs(cli: &Cli, config: Option<&(PathBuf, RathConfig)>) -> Result<Vec<Input>, String> {
    if let Some(ref expr) = cli.expr {
        return Ok(vec![Input {
            name: "<expr>".to_string(),
            source: expr.clone(),
        }]);
    }

    let files: Vec<String> = if !cli.files.is_empty() {
        cli.files.clone()
    } else if let Some((path, config)) = config {
        let root_dir = path.parent().unwrap_or_else(|| Path::new("."));
        config
            .files
            .iter()
            .flatten()
            .map(|f| root_dir.join(f).to_string_lossy().to_string())
            .collect()
    } else {
        Vec::new()
    };

    files
        .into_iter()
        .map(|name| match std::fs::read_to_string(&name) {
            Ok(source) => Ok(Input { name, source }),
            Err(e) => Err(format!("Failed to read '{}': {}", name, e)),
        })
        .collect()
}

fn print_diagnostic(diag: &Diagnostic, source: &str, pretty: bool, use_color: bool) {
    if pretty {
        let label = LabeledSpan::at(diag.loc.span.to_range(), diag.kind.to_string());
        let report = Report::new(
            MietteDiagnostic::new(diag.message_text.clone())
                .with_code(format!("rath::R{}", diag.code))
                .with_labels(vec![label]),
        )
        .with_source_code(NamedSource::new(diag.file.clone(), source.to_string()));
        eprintln!("{:?}", report);
    } else if use_color {
        let (head, detail) = diag.rendered.split_once('\n').unwrap_or((diag.rendered.as_str(), ""));
        eprintln!("{}{}{}{} {}R{}{}", BOLD, RED, head, RESET, CYAN, diag.code, RESET);
        if !detail.is_empty() {
            eprintln!("{}", detail);
        }
    } else {
        eprintln!("{}", diag);
    }
}

fn print_timings(name: &str, timings: &PhaseTimings, use_color: bool) {
    let line = format!(
        "{}: parse {:.3}ms, fold {:.3}ms, print {:.3}ms, total {:.3}ms, arena {} bytes",
        name,
        timings.parse.as_secs_f64() * 1000.0,
        timings.fold.as_secs_f64() * 1000.0,
        timings.print.as_secs_f64() * 1000.0,
        timings.total().as_secs_f64() * 1000.0,
        timings.arena_bytes,
    );
    if use_color {
        eprintln!("{}{}{}", GRAY, line, RESET);
    } else {
        eprintln!("{}", line);
    }
}

fn print_error(msg: &str) {
    if atty_is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

fn atty_is_terminal() -> bool {
    // Simple check - on Unix, check if stderr is a terminal
    #[cfg(unix)]
    {
        unsafe { libc::isatty(2) != 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("rathc").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_file_options() {
        let cli = parse_args(&["--no-fold", "--tokens", "main.rath"]);
        let file = CompilerOptions {
            fold: Some(true),
            pretty: Some(true),
            ..Default::default()
        };
        let merged = file.merge(cli_options(&cli));
        assert!(!merged.fold_enabled());
        assert!(merged.print_tokens_enabled());
        assert!(merged.pretty_enabled());
        assert_eq!(cli.files, vec!["main.rath"]);
    }

    #[test]
    fn test_unset_flags_are_not_overrides() {
        let cli = parse_args(&[]);
        assert_eq!(cli_options(&cli), CompilerOptions::default());
    }

    #[test]
    fn test_expr_input() {
        let cli = parse_args(&["--expr", "1 + 2", "ignored.rath"]);
        let inputs = resolve_inputs(&cli, None).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].name, "<expr>");
        assert_eq!(inputs[0].source, "1 + 2");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let cli = parse_args(&["/nonexistent/main.rath"]);
        let err = resolve_inputs(&cli, None).err().unwrap();
        assert!(err.starts_with("Failed to read '/nonexistent/main.rath'"));
    }
}
