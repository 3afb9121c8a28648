//! rath_compiler: Compiler orchestration.
//!
//! Runs one source unit through the lexer, parser and constant folder and
//! renders either the debug dump of the resulting tree or the single
//! diagnostic that stopped it.

use std::time::{Duration, Instant};

use rath_ast::Grammar;
use rath_core::arena::CompilerArena;
use rath_diagnostics::{Diagnostic, DiagnosticResult};
use rath_folder::Folder;
use rath_lexer::Lexer;
use rath_options::CompilerOptions;
use rath_parser::Parser;
use rath_printer::{Printer, PrinterOptions};

/// Wall-clock time spent in each phase of one compile.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseTimings {
    pub parse: Duration,
    pub fold: Duration,
    pub print: Duration,
    /// Bytes held by the node arena when the compile finished.
    pub arena_bytes: usize,
}

impl PhaseTimings {
    pub fn total(&self) -> Duration {
        self.parse + self.fold + self.print
    }
}

/// Result of a successful compile.
#[derive(Debug, Clone, Default)]
pub struct CompileOutput {
    /// The tree dump (or token stream); `None` for an empty program.
    pub text: Option<String>,
    pub timings: PhaseTimings,
}

/// The compile driver.
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// The configured grammar, or the built-in one.
    pub fn grammar(&self) -> &Grammar {
        match self.options.grammar {
            Some(ref grammar) => grammar,
            None => Grammar::standard_ref(),
        }
    }

    /// Compile `source` and report on the standard streams.
    ///
    /// Returns 0 after printing the dump to stdout, or 1 after printing the
    /// rendered diagnostic to stderr.
    pub fn compile(&self, file_name: &str, source: &str) -> i32 {
        match self.run(file_name, source) {
            Ok(text) => {
                if let Some(text) = text {
                    println!("{}", text);
                }
                0
            }
            Err(diagnostic) => {
                eprintln!("{}", diagnostic);
                1
            }
        }
    }

    /// Compile `source` and return the dump, `None` for an empty program.
    pub fn run(&self, file_name: &str, source: &str) -> Result<Option<String>, Diagnostic> {
        self.run_timed(file_name, source).map(|output| output.text)
    }

    /// Like [`Compiler::run`], also reporting per-phase timings.
    pub fn run_timed(&self, file_name: &str, source: &str) -> DiagnosticResult<CompileOutput> {
        if self.options.print_tokens_enabled() {
            return self.run_tokens(file_name, source);
        }

        let arena = CompilerArena::for_source(source.len());
        let mut timings = PhaseTimings::default();

        let start = Instant::now();
        let parser = Parser::new(arena.bump(), self.grammar(), file_name, source);
        let tree = parser.parse()?;
        timings.parse = start.elapsed();

        let Some(mut tree) = tree else {
            return Ok(CompileOutput { text: None, timings });
        };

        if self.options.fold_enabled() {
            let start = Instant::now();
            tree = Folder::new(arena.bump(), file_name, source).fold(tree)?;
            timings.fold = start.elapsed();
        }

        let start = Instant::now();
        let mut printer = Printer::with_options(PrinterOptions {
            pretty: self.options.pretty_enabled(),
            ..Default::default()
        });
        let text = printer.print(tree);
        timings.print = start.elapsed();
        timings.arena_bytes = arena.allocated_bytes();

        Ok(CompileOutput {
            text: Some(text),
            timings,
        })
    }

    /// Lex `source` and render the token stream as `[Ident hi, LParen, ...]`.
    pub fn tokens(&self, file_name: &str, source: &str) -> DiagnosticResult<String> {
        let mut lexer = Lexer::new(self.grammar());
        lexer.feed(file_name, source);
        let tokens = lexer.tokenize()?;
        let rendered: Vec<String> = tokens.iter().map(|t| format!("{:?}", t)).collect();
        Ok(format!("[{}]", rendered.join(", ")))
    }

    fn run_tokens(&self, file_name: &str, source: &str) -> DiagnosticResult<CompileOutput> {
        let start = Instant::now();
        let text = self.tokens(file_name, source)?;
        Ok(CompileOutput {
            text: Some(text),
            timings: PhaseTimings {
                parse: start.elapsed(),
                ..Default::default()
            },
        })
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CompilerOptions::default())
    }
}
