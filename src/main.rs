use anyhow::{Context, Result};
use clap::Parser;
use keel_interpreter::builtins::global_environment;
use keel_interpreter::{evaluator, lexer, parser, repl, Environment};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "keel")]
#[command(about = "Run Keel scripts, or start an interactive session", long_about = None)]
struct Args {
    /// Script to run; starts the REPL when omitted
    script: Option<PathBuf>,

    /// Print the token stream before parsing
    #[arg(long)]
    debug_tokens: bool,

    /// Print the parsed program
    #[arg(long)]
    debug_ast: bool,

    /// Log how long each phase takes
    #[arg(long)]
    time: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // KEEL_LOG controls filtering; --time raises the default so phase timings show.
    let default_level = if args.time { "info" } else { "warn" };
    let filter = EnvFilter::try_from_env("KEEL_LOG")
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("invalid log filter")?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match &args.script {
        Some(path) => run_script(path, &args),
        None => {
            println!("Keel interactive session. Type `exit` to leave.");
            let root = global_environment(None)?;
            repl::start(&Environment::with_enclosed(&root))?;
            Ok(())
        }
    }
}

fn run_script(path: &Path, args: &Args) -> Result<()> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;

    let start = Instant::now();
    let tokens = lexer::tokenize(&source)?;
    info!(elapsed = ?start.elapsed(), tokens = tokens.len(), "tokenized");

    if args.debug_tokens {
        for token in tokens.iter() {
            println!("{:?}", token);
        }
    }

    let start = Instant::now();
    let program = parser::parse(tokens)?;
    info!(elapsed = ?start.elapsed(), statements = program.statements.len(), "parsed");

    if args.debug_ast {
        println!("{}", program);
    }

    let root = global_environment(path.parent().map(Path::to_path_buf))?;
    let env = Environment::with_enclosed(&root);

    let start = Instant::now();
    evaluator::eval_chunk(&program, &env)?;
    info!(elapsed = ?start.elapsed(), "evaluated");

    Ok(())
}
