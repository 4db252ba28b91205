use crate::builtins::global_environment;
use crate::environment::Environment;
use crate::evaluator::{self, Flow};
use crate::lexer::{self, LexError};
use crate::object::{EvalError, Object};
use crate::parser::{self, ParseError};
use custom_error::custom_error;
use std::fs;
use std::path::Path;
use tracing::debug;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub Error

    Lex{source: LexError} = "syntax error: {source}",
    Parse{source: ParseError} = "parse error: {source}",
    Runtime{source: EvalError} = "runtime error: {source}",
}

pub type Result<T> = std::result::Result<T, Error>;

/// Tokenizes, parses and evaluates `source` in `env`, returning the final flow.
pub fn execute(source: &str, env: &Environment) -> Result<Flow> {
    let tokens = lexer::tokenize(source)?;
    debug!(tokens = tokens.len(), "tokenized");

    let program = parser::parse(tokens)?;
    debug!(statements = program.statements.len(), "parsed");

    Ok(evaluator::eval_chunk(&program, env)?)
}

/// Like `execute`, but yields whichever value the flow carries.
pub fn run(source: &str, env: &Environment) -> Result<Object> {
    execute(source, env).map(Flow::into_value)
}

/// Runs the module at `path` in a child of its own fresh root, whose `require` resolves
/// against the module's directory. The module's value is its top-level `return`.
pub fn load_module(path: &Path) -> std::result::Result<Object, EvalError> {
    let display = path.display().to_string();
    debug!(path = %path.display(), "loading module");

    let source = fs::read_to_string(path).map_err(|err| EvalError::ModuleNotFound {
        path: display.clone(),
        reason: err.to_string(),
    })?;

    let root = global_environment(path.parent().map(Path::to_path_buf))?;
    match execute(&source, &Environment::with_enclosed(&root)) {
        Ok(Flow::Return(value)) => Ok(value),
        Ok(Flow::Continue(_)) => Err(EvalError::ModuleWithoutValue { path: display }),
        Err(err) => Err(EvalError::ModuleFailed {
            path: display,
            message: err.to_string(),
        }),
    }
}
