pub mod ast;
pub mod builtins;
pub mod environment;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod program;
pub mod repl;
pub mod token;

pub use environment::Environment;
pub use lexer::Lexer;
pub use object::Object;
pub use parser::Parser;
