mod expression;
mod statement;
pub use expression::*;
pub use statement::*;

use crate::token::Token;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chunk {
    pub statements: Vec<Statement>,
}

impl Chunk {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Writes each statement preceded by a space, so an empty body leaves no gap.
    fn fmt_body(&self, f: &mut Formatter) -> fmt::Result {
        for stmt in self.statements.iter() {
            write!(f, " {}", stmt)?;
        }
        Ok(())
    }
}

impl Display for Chunk {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let statements: Vec<String> = self.statements.iter().map(Statement::to_string).collect();
        write!(f, "{}", statements.join(" "))
    }
}

impl From<Vec<Statement>> for Chunk {
    fn from(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub value: String,
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<Token> for Identifier {
    fn from(token: Token) -> Self {
        Self {
            value: token.literal,
        }
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self {
            value: value.to_owned(),
        }
    }
}

fn comma_separated<T: Display>(items: &[T]) -> String {
    let parts: Vec<String> = items.iter().map(T::to_string).collect();
    parts.join(", ")
}
