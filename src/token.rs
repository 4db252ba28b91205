use std::fmt::{self, Display, Formatter};
use strum_macros::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    #[strum(serialize = "identifier")]
    Identifier,
    #[strum(serialize = "end of input")]
    Eof,

    // Delimiters
    #[strum(serialize = "`;`")]
    Semicolon,
    #[strum(serialize = "`,`")]
    Comma,
    #[strum(serialize = "`.`")]
    Dot,

    // Keywords
    #[strum(serialize = "`val`")]
    Val,
    #[strum(serialize = "`fn`")]
    Function,
    #[strum(serialize = "`lm`")]
    Lambda,
    #[strum(serialize = "`return`")]
    Return,
    #[strum(serialize = "`if`")]
    If,
    #[strum(serialize = "`then`")]
    Then,
    #[strum(serialize = "`else`")]
    Else,
    #[strum(serialize = "`end`")]
    End,

    // Operators
    #[strum(serialize = "binary operator")]
    BinaryOperator,
    #[strum(serialize = "`=`")]
    Assign,

    #[strum(serialize = "`(`")]
    LParen,
    #[strum(serialize = "`)`")]
    RParen,
    #[strum(serialize = "`{`")]
    LBrace,
    #[strum(serialize = "`}`")]
    RBrace,
    #[strum(serialize = "`[`")]
    LBracket,
    #[strum(serialize = "`]`")]
    RBracket,

    // Literals
    #[strum(serialize = "integer literal")]
    Integer,
    #[strum(serialize = "float literal")]
    Float,
    #[strum(serialize = "string literal")]
    String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub literal: String,
}

impl Token {
    pub fn new(token_type: TokenType, literal: impl Into<String>) -> Self {
        Self {
            token_type,
            literal: literal.into(),
        }
    }

    pub fn from_char(token_type: TokenType, ch: char) -> Self {
        Self::new(token_type, ch.to_string())
    }

    pub fn eof() -> Self {
        Self::new(TokenType::Eof, "EOF")
    }

    pub fn is(&self, token_type: TokenType) -> bool {
        self.token_type == token_type
    }
}

/// Keywords take priority over identifiers for any word the lexer reads.
impl From<String> for Token {
    fn from(word: String) -> Self {
        let token_type = match word.as_str() {
            "val" => TokenType::Val,
            "fn" => TokenType::Function,
            "lm" => TokenType::Lambda,
            "return" => TokenType::Return,
            "if" => TokenType::If,
            "then" => TokenType::Then,
            "else" => TokenType::Else,
            "end" => TokenType::End,
            _ => TokenType::Identifier,
        };
        Self::new(token_type, word)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.token_type {
            TokenType::Eof => write!(f, "{}", self.token_type),
            TokenType::Identifier
            | TokenType::BinaryOperator
            | TokenType::Integer
            | TokenType::Float
            | TokenType::String => write!(f, "{} `{}`", self.token_type, self.literal),
            _ => write!(f, "`{}`", self.literal),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_keywords() {
        let cases = vec![
            ("val", TokenType::Val),
            ("fn", TokenType::Function),
            ("lm", TokenType::Lambda),
            ("return", TokenType::Return),
            ("if", TokenType::If),
            ("then", TokenType::Then),
            ("else", TokenType::Else),
            ("end", TokenType::End),
            ("value", TokenType::Identifier),
            ("true", TokenType::Identifier),
        ];

        for (word, token_type) in cases.into_iter() {
            assert_eq!(Token::from(word.to_owned()).token_type, token_type);
        }
    }

    #[test]
    fn test_display() {
        let cases = vec![
            (Token::eof(), "end of input"),
            (Token::new(TokenType::Identifier, "x"), "identifier `x`"),
            (Token::new(TokenType::BinaryOperator, "<="), "binary operator `<=`"),
            (Token::from_char(TokenType::LParen, '('), "`(`"),
            (Token::new(TokenType::Val, "val"), "`val`"),
        ];

        for (token, expected) in cases.into_iter() {
            assert_eq!(token.to_string(), expected);
        }
    }
}
