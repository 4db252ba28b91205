use crate::token::{Token, TokenType};
use custom_error::custom_error;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub LexError

    InvalidNumber{literal: String} = "invalid number format: {literal}",
    UnterminatedString{literal: String} = "string not closed, expected `\"` before end of input after \"{literal}",
    UnknownOperator{operator: String} = "unknown operator: {operator}",
    UnknownToken{ch: char} = "unknown token: {ch}",
}

pub type Result<T> = std::result::Result<T, LexError>;

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    read_position: usize,
    ch: Option<char>,
    finished: bool,
}

/// A letter has distinct one-to-one upper and lower case forms. Characters whose case mapping
/// expands to several characters (`ß` uppercases to `SS`) map to themselves.
fn is_letter(c: char) -> bool {
    c == '_' || simple_case(c, c.to_uppercase()) != simple_case(c, c.to_lowercase())
}

fn simple_case(c: char, mut mapping: impl Iterator<Item = char>) -> char {
    match (mapping.next(), mapping.next()) {
        (Some(mapped), None) => mapped,
        _ => c,
    }
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '=' | '<' | '>' | '|' | '&' | '!')
}

/// Runs the lexer over `input` to completion, including the trailing end-of-input token.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).collect()
}

impl Iterator for Lexer {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let token = self.next_token();
        self.finished = match &token {
            Ok(token) => token.is(TokenType::Eof),
            Err(_) => true,
        };
        Some(token)
    }
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let mut lexer = Self {
            input: input.chars().collect(),
            position: 0,
            read_position: 0,
            ch: None,
            finished: false,
        };
        lexer.read_char();
        lexer
    }

    fn read_char(&mut self) {
        self.ch = self.input.get(self.read_position).copied();
        self.position = self.read_position;
        self.read_position += 1;
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.read_position).copied()
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.input[start..end.min(self.input.len())].iter().collect()
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let ch = match self.ch {
            Some(ch) => ch,
            None => return Ok(Token::eof()),
        };

        let token = match ch {
            '(' => Token::from_char(TokenType::LParen, ch),
            ')' => Token::from_char(TokenType::RParen, ch),
            '{' => Token::from_char(TokenType::LBrace, ch),
            '}' => Token::from_char(TokenType::RBrace, ch),
            '[' => Token::from_char(TokenType::LBracket, ch),
            ']' => Token::from_char(TokenType::RBracket, ch),
            ',' => Token::from_char(TokenType::Comma, ch),
            ';' => Token::from_char(TokenType::Semicolon, ch),
            '+' | '-' | '*' | '/' | '%' | '^' => Token::from_char(TokenType::BinaryOperator, ch),
            '.' if self.peek_char().map_or(false, is_digit) => return Ok(self.read_fraction()),
            '.' => Token::from_char(TokenType::Dot, ch),
            '"' => return self.read_string(),
            c if is_digit(c) => return self.read_number(),
            c if is_letter(c) => return Ok(self.read_identifier()),
            c if is_operator_char(c) => return self.read_operator(),
            c => return Err(LexError::UnknownToken { ch: c }),
        };
        self.read_char();
        Ok(token)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.ch {
                Some(' ') | Some('\t') | Some('\n') | Some('\r') => self.read_char(),
                Some('#') => {
                    while !matches!(self.ch, None | Some('\n')) {
                        self.read_char();
                    }
                }
                // An unclosed block comment runs to the end of input.
                Some('$') => {
                    self.read_char();
                    while !matches!(self.ch, None | Some('$')) {
                        self.read_char();
                    }
                    self.read_char();
                }
                _ => return,
            }
        }
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.position;
        while self.ch.map_or(false, is_letter) {
            self.read_char();
        }
        Token::from(self.slice(start, self.position))
    }

    fn read_number(&mut self) -> Result<Token> {
        let start = self.position;
        let mut has_decimal = false;

        while let Some(c) = self.ch {
            if c == '.' {
                if has_decimal {
                    return Err(LexError::InvalidNumber {
                        literal: self.slice(start, self.position + 1),
                    });
                }
                has_decimal = true;
            } else if !is_digit(c) {
                break;
            }
            self.read_char();
        }

        let literal = self.slice(start, self.position);
        let token_type = if has_decimal {
            TokenType::Float
        } else {
            TokenType::Integer
        };
        Ok(Token::new(token_type, literal))
    }

    /// `.5` reads as `0.5`.
    fn read_fraction(&mut self) -> Token {
        self.read_char();
        let start = self.position;
        while self.ch.map_or(false, is_digit) {
            self.read_char();
        }
        Token::new(TokenType::Float, format!("0.{}", self.slice(start, self.position)))
    }

    fn read_string(&mut self) -> Result<Token> {
        self.read_char();
        let start = self.position;
        loop {
            match self.ch {
                Some('"') => break,
                Some(_) => self.read_char(),
                None => {
                    return Err(LexError::UnterminatedString {
                        literal: self.slice(start, self.position),
                    })
                }
            }
        }
        let literal = self.slice(start, self.position);
        self.read_char();
        Ok(Token::new(TokenType::String, literal))
    }

    fn read_operator(&mut self) -> Result<Token> {
        let start = self.position;
        while self.ch.map_or(false, is_operator_char) {
            self.read_char();
        }

        let operator = self.slice(start, self.position);
        match operator.as_str() {
            "==" | "!=" | "<" | ">" | "<=" | ">=" | "||" | "&&" => {
                Ok(Token::new(TokenType::BinaryOperator, operator))
            }
            "=" => Ok(Token::new(TokenType::Assign, operator)),
            _ => Err(LexError::UnknownOperator { operator }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_next_token() {
        let input = "val five = 5;
fn add(x, y)
  return x + y;
end fn

# line comment
if (five >= 10) then
  out(\"big\");
else
  out(.5, 2.25);
end if
$ block
  comment $
val d = {a = [1, 2]};
d.a != d && true || false;
";

        let cases = vec![
            (TokenType::Val, "val"),
            (TokenType::Identifier, "five"),
            (TokenType::Assign, "="),
            (TokenType::Integer, "5"),
            (TokenType::Semicolon, ";"),
            (TokenType::Function, "fn"),
            (TokenType::Identifier, "add"),
            (TokenType::LParen, "("),
            (TokenType::Identifier, "x"),
            (TokenType::Comma, ","),
            (TokenType::Identifier, "y"),
            (TokenType::RParen, ")"),
            (TokenType::Return, "return"),
            (TokenType::Identifier, "x"),
            (TokenType::BinaryOperator, "+"),
            (TokenType::Identifier, "y"),
            (TokenType::Semicolon, ";"),
            (TokenType::End, "end"),
            (TokenType::Function, "fn"),
            (TokenType::If, "if"),
            (TokenType::LParen, "("),
            (TokenType::Identifier, "five"),
            (TokenType::BinaryOperator, ">="),
            (TokenType::Integer, "10"),
            (TokenType::RParen, ")"),
            (TokenType::Then, "then"),
            (TokenType::Identifier, "out"),
            (TokenType::LParen, "("),
            (TokenType::String, "big"),
            (TokenType::RParen, ")"),
            (TokenType::Semicolon, ";"),
            (TokenType::Else, "else"),
            (TokenType::Identifier, "out"),
            (TokenType::LParen, "("),
            (TokenType::Float, "0.5"),
            (TokenType::Comma, ","),
            (TokenType::Float, "2.25"),
            (TokenType::RParen, ")"),
            (TokenType::Semicolon, ";"),
            (TokenType::End, "end"),
            (TokenType::If, "if"),
            (TokenType::Val, "val"),
            (TokenType::Identifier, "d"),
            (TokenType::Assign, "="),
            (TokenType::LBrace, "{"),
            (TokenType::Identifier, "a"),
            (TokenType::Assign, "="),
            (TokenType::LBracket, "["),
            (TokenType::Integer, "1"),
            (TokenType::Comma, ","),
            (TokenType::Integer, "2"),
            (TokenType::RBracket, "]"),
            (TokenType::RBrace, "}"),
            (TokenType::Semicolon, ";"),
            (TokenType::Identifier, "d"),
            (TokenType::Dot, "."),
            (TokenType::Identifier, "a"),
            (TokenType::BinaryOperator, "!="),
            (TokenType::Identifier, "d"),
            (TokenType::BinaryOperator, "&&"),
            (TokenType::Identifier, "true"),
            (TokenType::BinaryOperator, "||"),
            (TokenType::Identifier, "false"),
            (TokenType::Semicolon, ";"),
            (TokenType::Eof, "EOF"),
        ]
        .into_iter()
        .map(|(token_type, literal)| Token::new(token_type, literal))
        .collect::<Vec<_>>();

        assert_eq!(tokenize(input).expect("Lex errors found"), cases);
    }

    #[test]
    fn test_arithmetic_operators() {
        let tokens = tokenize("1+2-3*4/5%6^7").expect("Lex errors found");
        let operators: Vec<&str> = tokens
            .iter()
            .filter(|token| token.is(TokenType::BinaryOperator))
            .map(|token| token.literal.as_str())
            .collect();

        assert_eq!(operators, vec!["+", "-", "*", "/", "%", "^"]);
    }

    #[test]
    fn test_identifiers_are_letter_runs() {
        let tokens = tokenize("ünïcødé snake_case x1").expect("Lex errors found");
        let cases = vec![
            (TokenType::Identifier, "ünïcødé"),
            (TokenType::Identifier, "snake_case"),
            (TokenType::Identifier, "x"),
            (TokenType::Integer, "1"),
            (TokenType::Eof, "EOF"),
        ];

        assert_eq!(tokens.len(), cases.len());
        for ((token_type, literal), token) in cases.into_iter().zip(tokens) {
            assert_eq!(token, Token::new(token_type, literal));
        }
    }

    #[test]
    fn test_comments() {
        let cases = vec![
            ("# only a comment", 1),
            ("1; # trailing\n2;", 5),
            ("1; $ never closed ;;;", 3),
            ("$a$1$b$", 2),
        ];

        for (input, count) in cases.into_iter() {
            let tokens = tokenize(input).expect("Lex errors found");
            assert_eq!(tokens.len(), count, "input: {}", input);
            assert!(tokens.last().map_or(false, |t| t.is(TokenType::Eof)));
        }
    }

    #[test]
    fn test_numbers() {
        let cases = vec![
            ("42", Token::new(TokenType::Integer, "42")),
            ("4.25", Token::new(TokenType::Float, "4.25")),
            ("7.", Token::new(TokenType::Float, "7.")),
            (".75", Token::new(TokenType::Float, "0.75")),
        ];

        for (input, expected) in cases.into_iter() {
            let mut lexer = Lexer::new(input);
            assert_eq!(lexer.next_token(), Ok(expected));
            assert_eq!(lexer.next_token(), Ok(Token::eof()));
        }
    }

    #[test]
    fn test_member_accessor_is_not_a_number() {
        let tokens = tokenize("a.b").expect("Lex errors found");
        assert_eq!(tokens[1], Token::new(TokenType::Dot, "."));
    }

    #[test]
    fn test_errors() {
        let cases = vec![
            (
                "1.2.3",
                LexError::InvalidNumber {
                    literal: "1.2.".to_owned(),
                },
            ),
            (
                "\"abc",
                LexError::UnterminatedString {
                    literal: "abc".to_owned(),
                },
            ),
            (
                "!x",
                LexError::UnknownOperator {
                    operator: "!".to_owned(),
                },
            ),
            (
                "a => b",
                LexError::UnknownOperator {
                    operator: "=>".to_owned(),
                },
            ),
            ("val @ = 1;", LexError::UnknownToken { ch: '@' }),
            ("straße", LexError::UnknownToken { ch: 'ß' }),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(tokenize(input), Err(expected));
        }
    }

    #[test]
    fn test_iterator_stops_after_eof() {
        let mut lexer = Lexer::new("x");
        assert!(lexer.next().is_some());
        assert_eq!(lexer.next(), Some(Ok(Token::eof())));
        assert_eq!(lexer.next(), None);
    }
}
