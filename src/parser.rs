use crate::ast::{self, Alternate, Chunk, Expression, Identifier, Operator, Property, Statement};
use crate::token::{Token, TokenType};
use custom_error::custom_error;
use std::fmt::Display;
use std::rc::Rc;
use std::vec;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub ParseError

    UnexpectedToken{expected: String, got: String} = "expected {expected}, got {got}",
    NonIdentifierAccessor{got: String} = "the `.` accessor must be followed by an identifier, got {got}",
    InvalidInteger{literal: String} = "could not parse {literal} as integer",
    InvalidFloat{literal: String} = "could not parse {literal} as float",
}

impl ParseError {
    fn unexpected(expected: impl Display, got: &Token) -> Self {
        Self::UnexpectedToken {
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Parses a whole token stream into the program chunk.
pub fn parse(tokens: Vec<Token>) -> Result<Chunk> {
    Parser::new(tokens).parse_program()
}

pub struct Parser {
    tokens: vec::IntoIter<Token>,
    cur_token: Token,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens.into_iter();
        let cur_token = tokens.next().unwrap_or_else(Token::eof);

        Self { tokens, cur_token }
    }

    /// Moves to the next token and hands back the one just consumed.
    fn next_token(&mut self) -> Token {
        let next = self.tokens.next().unwrap_or_else(Token::eof);
        std::mem::replace(&mut self.cur_token, next)
    }

    fn expect(&mut self, expected: TokenType) -> Result<Token> {
        if self.cur_token.is(expected) {
            Ok(self.next_token())
        } else {
            Err(ParseError::unexpected(expected, &self.cur_token))
        }
    }

    fn cur_operator(&self, accepts: fn(Operator) -> bool) -> Option<Operator> {
        if !self.cur_token.is(TokenType::BinaryOperator) {
            return None;
        }
        self.cur_token
            .literal
            .parse::<Operator>()
            .ok()
            .filter(|op| accepts(*op))
    }

    pub fn parse_program(mut self) -> Result<Chunk> {
        let mut program = Chunk::default();

        while !self.cur_token.is(TokenType::Eof) {
            program.statements.push(self.parse_statement()?);
        }

        Ok(program)
    }

    /// Parses statements until one of `terminators` is current, leaving it unconsumed.
    fn parse_block(&mut self, terminators: &[TokenType]) -> Result<Chunk> {
        let mut block = Chunk::default();

        while !terminators.contains(&self.cur_token.token_type) {
            if self.cur_token.is(TokenType::Eof) {
                return Err(ParseError::unexpected(terminators[0], &self.cur_token));
            }
            block.statements.push(self.parse_statement()?);
        }

        Ok(block)
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        match self.cur_token.token_type {
            TokenType::Val => self.parse_val_declaration().map(Statement::Val),
            TokenType::Function => self.parse_fn_declaration().map(Statement::Fn),
            TokenType::Return => self.parse_return_statement().map(Statement::Return),
            TokenType::If => self.parse_if_statement(false).map(Statement::If),
            _ => self.parse_expression_statement().map(Statement::Expr),
        }
    }

    fn parse_val_declaration(&mut self) -> Result<ast::ValDeclaration> {
        self.next_token();
        let name = self.expect(TokenType::Identifier)?.into();
        self.expect(TokenType::Assign)?;
        let value = self.parse_expression()?;
        self.expect(TokenType::Semicolon)?;

        Ok(ast::ValDeclaration { name, value })
    }

    fn parse_fn_declaration(&mut self) -> Result<ast::FnDeclaration> {
        self.next_token();
        let name = self.expect(TokenType::Identifier)?.into();
        let function = self.parse_function_literal(TokenType::Function)?;

        Ok(ast::FnDeclaration {
            name,
            function: Rc::new(function),
        })
    }

    /// Parameters and body shared by `fn` and `lm`, through `end <closer>`.
    fn parse_function_literal(&mut self, closer: TokenType) -> Result<ast::FunctionLiteral> {
        let parameters = self.parse_parameters()?;
        let body = self.parse_block(&[TokenType::End])?;
        self.expect(TokenType::End)?;
        self.expect(closer)?;

        Ok(ast::FunctionLiteral { parameters, body })
    }

    fn parse_parameters(&mut self) -> Result<Vec<Identifier>> {
        self.expect(TokenType::LParen)?;
        let mut parameters = vec![];

        while !self.cur_token.is(TokenType::RParen) {
            if !parameters.is_empty() {
                self.expect(TokenType::Comma)?;
            }
            parameters.push(self.expect(TokenType::Identifier)?.into());
        }
        self.expect(TokenType::RParen)?;

        Ok(parameters)
    }

    fn parse_return_statement(&mut self) -> Result<ast::ReturnStatement> {
        self.next_token();
        let value = self.parse_expression()?;
        self.expect(TokenType::Semicolon)?;

        Ok(ast::ReturnStatement { value })
    }

    fn parse_if_statement(&mut self, is_alternate: bool) -> Result<ast::IfStatement> {
        self.next_token();
        self.expect(TokenType::LParen)?;
        let test = self.parse_expression()?;
        self.expect(TokenType::RParen)?;
        self.expect(TokenType::Then)?;

        let consequent = self.parse_block(&[TokenType::End, TokenType::Else])?;

        let alternate = if self.cur_token.is(TokenType::Else) {
            self.next_token();
            if self.cur_token.is(TokenType::If) {
                Some(Alternate::ElseIf(Box::new(self.parse_if_statement(true)?)))
            } else {
                Some(Alternate::Else(self.parse_block(&[TokenType::End])?))
            }
        } else {
            None
        };

        if !is_alternate {
            self.expect(TokenType::End)?;
            self.expect(TokenType::If)?;
        }

        Ok(ast::IfStatement {
            test,
            consequent,
            alternate,
        })
    }

    fn parse_expression_statement(&mut self) -> Result<ast::ExpressionStatement> {
        let expression = self.parse_expression()?;
        self.expect(TokenType::Semicolon)?;

        Ok(ast::ExpressionStatement { expression })
    }

    fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_boolean_expression()
    }

    fn parse_boolean_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_lambda_expression()?;

        while let Some(operator) = self.cur_operator(Operator::is_comparison) {
            self.next_token();
            let right = self.parse_lambda_expression()?;
            left = binary(left, operator, right);
        }

        Ok(left)
    }

    fn parse_lambda_expression(&mut self) -> Result<Expression> {
        if !self.cur_token.is(TokenType::Lambda) {
            return self.parse_dictionary_expression();
        }

        self.next_token();
        let function = self.parse_function_literal(TokenType::Lambda)?;
        Ok(Expression::Lambda(Rc::new(function)))
    }

    fn parse_dictionary_expression(&mut self) -> Result<Expression> {
        if !self.cur_token.is(TokenType::LBrace) {
            return self.parse_array_expression();
        }

        self.next_token();
        let mut properties = vec![];

        while !self.cur_token.is(TokenType::RBrace) {
            let key = match self.cur_token.token_type {
                TokenType::Identifier => Property::Named(self.next_token().into()),
                TokenType::LBracket => {
                    self.next_token();
                    let key = self.parse_expression()?;
                    self.expect(TokenType::RBracket)?;
                    Property::Computed(Box::new(key))
                }
                _ => return Err(ParseError::unexpected("property key", &self.cur_token)),
            };
            self.expect(TokenType::Assign)?;
            let value = self.parse_expression()?;
            properties.push((key, value));

            match self.cur_token.token_type {
                TokenType::Comma => {
                    self.next_token();
                }
                TokenType::RBrace => {}
                _ => return Err(ParseError::unexpected("`,` or `}`", &self.cur_token)),
            }
        }
        self.expect(TokenType::RBrace)?;

        Ok(Expression::Dictionary(properties.into()))
    }

    fn parse_array_expression(&mut self) -> Result<Expression> {
        if !self.cur_token.is(TokenType::LBracket) {
            return self.parse_multiplicative_expression();
        }

        self.next_token();
        let mut elements = vec![];

        while !self.cur_token.is(TokenType::RBracket) {
            elements.push(self.parse_expression()?);

            match self.cur_token.token_type {
                TokenType::Comma => {
                    self.next_token();
                }
                TokenType::RBracket => {}
                _ => return Err(ParseError::unexpected("`,` or `]`", &self.cur_token)),
            }
        }
        self.expect(TokenType::RBracket)?;

        Ok(Expression::Array(elements.into()))
    }

    fn parse_multiplicative_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_additive_expression()?;

        while let Some(operator) = self.cur_operator(Operator::is_multiplicative) {
            self.next_token();
            let right = self.parse_additive_expression()?;
            left = binary(left, operator, right);
        }

        Ok(left)
    }

    fn parse_additive_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_call_member_expression()?;

        while let Some(operator) = self.cur_operator(Operator::is_additive) {
            self.next_token();
            let right = self.parse_call_member_expression()?;
            left = binary(left, operator, right);
        }

        Ok(left)
    }

    fn parse_call_member_expression(&mut self) -> Result<Expression> {
        let mut expression = self.parse_primary_expression()?;

        loop {
            expression = match self.cur_token.token_type {
                TokenType::Dot => {
                    self.next_token();
                    if !self.cur_token.is(TokenType::Identifier) {
                        return Err(ParseError::NonIdentifierAccessor {
                            got: self.cur_token.to_string(),
                        });
                    }
                    Expression::Member(ast::MemberExpression {
                        object: Box::new(expression),
                        property: Property::Named(self.next_token().into()),
                    })
                }
                TokenType::LBracket => {
                    self.next_token();
                    let index = self.parse_expression()?;
                    self.expect(TokenType::RBracket)?;
                    Expression::Member(ast::MemberExpression {
                        object: Box::new(expression),
                        property: Property::Computed(Box::new(index)),
                    })
                }
                TokenType::LParen => Expression::Call(ast::CallExpression {
                    function: Box::new(expression),
                    arguments: self.parse_call_arguments()?,
                }),
                _ => return Ok(expression),
            };
        }
    }

    fn parse_call_arguments(&mut self) -> Result<Vec<Expression>> {
        self.expect(TokenType::LParen)?;
        let mut arguments = vec![];

        while !self.cur_token.is(TokenType::RParen) {
            if !arguments.is_empty() {
                self.expect(TokenType::Comma)?;
            }
            arguments.push(self.parse_expression()?);
        }
        self.expect(TokenType::RParen)?;

        Ok(arguments)
    }

    fn parse_primary_expression(&mut self) -> Result<Expression> {
        match self.cur_token.token_type {
            TokenType::Identifier => Ok(Expression::Identifier(self.next_token().into())),
            TokenType::LParen => {
                self.next_token();
                let expression = self.parse_expression()?;
                self.expect(TokenType::RParen)?;
                Ok(expression)
            }
            TokenType::Integer => {
                let literal = self.next_token().literal;
                literal
                    .parse()
                    .map(Expression::Integer)
                    .map_err(|_| ParseError::InvalidInteger { literal })
            }
            TokenType::Float => {
                let literal = self.next_token().literal;
                literal
                    .parse()
                    .map(Expression::Float)
                    .map_err(|_| ParseError::InvalidFloat { literal })
            }
            TokenType::String => Ok(Expression::String(self.next_token().literal)),
            _ => Err(ParseError::unexpected("expression", &self.cur_token)),
        }
    }
}

fn binary(left: Expression, operator: Operator, right: Expression) -> Expression {
    Expression::Binary(ast::BinaryExpression {
        left: Box::new(left),
        operator,
        right: Box::new(right),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn parse_input(input: &str) -> Result<Chunk> {
        parse(tokenize(input).expect("Lex errors found"))
    }

    fn parse_ok(input: &str) -> Chunk {
        parse_input(input).expect("Parse errors found")
    }

    #[test]
    fn test_val_declarations() {
        let program = parse_ok(
            "
val x = 5;
val y = 10.5;
val foobar = \"text\";
",
        );

        assert_eq!(program.statements.len(), 3);

        let cases = [
            ("x", Expression::Integer(5)),
            ("y", Expression::Float(10.5)),
            ("foobar", Expression::String("text".to_owned())),
        ];

        for (stmt, (name, value)) in program.statements.iter().zip(cases.iter()) {
            match stmt {
                Statement::Val(decl) => {
                    assert_eq!(decl.name.value, *name);
                    assert_eq!(&decl.value, value);
                }
                other => panic!("expected val declaration, got {}", other),
            }
        }
    }

    #[test]
    fn test_return_statements() {
        let program = parse_ok("return 5; return x; return f(1);");

        assert_eq!(program.statements.len(), 3);
        for stmt in program.statements.iter() {
            assert!(matches!(stmt, Statement::Return(_)), "got {}", stmt);
        }
    }

    #[test]
    fn test_operator_precedence() {
        let cases = vec![
            ("a + b;", "(a + b);"),
            ("a - b - c;", "((a - b) - c);"),
            ("1 + 2 * 3;", "((1 + 2) * 3);"),
            ("1 * 2 + 3;", "(1 * (2 + 3));"),
            ("a * b / c;", "((a * b) / c);"),
            ("2 ^ 3 % 4;", "((2 ^ 3) % 4);"),
            ("a + b < c * d;", "((a + b) < (c * d));"),
            ("1 < 2 == true;", "((1 < 2) == true);"),
            ("a && b || c;", "((a && b) || c);"),
            ("(a + b) * c;", "((a + b) * c);"),
            ("a * (b + c);", "(a * (b + c));"),
            ("add(1, 2 * 3);", "add(1, (2 * 3));"),
            ("f(a)(b).c[d];", "f(a)(b).c[d];"),
            ("a.b.c;", "a.b.c;"),
            ("d.f() + 1;", "(d.f() + 1);"),
            ("xs[i + 1];", "xs[(i + 1)];"),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(parse_ok(input).to_string(), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_literals() {
        let cases = vec![
            ("[1, 2.5, \"s\"];", "[1, 2.5, \"s\"];"),
            ("[];", "[];"),
            ("[1, 2,];", "[1, 2];"),
            ("{};", "{};"),
            ("val d = {x = 1, [\"k\" + 1] = 2};", "val d = {x = 1, [(\"k\" + 1)] = 2};"),
            ("{a = [1], b = {c = .5}};", "{a = [1], b = {c = 0.5}};"),
            ("val f = lm(x, y) return x; end lm;", "val f = lm(x, y) return x; end lm;"),
            ("lm() end lm;", "lm() end lm;"),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(parse_ok(input).to_string(), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_fn_declaration() {
        let program = parse_ok("fn add(a, b) val sum = a + b; return sum; end fn");

        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Statement::Fn(decl) => {
                assert_eq!(decl.name.value, "add");
                let parameters: Vec<&str> = decl
                    .function
                    .parameters
                    .iter()
                    .map(|p| p.value.as_str())
                    .collect();
                assert_eq!(parameters, vec!["a", "b"]);
                assert_eq!(decl.function.body.statements.len(), 2);
            }
            other => panic!("expected fn declaration, got {}", other),
        }
    }

    #[test]
    fn test_if_else_chain() {
        let input = "if (x) then return 1; else if (y) then return 2; else return 3; end if";
        let program = parse_ok(input);

        assert_eq!(program.to_string(), input);

        let stmt = match &program.statements[0] {
            Statement::If(stmt) => stmt,
            other => panic!("expected if statement, got {}", other),
        };
        let nested = match &stmt.alternate {
            Some(Alternate::ElseIf(nested)) => nested,
            other => panic!("expected else-if alternate, got {:?}", other),
        };
        assert!(matches!(nested.alternate, Some(Alternate::Else(_))));
    }

    #[test]
    fn test_nested_if_consumes_own_end() {
        let input = "if (a) then if (b) then 1; end if 2; else 3; end if";
        let program = parse_ok(input);

        assert_eq!(program.statements.len(), 1);
        assert_eq!(program.to_string(), input);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let input = "fn f(n) if (n < 2) then return n; end if return f(n - 1) + f(n - 2); end fn f(10);";

        assert_eq!(parse_ok(input), parse_ok(input));
    }

    #[test]
    fn test_property_kinds() {
        let program = parse_ok("a.b; a[b];");
        let computed: Vec<bool> = program
            .statements
            .iter()
            .map(|stmt| match stmt {
                Statement::Expr(ast::ExpressionStatement {
                    expression: Expression::Member(member),
                }) => member.property.is_computed(),
                other => panic!("expected member expression, got {}", other),
            })
            .collect();

        assert_eq!(computed, vec![false, true]);
    }

    #[test]
    fn test_errors() {
        let unexpected = |expected: &str, got: &str| ParseError::UnexpectedToken {
            expected: expected.to_owned(),
            got: got.to_owned(),
        };

        let cases = vec![
            ("val = 5;", unexpected("identifier", "`=`")),
            ("val x = 5", unexpected("`;`", "end of input")),
            ("val x 5;", unexpected("`=`", "integer literal `5`")),
            ("fn f() return 1;", unexpected("`end`", "end of input")),
            ("fn f(a b) end fn", unexpected("`,`", "identifier `b`")),
            ("fn f() end lm", unexpected("`fn`", "`lm`")),
            ("if (x) then 1; end fn", unexpected("`if`", "`fn`")),
            ("if x then 1; end if", unexpected("`(`", "identifier `x`")),
            ("if (x) 1; end if", unexpected("`then`", "integer literal `1`")),
            ("1 + ;", unexpected("expression", "`;`")),
            ("{x 1};", unexpected("`=`", "integer literal `1`")),
            ("{1 = 2};", unexpected("property key", "integer literal `1`")),
            ("{x = 1 y = 2};", unexpected("`,` or `}`", "identifier `y`")),
            ("[1 2];", unexpected("`,` or `]`", "integer literal `2`")),
            ("f(1 2);", unexpected("`,`", "integer literal `2`")),
            ("xs[1;", unexpected("`]`", "`;`")),
            (
                "a.(b);",
                ParseError::NonIdentifierAccessor {
                    got: "`(`".to_owned(),
                },
            ),
            (
                "99999999999;",
                ParseError::InvalidInteger {
                    literal: "99999999999".to_owned(),
                },
            ),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(parse_input(input), Err(expected), "input: {}", input);
        }
    }
}
