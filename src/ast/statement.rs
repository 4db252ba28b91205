use super::{comma_separated, Chunk, Expression, FunctionLiteral, Identifier};
use derive_more::Display;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

#[derive(Display, Debug, Clone, PartialEq)]
pub enum Statement {
    Val(ValDeclaration),
    Fn(FnDeclaration),
    Return(ReturnStatement),
    If(IfStatement),
    Expr(ExpressionStatement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValDeclaration {
    pub name: Identifier,
    pub value: Expression,
}

impl Display for ValDeclaration {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "val {} = {};", self.name, self.value)
    }
}

/// A named function. The literal is shared with every closure created from it.
#[derive(Debug, Clone, PartialEq)]
pub struct FnDeclaration {
    pub name: Identifier,
    pub function: Rc<FunctionLiteral>,
}

impl Display for FnDeclaration {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "fn {}({})",
            self.name,
            comma_separated(&self.function.parameters)
        )?;
        self.function.body.fmt_body(f)?;
        write!(f, " end fn")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Expression,
}

impl Display for ReturnStatement {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "return {};", self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub test: Expression,
    pub consequent: Chunk,
    pub alternate: Option<Alternate>,
}

/// `else if` chains nest as `ElseIf`; only the outermost `if` owns the closing `end if`.
#[derive(Debug, Clone, PartialEq)]
pub enum Alternate {
    Else(Chunk),
    ElseIf(Box<IfStatement>),
}

impl IfStatement {
    fn fmt_branches(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "if ({}) then", self.test)?;
        self.consequent.fmt_body(f)?;
        match &self.alternate {
            Some(Alternate::Else(chunk)) => {
                write!(f, " else")?;
                chunk.fmt_body(f)
            }
            Some(Alternate::ElseIf(nested)) => {
                write!(f, " else ")?;
                nested.fmt_branches(f)
            }
            None => Ok(()),
        }
    }
}

impl Display for IfStatement {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.fmt_branches(f)?;
        write!(f, " end if")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
}

impl Display for ExpressionStatement {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{};", self.expression)
    }
}
