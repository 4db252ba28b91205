use super::{comma_separated, Chunk, Identifier};
use derive_more::Display;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

#[derive(Display, Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Integer(i32),
    #[display(fmt = "{:?}", _0)]
    Float(f64),
    #[display(fmt = "\"{}\"", _0)]
    String(String),
    Array(ArrayLiteral),
    Dictionary(DictionaryLiteral),
    Lambda(Rc<FunctionLiteral>),
    Binary(BinaryExpression),
    Call(CallExpression),
    Member(MemberExpression),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumString)]
pub enum Operator {
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "*")]
    Asterisk,
    #[strum(serialize = "/")]
    Slash,
    #[strum(serialize = "%")]
    Percent,
    #[strum(serialize = "^")]
    Caret,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    NotEq,
    #[strum(serialize = "<")]
    LT,
    #[strum(serialize = ">")]
    GT,
    #[strum(serialize = "<=")]
    LtEq,
    #[strum(serialize = ">=")]
    GtEq,
    #[strum(serialize = "&&")]
    And,
    #[strum(serialize = "||")]
    Or,
}

impl Operator {
    /// Comparison and boolean operators share the loosest binding level.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::LT | Self::GT | Self::LtEq | Self::GtEq | Self::And | Self::Or
        )
    }

    pub fn is_multiplicative(self) -> bool {
        matches!(self, Self::Asterisk | Self::Slash | Self::Percent | Self::Caret)
    }

    pub fn is_additive(self) -> bool {
        matches!(self, Self::Plus | Self::Minus)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub left: Box<Expression>,
    pub operator: Operator,
    pub right: Box<Expression>,
}

impl Display for BinaryExpression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub parameters: Vec<Identifier>,
    pub body: Chunk,
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "lm({})", comma_separated(&self.parameters))?;
        self.body.fmt_body(f)?;
        write!(f, " end lm")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
}

impl Display for CallExpression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}({})", self.function, comma_separated(&self.arguments))
    }
}

/// How a member accessor or dictionary key names its target: `.name` / `name =`
/// versus `[expr]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Named(Identifier),
    Computed(Box<Expression>),
}

impl Property {
    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    pub object: Box<Expression>,
    pub property: Property,
}

impl Display for MemberExpression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.property {
            Property::Named(name) => write!(f, "{}.{}", self.object, name),
            Property::Computed(index) => write!(f, "{}[{}]", self.object, index),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
}

impl Display for ArrayLiteral {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{}]", comma_separated(&self.elements))
    }
}

impl From<Vec<Expression>> for ArrayLiteral {
    fn from(elements: Vec<Expression>) -> Self {
        Self { elements }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryLiteral {
    pub properties: Vec<(Property, Expression)>,
}

impl Display for DictionaryLiteral {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let properties: Vec<String> = self
            .properties
            .iter()
            .map(|(key, value)| match key {
                Property::Named(name) => format!("{} = {}", name, value),
                Property::Computed(key) => format!("[{}] = {}", key, value),
            })
            .collect();
        write!(f, "{{{}}}", properties.join(", "))
    }
}

impl From<Vec<(Property, Expression)>> for DictionaryLiteral {
    fn from(properties: Vec<(Property, Expression)>) -> Self {
        Self { properties }
    }
}
