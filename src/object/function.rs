use super::{Object, Result};
use crate::ast::{self, FunctionLiteral};
use crate::environment::Environment;
use std::fmt::{self, Debug, Display, Formatter};
use std::rc::Rc;

pub type NativeFn = fn(Vec<Object>) -> Result<Object>;

#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    Builtin(Builtin),
    Closure(Closure),
}

impl Function {
    /// The name used in arity errors and traces.
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin(builtin) => builtin.name,
            Self::Closure(closure) => closure.name.as_deref().unwrap_or("lambda"),
        }
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Builtin(builtin) => write!(f, "builtin function {}", builtin.name),
            Self::Closure(closure) => write!(f, "{}", closure),
        }
    }
}

/// A host function. Names are qualified by namespace (`math.abs`) and unique.
#[derive(Clone)]
pub struct Builtin {
    pub name: &'static str,
    pub func: Rc<dyn Fn(Vec<Object>) -> Result<Object>>,
}

impl Builtin {
    pub fn new(name: &'static str, func: impl Fn(Vec<Object>) -> Result<Object> + 'static) -> Self {
        Self {
            name,
            func: Rc::new(func),
        }
    }

    pub fn call(&self, args: Vec<Object>) -> Result<Object> {
        (self.func)(args)
    }
}

impl From<(&'static str, NativeFn)> for Builtin {
    fn from((name, func): (&'static str, NativeFn)) -> Self {
        Self::new(name, func)
    }
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_tuple("Builtin").field(&self.name).finish()
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// An interpreted function together with the scope it was defined in.
#[derive(Debug, Clone)]
pub struct Closure {
    pub name: Option<String>,
    pub literal: Rc<FunctionLiteral>,
    pub env: Environment,
}

impl Closure {
    pub fn arity(&self) -> usize {
        self.literal.parameters.len()
    }
}

impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.literal, &other.literal) && self.env.ptr_eq(&other.env)
    }
}

impl Display for Closure {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let parameters: Vec<String> = self
            .literal
            .parameters
            .iter()
            .map(ast::Identifier::to_string)
            .collect();

        match &self.name {
            Some(name) => write!(f, "fn {}({})", name, parameters.join(", ")),
            None => write!(f, "lm({})", parameters.join(", ")),
        }
    }
}
