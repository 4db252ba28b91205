use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

mod dictionary;
mod eval_error;
mod function;
pub use dictionary::DictionaryValue;
pub use eval_error::EvalError;
pub use function::{Builtin, Closure, Function, NativeFn};

pub type Result<T> = std::result::Result<T, EvalError>;

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Null,
    Integer(i32),
    Float(f64),
    String(String),
    Bool(bool),
    Array(Rc<Vec<Object>>),
    Dictionary(DictionaryValue),
    Function(Function),
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::String(s) => write!(f, "{}", s),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Array(a) => {
                let elements: Vec<String> = a.iter().map(Object::to_string).collect();

                write!(f, "[{}]", elements.join(", "))
            }
            Self::Dictionary(d) => write!(f, "{}", d),
            Self::Function(func) => write!(f, "{}", func),
        }
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::Null
    }
}

impl From<i32> for Object {
    fn from(n: i32) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Object {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<String> for Object {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Object {
    fn from(s: &str) -> Self {
        s.to_owned().into()
    }
}

impl From<Vec<Object>> for Object {
    fn from(a: Vec<Object>) -> Self {
        Self::Array(Rc::new(a))
    }
}

impl From<DictionaryValue> for Object {
    fn from(d: DictionaryValue) -> Self {
        Self::Dictionary(d)
    }
}

impl From<Function> for Object {
    fn from(f: Function) -> Self {
        Self::Function(f)
    }
}

impl From<Builtin> for Object {
    fn from(b: Builtin) -> Self {
        Function::Builtin(b).into()
    }
}

impl From<Closure> for Object {
    fn from(c: Closure) -> Self {
        Function::Closure(c).into()
    }
}

impl Object {
    pub fn array(elements: Vec<Object>) -> Self {
        elements.into()
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Array(_) => "array",
            Self::Dictionary(_) => "dictionary",
            Self::Function(_) => "function",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        let dict =
            DictionaryValue::from_pairs(vec![(Object::from("k"), Object::array(vec![]))]).unwrap();
        let cases = vec![
            (Object::Null, "null"),
            (Object::Integer(-3), "-3"),
            (Object::Float(2.0), "2"),
            (Object::Float(0.1), "0.1"),
            (Object::Float(-1.5), "-1.5"),
            (Object::from("raw text"), "raw text"),
            (Object::Bool(false), "false"),
            (
                Object::array(vec![Object::Integer(1), Object::from("a"), Object::Null]),
                "[1, a, null]",
            ),
            (Object::from(dict), "{k: []}"),
            (
                Builtin::new("math.abs", |_| Ok(Object::Null)).into(),
                "builtin function math.abs",
            ),
        ];

        for (object, expected) in cases.into_iter() {
            assert_eq!(object.to_string(), expected);
        }
    }

    #[test]
    fn test_type_names() {
        let cases = vec![
            (Object::Null, "null"),
            (Object::Integer(1), "integer"),
            (Object::Float(1.0), "float"),
            (Object::from(""), "string"),
            (Object::Bool(true), "bool"),
            (Object::array(vec![]), "array"),
            (Object::from(DictionaryValue::new()), "dictionary"),
        ];

        for (object, expected) in cases.into_iter() {
            assert_eq!(object.type_name(), expected);
        }
    }
}
