use crate::ast;
use custom_error::custom_error;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub EvalError

    IdentifierNotFound{id: String} = "identifier not found: {id}",
    AlreadyDeclared{name: String} = "`{name}` is already declared in this scope",
    UnknownOperator{left: &'static str, operator: ast::Operator, right: &'static str} = "unknown operator: {left} {operator} {right}",
    TypeMismatch{left: &'static str, operator: ast::Operator, right: &'static str} = "type mismatch: {left} {operator} {right}",
    DivisionByZero{left: i32, operator: ast::Operator} = "division by zero: {left} {operator} 0",
    IntegerOverflow{left: i32, operator: ast::Operator, right: i32} = "integer overflow: {left} {operator} {right}",
    NonBooleanCondition{type_name: &'static str} = "if condition must be a bool, got {type_name}",
    NotCallable{type_name: &'static str} = "not callable: {type_name}",
    IncorrectArity{name: String, want: usize, got: usize} = "wrong number of arguments to `{name}`. got={got}, want={want}",
    UnsupportedArgType{fn_name: &'static str, type_name: &'static str} = "argument to `{fn_name}` not supported, got {type_name}",
    NotIndexable{type_name: &'static str} = "member access not supported: {type_name}",
    NamedArrayAccess{property: String} = "cannot access non-computed property `{property}` on arrays",
    InvalidIndex{type_name: &'static str} = "array index must be an integer, got {type_name}",
    IndexOutOfRange{index: i32, length: usize} = "index {index} out of range for array of length {length}",
    DuplicateKey{key: String} = "duplicate dictionary key: {key}",
    ModuleNotFound{path: String, reason: String} = "could not read module {path}: {reason}",
    ModuleFailed{path: String, message: String} = "module {path} failed: {message}",
    ModuleWithoutValue{path: String} = "module {path} did not return a value",
    Io{reason: String} = "i/o error: {reason}",
}

impl From<std::io::Error> for EvalError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}
