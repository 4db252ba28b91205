
use crate::ast::{self, Alternate, Chunk, Expression, Operator, Property, Statement};
use crate::environment::Environment;
use crate::object::{Closure, DictionaryValue, EvalError, Function, Object, Result};
use std::convert::TryFrom;
use std::rc::Rc;
use tracing::trace;

/// The outcome of running statements: either carry on with the value produced, or unwind
/// with a returned value until a call boundary or the top level takes it.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Continue(Object),
    Return(Object),
}

impl Flow {
    pub fn into_value(self) -> Object {
        match self {
            Self::Continue(value) | Self::Return(value) => value,
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Self::Return(_))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Chunk(&'a Chunk),
    Statement(&'a Statement),
    Expression(&'a Expression),
}

impl<'a> From<&'a Chunk> for Node<'a> {
    fn from(chunk: &'a Chunk) -> Self {
        Self::Chunk(chunk)
    }
}

impl<'a> From<&'a Statement> for Node<'a> {
    fn from(stmt: &'a Statement) -> Self {
        Self::Statement(stmt)
    }
}

impl<'a> From<&'a Expression> for Node<'a> {
    fn from(expr: &'a Expression) -> Self {
        Self::Expression(expr)
    }
}

pub fn eval(node: Node, env: &Environment) -> Result<Flow> {
    match node {
        Node::Chunk(chunk) => eval_chunk(chunk, env),
        Node::Statement(stmt) => eval_statement(stmt, env),
        Node::Expression(expr) => eval_expression(expr, env).map(Flow::Continue),
    }
}

pub fn eval_chunk(chunk: &Chunk, env: &Environment) -> Result<Flow> {
    let mut flow = Flow::Continue(Object::Null);

    for stmt in chunk.statements.iter() {
        flow = eval_statement(stmt, env)?;
        if flow.is_return() {
            break;
        }
    }

    Ok(flow)
}

pub fn eval_statement(stmt: &Statement, env: &Environment) -> Result<Flow> {
    match stmt {
        Statement::Val(decl) => {
            let value = eval_expression(&decl.value, env)?;
            env.declare(&decl.name.value, value)?;
            Ok(Flow::Continue(Object::Null))
        }
        Statement::Fn(decl) => {
            let closure = Closure {
                name: Some(decl.name.value.clone()),
                literal: Rc::clone(&decl.function),
                env: env.clone(),
            };
            env.declare(&decl.name.value, closure.into())?;
            Ok(Flow::Continue(Object::Null))
        }
        Statement::Return(stmt) => eval_expression(&stmt.value, env).map(Flow::Return),
        Statement::If(stmt) => eval_if_statement(stmt, env),
        Statement::Expr(stmt) => eval_expression(&stmt.expression, env).map(Flow::Continue),
    }
}

fn eval_if_statement(stmt: &ast::IfStatement, env: &Environment) -> Result<Flow> {
    match eval_expression(&stmt.test, env)? {
        Object::Bool(true) => eval_chunk(&stmt.consequent, &Environment::with_enclosed(env)),
        Object::Bool(false) => match &stmt.alternate {
            Some(Alternate::Else(chunk)) => eval_chunk(chunk, &Environment::with_enclosed(env)),
            // A nested `if` opens its own branch scopes.
            Some(Alternate::ElseIf(nested)) => eval_if_statement(nested, env),
            None => Ok(Flow::Continue(Object::Null)),
        },
        other => Err(EvalError::NonBooleanCondition {
            type_name: other.type_name(),
        }),
    }
}

pub fn eval_expression(expr: &Expression, env: &Environment) -> Result<Object> {
    match expr {
        Expression::Identifier(id) => env.get(&id.value),
        Expression::Integer(n) => Ok(Object::Integer(*n)),
        Expression::Float(x) => Ok(Object::Float(*x)),
        Expression::String(s) => Ok(Object::String(s.clone())),
        Expression::Array(array) => eval_expressions(&array.elements, env).map(Object::array),
        Expression::Dictionary(dict) => eval_dictionary_literal(dict, env),
        Expression::Lambda(literal) => Ok(Closure {
            name: None,
            literal: Rc::clone(literal),
            env: env.clone(),
        }
        .into()),
        Expression::Binary(binary) => {
            let left = eval_expression(&binary.left, env)?;
            let right = eval_expression(&binary.right, env)?;
            eval_binary_expression(binary.operator, left, right)
        }
        Expression::Call(call) => {
            let function = match eval_expression(&call.function, env)? {
                Object::Function(function) => function,
                other => {
                    return Err(EvalError::NotCallable {
                        type_name: other.type_name(),
                    })
                }
            };
            let args = eval_expressions(&call.arguments, env)?;
            apply_function(&function, args)
        }
        Expression::Member(member) => eval_member_expression(member, env),
    }
}

fn eval_expressions(exprs: &[Expression], env: &Environment) -> Result<Vec<Object>> {
    exprs.iter().map(|expr| eval_expression(expr, env)).collect()
}

fn eval_dictionary_literal(dict: &ast::DictionaryLiteral, env: &Environment) -> Result<Object> {
    let mut value = DictionaryValue::new();

    for (key, expr) in dict.properties.iter() {
        let key = match key {
            Property::Named(name) => Object::String(name.value.clone()),
            Property::Computed(key) => eval_expression(key, env)?,
        };
        value.insert(key, eval_expression(expr, env)?)?;
    }

    Ok(value.into())
}

fn eval_member_expression(member: &ast::MemberExpression, env: &Environment) -> Result<Object> {
    match eval_expression(&member.object, env)? {
        Object::Dictionary(dict) => {
            let found = match &member.property {
                Property::Named(name) => dict.get_named(&name.value).cloned(),
                Property::Computed(key) => dict.get(&eval_expression(key, env)?).cloned(),
            };
            Ok(found.unwrap_or_default())
        }
        Object::Array(elements) => match &member.property {
            Property::Named(name) => Err(EvalError::NamedArrayAccess {
                property: name.value.clone(),
            }),
            Property::Computed(index) => index_array(&elements, eval_expression(index, env)?),
        },
        other => Err(EvalError::NotIndexable {
            type_name: other.type_name(),
        }),
    }
}

fn index_array(elements: &[Object], index: Object) -> Result<Object> {
    let index = match index {
        Object::Integer(i) => i,
        other => {
            return Err(EvalError::InvalidIndex {
                type_name: other.type_name(),
            })
        }
    };
    let length = elements.len();

    usize::try_from(index)
        .ok()
        .and_then(|i| elements.get(i).cloned())
        .ok_or(EvalError::IndexOutOfRange { index, length })
}

fn eval_binary_expression(operator: Operator, left: Object, right: Object) -> Result<Object> {
    let left_type = left.type_name();
    let right_type = right.type_name();
    let mismatch = EvalError::TypeMismatch {
        left: left_type,
        operator,
        right: right_type,
    };

    match left {
        Object::Integer(l) => match right {
            Object::Integer(r) => eval_integer_binary(operator, l, r),
            _ => Err(mismatch),
        },
        Object::Float(l) => match right {
            Object::Float(r) => eval_float_binary(operator, l, r, right_type),
            Object::Integer(r) => eval_float_binary(operator, l, f64::from(r), right_type),
            _ => Err(mismatch),
        },
        Object::String(l) => match right {
            Object::String(r) => eval_string_binary(operator, l, &r),
            // Only the string on the left coerces the other side.
            right @ Object::Integer(_)
            | right @ Object::Float(_)
            | right @ Object::Null
            | right @ Object::Bool(_) => match operator {
                Operator::Plus => Ok(Object::String(l + &right.to_string())),
                _ => Err(unknown_operator(left_type, operator, right_type)),
            },
            Object::Array(_) | Object::Dictionary(_) | Object::Function(_) => Err(mismatch),
        },
        Object::Bool(l) => match right {
            Object::Bool(r) => eval_bool_binary(operator, l, r),
            _ => Err(mismatch),
        },
        Object::Null | Object::Array(_) | Object::Dictionary(_) | Object::Function(_) => {
            Err(mismatch)
        }
    }
}

fn unknown_operator(left: &'static str, operator: Operator, right: &'static str) -> EvalError {
    EvalError::UnknownOperator {
        left,
        operator,
        right,
    }
}

fn eval_integer_binary(operator: Operator, left: i32, right: i32) -> Result<Object> {
    let result: Object = match operator {
        Operator::Plus => left.wrapping_add(right).into(),
        Operator::Minus => left.wrapping_sub(right).into(),
        Operator::Asterisk => left.wrapping_mul(right).into(),
        // Equal operands always divide to one, zero included.
        Operator::Slash if left == right => Object::Integer(1),
        Operator::Slash | Operator::Percent if right == 0 => {
            return Err(EvalError::DivisionByZero { left, operator })
        }
        Operator::Slash => left
            .checked_div(right)
            .ok_or(EvalError::IntegerOverflow {
                left,
                operator,
                right,
            })?
            .into(),
        Operator::Percent => left
            .checked_rem(right)
            .ok_or(EvalError::IntegerOverflow {
                left,
                operator,
                right,
            })?
            .into(),
        Operator::Caret => integer_power(left, right)?.into(),
        Operator::Eq => (left == right).into(),
        Operator::NotEq => (left != right).into(),
        Operator::LT => (left < right).into(),
        Operator::GT => (left > right).into(),
        Operator::LtEq => (left <= right).into(),
        Operator::GtEq => (left >= right).into(),
        Operator::And | Operator::Or => {
            return Err(unknown_operator("integer", operator, "integer"))
        }
    };

    Ok(result)
}

/// Negative exponents round the real result half to even; anything outside `i32` overflows.
fn integer_power(base: i32, exponent: i32) -> Result<i32> {
    let overflow = EvalError::IntegerOverflow {
        left: base,
        operator: Operator::Caret,
        right: exponent,
    };

    match u32::try_from(exponent) {
        Ok(exp) => base.checked_pow(exp).ok_or(overflow),
        Err(_) => {
            let real = f64::from(base).powi(exponent).round_ties_even();
            if real.is_finite() && real >= f64::from(i32::MIN) && real <= f64::from(i32::MAX) {
                Ok(real as i32)
            } else {
                Err(overflow)
            }
        }
    }
}

fn eval_float_binary(
    operator: Operator,
    left: f64,
    right: f64,
    right_type: &'static str,
) -> Result<Object> {
    let result: Object = match operator {
        Operator::Plus => (left + right).into(),
        Operator::Minus => (left - right).into(),
        Operator::Asterisk => (left * right).into(),
        Operator::Slash if left == right => Object::Float(1.0),
        Operator::Slash => (left / right).into(),
        Operator::Percent => (left % right).into(),
        Operator::Caret => left.powf(right).into(),
        Operator::Eq => (left == right).into(),
        Operator::NotEq => (left != right).into(),
        Operator::LT => (left < right).into(),
        Operator::GT => (left > right).into(),
        Operator::LtEq => (left <= right).into(),
        Operator::GtEq => (left >= right).into(),
        Operator::And | Operator::Or => {
            return Err(unknown_operator("float", operator, right_type))
        }
    };

    Ok(result)
}

fn eval_string_binary(operator: Operator, left: String, right: &str) -> Result<Object> {
    match operator {
        Operator::Plus => Ok(Object::String(left + right)),
        Operator::Eq => Ok((left == right).into()),
        Operator::NotEq => Ok((left != right).into()),
        _ => Err(unknown_operator("string", operator, "string")),
    }
}

fn eval_bool_binary(operator: Operator, left: bool, right: bool) -> Result<Object> {
    match operator {
        Operator::Eq => Ok((left == right).into()),
        Operator::NotEq => Ok((left != right).into()),
        Operator::And => Ok((left && right).into()),
        Operator::Or => Ok((left || right).into()),
        _ => Err(unknown_operator("bool", operator, "bool")),
    }
}

/// Calls a native or interpreted function. A closure body runs in a fresh child of the
/// scope it was defined in, with parameters bound positionally.
pub fn apply_function(function: &Function, args: Vec<Object>) -> Result<Object> {
    trace!(function = function.name(), args = args.len(), "applying function");

    match function {
        Function::Builtin(builtin) => builtin.call(args),
        Function::Closure(closure) => {
            if args.len() != closure.arity() {
                return Err(EvalError::IncorrectArity {
                    name: function.name().to_owned(),
                    want: closure.arity(),
                    got: args.len(),
                });
            }

            let env = Environment::with_enclosed(&closure.env);
            for (parameter, arg) in closure.literal.parameters.iter().zip(args) {
                env.declare(&parameter.value, arg)?;
            }

            match eval_chunk(&closure.literal.body, &env)? {
                Flow::Return(value) => Ok(value),
                Flow::Continue(_) => Ok(Object::Null),
            }
        }
    }
}
