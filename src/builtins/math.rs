use super::{arity, unsupported, Namespace};
use crate::object::{Object, Result};

pub const FUNCTIONS: Namespace = &[
    ("abs", "math.abs", abs),
    ("sin", "math.sin", sin),
    ("cos", "math.cos", cos),
    ("tan", "math.tan", tan),
];

fn abs(args: Vec<Object>) -> Result<Object> {
    match args.as_slice() {
        [Object::Integer(n)] => Ok(n.wrapping_abs().into()),
        [Object::Float(x)] => Ok(x.abs().into()),
        [other] => Err(unsupported("math.abs", other)),
        _ => Err(arity("math.abs", 1, &args)),
    }
}

/// Integers stay integers: the result is rounded half to even.
fn trig(name: &'static str, f: fn(f64) -> f64, args: Vec<Object>) -> Result<Object> {
    match args.as_slice() {
        [Object::Integer(n)] => Ok(Object::Integer(f(f64::from(*n)).round_ties_even() as i32)),
        [Object::Float(x)] => Ok(f(*x).into()),
        [other] => Err(unsupported(name, other)),
        _ => Err(arity(name, 1, &args)),
    }
}

fn sin(args: Vec<Object>) -> Result<Object> {
    trig("math.sin", f64::sin, args)
}

fn cos(args: Vec<Object>) -> Result<Object> {
    trig("math.cos", f64::cos, args)
}

fn tan(args: Vec<Object>) -> Result<Object> {
    trig("math.tan", f64::tan, args)
}
