use super::{arity, count, unsupported, Namespace};
use crate::evaluator::apply_function;
use crate::object::{Object, Result};

pub const FUNCTIONS: Namespace = &[("length", "arr.length", length), ("map", "arr.map", map)];

fn length(args: Vec<Object>) -> Result<Object> {
    match args.as_slice() {
        [Object::Array(elements)] => Ok(count(elements.len())),
        [other] => Err(unsupported("arr.length", other)),
        _ => Err(arity("arr.length", 1, &args)),
    }
}

/// Applies a native or interpreted function to every element, in order.
fn map(args: Vec<Object>) -> Result<Object> {
    match args.as_slice() {
        [Object::Array(elements), Object::Function(function)] => elements
            .iter()
            .map(|element| apply_function(function, vec![element.clone()]))
            .collect::<Result<Vec<_>>>()
            .map(Object::array),
        [Object::Array(_), other] | [other, _] => Err(unsupported("arr.map", other)),
        _ => Err(arity("arr.map", 2, &args)),
    }
}
