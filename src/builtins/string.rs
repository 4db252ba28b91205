use super::{arity, count, unsupported, Namespace};
use crate::object::{Object, Result};

pub const FUNCTIONS: Namespace = &[("length", "str.length", length)];

/// Counts characters, not bytes.
fn length(args: Vec<Object>) -> Result<Object> {
    match args.as_slice() {
        [Object::String(s)] => Ok(count(s.chars().count())),
        [other] => Err(unsupported("str.length", other)),
        _ => Err(arity("str.length", 1, &args)),
    }
}
