use super::{arity, count, unsupported, Namespace};
use crate::object::{DictionaryValue, Object, Result};

pub const FUNCTIONS: Namespace = &[
    ("length", "dict.length", length),
    ("keys", "dict.keys", keys),
    ("values", "dict.values", values),
];

fn dictionary_arg<'a>(name: &'static str, args: &'a [Object]) -> Result<&'a DictionaryValue> {
    match args {
        [Object::Dictionary(dict)] => Ok(dict),
        [other] => Err(unsupported(name, other)),
        _ => Err(arity(name, 1, args)),
    }
}

fn length(args: Vec<Object>) -> Result<Object> {
    let dict = dictionary_arg("dict.length", &args)?;
    Ok(count(dict.len()))
}

fn keys(args: Vec<Object>) -> Result<Object> {
    let dict = dictionary_arg("dict.keys", &args)?;
    Ok(Object::array(dict.keys().cloned().collect()))
}

fn values(args: Vec<Object>) -> Result<Object> {
    let dict = dictionary_arg("dict.values", &args)?;
    Ok(Object::array(dict.values().cloned().collect()))
}
