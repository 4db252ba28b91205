mod array;
mod dictionary;
mod math;
mod string;

use crate::environment::Environment;
use crate::object::*;
use crate::program;
use lazy_static::lazy_static;
use std::convert::TryFrom;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

/// Natives grouped under a namespace dictionary: key, qualified name, function.
type Namespace = &'static [(&'static str, &'static str, NativeFn)];

lazy_static! {
    static ref STARTED: Instant = Instant::now();
}

const GLOBALS: &[(&str, NativeFn)] = &[
    ("out", out),
    ("in", input),
    ("type", type_of),
    ("exit", exit),
    ("time", time),
];

const NAMESPACES: &[(&str, Namespace)] = &[
    ("math", math::FUNCTIONS),
    ("str", string::FUNCTIONS),
    ("arr", array::FUNCTIONS),
    ("dict", dictionary::FUNCTIONS),
];

/// Builds a root scope with the constants, global natives and namespaces. `require` resolves
/// paths against `base_dir`, or the working directory when there is none.
pub fn global_environment(base_dir: Option<PathBuf>) -> Result<Environment> {
    lazy_static::initialize(&STARTED);
    let base_dir = base_dir.unwrap_or_default();

    let mut bindings: Vec<(String, Object)> = vec![
        ("null".to_owned(), Object::Null),
        ("true".to_owned(), Object::Bool(true)),
        ("false".to_owned(), Object::Bool(false)),
        (
            "require".to_owned(),
            Builtin::new("require", move |args| require(&base_dir, args)).into(),
        ),
    ];

    for &(name, func) in GLOBALS {
        bindings.push((name.to_owned(), Builtin::from((name, func)).into()));
    }
    for &(name, functions) in NAMESPACES {
        bindings.push((name.to_owned(), namespace(functions)?));
    }

    Environment::from_bindings(bindings)
}

fn namespace(functions: Namespace) -> Result<Object> {
    DictionaryValue::from_pairs(
        functions
            .iter()
            .map(|&(key, name, func)| (Object::from(key), Builtin::from((name, func)).into())),
    )
    .map(Object::Dictionary)
}

fn arity(name: &str, want: usize, args: &[Object]) -> EvalError {
    EvalError::IncorrectArity {
        name: name.to_owned(),
        want,
        got: args.len(),
    }
}

fn check_arity(name: &str, want: usize, args: &[Object]) -> Result<()> {
    if args.len() == want {
        Ok(())
    } else {
        Err(arity(name, want, args))
    }
}

fn unsupported(fn_name: &'static str, arg: &Object) -> EvalError {
    EvalError::UnsupportedArgType {
        fn_name,
        type_name: arg.type_name(),
    }
}

fn count(n: usize) -> Object {
    Object::Integer(i32::try_from(n).unwrap_or(i32::MAX))
}

fn out(args: Vec<Object>) -> Result<Object> {
    let words: Vec<String> = args.iter().map(Object::to_string).collect();
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", words.join(" "))?;

    Ok(Object::Null)
}

fn input(args: Vec<Object>) -> Result<Object> {
    check_arity("in", 0, &args)?;
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;

    Ok(line.trim_end_matches(&['\r', '\n'][..]).into())
}

fn type_of(args: Vec<Object>) -> Result<Object> {
    match args.as_slice() {
        [value] => Ok(value.type_name().into()),
        _ => Err(arity("type", 1, &args)),
    }
}

fn exit(args: Vec<Object>) -> Result<Object> {
    let code = match args.as_slice() {
        [] => 0,
        [Object::Integer(code)] => *code,
        [other] => return Err(unsupported("exit", other)),
        _ => return Err(arity("exit", 1, &args)),
    };

    process::exit(code)
}

fn time(args: Vec<Object>) -> Result<Object> {
    check_arity("time", 0, &args)?;

    let elapsed = STARTED.elapsed().as_millis();
    Ok(Object::Integer(i32::try_from(elapsed).unwrap_or(i32::MAX)))
}

fn require(base_dir: &Path, args: Vec<Object>) -> Result<Object> {
    match args.as_slice() {
        [Object::String(path)] => program::load_module(&base_dir.join(path)),
        [other] => Err(unsupported("require", other)),
        _ => Err(arity("require", 1, &args)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn call(function: NativeFn, args: Vec<Object>) -> Result<Object> {
        function(args)
    }

    #[test]
    fn test_global_bindings() {
        let env = global_environment(None).unwrap();

        let cases = vec![
            ("null", "null"),
            ("true", "true"),
            ("false", "false"),
            ("out", "builtin function out"),
            ("in", "builtin function in"),
            ("require", "builtin function require"),
            ("time", "builtin function time"),
        ];

        for (name, expected) in cases.into_iter() {
            assert_eq!(env.get(name).unwrap().to_string(), expected);
        }

        for name in ["math", "str", "arr", "dict"].iter() {
            assert_eq!(env.get(name).unwrap().type_name(), "dictionary");
        }
    }

    #[test]
    fn test_namespace_members() {
        let env = global_environment(None).unwrap();
        let math = match env.get("math").unwrap() {
            Object::Dictionary(dict) => dict,
            other => panic!("expected dictionary, got {}", other),
        };

        let keys: Vec<String> = math.keys().map(Object::to_string).collect();
        assert_eq!(keys, vec!["abs", "sin", "cos", "tan"]);
        assert_eq!(
            math.get_named("abs").map(Object::to_string),
            Some("builtin function math.abs".to_owned())
        );
    }

    #[test]
    fn test_roots_are_independent() {
        let first = global_environment(None).unwrap();
        let second = global_environment(None).unwrap();

        assert!(!first.ptr_eq(&second));
        assert!(Environment::with_enclosed(&first)
            .declare("null", Object::Integer(0))
            .is_ok());
        assert_eq!(second.get("null"), Ok(Object::Null));
    }

    #[test]
    fn test_type_of() {
        let cases = vec![
            (Object::Null, "null"),
            (Object::Integer(1), "integer"),
            (Object::Float(1.5), "float"),
            (Object::from("s"), "string"),
            (Object::Bool(true), "bool"),
            (Object::array(vec![]), "array"),
            (Object::from(DictionaryValue::new()), "dictionary"),
        ];

        for (value, expected) in cases.into_iter() {
            assert_eq!(call(type_of, vec![value]), Ok(expected.into()));
        }
    }

    #[test]
    fn test_arity_errors() {
        let cases: Vec<(NativeFn, Vec<Object>, &str, usize)> = vec![
            (type_of, vec![], "type", 1),
            (type_of, vec![Object::Null, Object::Null], "type", 1),
            (time, vec![Object::Null], "time", 0),
            (input, vec![Object::Null], "in", 0),
            (exit, vec![Object::Null, Object::Null], "exit", 1),
        ];

        for (function, args, name, want) in cases.into_iter() {
            let got = args.len();
            assert_eq!(
                call(function, args),
                Err(EvalError::IncorrectArity {
                    name: name.to_owned(),
                    want,
                    got,
                })
            );
        }
    }

    #[test]
    fn test_unsupported_arguments() {
        assert_eq!(
            call(exit, vec![Object::from("0")]),
            Err(EvalError::UnsupportedArgType {
                fn_name: "exit",
                type_name: "string",
            })
        );

        let loader = Builtin::new("require", |args| require(Path::new("."), args));
        assert_eq!(
            loader.call(vec![Object::Integer(1)]),
            Err(EvalError::UnsupportedArgType {
                fn_name: "require",
                type_name: "integer",
            })
        );
    }

    #[test]
    fn test_time_is_monotonic() {
        let first = call(time, vec![]).unwrap();
        let second = call(time, vec![]).unwrap();

        match (first, second) {
            (Object::Integer(a), Object::Integer(b)) => assert!(0 <= a && a <= b),
            other => panic!("expected integers, got {:?}", other),
        }
    }

    #[test]
    fn test_out_returns_null() {
        assert_eq!(
            call(out, vec![Object::from("hello"), Object::Integer(1)]),
            Ok(Object::Null)
        );
    }
}
