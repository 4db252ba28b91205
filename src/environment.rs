use crate::object::{EvalError, Object, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::rc::Rc;

#[derive(Default)]
struct Scope {
    store: HashMap<String, Object>,
    outer: Option<Environment>,
}

/// Shared handle to one scope in a lexical chain. Clones refer to the same scope, so a
/// closure holding one keeps its defining scope (and every parent) alive.
#[derive(Clone, Default)]
pub struct Environment(Rc<RefCell<Scope>>);

impl Environment {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_enclosed(outer: &Environment) -> Self {
        Self(Rc::new(RefCell::new(Scope {
            store: HashMap::new(),
            outer: Some(outer.clone()),
        })))
    }

    /// A root scope holding `bindings`; a repeated name is rejected like any redeclaration.
    pub fn from_bindings<I>(bindings: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Object)>,
    {
        let env = Self::new();
        for (name, value) in bindings {
            env.declare(&name, value)?;
        }
        Ok(env)
    }

    pub fn declare(&self, name: &str, value: Object) -> Result<()> {
        let mut scope = self.0.borrow_mut();
        if scope.store.contains_key(name) {
            return Err(EvalError::AlreadyDeclared {
                name: name.to_owned(),
            });
        }
        scope.store.insert(name.to_owned(), value);
        Ok(())
    }

    /// The nearest scope, starting with this one, that binds `name`.
    pub fn resolve(&self, name: &str) -> Result<Environment> {
        let mut env = self.clone();
        loop {
            let outer = {
                let scope = env.0.borrow();
                if scope.store.contains_key(name) {
                    break;
                }
                scope.outer.clone()
            };
            env = outer.ok_or_else(|| EvalError::IdentifierNotFound {
                id: name.to_owned(),
            })?;
        }
        Ok(env)
    }

    pub fn get(&self, name: &str) -> Result<Object> {
        let env = self.resolve(name)?;
        let scope = env.0.borrow();
        scope
            .store
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::IdentifierNotFound {
                id: name.to_owned(),
            })
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// Scopes can reach themselves through closures stored in them, so only names are shown.
impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let scope = self.0.borrow();
        let mut names: Vec<&String> = scope.store.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("has_outer", &scope.outer.is_some())
            .finish()
    }
}
