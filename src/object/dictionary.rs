use super::{EvalError, Object, Result};
use std::fmt::{self, Display, Formatter};

/// Key/value pairs in insertion order. Keys are any values compared by equality, so lookup
/// is a linear scan.
#[derive(Debug, Clone, Default)]
pub struct DictionaryValue {
    entries: Vec<(Object, Object)>,
}

impl DictionaryValue {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Object, Object)>,
    {
        let mut dict = Self::new();
        for (key, value) in pairs {
            dict.insert(key, value)?;
        }
        Ok(dict)
    }

    pub fn insert(&mut self, key: Object, value: Object) -> Result<()> {
        if self.get(&key).is_some() {
            return Err(EvalError::DuplicateKey {
                key: key.to_string(),
            });
        }
        self.entries.push((key, value));
        Ok(())
    }

    pub fn get(&self, key: &Object) -> Option<&Object> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Lookup for `.name` access, which only matches string keys.
    pub fn get_named(&self, name: &str) -> Option<&Object> {
        self.entries
            .iter()
            .find(|(k, _)| matches!(k, Object::String(s) if s == name))
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Object> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &Object> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Two dictionaries are equal when they hold the same pairs, whatever the insertion order.
impl PartialEq for DictionaryValue {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl Display for DictionaryValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let pairs: Vec<String> = self
            .entries
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect();

        write!(f, "{{{}}}", pairs.join(", "))
    }
}
