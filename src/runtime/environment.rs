use std::fmt;
use std::sync::Arc;

use crate::runtime::Value;

/// Persistent variable environment
///
/// An environment is a handle to the newest binding of an immutable chain.
/// [`Environment::define`] returns a new handle and leaves the receiver
/// untouched, so cloning a handle is an O(1) snapshot and reassigning it is an
/// O(1) restore. Later definitions shadow earlier ones.
#[derive(Clone, Default)]
pub struct Environment {
    head: Option<Arc<Binding>>,
}

struct Binding {
    identifier: String,
    value: Value,
    parent: Environment,
}

impl Environment {
    /// The empty root environment
    pub fn empty() -> Self {
        Environment { head: None }
    }

    /// Same as [`Environment::empty`]
    pub fn new() -> Self {
        Self::empty()
    }

    /// Returns an environment extending `self` with `identifier = value`
    #[must_use]
    pub fn define(&self, identifier: impl Into<String>, value: Value) -> Environment {
        Environment {
            head: Some(Arc::new(Binding {
                identifier: identifier.into(),
                value,
                parent: self.clone(),
            })),
        }
    }

    /// Nearest value bound to `identifier`
    pub fn lookup(&self, identifier: &str) -> Option<&Value> {
        self.iter()
            .find(|(name, _)| *name == identifier)
            .map(|(_, value)| value)
    }

    /// Checks if `identifier` is bound anywhere in the chain
    pub fn is_defined(&self, identifier: &str) -> bool {
        self.lookup(identifier).is_some()
    }

    /// The environment this one extends, `None` for the root
    pub fn parent(&self) -> Option<&Environment> {
        self.head.as_ref().map(|binding| &binding.parent)
    }

    /// Bindings from the newest to the oldest, shadowed ones included
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Number of bindings in the chain
    pub fn depth(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Whether both handles point at the same binding
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Drop for Environment {
    // Unlink uniquely owned bindings one at a time instead of recursing
    // through the whole chain.
    fn drop(&mut self) {
        let mut head = self.head.take();
        while let Some(binding) = head {
            match Arc::try_unwrap(binding) {
                Ok(mut binding) => head = binding.parent.head.take(),
                Err(_) => break,
            }
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter())
            .finish()
    }
}

/// Iterator returned by [`Environment::iter`]
pub struct Iter<'a> {
    next: Option<&'a Binding>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let binding = self.next?;
        self.next = binding.parent.head.as_deref();
        Some((&binding.identifier, &binding.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_define_and_lookup() {
        let env = Environment::empty().define("x", Value::Number(42.0));
        assert_eq!(env.lookup("x"), Some(&Value::Number(42.0)));
        assert!(env.is_defined("x"));
    }

    #[test]
    fn test_undefined_variable() {
        let env = Environment::empty();
        assert_eq!(env.lookup("undefined"), None);
        assert!(env.is_empty());
        assert!(env.parent().is_none());
    }

    #[test]
    fn test_define_leaves_original_untouched() {
        let base = Environment::empty().define("x", Value::Number(1.0));
        let extended = base.define("y", Value::Number(2.0));

        assert_eq!(base.lookup("y"), None);
        assert_eq!(extended.lookup("x"), Some(&Value::Number(1.0)));
        assert!(extended.parent().unwrap().ptr_eq(&base));
    }

    #[test]
    fn test_shadowing() {
        let env = Environment::empty()
            .define("x", Value::Number(1.0))
            .define("y", Value::from("y"))
            .define("x", Value::Number(2.0));

        assert_eq!(env.lookup("x"), Some(&Value::Number(2.0)));
        assert_eq!(env.depth(), 3);
        let names: Vec<&str> = env.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["x", "y", "x"]);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut env = Environment::empty().define("x", Value::Number(1.0));
        let snapshot = env.clone();
        env = env.define("x", Value::Number(9.0));
        assert_eq!(env.lookup("x"), Some(&Value::Number(9.0)));

        env = snapshot.clone();
        assert!(env.ptr_eq(&snapshot));
        assert_eq!(env.lookup("x"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_long_chain_drops() {
        let mut env = Environment::empty();
        for i in 0..200_000 {
            env = env.define("i", Value::Number(i as f64));
        }
        assert_eq!(env.lookup("i"), Some(&Value::Number(199_999.0)));
        drop(env);
    }
}
