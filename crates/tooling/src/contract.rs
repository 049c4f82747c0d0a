use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Default for a declared argument: either a literal value or a deriver
/// invoked at dispatch time (e.g. resolve a path against a configured base).
#[derive(Clone)]
pub enum ArgDefault {
    Value(Value),
    Derived(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl ArgDefault {
    pub fn resolve(&self) -> Value {
        match self {
            ArgDefault::Value(value) => value.clone(),
            ArgDefault::Derived(deriver) => deriver(),
        }
    }
}

impl fmt::Debug for ArgDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgDefault::Value(value) => f.debug_tuple("Value").field(value).finish(),
            ArgDefault::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArgSpec {
    pub required: bool,
    pub default: Option<ArgDefault>,
}

/// Declared argument schema for one tool, validated before its handler runs.
///
/// Policy on undeclared keys is strict rejection: an argument the contract
/// does not declare fails the dispatch instead of being silently ignored.
#[derive(Debug, Clone, Default)]
pub struct ArgContract {
    args: Vec<(String, ArgSpec)>,
}

impl ArgContract {
    pub fn new() -> Self {
        Self::default()
    }

    /// Argument that must be supplied by the caller.
    pub fn required(mut self, name: &str) -> Self {
        self.push(name, true, None);
        self
    }

    /// Argument the handler treats as absent when not supplied.
    pub fn optional(mut self, name: &str) -> Self {
        self.push(name, false, None);
        self
    }

    /// Argument that falls back to a literal value when not supplied.
    pub fn with_default(mut self, name: &str, value: Value) -> Self {
        self.push(name, false, Some(ArgDefault::Value(value)));
        self
    }

    /// Argument that falls back to a derived value when not supplied.
    pub fn with_derived_default<F>(mut self, name: &str, deriver: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.push(name, false, Some(ArgDefault::Derived(Arc::new(deriver))));
        self
    }

    pub fn declares(&self, name: &str) -> bool {
        self.args.iter().any(|(n, _)| n == name)
    }

    /// Declared arguments in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgSpec)> {
        self.args.iter().map(|(n, s)| (n.as_str(), s))
    }

    fn push(&mut self, name: &str, required: bool, default: Option<ArgDefault>) {
        debug_assert!(!self.declares(name), "argument declared twice: {name}");
        self.args
            .push((name.to_string(), ArgSpec { required, default }));
    }
}
