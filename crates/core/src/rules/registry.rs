//! Named rule registry and executor.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::error::ConfigError;
use crate::value::FieldValue;

/// Whether a rule takes a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// `name` only; `name=param` is a configuration error.
    None,
    /// `name=param`; a bare `name` is a configuration error.
    Required,
    /// Either form.
    Optional,
}

/// What a rule function receives besides the value.
#[derive(Debug, Clone, Copy)]
pub struct RuleArgs<'p> {
    /// Name the rule was invoked under.
    pub rule: &'p str,
    /// Parameter text, `""` when none was given.
    pub param: &'p str,
}

/// A rule function: `Ok(true)` passes, `Ok(false)` is a violation, `Err` is
/// a configuration error such as a domain mismatch.
pub type Predicate =
    Arc<dyn Fn(&FieldValue<'_>, &RuleArgs<'_>) -> Result<bool, ConfigError> + Send + Sync>;

/// A registered rule.
#[derive(Clone)]
pub struct RuleDef {
    name: String,
    arity: Arity,
    predicate: Predicate,
}

impl RuleDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub(crate) fn check_arity(&self, param: Option<&str>) -> Result<(), ConfigError> {
        match (self.arity, param) {
            (Arity::Required, None) => Err(ConfigError::MissingParam {
                rule: self.name.clone(),
            }),
            (Arity::None, Some(param)) => Err(ConfigError::UnexpectedParam {
                rule: self.name.clone(),
                param: param.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for RuleDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDef")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Collects rules before the registry is frozen.
#[derive(Debug, Default)]
pub struct RuleRegistryBuilder {
    rules: HashMap<String, RuleDef>,
}

impl RuleRegistryBuilder {
    /// A builder with no rules at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register `predicate` under `name`, replacing any earlier rule of that
    /// name.
    pub fn register<F>(mut self, name: &str, arity: Arity, predicate: F) -> Self
    where
        F: Fn(&FieldValue<'_>, &RuleArgs<'_>) -> Result<bool, ConfigError> + Send + Sync + 'static,
    {
        let def = RuleDef {
            name: name.to_string(),
            arity,
            predicate: Arc::new(predicate),
        };
        if self.rules.insert(name.to_string(), def).is_some() {
            tracing::debug!(rule = %name, "Replaced previously registered rule");
        }
        self
    }

    /// Freeze the rule set. The result cannot be extended.
    pub fn build(self) -> RuleRegistry {
        RuleRegistry {
            rules: Arc::new(self.rules),
        }
    }
}

static GLOBAL: LazyLock<RuleRegistry> = LazyLock::new(|| RuleRegistry::builder().build());

/// Immutable set of named rules. Cloning shares the same rules.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Arc<HashMap<String, RuleDef>>,
}

impl RuleRegistry {
    /// A builder pre-loaded with every built-in rule.
    pub fn builder() -> RuleRegistryBuilder {
        super::builtin::register(RuleRegistryBuilder::empty())
    }

    /// Process-wide registry holding the built-in rules.
    pub fn global() -> &'static RuleRegistry {
        &GLOBAL
    }

    /// Find a rule by name.
    pub fn lookup(&self, name: &str) -> Result<&RuleDef, ConfigError> {
        self.rules.get(name).ok_or_else(|| ConfigError::UnknownRule {
            rule: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered rule names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run the rule `name` against `value`.
    ///
    /// Unknown rules, arity mismatches and domain mismatches are returned as
    /// [`ConfigError`]s; `Ok(false)` means the value broke the rule.
    pub fn execute(
        &self,
        name: &str,
        value: &FieldValue<'_>,
        param: Option<&str>,
    ) -> Result<bool, ConfigError> {
        let def = self.lookup(name)?;
        def.check_arity(param)?;

        let args = RuleArgs {
            rule: name,
            param: param.unwrap_or_default(),
        };
        (def.predicate)(value, &args)
    }
}
