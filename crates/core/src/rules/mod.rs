//! Rule registry, executor and the built-in rule set.
//!
//! Rules are plain functions dispatched by name. The registry is assembled
//! with [`RuleRegistryBuilder`] and frozen by [`RuleRegistryBuilder::build`];
//! after that it is read-only and can be shared freely between threads.

mod builtin;
mod registry;
mod sequence;

pub use registry::{Arity, Predicate, RuleArgs, RuleDef, RuleRegistry, RuleRegistryBuilder};
