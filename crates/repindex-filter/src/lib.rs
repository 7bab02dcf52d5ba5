//! Repindex Filter - scoping views over replicated objects
//!
//! A [`ViewFilter`] compiles a view's scope into a SQL predicate over the
//! replicated-object table (alias `R`) and its annotations (alias `A`),
//! together with the named parameters that predicate binds.

mod builder;
mod filter;
pub mod params;
mod scope;

pub use builder::ViewFilterBuilder;
pub use filter::ViewFilter;
pub use params::{ParameterMap, ParameterValue};
pub use scope::FilterScope;
