//! Workflow templates and the resolved commands built from them
//!
//! A [`workflow::Workflow`] is the validated form of one YAML document. The template builder
//! merges its declared variables with caller overrides, checks that every reference has a
//! binding and produces a [`template::ResolvedCommand`] ready for the execution boundary.
//!
//! Arguments that look like filesystem paths are rewritten to the host separator on the way
//! out; flags and short options pass through untouched.

pub mod overrides;
pub mod path;
pub mod template;
pub mod workflow;
