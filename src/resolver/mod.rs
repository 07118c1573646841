//! Variable and call resolution.
//!
//! AWK programs never declare variable types or scopes. This module works
//! them out from usage once the whole tree has been built:
//!
//! - Binding user function calls to function ordinals and checking arity
//! - Inferring scalar or array kind, following bare arguments into callees
//! - Assigning dense indexes to globals and to each function's parameters
//! - Patching the final indexes back into the tree
//!
//! The [`resolver::Resolver`] context is created per program and discarded
//! once resolution finishes.

pub mod config;
pub mod resolver;
pub mod specials;
pub mod symbols;

#[cfg(test)]
mod tests;
