//! Error types raised while resolving a program.
//!
//! Every error carries the source position of the construct that caused it
//! so the caller can format a diagnostic. Nothing here prints anything.
//!
//! - Call-site errors (undefined function, too many arguments)
//! - Declaration errors reported by the tree builder
//! - Type inference failing to reach a fixed point

pub mod errors;
