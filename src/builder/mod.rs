//! Tree construction surface for the parser.
//!
//! The parser itself lives elsewhere; it calls into [`builder::ProgramBuilder`]
//! to allocate nodes, declare functions and report references.

pub mod builder;
