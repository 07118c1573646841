#![allow(clippy::module_inception)]

//! Name resolution for an AWK-style scripting language.
//!
//! The upstream parser reports every variable reference and user function
//! call to a [`resolver::resolver::Resolver`] while it builds the tree. Once
//! the tree is complete the resolver binds calls to function ordinals, infers
//! which names are arrays and which are scalars (following arguments through
//! user function calls), and gives every variable a dense index so the
//! interpreter never looks anything up by name.

use std::rc::Rc;

pub mod ast;
pub mod builder;
pub mod errors;
pub mod resolver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }

    pub fn is_null(&self) -> bool {
        self.0 == 0 && self.1.as_str() == "<null>"
    }
}
