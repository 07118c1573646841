use std::{fmt, ops::Index};

use super::expressions::Expr;

/// Expression Handle
///
/// Stable index of an expression node inside an [`Ast`]. Handles are handed
/// out as nodes are allocated and stay valid for the lifetime of the arena,
/// so the resolver can record a reference now and write its index later.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub u32);

impl ExprId {
    pub const fn from_raw(raw: u32) -> Self {
        ExprId(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Variable Scope
///
/// Where a variable lives at runtime. Locals are tagged with the function
/// that declares them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Local(String),
    Special,
}

impl Scope {
    /// Name of the function owning this scope, `None` for globals and specials.
    pub fn function(&self) -> Option<&str> {
        match self {
            Scope::Local(function) => Some(function),
            _ => None,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "Global"),
            Scope::Local(_) => write!(f, "Local"),
            Scope::Special => write!(f, "Special"),
        }
    }
}

/// Expression Arena
///
/// Owns every expression node of a program. Statements and parent nodes
/// refer to children by [`ExprId`].
#[derive(Debug, Default)]
pub struct Ast {
    exprs: Vec<Expr>,
}

impl Ast {
    pub fn new() -> Self {
        Ast { exprs: vec![] }
    }

    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::from_raw(self.exprs.len() as u32);
        self.exprs.push(expr);
        id
    }

    pub fn get(&self, id: ExprId) -> Option<&Expr> {
        self.exprs.get(id.to_raw() as usize)
    }

    pub fn get_mut(&mut self, id: ExprId) -> Option<&mut Expr> {
        self.exprs.get_mut(id.to_raw() as usize)
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Iterates all nodes together with their handles, in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (ExprId, &Expr)> {
        self.exprs
            .iter()
            .enumerate()
            .map(|(i, expr)| (ExprId::from_raw(i as u32), expr))
    }
}

impl Index<ExprId> for Ast {
    type Output = Expr;

    fn index(&self, id: ExprId) -> &Self::Output {
        &self.exprs[id.to_raw() as usize]
    }
}
