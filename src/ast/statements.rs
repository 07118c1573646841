use std::collections::HashMap;

use super::ast::ExprId;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(ExprId),
    Print(Vec<ExprId>),
    /// `delete array[index, ...]`; an empty index deletes the whole array
    Delete {
        array: ExprId,
        index: Vec<ExprId>,
    },
    Return(Option<ExprId>),
}

/// Pattern–action item. A missing pattern matches every record.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub pattern: Option<ExprId>,
    pub body: Vec<Stmt>,
}

/// User-defined function.
///
/// `arrays` is written by the resolver: one flag per parameter, true when
/// the interpreter must pass that argument by reference as an array.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub arrays: Vec<bool>,
    pub body: Vec<Stmt>,
}

/// A parsed program and the global name tables the interpreter reads.
///
/// `scalars` and `arrays` only hold globals; locals and special variables
/// are addressed purely by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub begin: Vec<Vec<Stmt>>,
    pub actions: Vec<Action>,
    pub end: Vec<Vec<Stmt>>,
    pub functions: Vec<Function>,
    pub scalars: HashMap<String, usize>,
    pub arrays: HashMap<String, usize>,
}
