use super::ast::{ExprId, Scope};

/// Binary operators. The resolver never inspects them; they only exist so
/// callers can build realistic trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Concat,
    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    And,
    Or,
}

/// Scalar variable reference.
///
/// `index` is zero until the resolver patches it.
#[derive(Debug, Clone, PartialEq)]
pub struct VarExpr {
    pub scope: Scope,
    pub index: usize,
    pub name: String,
}

/// Array variable reference (the bare array name, without a subscript).
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpr {
    pub scope: Scope,
    pub index: usize,
    pub name: String,
}

/// Call of a user-defined function.
///
/// `index` is the ordinal of the callee in `Program::functions`, filled in
/// once every call site has been validated.
#[derive(Debug, Clone, PartialEq)]
pub struct UserCallExpr {
    pub name: String,
    pub args: Vec<ExprId>,
    pub index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    Str(String),
    /// `$expr`
    Field(ExprId),
    Var(VarExpr),
    Array(ArrayExpr),
    /// `array[index, ...]`, where `array` is an [`Expr::Array`] node
    Index {
        array: ExprId,
        index: Vec<ExprId>,
    },
    /// `(index, ...) in array`
    In {
        index: Vec<ExprId>,
        array: ExprId,
    },
    Assign {
        left: ExprId,
        right: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    UserCall(UserCallExpr),
}

impl Expr {
    pub fn as_var(&self) -> Option<&VarExpr> {
        match self {
            Expr::Var(var) => Some(var),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayExpr> {
        match self {
            Expr::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_user_call(&self) -> Option<&UserCallExpr> {
        match self {
            Expr::UserCall(call) => Some(call),
            _ => None,
        }
    }
}
