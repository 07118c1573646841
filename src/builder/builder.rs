//! Program builder driven by the parser.
//!
//! The builder allocates tree nodes and reports each variable reference and
//! user call to the [`Resolver`] in the order the parser meets them. Once the
//! whole program has been built, [`ProgramBuilder::resolve`] runs the
//! resolver and leaves every node indexed.

use std::collections::HashSet;

use crate::{
    ast::{
        ast::{Ast, ExprId},
        expressions::{BinaryOp, Expr, UserCallExpr},
        statements::{Action, Function, Program, Stmt},
    },
    errors::errors::{Error, ErrorImpl},
    resolver::{config::ResolverConfig, resolver::Resolver},
    Position,
};

pub struct ProgramBuilder {
    ast: Ast,
    program: Program,
    resolver: Resolver,
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        ProgramBuilder::new()
    }
}

impl ProgramBuilder {
    pub fn new() -> Self {
        ProgramBuilder::with_config(ResolverConfig::default())
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        let mut ast = Ast::new();
        let resolver = Resolver::new(config, &mut ast);
        ProgramBuilder {
            ast,
            program: Program::default(),
            resolver,
        }
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Declares a function. `body` builds the statements with the parameters
    /// in scope; the function is registered once the body is complete.
    pub fn function<F>(
        &mut self,
        name: &str,
        params: &[&str],
        position: Position,
        body: F,
    ) -> Result<(), Error>
    where
        F: FnOnce(&mut Self) -> Result<Vec<Stmt>, Error>,
    {
        if self.resolver.current_function().is_some() {
            return Err(Error::new(
                ErrorImpl::NestedFunction {
                    function: name.to_string(),
                },
                position,
            ));
        }
        if self.resolver.has_function(name) {
            return Err(Error::new(
                ErrorImpl::FunctionAlreadyDeclared {
                    function: name.to_string(),
                },
                position,
            ));
        }
        let mut seen = HashSet::new();
        for param in params {
            if !seen.insert(*param) {
                return Err(Error::new(
                    ErrorImpl::DuplicateParameter {
                        function: name.to_string(),
                        parameter: param.to_string(),
                    },
                    position,
                ));
            }
        }

        let params: Vec<String> = params.iter().map(|param| param.to_string()).collect();
        self.resolver.start_function(name, &params);
        let body = body(self);
        self.resolver.stop_function();
        let body = body?;

        let index = self.program.functions.len();
        self.program.functions.push(Function {
            name: name.to_string(),
            arrays: vec![false; params.len()],
            params,
            body,
        });
        self.resolver.add_function(name, index);
        Ok(())
    }

    pub fn begin(&mut self, body: Vec<Stmt>) {
        self.program.begin.push(body);
    }

    pub fn action(&mut self, pattern: Option<ExprId>, body: Vec<Stmt>) {
        self.program.actions.push(Action { pattern, body });
    }

    pub fn end(&mut self, body: Vec<Stmt>) {
        self.program.end.push(body);
    }

    pub fn num(&mut self, value: f64) -> ExprId {
        self.ast.alloc(Expr::Num(value))
    }

    pub fn str(&mut self, value: &str) -> ExprId {
        self.ast.alloc(Expr::Str(value.to_string()))
    }

    pub fn field(&mut self, index: ExprId) -> ExprId {
        self.ast.alloc(Expr::Field(index))
    }

    /// Scalar use of `name`.
    pub fn var(&mut self, name: &str) -> ExprId {
        self.resolver.var_ref(&mut self.ast, name)
    }

    /// Bare array name, as in `delete a` or `split(s, a)`.
    pub fn array(&mut self, name: &str) -> ExprId {
        self.resolver.array_ref(&mut self.ast, name)
    }

    /// `name[index, ...]`
    pub fn index(&mut self, name: &str, index: Vec<ExprId>) -> ExprId {
        let array = self.array(name);
        self.ast.alloc(Expr::Index { array, index })
    }

    /// `(index, ...) in name`
    pub fn in_array(&mut self, index: Vec<ExprId>, name: &str) -> ExprId {
        let array = self.array(name);
        self.ast.alloc(Expr::In { index, array })
    }

    pub fn assign(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.ast.alloc(Expr::Assign { left, right })
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.ast.alloc(Expr::Binary { op, left, right })
    }

    /// Call of user function `name`. The callee may be declared later.
    pub fn call(&mut self, name: &str, args: Vec<ExprId>, position: Position) -> ExprId {
        for (i, arg) in args.iter().enumerate() {
            self.resolver.process_user_call_arg(&self.ast, name, *arg, i);
        }
        let call = self.ast.alloc(Expr::UserCall(UserCallExpr {
            name: name.to_string(),
            args,
            index: None,
        }));
        self.resolver.record_user_call(&self.ast, call, position);
        call
    }

    pub fn resolve(&mut self) -> Result<(), Error> {
        self.resolver.resolve(&mut self.ast, &mut self.program)
    }

    /// Resolves the program and hands back the finished tree.
    pub fn finish(mut self) -> Result<(Ast, Program), Error> {
        self.resolve()?;
        Ok((self.ast, self.program))
    }
}
