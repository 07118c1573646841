use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Ast, ExprId, Scope},
        expressions::{ArrayExpr, Expr, VarExpr},
        statements::Program,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{
    config::ResolverConfig,
    symbols::{DeferredCall, SymbolTable, TypeInfo, TypeKind},
};

/// A scalar variable reference awaiting its index.
#[derive(Debug, Clone)]
pub struct VariableReference {
    pub function: Option<String>,
    pub expr: ExprId,
}

/// An array reference awaiting its index.
#[derive(Debug, Clone)]
pub struct ArrayReference {
    pub function: Option<String>,
    pub expr: ExprId,
}

/// A call to a user function awaiting validation and binding.
#[derive(Debug, Clone)]
pub struct CallSite {
    pub name: String,
    pub arg_count: usize,
    pub position: Position,
    pub call: ExprId,
}

/// Resolution context for a single program.
///
/// Created before the tree is built, fed every reference and call site as the
/// parser meets them, then consumed once by [`Resolver::resolve`].
#[derive(Debug)]
pub struct Resolver {
    config: ResolverConfig,
    symbols: SymbolTable,
    /// Function name to ordinal in `Program::functions`
    functions: HashMap<String, usize>,
    var_refs: Vec<VariableReference>,
    array_refs: Vec<ArrayReference>,
    user_calls: Vec<CallSite>,
    /// Validated call sites and the ordinals they bind to
    call_bindings: Vec<(ExprId, usize)>,
    /// Function whose body is being built, with its parameter names
    function: Option<(String, HashSet<String>)>,
}

impl Resolver {
    pub fn new(config: ResolverConfig, ast: &mut Ast) -> Self {
        let mut resolver = Resolver {
            config,
            symbols: SymbolTable::new(),
            functions: HashMap::new(),
            var_refs: vec![],
            array_refs: vec![],
            user_calls: vec![],
            call_bindings: vec![],
            function: None,
        };
        // The interpreter relies on ARGV being present
        resolver.array_ref(ast, "ARGV");
        resolver
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn array_refs(&self) -> &[ArrayReference] {
        &self.array_refs
    }

    pub fn user_calls(&self) -> &[CallSite] {
        &self.user_calls
    }

    /// Opens a function body: until [`Resolver::stop_function`], names in
    /// `params` resolve to locals of `name`.
    pub fn start_function(&mut self, name: &str, params: &[String]) {
        self.symbols.add_function(name);
        self.function = Some((name.to_string(), params.iter().cloned().collect()));
    }

    pub fn stop_function(&mut self) {
        self.function = None;
    }

    pub fn current_function(&self) -> Option<&str> {
        self.function.as_ref().map(|(name, _)| name.as_str())
    }

    pub fn add_function(&mut self, name: &str, index: usize) {
        self.functions.insert(name.to_string(), index);
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Scope of `name` at the current point of the walk, plus the owning
    /// function for locals. Parameters shadow special variables, which
    /// shadow globals.
    pub fn scope_of(&self, name: &str) -> (Scope, Option<String>) {
        if let Some((function, params)) = &self.function {
            if params.contains(name) {
                return (Scope::Local(function.clone()), Some(function.clone()));
            }
        }
        if (self.config.special_var_index)(name) > 0 {
            (Scope::Special, None)
        } else {
            (Scope::Global, None)
        }
    }

    /// Records a scalar use of `name` and returns its (not yet indexed) node.
    pub fn var_ref(&mut self, ast: &mut Ast, name: &str) -> ExprId {
        let (scope, function) = self.scope_of(name);
        let expr = ast.alloc(Expr::Var(VarExpr {
            scope: scope.clone(),
            index: 0,
            name: name.to_string(),
        }));
        self.var_refs.push(VariableReference {
            function: function.clone(),
            expr,
        });
        if self.symbols.kind(function.as_deref(), name) == TypeKind::Unknown {
            self.symbols.insert(
                function.as_deref(),
                name,
                TypeInfo::new(TypeKind::Scalar, Some(expr), scope),
            );
        }
        expr
    }

    /// Records an array use of `name` and returns its (not yet indexed) node.
    pub fn array_ref(&mut self, ast: &mut Ast, name: &str) -> ExprId {
        let (scope, function) = self.scope_of(name);
        let expr = ast.alloc(Expr::Array(ArrayExpr {
            scope: scope.clone(),
            index: 0,
            name: name.to_string(),
        }));
        self.array_refs.push(ArrayReference {
            function: function.clone(),
            expr,
        });
        if self.symbols.kind(function.as_deref(), name) == TypeKind::Unknown {
            self.symbols.insert(
                function.as_deref(),
                name,
                TypeInfo::new(TypeKind::Array, None, scope),
            );
        }
        expr
    }

    /// Logs a call to a user function so it can be bound once every function
    /// has been declared.
    pub fn record_user_call(&mut self, ast: &Ast, call: ExprId, position: Position) {
        if let Some(user_call) = ast.get(call).and_then(Expr::as_user_call) {
            self.user_calls.push(CallSite {
                name: user_call.name.clone(),
                arg_count: user_call.args.len(),
                position,
                call,
            });
        }
    }

    /// A bare variable passed to a user function says nothing about its own
    /// kind. If this argument is the variable's first mention, its kind is
    /// deferred to the callee's parameter at `arg_index`.
    pub fn process_user_call_arg(&mut self, ast: &Ast, callee: &str, arg: ExprId, arg_index: usize) {
        let Some(var) = ast.get(arg).and_then(Expr::as_var) else {
            return;
        };
        let Some(info) = self.symbols.get_mut(var.scope.function(), &var.name) else {
            return;
        };
        if info.first_reference == Some(arg) {
            trace!(name = %var.name, callee, arg_index, "deferring variable type");
            info.kind = TypeKind::Unknown;
            info.deferred_call = Some(DeferredCall {
                callee: callee.to_string(),
                arg_index,
            });
        }
    }

    /// Runs every resolution phase in order. On error neither the tree nor
    /// `program` has been written, and the caller should discard the attempt.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn resolve(&mut self, ast: &mut Ast, program: &mut Program) -> Result<(), Error> {
        self.resolve_user_calls(program)?;
        self.resolve_types(program)?;
        self.bind_user_calls(ast);
        self.assign_global_indexes(program);
        self.assign_local_indexes(program);
        if self.config.debug_types {
            debug!(types = %self.symbols, "resolved variable types");
        }
        self.patch_references(ast);
        Ok(())
    }

    /// Looks up every call site's function ordinal, checking the callee
    /// exists and is not given more arguments than it declares. Call nodes
    /// are only written by [`Resolver::bind_user_calls`].
    pub fn resolve_user_calls(&mut self, program: &Program) -> Result<(), Error> {
        let mut bindings = Vec::with_capacity(self.user_calls.len());
        for call in self.user_calls.iter() {
            let index = *self.functions.get(&call.name).ok_or_else(|| {
                Error::new(
                    ErrorImpl::UndefinedFunction {
                        function: call.name.clone(),
                    },
                    call.position.clone(),
                )
            })?;
            let declared = program.functions.get(index).map_or(0, |f| f.params.len());
            if call.arg_count > declared {
                return Err(Error::new(
                    ErrorImpl::TooManyArguments {
                        function: call.name.clone(),
                        expected: declared,
                        received: call.arg_count,
                    },
                    call.position.clone(),
                ));
            }
            bindings.push((call.call, index));
        }

        debug!(calls = bindings.len(), "resolved user calls");
        self.call_bindings = bindings;
        Ok(())
    }

    /// Writes the ordinals found by [`Resolver::resolve_user_calls`] into the
    /// call nodes.
    pub fn bind_user_calls(&self, ast: &mut Ast) {
        for &(call, index) in self.call_bindings.iter() {
            if let Some(Expr::UserCall(user_call)) = ast.get_mut(call) {
                user_call.index = Some(index);
            }
        }
    }

    /// Propagates parameter kinds back to the variables passed as bare
    /// arguments, until a full pass makes no progress. Whatever is still
    /// unknown afterwards is never constrained and ends up a scalar.
    pub fn resolve_types(&mut self, program: &Program) -> Result<(), Error> {
        let mut passes = 0;
        loop {
            passes += 1;
            let mut progressed = false;
            for (owner, name) in self.symbols.pending() {
                let Some(call) = self
                    .symbols
                    .get(owner.as_deref(), &name)
                    .and_then(|info| info.deferred_call.clone())
                else {
                    continue;
                };
                let kind = self.param_kind(program, &call);
                if kind != TypeKind::Unknown {
                    trace!(name = %name, function = ?owner, %kind, "inferred from call");
                    if let Some(info) = self.symbols.get_mut(owner.as_deref(), &name) {
                        info.kind = kind;
                    }
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
            if passes > self.config.max_resolve_iterations {
                return Err(Error::new(
                    ErrorImpl::TypeResolutionDivergence {
                        iterations: self.config.max_resolve_iterations,
                    },
                    Position::null(),
                ));
            }
        }
        debug!(passes, "resolved variable types");
        Ok(())
    }

    fn param_kind(&self, program: &Program, call: &DeferredCall) -> TypeKind {
        let param = self
            .functions
            .get(&call.callee)
            .and_then(|&index| program.functions.get(index))
            .and_then(|function| function.params.get(call.arg_index));
        match param {
            Some(param) => self.symbols.kind(Some(&call.callee), param),
            None => TypeKind::Unknown,
        }
    }

    /// Gives each global a slot in `program.scalars` or `program.arrays`;
    /// special variables keep their fixed index. Slot order follows table
    /// iteration order and carries no meaning.
    pub fn assign_global_indexes(&mut self, program: &mut Program) {
        let mut scalars = HashMap::new();
        let mut arrays = HashMap::new();
        let special_var_index = self.config.special_var_index;
        for (name, info) in self.symbols.globals_mut().iter_mut() {
            info.index = if info.scope == Scope::Special {
                special_var_index(name)
            } else if info.kind == TypeKind::Array {
                let index = arrays.len();
                arrays.insert(name.clone(), index);
                index
            } else {
                info.kind = TypeKind::Scalar;
                let index = scalars.len();
                scalars.insert(name.clone(), index);
                index
            };
        }
        debug!(
            scalars = scalars.len(),
            arrays = arrays.len(),
            "assigned global indexes"
        );
        program.scalars = scalars;
        program.arrays = arrays;
    }

    /// Numbers each function's parameters in declaration order, scalars and
    /// arrays counted separately, and fills in `Function::arrays`. Parameters
    /// never referenced default to scalars.
    pub fn assign_local_indexes(&mut self, program: &mut Program) {
        for function in program.functions.iter_mut() {
            let scope = self.symbols.function_scope_mut(&function.name);
            let mut scalar_index = 0;
            let mut array_index = 0;
            let mut arrays = vec![false; function.params.len()];
            for (i, param) in function.params.iter().enumerate() {
                let info = scope.entry(param.clone()).or_insert_with(|| {
                    TypeInfo::new(TypeKind::Unknown, None, Scope::Local(function.name.clone()))
                });
                if info.kind == TypeKind::Array {
                    info.index = array_index;
                    array_index += 1;
                    arrays[i] = true;
                } else {
                    info.kind = TypeKind::Scalar;
                    info.index = scalar_index;
                    scalar_index += 1;
                }
            }
            trace!(function = %function.name, scalars = scalar_index, arrays = array_index, "assigned local indexes");
            function.arrays = arrays;
        }
        debug!(functions = program.functions.len(), "assigned local indexes");
    }

    /// Writes the final index into every recorded variable and array node.
    pub fn patch_references(&self, ast: &mut Ast) {
        for var_ref in self.var_refs.iter() {
            if let Some(Expr::Var(var)) = ast.get_mut(var_ref.expr) {
                if let Some(info) = self.symbols.get(var_ref.function.as_deref(), &var.name) {
                    var.index = info.index;
                }
            }
        }
        for array_ref in self.array_refs.iter() {
            if let Some(Expr::Array(array)) = ast.get_mut(array_ref.expr) {
                if let Some(info) = self.symbols.get(array_ref.function.as_deref(), &array.name) {
                    array.index = info.index;
                }
            }
        }
        debug!(
            scalars = self.var_refs.len(),
            arrays = self.array_refs.len(),
            "patched references"
        );
    }

    /// Per-scope listing of every variable's type facts, for debugging.
    pub fn dump_types(&self) -> String {
        self.symbols.to_string()
    }
}
