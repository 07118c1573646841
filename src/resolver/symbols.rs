use std::{collections::HashMap, fmt};

use crate::ast::ast::{ExprId, Scope};

/// Inferred kind of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Unknown,
    Scalar,
    Array,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Unknown => write!(f, "Unknown"),
            TypeKind::Scalar => write!(f, "Scalar"),
            TypeKind::Array => write!(f, "Array"),
        }
    }
}

/// The variable was first seen as a bare argument to `callee`; its kind is
/// whatever the callee's parameter at `arg_index` turns out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredCall {
    pub callee: String,
    pub arg_index: usize,
}

/// Everything known about one variable name within one scope.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeInfo {
    pub kind: TypeKind,
    /// First scalar reference recorded for the name. Array uses leave this
    /// empty.
    pub first_reference: Option<ExprId>,
    pub scope: Scope,
    /// Only meaningful once indexes have been assigned.
    pub index: usize,
    pub deferred_call: Option<DeferredCall>,
}

impl TypeInfo {
    pub fn new(kind: TypeKind, first_reference: Option<ExprId>, scope: Scope) -> Self {
        TypeInfo {
            kind,
            first_reference,
            scope,
            index: 0,
            deferred_call: None,
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kind={} scope={} index={}", self.kind, self.scope, self.index)?;
        match self.first_reference {
            Some(id) => write!(f, " first_ref={:?}", id)?,
            None => write!(f, " first_ref=none")?,
        }
        match &self.deferred_call {
            Some(call) => write!(f, " deferred={}[{}]", call.callee, call.arg_index),
            None => write!(f, " deferred=none"),
        }
    }
}

/// Per-scope type facts: one table for globals (special variables included)
/// and one per user function, keyed by variable name.
///
/// Scopes are addressed by owning function name, `None` meaning globals.
#[derive(Debug, Default)]
pub struct SymbolTable {
    globals: HashMap<String, TypeInfo>,
    functions: HashMap<String, HashMap<String, TypeInfo>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn add_function(&mut self, function: &str) {
        self.functions.insert(function.to_string(), HashMap::new());
    }

    pub fn get(&self, owner: Option<&str>, name: &str) -> Option<&TypeInfo> {
        match owner {
            None => self.globals.get(name),
            Some(function) => self.functions.get(function)?.get(name),
        }
    }

    pub fn get_mut(&mut self, owner: Option<&str>, name: &str) -> Option<&mut TypeInfo> {
        match owner {
            None => self.globals.get_mut(name),
            Some(function) => self.functions.get_mut(function)?.get_mut(name),
        }
    }

    pub fn insert(&mut self, owner: Option<&str>, name: &str, info: TypeInfo) {
        let scope = match owner {
            None => &mut self.globals,
            Some(function) => self.functions.entry(function.to_string()).or_default(),
        };
        scope.insert(name.to_string(), info);
    }

    /// Kind of `name`, `Unknown` when the name has never been recorded.
    pub fn kind(&self, owner: Option<&str>, name: &str) -> TypeKind {
        self.get(owner, name)
            .map_or(TypeKind::Unknown, |info| info.kind)
    }

    pub fn globals_mut(&mut self) -> &mut HashMap<String, TypeInfo> {
        &mut self.globals
    }

    pub fn function_scope(&self, function: &str) -> Option<&HashMap<String, TypeInfo>> {
        self.functions.get(function)
    }

    pub fn function_scope_mut(&mut self, function: &str) -> &mut HashMap<String, TypeInfo> {
        self.functions.entry(function.to_string()).or_default()
    }

    /// Every variable still waiting on a callee's parameter kind.
    pub fn pending(&self) -> Vec<(Option<String>, String)> {
        let globals = self
            .globals
            .iter()
            .map(|(name, info)| (None::<String>, name, info));
        let locals = self.functions.iter().flat_map(|(function, scope)| {
            scope
                .iter()
                .map(move |(name, info)| (Some(function.clone()), name, info))
        });

        globals
            .chain(locals)
            .filter(|(_, _, info)| info.kind == TypeKind::Unknown && info.deferred_call.is_some())
            .map(|(owner, name, _)| (owner, name.clone()))
            .collect()
    }
}

/// Human-readable dump: globals first, then each function in name order,
/// variables sorted by name within each group.
impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "globals")?;
        write_scope(f, &self.globals)?;

        let mut functions: Vec<&String> = self.functions.keys().collect();
        functions.sort();
        for function in functions {
            writeln!(f, "function {}", function)?;
            write_scope(f, &self.functions[function])?;
        }
        Ok(())
    }
}

fn write_scope(f: &mut fmt::Formatter<'_>, scope: &HashMap<String, TypeInfo>) -> fmt::Result {
    let mut names: Vec<&String> = scope.keys().collect();
    names.sort();
    for name in names {
        writeln!(f, "  {}: {}", name, scope[name])?;
    }
    Ok(())
}
