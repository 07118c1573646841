//! Unit tests for the resolver context.
//!
//! These drive the resolver directly, the way the builder does, to check
//! scope lookup, kind recording, call binding and index assignment.

use std::rc::Rc;

use crate::{
    ast::{
        ast::{Ast, ExprId, Scope},
        expressions::{Expr, UserCallExpr},
        statements::{Function, Program},
    },
    errors::errors::ErrorImpl,
    Position,
};

use super::{
    config::{ResolverConfig, MAX_RESOLVE_ITERATIONS},
    resolver::Resolver,
    specials::special_var_index,
    symbols::{DeferredCall, TypeKind},
};

fn pos(offset: u32) -> Position {
    Position(offset, Rc::new("test.awk".to_string()))
}

fn function(name: &str, params: &[&str]) -> Function {
    Function {
        name: name.to_string(),
        params: params.iter().map(|p| p.to_string()).collect(),
        arrays: vec![],
        body: vec![],
    }
}

fn call(resolver: &mut Resolver, ast: &mut Ast, name: &str, args: Vec<ExprId>, at: u32) -> ExprId {
    for (i, arg) in args.iter().enumerate() {
        resolver.process_user_call_arg(ast, name, *arg, i);
    }
    let call = ast.alloc(Expr::UserCall(UserCallExpr {
        name: name.to_string(),
        args,
        index: None,
    }));
    resolver.record_user_call(ast, call, pos(at));
    call
}

#[test]
fn test_special_var_index() {
    assert_eq!(special_var_index("NF"), 6);
    assert_eq!(special_var_index("SUBSEP"), 15);
    assert_eq!(special_var_index("ARGV"), 0);
    assert_eq!(special_var_index("x"), 0);
}

#[test]
fn test_default_config() {
    let config = ResolverConfig::default();
    assert_eq!(config.max_resolve_iterations, MAX_RESOLVE_ITERATIONS);
    assert!(!config.debug_types);
    assert_eq!((config.special_var_index)("NR"), 7);
}

#[test]
fn test_argv_preregistered() {
    let mut ast = Ast::new();
    let resolver = Resolver::new(ResolverConfig::default(), &mut ast);

    let info = resolver.symbols().get(None, "ARGV").unwrap();
    assert_eq!(info.kind, TypeKind::Array);
    assert_eq!(info.scope, Scope::Global);
    assert_eq!(resolver.array_refs().len(), 1);
    assert_eq!(ast.len(), 1);
}

#[test]
fn test_scope_precedence() {
    let mut ast = Ast::new();
    let mut resolver = Resolver::new(ResolverConfig::default(), &mut ast);

    resolver.start_function("f", &["NF".to_string(), "x".to_string()]);
    assert_eq!(
        resolver.scope_of("NF"),
        (Scope::Local("f".to_string()), Some("f".to_string()))
    );
    assert_eq!(resolver.scope_of("FS"), (Scope::Special, None));
    assert_eq!(resolver.scope_of("y"), (Scope::Global, None));
    resolver.stop_function();

    assert_eq!(resolver.scope_of("NF"), (Scope::Special, None));
    assert_eq!(resolver.scope_of("x"), (Scope::Global, None));
}

#[test]
fn test_first_use_fixes_kind() {
    let mut ast = Ast::new();
    let mut resolver = Resolver::new(ResolverConfig::default(), &mut ast);

    let first = resolver.var_ref(&mut ast, "x");
    resolver.array_ref(&mut ast, "x");

    let info = resolver.symbols().get(None, "x").unwrap();
    assert_eq!(info.kind, TypeKind::Scalar);
    assert_eq!(info.first_reference, Some(first));

    resolver.array_ref(&mut ast, "a");
    resolver.var_ref(&mut ast, "a");
    let info = resolver.symbols().get(None, "a").unwrap();
    assert_eq!(info.kind, TypeKind::Array);
    assert_eq!(info.first_reference, None);
}

#[test]
fn test_call_argument_defers_first_reference() {
    let mut ast = Ast::new();
    let mut resolver = Resolver::new(ResolverConfig::default(), &mut ast);

    let x = resolver.var_ref(&mut ast, "x");
    call(&mut resolver, &mut ast, "f", vec![x], 10);

    let info = resolver.symbols().get(None, "x").unwrap();
    assert_eq!(info.kind, TypeKind::Unknown);
    assert_eq!(
        info.deferred_call,
        Some(DeferredCall {
            callee: "f".to_string(),
            arg_index: 0
        })
    );
}

#[test]
fn test_call_argument_after_use_keeps_kind() {
    let mut ast = Ast::new();
    let mut resolver = Resolver::new(ResolverConfig::default(), &mut ast);

    resolver.var_ref(&mut ast, "x");
    let again = resolver.var_ref(&mut ast, "x");
    let one = ast.alloc(Expr::Num(1.0));
    call(&mut resolver, &mut ast, "f", vec![one, again], 10);

    let info = resolver.symbols().get(None, "x").unwrap();
    assert_eq!(info.kind, TypeKind::Scalar);
    assert_eq!(info.deferred_call, None);
}

#[test]
fn test_direct_use_overrides_deferral() {
    let mut ast = Ast::new();
    let mut resolver = Resolver::new(ResolverConfig::default(), &mut ast);

    let x = resolver.var_ref(&mut ast, "x");
    call(&mut resolver, &mut ast, "f", vec![x], 10);
    let later = resolver.var_ref(&mut ast, "x");

    let info = resolver.symbols().get(None, "x").unwrap();
    assert_eq!(info.kind, TypeKind::Scalar);
    assert_eq!(info.first_reference, Some(later));
    assert_eq!(info.deferred_call, None);
}

#[test]
fn test_undefined_function() {
    let mut ast = Ast::new();
    let mut resolver = Resolver::new(ResolverConfig::default(), &mut ast);
    let mut program = Program::default();

    resolver.var_ref(&mut ast, "g");
    call(&mut resolver, &mut ast, "g", vec![], 42);

    let error = resolver.resolve(&mut ast, &mut program).unwrap_err();
    assert_eq!(
        error.get_kind(),
        &ErrorImpl::UndefinedFunction {
            function: "g".to_string()
        }
    );
    assert_eq!(error.get_position().0, 42);
    assert!(program.arrays.is_empty());
}

#[test]
fn test_too_many_arguments_binds_nothing() {
    let mut ast = Ast::new();
    let mut resolver = Resolver::new(ResolverConfig::default(), &mut ast);
    let mut program = Program::default();
    program.functions.push(function("f", &["a"]));
    resolver.start_function("f", &["a".to_string()]);
    resolver.stop_function();
    resolver.add_function("f", 0);

    let one = ast.alloc(Expr::Num(1.0));
    let good = call(&mut resolver, &mut ast, "f", vec![one], 5);
    let one = ast.alloc(Expr::Num(1.0));
    let two = ast.alloc(Expr::Num(2.0));
    call(&mut resolver, &mut ast, "f", vec![one, two], 9);

    let error = resolver.resolve_user_calls(&program).unwrap_err();
    assert_eq!(
        error.get_kind(),
        &ErrorImpl::TooManyArguments {
            function: "f".to_string(),
            expected: 1,
            received: 2
        }
    );
    assert_eq!(error.get_position().0, 9);
    assert_eq!(ast[good].as_user_call().unwrap().index, None);
}

#[test]
fn test_call_ordinals_written_only_when_bound() {
    let mut ast = Ast::new();
    let mut resolver = Resolver::new(ResolverConfig::default(), &mut ast);
    let mut program = Program::default();
    program.functions.push(function("f", &["a"]));
    resolver.start_function("f", &["a".to_string()]);
    resolver.stop_function();
    resolver.add_function("f", 0);

    let call = call(&mut resolver, &mut ast, "f", vec![], 3);
    assert_eq!(resolver.user_calls().len(), 1);

    resolver.resolve_user_calls(&program).unwrap();
    assert_eq!(ast[call].as_user_call().unwrap().index, None);

    resolver.resolve_types(&program).unwrap();
    resolver.bind_user_calls(&mut ast);
    assert_eq!(ast[call].as_user_call().unwrap().index, Some(0));
}

#[test]
fn test_unknown_global_recorded_as_scalar() {
    let mut ast = Ast::new();
    let mut resolver = Resolver::new(ResolverConfig::default(), &mut ast);
    let mut program = Program::default();
    program.functions.push(function("f", &["a"]));
    resolver.start_function("f", &["a".to_string()]);
    resolver.stop_function();
    resolver.add_function("f", 0);

    let x = resolver.var_ref(&mut ast, "x");
    call(&mut resolver, &mut ast, "f", vec![x], 7);
    resolver.resolve(&mut ast, &mut program).unwrap();

    let info = resolver.symbols().get(None, "x").unwrap();
    assert_eq!(info.kind, TypeKind::Scalar);
    assert_eq!(info.index, program.scalars["x"]);
    assert_eq!(resolver.symbols().kind(Some("f"), "a"), TypeKind::Scalar);
    assert!(resolver.dump_types().contains("  x: kind=Scalar scope=Global"));
}

#[test]
fn test_fewer_arguments_is_legal() {
    let mut ast = Ast::new();
    let mut resolver = Resolver::new(ResolverConfig::default(), &mut ast);
    let mut program = Program::default();
    program.functions.push(function("f", &["a", "b", "c"]));
    resolver.start_function("f", &["a".to_string(), "b".to_string(), "c".to_string()]);
    resolver.stop_function();
    resolver.add_function("f", 0);

    let call = call(&mut resolver, &mut ast, "f", vec![], 1);
    resolver.resolve(&mut ast, &mut program).unwrap();

    assert_eq!(ast[call].as_user_call().unwrap().index, Some(0));
    assert_eq!(program.functions[0].arrays, vec![false, false, false]);
}

#[test]
fn test_local_indexes_follow_parameter_order() {
    let mut ast = Ast::new();
    let mut resolver = Resolver::new(ResolverConfig::default(), &mut ast);
    let mut program = Program::default();
    let params = ["s", "a", "t", "b", "unused"];
    program.functions.push(function("f", &params));

    let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
    resolver.start_function("f", &params);
    let b = resolver.array_ref(&mut ast, "b");
    let t = resolver.var_ref(&mut ast, "t");
    let a = resolver.array_ref(&mut ast, "a");
    let s = resolver.var_ref(&mut ast, "s");
    resolver.stop_function();
    resolver.add_function("f", 0);

    resolver.resolve(&mut ast, &mut program).unwrap();

    assert_eq!(
        program.functions[0].arrays,
        vec![false, true, false, true, false]
    );
    assert_eq!(ast[s].as_var().unwrap().index, 0);
    assert_eq!(ast[a].as_array().unwrap().index, 0);
    assert_eq!(ast[t].as_var().unwrap().index, 1);
    assert_eq!(ast[b].as_array().unwrap().index, 1);

    let unused = resolver.symbols().get(Some("f"), "unused").unwrap();
    assert_eq!(unused.kind, TypeKind::Scalar);
    assert_eq!(unused.index, 2);
    assert!(program.scalars.is_empty());
}

#[test]
fn test_custom_special_lookup() {
    fn lookup(name: &str) -> usize {
        if name == "REC" {
            42
        } else {
            0
        }
    }
    let config = ResolverConfig {
        special_var_index: lookup,
        ..ResolverConfig::default()
    };
    let mut ast = Ast::new();
    let mut resolver = Resolver::new(config, &mut ast);
    let mut program = Program::default();

    let rec = resolver.var_ref(&mut ast, "REC");
    let nf = resolver.var_ref(&mut ast, "NF");
    resolver.resolve(&mut ast, &mut program).unwrap();

    let rec = ast[rec].as_var().unwrap();
    assert_eq!(rec.scope, Scope::Special);
    assert_eq!(rec.index, 42);
    assert_eq!(ast[nf].as_var().unwrap().scope, Scope::Global);
    assert!(!program.scalars.contains_key("REC"));
    assert!(program.scalars.contains_key("NF"));
}

#[test]
fn test_specials_stay_out_of_global_maps() {
    let mut ast = Ast::new();
    let mut resolver = Resolver::new(ResolverConfig::default(), &mut ast);
    let mut program = Program::default();

    let nr = resolver.var_ref(&mut ast, "NR");
    let x = resolver.var_ref(&mut ast, "x");
    resolver.resolve(&mut ast, &mut program).unwrap();

    assert_eq!(ast[nr].as_var().unwrap().index, 7);
    assert_eq!(ast[x].as_var().unwrap().index, program.scalars["x"]);
    assert_eq!(program.scalars.len(), 1);
    assert_eq!(program.arrays.len(), 1);
    assert!(program.arrays.contains_key("ARGV"));
}

#[test]
fn test_index_assignment_is_idempotent() {
    let mut ast = Ast::new();
    let mut resolver = Resolver::new(ResolverConfig::default(), &mut ast);
    let mut program = Program::default();
    program.functions.push(function("f", &["p", "q"]));

    for name in ["a", "b", "c", "d"] {
        resolver.var_ref(&mut ast, name);
        resolver.array_ref(&mut ast, &format!("arr_{}", name));
    }
    resolver.start_function("f", &["p".to_string(), "q".to_string()]);
    resolver.array_ref(&mut ast, "q");
    resolver.stop_function();
    resolver.add_function("f", 0);

    resolver.resolve(&mut ast, &mut program).unwrap();
    let scalars = program.scalars.clone();
    let arrays = program.arrays.clone();
    let locals = resolver.symbols().function_scope("f").unwrap().clone();

    resolver.assign_global_indexes(&mut program);
    resolver.assign_local_indexes(&mut program);

    assert_eq!(program.scalars, scalars);
    assert_eq!(program.arrays, arrays);
    assert_eq!(resolver.symbols().function_scope("f").unwrap(), &locals);
}

#[test]
fn test_dump_groups_and_sorts() {
    let mut ast = Ast::new();
    let mut resolver = Resolver::new(ResolverConfig::default(), &mut ast);

    resolver.var_ref(&mut ast, "zeta");
    resolver.var_ref(&mut ast, "alpha");
    resolver.start_function("second", &["b".to_string()]);
    resolver.var_ref(&mut ast, "b");
    resolver.stop_function();
    resolver.start_function("first", &["y".to_string(), "x".to_string()]);
    resolver.array_ref(&mut ast, "y");
    resolver.var_ref(&mut ast, "x");
    resolver.stop_function();

    let dump = resolver.dump_types();
    let lines: Vec<&str> = dump.lines().collect();
    let headers: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| !line.starts_with("  "))
        .collect();
    assert_eq!(headers, vec!["globals", "function first", "function second"]);

    let names: Vec<&str> = lines
        .iter()
        .filter_map(|line| line.strip_prefix("  "))
        .map(|line| line.split(':').next().unwrap())
        .collect();
    assert_eq!(names, vec!["ARGV", "alpha", "zeta", "x", "y", "b"]);
    assert!(lines[1].starts_with("  ARGV: kind=Array scope=Global"));
}
