//! End-to-end builder behavior: the operand stack across statements,
//! operator lowering, closures, returns and protocol violations.

use gotree::ast::{Decl, Expr, Stmt};
use gotree::{
    BinaryOp, BuildError, BuilderConfig, Field, Package, Param, Signature, StructType, Type,
    UnaryOp,
};

fn point_package() -> (Package, Type) {
    let mut pkg = Package::new("main");
    let t = pkg.new_type("T").unwrap();
    pkg.init_type(
        t,
        Type::Struct(StructType::new(vec![
            Field::new("x", Type::INT),
            Field::new("y", Type::INT),
        ])),
    )
    .unwrap();
    (pkg, Type::Named(t))
}

#[test]
fn every_statement_returns_to_the_block_depth() {
    let (mut pkg, t) = point_package();
    pkg.new_var(t, &["p"]).unwrap();
    let f = pkg.new_func(None, "f", vec![], vec![], false).unwrap();
    let cb = pkg.body_start(&f);
    assert_eq!(cb.depth(), 0);

    cb.define_var_start(&["n"])
        .var_val("p").unwrap()
        .member_val("x").unwrap()
        .val(1).unwrap()
        .binary_op(BinaryOp::Add).unwrap()
        .end_init(1).unwrap();
    assert_eq!(cb.depth(), 0);

    cb.var_val("p").unwrap()
        .member_ref("y").unwrap()
        .var_val("n").unwrap()
        .assign(1).unwrap();
    assert_eq!(cb.depth(), 0);

    cb.block();
    cb.var_ref("_").unwrap().var_val("n").unwrap().assign(1).unwrap();
    assert_eq!(cb.depth(), 0);
    cb.end();
    cb.end();

    let file = pkg.finish();
    let body = file.func("f").and_then(|f| f.body.clone()).unwrap();
    assert_eq!(body.list.len(), 3);
    assert!(matches!(body.list[2], Stmt::Block(_)));
}

#[test]
fn unknown_member_leaves_the_stack_alone() {
    let (mut pkg, t) = point_package();
    pkg.new_var(t, &["p"]).unwrap();
    let f = pkg.new_func(None, "f", vec![], vec![], false).unwrap();
    let cb = pkg.body_start(&f);
    cb.var_val("p").unwrap();

    let err = cb.member_val("z3").unwrap_err();
    assert_eq!(err.to_string(), "main.T has no field or method z3");
    assert_eq!(cb.depth(), 1);
    assert_eq!(cb.top().unwrap().expr, Expr::ident("p"));

    // Still usable after the error.
    cb.member_val("x").unwrap();
    assert_eq!(cb.top().unwrap().ty, Type::INT);
}

#[test]
fn undefined_names() {
    let mut pkg = Package::new("main");
    let cb = pkg.cb();
    assert_eq!(
        cb.var_val("nope").unwrap_err(),
        BuildError::UndefinedReference {
            name: "nope".to_string()
        }
    );
    assert_eq!(cb.depth(), 0);
}

#[test]
fn operators_on_named_types_lower_to_methods() {
    let mut pkg = Package::new("main");
    let v = pkg.new_type("Vec").unwrap();
    pkg.init_type(v, Type::Struct(StructType::new(vec![Field::new("x", Type::INT)])))
        .unwrap();
    let vec_ty = Type::Named(v);
    pkg.add_method(
        v,
        "Gop_Add",
        Signature::new(vec![Param::new("b", vec_ty.clone())], vec![Param::unnamed(vec_ty.clone())], false),
    )
    .unwrap();
    pkg.new_var(vec_ty.clone(), &["a", "b"]).unwrap();

    let cb = pkg.cb();
    cb.var_val("a").unwrap().var_val("b").unwrap().binary_op(BinaryOp::Add).unwrap();
    let top = cb.top().unwrap();
    assert_eq!(top.ty, vec_ty);
    assert_eq!(
        top.expr,
        Expr::call(Expr::selector(Expr::ident("a"), "Gop_Add"), vec![Expr::ident("b")])
    );

    // No Gop_Sub: falls back to the type oracle, which rejects structs.
    cb.var_val("a").unwrap().var_val("b").unwrap();
    assert!(matches!(
        cb.binary_op(BinaryOp::Sub),
        Err(BuildError::InvalidOperation { .. })
    ));
    assert_eq!(cb.depth(), 3);
}

#[test]
fn operator_prefix_is_configurable() {
    let config = BuilderConfig::new().with_operator_prefix("Op_");
    let mut pkg = Package::with_config("main", config);
    let n = pkg.new_type("Num").unwrap();
    pkg.init_type(n, Type::INT).unwrap();
    let num = Type::Named(n);
    pkg.add_method(n, "Op_Neg", Signature::new(vec![], vec![Param::unnamed(num.clone())], false))
        .unwrap();
    pkg.new_var(num, &["x"]).unwrap();

    let cb = pkg.cb();
    cb.var_val("x").unwrap().unary_op(UnaryOp::Neg).unwrap();
    assert_eq!(
        cb.top().unwrap().expr,
        Expr::call(Expr::selector(Expr::ident("x"), "Op_Neg"), vec![])
    );
}

#[test]
fn constant_folding_keeps_the_expression_tree() {
    let mut pkg = Package::new("main");
    let cb = pkg.cb();
    cb.val(2).unwrap().val(3).unwrap().binary_op(BinaryOp::Mul).unwrap();
    let top = cb.top().unwrap();
    assert_eq!(top.cval, Some(gotree::ConstValue::Int(6)));
    assert_eq!(
        top.expr,
        Expr::binary(Expr::int_lit(2), BinaryOp::Mul, Expr::int_lit(3))
    );

    cb.val(0).unwrap();
    assert_eq!(
        cb.binary_op(BinaryOp::Quo).unwrap_err(),
        BuildError::invalid_operation("division by zero")
    );
}

#[test]
fn closure_is_pushed_as_a_function_value() {
    let mut pkg = Package::new("main");
    pkg.cb().new_var_start(None, &["double"]).unwrap();
    pkg.new_closure(
        vec![Param::new("n", Type::INT)],
        vec![Param::unnamed(Type::INT)],
        false,
    )
    .unwrap()
    .var_val("n").unwrap()
    .val(2).unwrap()
    .binary_op(BinaryOp::Mul).unwrap()
    .return_(1).unwrap()
    .end();

    let cb = pkg.cb();
    assert!(matches!(cb.top().unwrap().expr, Expr::FuncLit(_)));
    assert!(matches!(cb.top().unwrap().ty, Type::Signature(_)));
    cb.end_init(1).unwrap();

    // The closure's variable can be called.
    cb.new_var_start(None, &["four"]).unwrap()
        .var_val("double").unwrap()
        .val(2).unwrap()
        .call(1).unwrap()
        .end_init(1).unwrap();

    let file = pkg.finish();
    assert_eq!(file.decls.len(), 2);
}

#[test]
fn return_counts_are_checked() {
    let mut pkg = Package::new("main");
    let f = pkg
        .new_func(
            None,
            "pair",
            vec![],
            vec![Param::unnamed(Type::INT), Param::unnamed(Type::STRING)],
            false,
        )
        .unwrap();
    let cb = pkg.body_start(&f);
    cb.val(1).unwrap();
    assert_eq!(
        cb.return_(1).unwrap_err(),
        BuildError::invalid_operation("not enough return values")
    );
    cb.val("s").unwrap().val(3).unwrap();
    assert_eq!(
        cb.return_(3).unwrap_err(),
        BuildError::invalid_operation("too many return values")
    );
    assert_eq!(cb.depth(), 3);
}

#[test]
fn naked_return_with_named_results() {
    let mut pkg = Package::new("main");
    let f = pkg
        .new_func(None, "f", vec![], vec![Param::new("err", Type::STRING)], false)
        .unwrap();
    pkg.body_start(&f)
        .var_ref("err").unwrap()
        .val("ok").unwrap()
        .assign(1).unwrap()
        .return_(0).unwrap()
        .end();
    let file = pkg.finish();
    assert_eq!(file.func("f").and_then(|f| f.body.clone()).unwrap().list.len(), 2);
}

#[test]
fn package_level_declarations_come_in_order() {
    let (mut pkg, t) = point_package();
    pkg.new_var(t, &["p"]).unwrap();
    let f = pkg.new_func(None, "f", vec![], vec![], false).unwrap();
    pkg.body_start(&f).end();
    pkg.cb().new_var_start(Some(Type::INT), &["n"]).unwrap().val(1).unwrap().end_init(1).unwrap();

    let file = pkg.finish();
    assert_eq!(file.package.name, "main");
    assert!(file.imports.is_empty());
    let kinds: Vec<&str> = file
        .decls
        .iter()
        .map(|d| match d {
            Decl::Gen(_) => "gen",
            Decl::Func(_) => "func",
        })
        .collect();
    assert_eq!(kinds, ["gen", "gen", "func", "gen"]);
}

#[test]
#[should_panic(expected = "return outside of a function body")]
fn return_at_package_level_panics() {
    let mut pkg = Package::new("main");
    let _ = pkg.cb().return_(0);
}

#[test]
#[should_panic]
fn statement_start_with_pending_operands_panics() {
    let mut pkg = Package::new("main");
    let f = pkg.new_func(None, "f", vec![], vec![], false).unwrap();
    let cb = pkg.body_start(&f);
    cb.val(1).unwrap();
    let _ = cb.new_var(Type::INT, &["x"]);
}

#[test]
#[should_panic]
fn assign_with_wrong_operand_count_panics() {
    let mut pkg = Package::new("main");
    pkg.new_var(Type::INT, &["a"]).unwrap();
    let f = pkg.new_func(None, "f", vec![], vec![], false).unwrap();
    let cb = pkg.body_start(&f);
    cb.var_ref("a").unwrap();
    let _ = cb.assign(1);
}
