//! Bitfield reads and writes, checked by running the synthesized code.

mod common;

use common::{IntKind, Memory};
use gotree::ast::{Expr, Stmt};
use gotree::{BitField, BuildError, Field, Package, RegistrationError, StructType, Type};

/// `type T struct { x int; y uint }` with `z1 = x[0:1]`, `z2 = x[1:4]`,
/// `u1 = y[0:1]` and `u2 = y[2:5]`, and `var a T`.
fn bitfield_package() -> Package {
    let mut pkg = Package::new("main");
    let t = pkg.new_type("T").unwrap();
    pkg.init_type(
        t,
        Type::Struct(StructType::new(vec![
            Field::new("x", Type::INT),
            Field::new("y", Type::UINT),
        ])),
    )
    .unwrap();
    pkg.set_bitfields(
        &Type::Named(t),
        vec![
            BitField::new("z1", "x", 0, 1),
            BitField::new("z2", "x", 1, 3),
            BitField::new("u1", "y", 0, 1),
            BitField::new("u2", "y", 2, 3),
        ],
    )
    .unwrap();
    pkg.new_var(Type::Named(t), &["a"]).unwrap();
    pkg
}

/// The read expression of `a.<field>`.
fn read(pkg: &mut Package, field: &str) -> Expr {
    // var _ = a.<field>
    let cb = pkg.cb();
    cb.new_var_start(None, &["_"]).unwrap();
    cb.var_val("a").unwrap().member_val(field).unwrap();
    let expr = cb.top().unwrap().expr.clone();
    cb.end_init(1).unwrap();
    expr
}

/// The statements of `a.<field> = value` for each write, in order.
fn writes(pkg: Package, assignments: &[(&str, i128)]) -> Vec<Stmt> {
    let mut pkg = pkg;
    let f = pkg.new_func(None, "f", vec![], vec![], false).unwrap();
    let cb = pkg.body_start(&f);
    for (field, value) in assignments {
        cb.var_val("a").unwrap()
            .member_ref(field).unwrap()
            .val(i64::try_from(*value).unwrap()).unwrap()
            .assign(1).unwrap();
    }
    cb.end();
    let file = pkg.finish();
    file.func("f").and_then(|f| f.body.clone()).unwrap().list
}

fn memory(x: i128, y: i128) -> Memory {
    let mut mem = Memory::new();
    mem.set("a.x", x, IntKind::INT);
    mem.set("a.y", y, IntKind::UINT);
    mem
}

#[test]
fn reads_of_x_equal_five() {
    let mut pkg = bitfield_package();
    let z1 = read(&mut pkg, "z1");
    let z2 = read(&mut pkg, "z2");
    let mem = memory(5, 0);

    // The set bit of a 1-bit field in signed storage sign-extends.
    assert_eq!(mem.eval(&z1), -1);
    assert_eq!(mem.eval(&z2), 2);
}

#[test]
fn unsigned_storage_reads_zero_extend() {
    let mut pkg = bitfield_package();
    let u1 = read(&mut pkg, "u1");
    let u2 = read(&mut pkg, "u2");
    let mem = memory(0, 0b1_1101);

    assert_eq!(mem.eval(&u1), 1);
    assert_eq!(mem.eval(&u2), 0b111);
}

#[test]
fn write_sequence() {
    let stmts = writes(bitfield_package(), &[("z1", 1), ("z2", 1)]);
    assert!(stmts.iter().all(|s| matches!(s, Stmt::Block(b) if b.list.len() == 2)));

    let mut mem = memory(0, 0);
    mem.exec(&stmts[0]);
    assert_eq!(mem.get("a.x"), 1);
    mem.exec(&stmts[1]);
    assert_eq!(mem.get("a.x"), 3);
}

#[test]
fn temporaries_are_numbered_in_order() {
    let stmts = writes(bitfield_package(), &[("z1", 1), ("z2", 1)]);
    let temps: Vec<String> = stmts
        .iter()
        .map(|s| match s {
            Stmt::Block(block) => match &block.list[0] {
                Stmt::Assign(assign) => assign.lhs[0].as_ident().unwrap_or("").to_string(),
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(temps, ["_autoGo_1", "_autoGo_2"]);
}

#[test]
fn signed_round_trip_keeps_other_bits() {
    let before: i128 = -0x5555_5555_5555_5556;
    for v in -4..4 {
        let mut pkg = bitfield_package();
        let z2 = read(&mut pkg, "z2");
        let stmts = writes(pkg, &[("z2", v)]);

        let mut mem = memory(before, 0);
        mem.exec(&stmts[0]);
        assert_eq!(mem.eval(&z2), v, "z2 = {v}");
        let outside = !(0b111 << 1);
        assert_eq!(mem.get("a.x") & outside, before & outside);
    }
}

#[test]
fn unsigned_round_trip_truncates_to_width() {
    for v in [0, 3, 7, 9] {
        let mut pkg = bitfield_package();
        let u2 = read(&mut pkg, "u2");
        let stmts = writes(pkg, &[("u2", v)]);

        let mut mem = memory(0, u64::MAX.into());
        mem.exec(&stmts[0]);
        assert_eq!(mem.eval(&u2), v & 0b111);
        assert_eq!(mem.get("a.y") | (0b111 << 2), i128::from(u64::MAX));
    }
}

#[test]
fn registration_checks() {
    let mut pkg = Package::new("main");
    let t = pkg.new_type("T").unwrap();
    pkg.init_type(
        t,
        Type::Struct(StructType::new(vec![
            Field::new("x", Type::Basic(gotree::BasicKind::Int8)),
            Field::new("s", Type::STRING),
        ])),
    )
    .unwrap();
    let t = Type::Named(t);

    assert!(matches!(
        pkg.set_bitfields(&t, vec![BitField::new("hi", "x", 6, 3)]),
        Err(RegistrationError::BitRangeOverflow { .. })
    ));
    assert!(matches!(
        pkg.set_bitfields(&t, vec![BitField::new("b", "s", 0, 1)]),
        Err(RegistrationError::NotAnInteger { .. })
    ));
    assert!(matches!(
        pkg.set_bitfields(&t, vec![BitField::new("b", "missing", 0, 1)]),
        Err(RegistrationError::FieldNotFound { .. })
    ));
    assert!(matches!(
        pkg.set_bitfields(&Type::INT, vec![BitField::new("b", "x", 0, 1)]),
        Err(RegistrationError::NotAStruct(_))
    ));
}

#[test]
fn bitfield_cannot_be_called_or_addressed() {
    let mut pkg = bitfield_package();
    let f = pkg.new_func(None, "f", vec![], vec![], false).unwrap();
    let cb = pkg.body_start(&f);
    cb.var_val("a").unwrap().member_val("z2").unwrap();
    assert!(matches!(cb.addr_of(), Err(BuildError::InvalidOperation { .. })));
    assert!(matches!(cb.call(0), Err(BuildError::InvalidOperation { .. })));
    assert_eq!(cb.depth(), 1);
}

#[test]
fn constant_write_into_sign_bit_of_signed_storage() {
    // hi = x[60:64]
    let hi_package = || {
        let mut pkg = Package::new("main");
        let t = pkg.new_type("T").unwrap();
        pkg.init_type(t, Type::Struct(StructType::new(vec![Field::new("x", Type::INT)])))
            .unwrap();
        pkg.set_bitfields(&Type::Named(t), vec![BitField::new("hi", "x", 60, 4)])
            .unwrap();
        pkg.new_var(Type::Named(t), &["a"]).unwrap();
        pkg
    };

    for (v, read_back) in [(15, -1), (7, 7), (-8, -8), (0, 0)] {
        let mut pkg = hi_package();
        let hi = read(&mut pkg, "hi");
        let stmts = writes(pkg, &[("hi", v)]);

        let mut mem = memory(5, 0);
        mem.exec(&stmts[0]);
        assert_eq!(mem.eval(&hi), read_back, "hi = {v}");
        assert_eq!(mem.get("a.x") & 0xFFF_FFFF_FFFF_FFFF, 5);
    }
}
