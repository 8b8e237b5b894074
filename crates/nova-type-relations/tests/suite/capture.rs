use nova_type_relations::{Mapped, TypeError, TypeRelations};
use nova_types::{TyContext, Type, TypeEnv, TypeKind, WildcardBound};
use pretty_assertions::assert_eq;

use super::fixtures::Fixture;

fn captured_var(ty: &Type, index: usize) -> nova_types::TypeVarId {
    match ty.as_class().map(|class| &class.args[index]) {
        Some(Type::TypeVar(id)) => *id,
        other => panic!("expected a capture variable, got {other:?}"),
    }
}

#[test]
fn types_without_wildcards_are_not_captured() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let mut cx = TyContext::new(&fx.store);

    for ty in [fx.list_of(fx.string()), fx.string(), Type::array(fx.object())] {
        assert_eq!(relations.capture(&mut cx, &ty).unwrap(), Mapped::Unchanged);
    }
    assert_eq!(cx.local_count(), 0);
}

#[test]
fn extends_wildcards_capture_to_the_glb_of_both_bounds() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let mut cx = TyContext::new(&fx.store);

    let ty = fx.list_of(Type::extends(fx.integer()));
    let captured = relations.capture(&mut cx, &ty).unwrap().into_type(&ty);
    let var = captured_var(&captured, 0);
    let def = cx.type_param(var).unwrap();
    assert!(def.is_capture());
    assert_eq!(def.captured, Some(WildcardBound::Extends(Box::new(fx.integer()))));
    assert_eq!(def.upper_bounds, vec![fx.integer()]);
    assert_eq!(def.lower_bound, None);
    assert_eq!(nova_types::format_type(&cx, &captured), "List<CAP#1>");

    // A declared bound narrower than the wildcard bound wins.
    let bounded = fx.ty("test.Bounded", vec![Type::extends(fx.object())]);
    let captured = relations.capture(&mut cx, &bounded).unwrap().into_type(&bounded);
    let var = captured_var(&captured, 0);
    assert_eq!(cx.type_param(var).unwrap().upper_bounds, vec![fx.number()]);
}

#[test]
fn super_wildcards_capture_a_lower_bound() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let mut cx = TyContext::new(&fx.store);

    let ty = fx.list_of(Type::super_of(fx.integer()));
    let captured = relations.capture(&mut cx, &ty).unwrap().into_type(&ty);
    let var = captured_var(&captured, 0);
    let def = cx.type_param(var).unwrap();
    assert_eq!(def.upper_bounds, vec![fx.object()]);
    assert_eq!(def.lower_bound, Some(fx.integer()));

    // The capture accepts what the wildcard accepted.
    let captured_var = Type::TypeVar(var);
    assert!(relations.is_subtype(&cx, &fx.integer(), &captured_var).unwrap());
    assert!(!relations.is_subtype(&cx, &fx.number(), &captured_var).unwrap());
}

#[test]
fn unbounded_wildcards_take_the_declared_bound() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let mut cx = TyContext::new(&fx.store);

    let ty = fx.ty("java.lang.Enum", vec![Type::wildcard()]);
    let captured = relations.capture(&mut cx, &ty).unwrap().into_type(&ty);
    let var = captured_var(&captured, 0);
    // `E extends Enum<E>` becomes `CAP#1 extends Enum<CAP#1>`.
    assert_eq!(
        cx.type_param(var).unwrap().upper_bounds,
        vec![fx.ty("java.lang.Enum", vec![Type::TypeVar(var)])]
    );
}

#[test]
fn capturing_twice_changes_nothing() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let mut cx = TyContext::new(&fx.store);

    let ty = fx.ty(
        "java.util.Map",
        vec![Type::wildcard(), Type::extends(fx.number())],
    );
    let once = relations.capture(&mut cx, &ty).unwrap().into_type(&ty);
    assert_eq!(cx.local_count(), 2);
    assert_eq!(relations.capture(&mut cx, &once).unwrap(), Mapped::Unchanged);
    assert!(relations.is_same_type(&cx, &once, &once).unwrap());

    // Each capture is a fresh variable.
    let again = relations.capture(&mut cx, &ty).unwrap().into_type(&ty);
    assert!(!relations.is_same_type(&cx, &once, &again).unwrap());
}

#[test]
fn glb_of_unrelated_interfaces_is_an_intersection() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let mut cx = TyContext::new(&fx.store);

    let comparable = fx.ty("java.lang.Comparable", vec![fx.string()]);
    let serializable = fx.ty("java.io.Serializable", vec![]);
    assert_eq!(
        relations.glb(&mut cx, &comparable, &serializable).unwrap(),
        Type::Intersection(vec![comparable.clone(), serializable.clone()])
    );
    assert_eq!(
        relations.glb(&mut cx, &fx.integer(), &fx.number()).unwrap(),
        fx.integer()
    );
    assert_eq!(
        relations.glb(&mut cx, &fx.number(), &serializable).unwrap(),
        fx.number()
    );
}

#[test]
fn glb_keeps_one_instantiation_per_declaration() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let mut cx = TyContext::new(&fx.store);
    let (strings, integers) = (fx.list_of(fx.string()), fx.list_of(fx.integer()));

    let glb = relations.glb(&mut cx, &strings, &integers).unwrap();
    assert_eq!(fx.format(&glb), "List<String>");
    let glb = relations.glb(&mut cx, &integers, &strings).unwrap();
    assert_eq!(fx.format(&glb), "List<Integer>");
}

#[test]
fn glb_of_unrelated_classes_is_the_error_type() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let mut cx = TyContext::new(&fx.store);

    assert_eq!(
        relations.glb(&mut cx, &fx.string(), &fx.integer()).unwrap(),
        Type::Error
    );
    assert_eq!(
        relations.glb(&mut cx, &Type::int(), &fx.integer()).unwrap_err(),
        TypeError::IllegalArgument {
            operation: "glb",
            found: TypeKind::Primitive,
        }
    );
}

#[test]
fn wildcards_contain_narrower_arguments() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let contains = |t: &Type, s: &Type| relations.contains(&fx.store, t, s).unwrap();

    let extends_number = Type::extends(fx.number());
    let extends_integer = Type::extends(fx.integer());
    let super_integer = Type::super_of(fx.integer());

    assert!(contains(&extends_number, &extends_integer));
    assert!(!contains(&extends_integer, &extends_number));
    assert!(contains(&extends_number, &fx.integer()));
    assert!(!contains(&extends_number, &Type::wildcard()));

    assert!(contains(&super_integer, &Type::super_of(fx.number())));
    assert!(contains(&super_integer, &fx.number()));
    assert!(!contains(&Type::super_of(fx.number()), &fx.integer()));
    assert!(!contains(&super_integer, &extends_integer));

    assert!(contains(&Type::wildcard(), &fx.string()));
    assert!(contains(&fx.string(), &fx.string()));
    assert!(!contains(&fx.string(), &fx.integer()));
}
