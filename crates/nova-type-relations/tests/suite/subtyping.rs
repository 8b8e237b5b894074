use nova_type_relations::{TypeError, TypeRelations};
use nova_types::{NoTypeKind, PrimitiveType, Type, TypeKind};

use super::fixtures::Fixture;

#[test]
fn array_list_of_string_is_a_list_of_string_but_not_of_integer() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();

    let array_list = fx.array_list_of(fx.string());
    assert!(relations
        .is_subtype(&fx.store, &array_list, &fx.list_of(fx.string()))
        .unwrap());
    assert!(!relations
        .is_subtype(&fx.store, &array_list, &fx.list_of(fx.integer()))
        .unwrap());
    assert!(relations
        .is_subtype(
            &fx.store,
            &array_list,
            &fx.ty("java.lang.Iterable", vec![fx.string()])
        )
        .unwrap());
}

#[test]
fn class_types_reach_object_and_interfaces_reach_object() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let object = fx.object();

    for ty in [
        fx.string(),
        fx.list_of(fx.string()),
        fx.ty("java.lang.Cloneable", vec![]),
        fx.ty("test.Color", vec![]),
    ] {
        assert!(
            relations.is_subtype(&fx.store, &ty, &object).unwrap(),
            "{} should be a subtype of Object",
            fx.format(&ty)
        );
    }
    assert!(!relations.is_subtype(&fx.store, &object, &fx.string()).unwrap());
}

#[test]
fn primitive_widening_follows_the_jls_table() {
    use PrimitiveType::*;

    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let sub = |a, b| {
        relations
            .is_subtype(&fx.store, &Type::Primitive(a), &Type::Primitive(b))
            .unwrap()
    };

    assert!(sub(Byte, Short));
    assert!(sub(Byte, Double));
    assert!(sub(Char, Int));
    assert!(!sub(Char, Short));
    assert!(!sub(Short, Char));
    assert!(sub(Int, Float));
    assert!(!sub(Long, Int));
    assert!(!sub(Boolean, Int));
    assert!(sub(Double, Double));
    assert!(!sub(Double, Float));
}

#[test]
fn arrays_are_covariant_for_references_only() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();

    let integers = Type::array(fx.integer());
    let numbers = Type::array(fx.number());
    assert!(relations.is_subtype(&fx.store, &integers, &numbers).unwrap());
    assert!(!relations.is_subtype(&fx.store, &numbers, &integers).unwrap());

    let ints = Type::array(Type::int());
    let longs = Type::array(Type::Primitive(PrimitiveType::Long));
    assert!(!relations.is_subtype(&fx.store, &ints, &longs).unwrap());
    assert!(!relations.is_subtype(&fx.store, &ints, &Type::array(fx.object())).unwrap());

    for top in ["Object", "Cloneable", "java.io.Serializable"] {
        assert!(relations.is_subtype(&fx.store, &ints, &fx.ty(top, vec![])).unwrap());
        assert!(relations.is_subtype(&fx.store, &integers, &fx.ty(top, vec![])).unwrap());
    }
    assert!(!relations.is_subtype(&fx.store, &ints, &fx.string()).unwrap());
}

#[test]
fn wildcard_arguments_use_containment() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();

    let list_integer = fx.list_of(fx.integer());
    let list_extends_integer = fx.list_of(Type::extends(fx.integer()));
    let list_extends_number = fx.list_of(Type::extends(fx.number()));
    let list_super_integer = fx.list_of(Type::super_of(fx.integer()));
    let list_super_number = fx.list_of(Type::super_of(fx.number()));
    let list_any = fx.list_of(Type::wildcard());

    let sub = |t: &Type, s: &Type| relations.is_subtype(&fx.store, t, s).unwrap();

    assert!(sub(&list_integer, &list_extends_number));
    assert!(sub(&list_extends_integer, &list_extends_number));
    assert!(!sub(&list_extends_number, &list_extends_integer));
    assert!(sub(&list_super_number, &list_super_integer));
    assert!(!sub(&list_super_integer, &list_super_number));
    assert!(sub(&list_extends_number, &list_any));
    assert!(sub(&list_super_integer, &list_any));
    assert!(!sub(&list_any, &list_extends_number));
}

#[test]
fn f_bounded_enum_declarations_terminate() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let color = fx.ty("test.Color", vec![]);

    assert!(relations
        .is_subtype(&fx.store, &color, &fx.ty("java.lang.Enum", vec![color.clone()]))
        .unwrap());
    assert!(relations
        .is_subtype(
            &fx.store,
            &color,
            &fx.ty("java.lang.Comparable", vec![color.clone()])
        )
        .unwrap());
    let any_enum = fx.ty("java.lang.Enum", vec![Type::wildcard()]);
    assert!(relations
        .is_subtype(
            &fx.store,
            &color,
            &fx.ty("java.lang.Comparable", vec![Type::extends(any_enum.clone())])
        )
        .unwrap());
    assert!(relations
        .is_subtype(
            &fx.store,
            &any_enum,
            &fx.ty("java.lang.Comparable", vec![Type::wildcard()])
        )
        .unwrap());
}

#[test]
fn type_variables_are_tested_through_their_bounds() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let n = Type::TypeVar(fx.bounded_n);

    assert!(relations.is_subtype(&fx.store, &n, &n).unwrap());
    assert!(relations.is_subtype(&fx.store, &n, &fx.number()).unwrap());
    assert!(!relations.is_subtype(&fx.store, &n, &fx.integer()).unwrap());
    assert!(!relations.is_subtype(&fx.store, &fx.number(), &n).unwrap());
}

#[test]
fn intersections_on_either_side() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let cloneable = fx.ty("Cloneable", vec![]);
    let serializable = fx.ty("java.io.Serializable", vec![]);
    let both = Type::Intersection(vec![cloneable.clone(), serializable.clone()]);
    let reversed = Type::Intersection(vec![serializable.clone(), cloneable.clone()]);

    assert!(relations.is_subtype(&fx.store, &both, &reversed).unwrap());
    assert!(relations.is_subtype(&fx.store, &both, &serializable).unwrap());
    assert!(!relations.is_subtype(&fx.store, &cloneable, &both).unwrap());
    assert!(relations
        .is_subtype(&fx.store, &fx.array_list_of(fx.string()), &both)
        .unwrap());
}

#[test]
fn null_wildcard_and_error_edge_cases() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();

    assert!(relations.is_subtype(&fx.store, &Type::Null, &fx.string()).unwrap());
    assert!(relations
        .is_subtype(&fx.store, &Type::Null, &Type::array(Type::int()))
        .unwrap());
    assert!(!relations.is_subtype(&fx.store, &Type::Null, &Type::int()).unwrap());

    // A wildcard is not a subtype of anything, not even its own bound.
    let extends_number = Type::extends(fx.number());
    assert!(!relations
        .is_subtype(&fx.store, &extends_number, &fx.number())
        .unwrap());
    assert!(!relations
        .is_subtype(&fx.store, &extends_number, &extends_number)
        .unwrap());

    assert!(relations.is_subtype(&fx.store, &Type::Error, &fx.string()).unwrap());
    assert!(relations.is_subtype(&fx.store, &fx.string(), &Type::Error).unwrap());
}

#[test]
fn raw_types_need_unchecked_conversion() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let raw = fx.ty("java.util.ArrayList", vec![]);
    let list_string = fx.list_of(fx.string());

    assert!(!relations.is_subtype(&fx.store, &raw, &list_string).unwrap());
    assert!(relations
        .is_subtype_unchecked(&fx.store, &raw, &list_string)
        .unwrap());
    assert!(relations
        .is_subtype(&fx.store, &raw, &fx.ty("java.util.List", vec![]))
        .unwrap());
    assert!(relations
        .is_subtype(&fx.store, &fx.array_list_of(fx.string()), &fx.ty("java.util.List", vec![]))
        .unwrap());
    assert!(!relations
        .is_subtype_unchecked(&fx.store, &fx.string(), &list_string)
        .unwrap());
}

#[test]
fn inner_classes_compare_their_enclosing_types() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let inner = fx.id("test.Box.Inner");
    let of = |arg: Type| Type::nested(fx.ty("test.Box", vec![arg]), inner, vec![]);

    assert!(relations
        .is_subtype(&fx.store, &of(fx.string()), &of(fx.string()))
        .unwrap());
    assert!(!relations
        .is_subtype(&fx.store, &of(fx.string()), &of(fx.integer()))
        .unwrap());
}

#[test]
fn illegal_operands_are_rejected() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();

    let err = relations
        .is_subtype(&fx.store, &Type::NoType(NoTypeKind::Package), &fx.object())
        .unwrap_err();
    assert_eq!(
        err,
        TypeError::IllegalArgument {
            operation: "is_subtype",
            found: TypeKind::Package,
        }
    );

    let unknown = nova_types::ClassId::from_raw(50_000);
    assert_eq!(
        relations
            .is_subtype(&fx.store, &Type::class(unknown, vec![]), &fx.object())
            .unwrap_err(),
        TypeError::UnknownClass(unknown)
    );
}

#[test]
fn exhausting_the_depth_guard_is_an_error() {
    let fx = Fixture::new();
    let relations = TypeRelations::builder().max_depth(4).build().unwrap();

    let err = relations
        .is_subtype(
            &fx.store,
            &fx.array_list_of(fx.string()),
            &fx.ty("java.lang.Iterable", vec![fx.string()]),
        )
        .unwrap_err();
    assert_eq!(
        err,
        TypeError::RecursionLimit {
            operation: "is_subtype",
            limit: 4,
        }
    );

    // The guard is per query: the default engine answers the same question.
    assert!(TypeRelations::new()
        .is_subtype(
            &fx.store,
            &fx.array_list_of(fx.string()),
            &fx.ty("java.lang.Iterable", vec![fx.string()]),
        )
        .unwrap());
}

#[test]
fn capture_exposes_declared_bounds_of_unbounded_wildcards() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let unbounded = fx.ty("test.Bounded", vec![Type::wildcard()]);
    let numbers = fx.ty("test.Bounded", vec![Type::extends(fx.number())]);

    // `Bounded<?>` captures to `Bounded<CAP#1 extends Number>`.
    assert!(relations.is_subtype(&fx.store, &unbounded, &numbers).unwrap());
    assert!(!relations
        .is_subtype_no_capture(&fx.store, &unbounded, &numbers)
        .unwrap());
    assert!(relations
        .is_subtype_no_capture(&fx.store, &numbers, &unbounded)
        .unwrap());
}
