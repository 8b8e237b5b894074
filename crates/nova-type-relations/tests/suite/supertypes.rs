use nova_type_relations::{TypeError, TypeRelations};
use nova_types::{ClassDef, ClassId, ClassKind, TyContext, Type, TypeEnv, TypeStore};
use pretty_assertions::assert_eq;

use super::fixtures::Fixture;

#[test]
fn direct_supertypes_substitute_the_receiver_arguments() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let ty = fx.array_list_of(fx.string());

    let sup = relations.supertype(&fx.store, &ty).unwrap();
    assert_eq!(fx.format(&sup), "AbstractList<String>");
    let interfaces = relations.interfaces(&fx.store, &ty).unwrap();
    assert_eq!(
        fx.format_all(&interfaces),
        vec!["List<String>", "RandomAccess", "Cloneable", "Serializable"]
    );
    assert_eq!(
        fx.format_all(&relations.direct_supertypes(&fx.store, &ty).unwrap()),
        vec![
            "AbstractList<String>",
            "List<String>",
            "RandomAccess",
            "Cloneable",
            "Serializable",
        ]
    );
}

#[test]
fn interfaces_have_object_as_superclass() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let list = fx.list_of(fx.string());

    assert_eq!(relations.supertype(&fx.store, &list).unwrap(), fx.object());
    assert_eq!(
        relations.interfaces(&fx.store, &list).unwrap(),
        vec![fx.ty("java.util.Collection", vec![fx.string()])]
    );

    assert_eq!(relations.supertype(&fx.store, &fx.object()).unwrap(), Type::NONE);
    assert!(relations
        .direct_supertypes(&fx.store, &fx.object())
        .unwrap()
        .is_empty());
    assert_eq!(relations.supertype(&fx.store, &Type::int()).unwrap(), Type::NONE);
    assert_eq!(relations.supertype(&fx.store, &Type::Error).unwrap(), Type::Error);
}

#[test]
fn raw_types_have_erased_supertypes() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let raw = fx.ty("java.util.ArrayList", vec![]);

    let sup = relations.supertype(&fx.store, &raw).unwrap();
    assert_eq!(sup, fx.ty("java.util.AbstractList", vec![]));
    assert_eq!(
        fx.format_all(&relations.interfaces(&fx.store, &raw).unwrap()),
        vec!["List", "RandomAccess", "Cloneable", "Serializable"]
    );
}

#[test]
fn array_supertypes_follow_the_component() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let array_top = Type::Intersection(vec![
        fx.object(),
        fx.ty("java.io.Serializable", vec![]),
        fx.ty("Cloneable", vec![]),
    ]);

    let sup = |ty: Type| relations.supertype(&fx.store, &ty).unwrap();
    assert_eq!(sup(Type::array(Type::int())), array_top);
    assert_eq!(sup(Type::array(fx.object())), array_top);
    assert_eq!(sup(Type::array(fx.string())), Type::array(fx.object()));
    assert_eq!(sup(Type::array(fx.integer())), Type::array(fx.number()));
}

#[test]
fn variables_and_intersections_split_class_and_interface_bounds() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let mut cx = TyContext::new(&fx.store);
    let comparable_string = fx.ty("java.lang.Comparable", vec![fx.string()]);
    let comparable_number = fx.ty("java.lang.Comparable", vec![fx.number()]);

    let n = Type::TypeVar(fx.bounded_n);
    assert_eq!(relations.supertype(&fx.store, &n).unwrap(), fx.number());
    assert!(relations.interfaces(&fx.store, &n).unwrap().is_empty());

    let c = Type::TypeVar(cx.add_type_param("C", vec![comparable_string.clone()], None));
    assert_eq!(relations.supertype(&cx, &c).unwrap(), fx.object());
    assert_eq!(
        relations.interfaces(&cx, &c).unwrap(),
        vec![comparable_string.clone()]
    );

    let mixed = Type::Intersection(vec![fx.number(), comparable_number.clone()]);
    assert_eq!(relations.supertype(&fx.store, &mixed).unwrap(), fx.number());
    assert_eq!(
        relations.interfaces(&fx.store, &mixed).unwrap(),
        vec![comparable_number]
    );

    let interfaces_only = Type::Intersection(vec![
        comparable_string.clone(),
        fx.ty("java.io.Serializable", vec![]),
    ]);
    assert_eq!(
        relations.supertype(&fx.store, &interfaces_only).unwrap(),
        fx.object()
    );
    assert_eq!(relations.interfaces(&fx.store, &interfaces_only).unwrap().len(), 2);
}

#[test]
fn as_super_finds_the_matching_instantiation() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let as_super = |ty: &Type, class: &str| relations.as_super(&fx.store, ty, fx.id(class)).unwrap();

    assert_eq!(
        as_super(&fx.array_list_of(fx.string()), "java.lang.Iterable"),
        Some(fx.ty("java.lang.Iterable", vec![fx.string()]))
    );
    assert_eq!(as_super(&fx.array_list_of(fx.string()), "java.util.Map"), None);

    let color = fx.ty("test.Color", vec![]);
    assert_eq!(
        as_super(&color, "java.lang.Enum"),
        Some(fx.ty("java.lang.Enum", vec![color.clone()]))
    );
    assert_eq!(
        as_super(&color, "java.lang.Comparable"),
        Some(fx.ty("java.lang.Comparable", vec![color.clone()]))
    );

    assert_eq!(
        as_super(&Type::TypeVar(fx.bounded_n), "java.io.Serializable"),
        Some(fx.ty("java.io.Serializable", vec![]))
    );
    assert_eq!(
        as_super(&Type::array(fx.string()), "Cloneable"),
        Some(fx.ty("Cloneable", vec![]))
    );
    assert_eq!(as_super(&Type::array(fx.string()), "Number"), None);
    assert_eq!(as_super(&Type::Error, "Number"), Some(Type::Error));
    assert_eq!(as_super(&Type::int(), "Number"), None);
}

#[test]
fn as_outer_super_searches_enclosing_types() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let box_string = fx.ty("test.Box", vec![fx.string()]);
    let inner = Type::nested(box_string.clone(), fx.id("test.Box.Inner"), vec![]);
    let box_id = fx.id("test.Box");

    assert_eq!(relations.as_super(&fx.store, &inner, box_id).unwrap(), None);
    assert_eq!(
        relations.as_outer_super(&fx.store, &inner, box_id).unwrap(),
        Some(box_string)
    );

    let missing = ClassId::from_raw(50_000);
    assert_eq!(
        relations.as_super(&fx.store, &inner, missing).unwrap_err(),
        TypeError::UnknownClass(missing)
    );
}

#[test]
fn cyclic_interface_graphs_terminate() {
    // interface A extends B {}  interface B extends A {}
    let mut store = TypeStore::default();
    let a = store.intern_class_id("test.A");
    let b = store.intern_class_id("test.B");
    for (id, name, parent) in [(a, "test.A", b), (b, "test.B", a)] {
        store.define_class(
            id,
            ClassDef {
                interfaces: vec![Type::class(parent, vec![])],
                ..ClassDef::new(name, ClassKind::Interface)
            },
        );
    }
    let cloneable = store.well_known().cloneable;
    let (a_ty, b_ty) = (Type::class(a, vec![]), Type::class(b, vec![]));

    let relations = TypeRelations::builder().max_depth(32).build().unwrap();
    assert_eq!(relations.as_super(&store, &a_ty, cloneable).unwrap(), None);
    assert!(relations.is_subtype(&store, &a_ty, &b_ty).unwrap());
    assert!(!relations
        .is_subtype(&store, &a_ty, &Type::class(cloneable, vec![]))
        .unwrap());
    assert!(relations.rank(&store, &a_ty).unwrap() >= 1);

    let object = Type::class(store.well_known().object, vec![]);
    let defaults = TypeRelations::new();
    for ty in [&a_ty, &b_ty] {
        let closure = defaults.closure(&store, ty).unwrap();
        assert_eq!(&closure[0], ty);
        assert_eq!(closure.len(), 3);
        for member in [&a_ty, &b_ty, &object] {
            assert!(closure.contains(member));
        }
    }

    let serializable = Type::class(store.well_known().serializable, vec![]);
    let mut cx = TyContext::new(&store);
    assert_eq!(
        defaults.glb(&mut cx, &a_ty, &serializable).unwrap(),
        Type::Intersection(vec![a_ty.clone(), serializable])
    );
}
