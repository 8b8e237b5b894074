use nova_type_relations::{TypeError, TypeRelations};
use nova_types::{Type, TypeKind, TypeStore};
use pretty_assertions::assert_eq;

use super::fixtures::Fixture;

#[test]
fn closure_is_ordered_by_rank_then_name() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();

    let closure = relations
        .closure(&fx.store, &fx.array_list_of(fx.string()))
        .unwrap();
    assert_eq!(
        fx.format_all(&closure),
        vec![
            "ArrayList<String>",
            "AbstractList<String>",
            "List<String>",
            "AbstractCollection<String>",
            "Collection<String>",
            "RandomAccess",
            "Iterable<String>",
            "Cloneable",
            "Serializable",
            "Object",
        ]
    );
}

#[test]
fn ranks_measure_the_longest_path_to_object() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let rank = |ty: Type| relations.rank(&fx.store, &ty).unwrap();

    assert_eq!(rank(fx.object()), 0);
    assert_eq!(rank(fx.ty("Cloneable", vec![])), 1);
    assert_eq!(rank(fx.number()), 2);
    assert_eq!(rank(fx.integer()), 3);
    assert_eq!(rank(fx.array_list_of(fx.string())), 5);
    // Enum<E extends Enum<E>> does not loop.
    assert_eq!(rank(fx.ty("test.Color", vec![])), 3);
}

#[test]
fn precedence_puts_subclasses_first() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();

    assert!(relations
        .precedes(&fx.store, &fx.integer(), &fx.number())
        .unwrap());
    assert!(!relations
        .precedes(&fx.store, &fx.number(), &fx.integer())
        .unwrap());
    // Equal ranks: descending qualified name.
    let cloneable = fx.ty("java.lang.Cloneable", vec![]);
    let serializable = fx.ty("java.io.Serializable", vec![]);
    assert!(relations.precedes(&fx.store, &cloneable, &serializable).unwrap());
    assert!(!relations.precedes(&fx.store, &serializable, &cloneable).unwrap());
    // Type variables come before classes.
    let n = Type::TypeVar(fx.bounded_n);
    assert!(relations.precedes(&fx.store, &n, &fx.number()).unwrap());
    assert!(!relations.precedes(&fx.store, &fx.number(), &n).unwrap());
}

#[test]
fn closure_of_a_type_variable_starts_with_the_variable() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();

    let n = Type::TypeVar(fx.bounded_n);
    let closure = relations.closure(&fx.store, &n).unwrap();
    assert_eq!(
        fx.format_all(&closure),
        vec!["N", "Number", "Serializable", "Object"]
    );
}

#[test]
fn closure_min_keeps_classes_then_interfaces() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();

    let closure = relations
        .closure(&fx.store, &fx.array_list_of(fx.string()))
        .unwrap();
    let min = relations.closure_min(&fx.store, &closure).unwrap();
    assert_eq!(fx.format_all(&min), vec!["ArrayList<String>"]);

    let comparable = fx.ty("java.lang.Comparable", vec![fx.string()]);
    let serializable = fx.ty("java.io.Serializable", vec![]);
    let min = relations
        .closure_min(
            &fx.store,
            &[fx.number(), comparable.clone(), serializable, fx.object()],
        )
        .unwrap();
    assert_eq!(min, vec![fx.number(), comparable]);
}

#[test]
fn closures_are_cached_per_store_snapshot() {
    let mut store = TypeStore::with_minimal_jdk();
    let relations = TypeRelations::new();
    let string = Type::class(nova_types::TypeEnv::well_known(&store).string, vec![]);

    let first = relations.closure(&store, &string).unwrap();
    let cached = relations.cached_closures();
    assert!(cached > 0);
    let second = relations.closure(&store, &string).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(relations.cached_closures(), cached);

    // Any mutation changes the snapshot identity.
    store.add_class(nova_types::ClassDef::new(
        "test.Unrelated",
        nova_types::ClassKind::Class,
    ));
    let third = relations.closure(&store, &string).unwrap();
    assert!(!std::sync::Arc::ptr_eq(&first, &third));
    assert_eq!(&*first, &*third);

    relations.clear_closure_cache();
    assert_eq!(relations.cached_closures(), 0);
}

#[test]
fn a_full_cache_is_flushed() {
    let fx = Fixture::new();
    let relations = TypeRelations::builder()
        .closure_cache_capacity(2)
        .build()
        .unwrap();

    relations
        .closure(&fx.store, &fx.array_list_of(fx.string()))
        .unwrap();
    assert!(relations.cached_closures() <= 2);

    let uncached = TypeRelations::builder()
        .closure_cache_capacity(0)
        .build()
        .unwrap();
    uncached.closure(&fx.store, &fx.string()).unwrap();
    assert_eq!(uncached.cached_closures(), 0);
}

#[test]
fn closure_is_only_defined_for_class_like_types() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();

    assert_eq!(
        relations.closure(&fx.store, &Type::int()).unwrap_err(),
        TypeError::IllegalArgument {
            operation: "closure",
            found: TypeKind::Primitive,
        }
    );
    assert_eq!(
        &*relations.closure(&fx.store, &Type::Error).unwrap(),
        &[Type::Error]
    );
}
