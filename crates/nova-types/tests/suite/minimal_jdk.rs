use nova_types::{format_type, PrimitiveType, Type, TypeEnv, TypeStore};

use pretty_assertions::assert_eq;

#[test]
fn default_store_defines_the_java_lang_core() {
    let store = TypeStore::default();
    let well_known = store.well_known();

    for (name, id) in [
        ("Object", well_known.object),
        ("String", well_known.string),
        ("Cloneable", well_known.cloneable),
        ("java.io.Serializable", well_known.serializable),
        ("Number", well_known.number),
    ] {
        assert_eq!(store.lookup_class(name), Some(id), "{name}");
    }
    assert_eq!(store.lookup_class("java.util.List"), None);

    for primitive in PrimitiveType::ALL {
        let boxed = well_known.boxed(primitive);
        let def = store.class(boxed).unwrap();
        assert_eq!(well_known.unboxed(boxed), Some(primitive));
        let numeric_super = def
            .super_class
            .as_ref()
            .is_some_and(|sup| *sup == Type::class(well_known.number, vec![]));
        // `Boolean` and `Character` extend `Object` directly.
        let expected = !matches!(primitive, PrimitiveType::Boolean | PrimitiveType::Char);
        assert_eq!(numeric_super, expected, "{}", def.name);
    }
    assert_eq!(well_known.unboxed(well_known.string), None);
}

#[test]
fn arrays_have_exactly_three_class_supertypes() {
    let store = TypeStore::default();
    let well_known = store.well_known();

    let supertypes: Vec<_> = [
        well_known.object,
        well_known.cloneable,
        well_known.serializable,
        well_known.string,
        well_known.number,
    ]
    .into_iter()
    .filter(|id| well_known.is_array_supertype(*id))
    .collect();
    assert_eq!(
        supertypes,
        vec![well_known.object, well_known.cloneable, well_known.serializable]
    );
}

#[test]
fn collections_are_declared_with_their_generic_supertypes() {
    let store = TypeStore::with_minimal_jdk();
    let array_list = store.lookup_class("java.util.ArrayList").unwrap();
    let def = store.class(array_list).unwrap();

    assert_eq!(
        format_type(&store, def.super_class.as_ref().unwrap()),
        "AbstractList<E>"
    );
    let interfaces: Vec<_> = def
        .interfaces
        .iter()
        .map(|ty| format_type(&store, ty))
        .collect();
    assert_eq!(
        interfaces,
        vec!["List<E>", "RandomAccess", "Cloneable", "Serializable"]
    );

    // Interfaces declare no superclass.
    let list = store.lookup_class("java.util.List").unwrap();
    assert_eq!(store.class(list).unwrap().super_class, None);
    assert_eq!(
        store.lookup_class_in_module("java.base", "java.util.List"),
        Some(list)
    );
}

#[test]
fn enum_is_f_bounded() {
    let store = TypeStore::with_minimal_jdk();
    let enum_ = store.lookup_class("java.lang.Enum").unwrap();
    let e = store.class(enum_).unwrap().type_params[0];

    let bounds = &store.type_param(e).unwrap().upper_bounds;
    assert_eq!(bounds, &vec![Type::class(enum_, vec![Type::TypeVar(e)])]);
    assert_eq!(format_type(&store, &bounds[0]), "Enum<E>");
}
