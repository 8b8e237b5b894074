//! A small, hand-written slice of `java.base`.
//!
//! Only declarations that relation code and tests actually lean on are modelled; members are
//! listed where they are useful for `member_type` style queries.

use crate::{
    ClassDef, ClassId, ClassKind, MethodDef, PrimitiveType, Type, TypeEnv, TypeParamDef,
    TypeStore, TypeVarId, WellKnownTypes,
};

const JAVA_BASE: &str = "java.base";

fn class(id: ClassId, args: Vec<Type>) -> Type {
    Type::class(id, args)
}

fn tv(id: TypeVarId) -> Type {
    Type::TypeVar(id)
}

fn method(name: &str, params: Vec<Type>, return_type: Type) -> MethodDef {
    MethodDef {
        name: name.to_string(),
        type_params: Vec::new(),
        params,
        return_type,
        thrown: Vec::new(),
        is_static: false,
        is_varargs: false,
        is_abstract: false,
    }
}

fn abstract_method(name: &str, params: Vec<Type>, return_type: Type) -> MethodDef {
    MethodDef {
        is_abstract: true,
        ..method(name, params, return_type)
    }
}

#[allow(clippy::too_many_arguments)]
fn declare(
    store: &mut TypeStore,
    id: ClassId,
    name: &str,
    kind: ClassKind,
    type_params: Vec<TypeVarId>,
    super_class: Option<Type>,
    interfaces: Vec<Type>,
    methods: Vec<MethodDef>,
) {
    let object = store.intern_class_id("java.lang.Object");
    let super_class = super_class.or_else(|| (!kind.is_interface()).then(|| class(object, vec![])));
    store.define_class(
        id,
        ClassDef {
            module: Some(JAVA_BASE.to_string()),
            type_params,
            super_class,
            interfaces,
            methods,
            ..ClassDef::new(name, kind)
        },
    );
}

pub(crate) fn define_core(store: &mut TypeStore) -> WellKnownTypes {
    let object = store.intern_class_id("java.lang.Object");
    let serializable = store.intern_class_id("java.io.Serializable");
    let cloneable = store.intern_class_id("java.lang.Cloneable");
    let comparable = store.intern_class_id("java.lang.Comparable");
    let char_sequence = store.intern_class_id("java.lang.CharSequence");
    let string = store.intern_class_id("java.lang.String");
    let number = store.intern_class_id("java.lang.Number");
    let boolean = store.intern_class_id("java.lang.Boolean");
    let byte = store.intern_class_id("java.lang.Byte");
    let short = store.intern_class_id("java.lang.Short");
    let character = store.intern_class_id("java.lang.Character");
    let integer = store.intern_class_id("java.lang.Integer");
    let long = store.intern_class_id("java.lang.Long");
    let float = store.intern_class_id("java.lang.Float");
    let double = store.intern_class_id("java.lang.Double");

    let object_ty = class(object, vec![]);
    let string_ty = class(string, vec![]);

    store.define_class(
        object,
        ClassDef {
            module: Some(JAVA_BASE.to_string()),
            methods: vec![
                method("equals", vec![object_ty.clone()], Type::boolean()),
                method("hashCode", vec![], Type::int()),
                method("toString", vec![], string_ty.clone()),
            ],
            ..ClassDef::new("java.lang.Object", ClassKind::Class)
        },
    );
    declare(store, serializable, "java.io.Serializable", ClassKind::Interface, vec![], None, vec![], vec![]);
    declare(store, cloneable, "java.lang.Cloneable", ClassKind::Interface, vec![], None, vec![], vec![]);

    let comparable_t = store.add_type_param("T", vec![object_ty.clone()]);
    declare(
        store,
        comparable,
        "java.lang.Comparable",
        ClassKind::Interface,
        vec![comparable_t],
        None,
        vec![],
        vec![abstract_method("compareTo", vec![tv(comparable_t)], Type::int())],
    );
    declare(
        store,
        char_sequence,
        "java.lang.CharSequence",
        ClassKind::Interface,
        vec![],
        None,
        vec![],
        vec![abstract_method("length", vec![], Type::int())],
    );
    declare(
        store,
        string,
        "java.lang.String",
        ClassKind::Class,
        vec![],
        None,
        vec![
            class(serializable, vec![]),
            class(comparable, vec![string_ty.clone()]),
            class(char_sequence, vec![]),
        ],
        vec![
            method("length", vec![], Type::int()),
            method("isEmpty", vec![], Type::boolean()),
        ],
    );
    declare(
        store,
        number,
        "java.lang.Number",
        ClassKind::Class,
        vec![],
        None,
        vec![class(serializable, vec![])],
        vec![abstract_method("intValue", vec![], Type::int())],
    );

    let boxes = [
        (boolean, "java.lang.Boolean", PrimitiveType::Boolean, false),
        (byte, "java.lang.Byte", PrimitiveType::Byte, true),
        (short, "java.lang.Short", PrimitiveType::Short, true),
        (character, "java.lang.Character", PrimitiveType::Char, false),
        (integer, "java.lang.Integer", PrimitiveType::Int, true),
        (long, "java.lang.Long", PrimitiveType::Long, true),
        (float, "java.lang.Float", PrimitiveType::Float, true),
        (double, "java.lang.Double", PrimitiveType::Double, true),
    ];
    for (id, name, primitive, numeric) in boxes {
        let value_method = format!("{}Value", primitive.name());
        declare(
            store,
            id,
            name,
            ClassKind::Class,
            vec![],
            numeric.then(|| class(number, vec![])),
            vec![
                class(serializable, vec![]),
                class(comparable, vec![class(id, vec![])]),
            ],
            vec![method(&value_method, vec![], Type::Primitive(primitive))],
        );
    }

    WellKnownTypes {
        object,
        string,
        cloneable,
        serializable,
        number,
        boolean,
        byte,
        short,
        character,
        integer,
        long,
        float,
        double,
    }
}

pub(crate) fn define_collections(store: &mut TypeStore) {
    let well_known = store.well_known().clone();
    let object_ty = class(well_known.object, vec![]);
    let string_ty = class(well_known.string, vec![]);
    let serializable = well_known.serializable;
    let cloneable = well_known.cloneable;
    let comparable = store.intern_class_id("java.lang.Comparable");

    let iterable = store.intern_class_id("java.lang.Iterable");
    let collection = store.intern_class_id("java.util.Collection");
    let list = store.intern_class_id("java.util.List");
    let set = store.intern_class_id("java.util.Set");
    let random_access = store.intern_class_id("java.util.RandomAccess");
    let abstract_collection = store.intern_class_id("java.util.AbstractCollection");
    let abstract_list = store.intern_class_id("java.util.AbstractList");
    let array_list = store.intern_class_id("java.util.ArrayList");
    let map = store.intern_class_id("java.util.Map");
    let map_entry = store.intern_class_id("java.util.Map.Entry");
    let hash_map = store.intern_class_id("java.util.HashMap");
    let function = store.intern_class_id("java.util.function.Function");
    let runnable = store.intern_class_id("java.lang.Runnable");
    let enum_ = store.intern_class_id("java.lang.Enum");

    let iterable_t = store.add_type_param("T", vec![object_ty.clone()]);
    declare(store, iterable, "java.lang.Iterable", ClassKind::Interface, vec![iterable_t], None, vec![], vec![]);

    let collection_e = store.add_type_param("E", vec![object_ty.clone()]);
    declare(
        store,
        collection,
        "java.util.Collection",
        ClassKind::Interface,
        vec![collection_e],
        None,
        vec![class(iterable, vec![tv(collection_e)])],
        vec![
            abstract_method("size", vec![], Type::int()),
            abstract_method("add", vec![tv(collection_e)], Type::boolean()),
            abstract_method("contains", vec![object_ty.clone()], Type::boolean()),
        ],
    );

    let list_e = store.add_type_param("E", vec![object_ty.clone()]);
    let to_array_t = store.add_type_param("T", vec![object_ty.clone()]);
    declare(
        store,
        list,
        "java.util.List",
        ClassKind::Interface,
        vec![list_e],
        None,
        vec![class(collection, vec![tv(list_e)])],
        vec![
            abstract_method("get", vec![Type::int()], tv(list_e)),
            abstract_method("add", vec![tv(list_e)], Type::boolean()),
            abstract_method("set", vec![Type::int(), tv(list_e)], tv(list_e)),
            MethodDef {
                type_params: vec![to_array_t],
                ..abstract_method(
                    "toArray",
                    vec![Type::array(tv(to_array_t))],
                    Type::array(tv(to_array_t)),
                )
            },
            MethodDef {
                is_static: true,
                ..method("of", vec![], class(list, vec![]))
            },
        ],
    );

    let set_e = store.add_type_param("E", vec![object_ty.clone()]);
    declare(
        store,
        set,
        "java.util.Set",
        ClassKind::Interface,
        vec![set_e],
        None,
        vec![class(collection, vec![tv(set_e)])],
        vec![],
    );
    declare(store, random_access, "java.util.RandomAccess", ClassKind::Interface, vec![], None, vec![], vec![]);

    let abstract_collection_e = store.add_type_param("E", vec![object_ty.clone()]);
    declare(
        store,
        abstract_collection,
        "java.util.AbstractCollection",
        ClassKind::Class,
        vec![abstract_collection_e],
        None,
        vec![class(collection, vec![tv(abstract_collection_e)])],
        vec![],
    );

    let abstract_list_e = store.add_type_param("E", vec![object_ty.clone()]);
    declare(
        store,
        abstract_list,
        "java.util.AbstractList",
        ClassKind::Class,
        vec![abstract_list_e],
        Some(class(abstract_collection, vec![tv(abstract_list_e)])),
        vec![class(list, vec![tv(abstract_list_e)])],
        vec![],
    );

    let array_list_e = store.add_type_param("E", vec![object_ty.clone()]);
    declare(
        store,
        array_list,
        "java.util.ArrayList",
        ClassKind::Class,
        vec![array_list_e],
        Some(class(abstract_list, vec![tv(array_list_e)])),
        vec![
            class(list, vec![tv(array_list_e)]),
            class(random_access, vec![]),
            class(cloneable, vec![]),
            class(serializable, vec![]),
        ],
        vec![],
    );

    let map_k = store.add_type_param("K", vec![object_ty.clone()]);
    let map_v = store.add_type_param("V", vec![object_ty.clone()]);
    declare(
        store,
        map,
        "java.util.Map",
        ClassKind::Interface,
        vec![map_k, map_v],
        None,
        vec![],
        vec![
            abstract_method("get", vec![object_ty.clone()], tv(map_v)),
            abstract_method("put", vec![tv(map_k), tv(map_v)], tv(map_v)),
        ],
    );

    let entry_k = store.add_type_param("K", vec![object_ty.clone()]);
    let entry_v = store.add_type_param("V", vec![object_ty.clone()]);
    store.define_class(
        map_entry,
        ClassDef {
            module: Some(JAVA_BASE.to_string()),
            enclosing: Some(map),
            is_static: true,
            type_params: vec![entry_k, entry_v],
            methods: vec![
                abstract_method("getKey", vec![], tv(entry_k)),
                abstract_method("getValue", vec![], tv(entry_v)),
            ],
            ..ClassDef::new("java.util.Map.Entry", ClassKind::Interface)
        },
    );

    let hash_map_k = store.add_type_param("K", vec![object_ty.clone()]);
    let hash_map_v = store.add_type_param("V", vec![object_ty.clone()]);
    declare(
        store,
        hash_map,
        "java.util.HashMap",
        ClassKind::Class,
        vec![hash_map_k, hash_map_v],
        None,
        vec![
            class(map, vec![tv(hash_map_k), tv(hash_map_v)]),
            class(cloneable, vec![]),
            class(serializable, vec![]),
        ],
        vec![],
    );

    let function_t = store.add_type_param("T", vec![object_ty.clone()]);
    let function_r = store.add_type_param("R", vec![object_ty.clone()]);
    declare(
        store,
        function,
        "java.util.function.Function",
        ClassKind::Interface,
        vec![function_t, function_r],
        None,
        vec![],
        vec![abstract_method("apply", vec![tv(function_t)], tv(function_r))],
    );

    declare(
        store,
        runnable,
        "java.lang.Runnable",
        ClassKind::Interface,
        vec![],
        None,
        vec![],
        vec![abstract_method("run", vec![], Type::VOID)],
    );

    // `E extends Enum<E>`: the bound mentions the variable, so it is installed after allocation.
    let enum_e = store.add_type_param("E", vec![]);
    store.define_type_param(
        enum_e,
        TypeParamDef::new("E", vec![class(enum_, vec![tv(enum_e)])]),
    );
    store.define_class(
        enum_,
        ClassDef {
            module: Some(JAVA_BASE.to_string()),
            type_params: vec![enum_e],
            super_class: Some(object_ty),
            interfaces: vec![
                class(comparable, vec![tv(enum_e)]),
                class(serializable, vec![]),
            ],
            methods: vec![
                method("ordinal", vec![], Type::int()),
                method("name", vec![], string_ty),
            ],
            ..ClassDef::new("java.lang.Enum", ClassKind::Class)
        },
    );
}
