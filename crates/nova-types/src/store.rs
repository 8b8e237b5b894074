use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::java::minimal_jdk;
use crate::{ClassDef, ClassId, Type, TypeEnv, TypeParamDef, TypeVarId, WellKnownTypes};

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`TypeStore`] snapshot.
///
/// Two keys are equal only if they come from the same store (clones get a new identity) with no
/// mutation in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvKey {
    pub store: u64,
    pub revision: u64,
}

/// An arena of class and type parameter declarations.
#[derive(Debug)]
pub struct TypeStore {
    id: u64,
    revision: u64,
    classes: Vec<Option<ClassDef>>,
    class_names: HashMap<String, ClassId>,
    type_params: Vec<TypeParamDef>,
    well_known: WellKnownTypes,
}

impl Clone for TypeStore {
    fn clone(&self) -> Self {
        Self {
            id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            revision: self.revision,
            classes: self.classes.clone(),
            class_names: self.class_names.clone(),
            type_params: self.type_params.clone(),
            well_known: self.well_known.clone(),
        }
    }
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeStore {
    /// A store containing the `java.lang` core: `Object`, `String`, `Number`, `Comparable`,
    /// `Cloneable`, `java.io.Serializable` and the eight box classes.
    pub fn new() -> Self {
        let placeholder = ClassId::from_raw(0);
        let mut store = Self {
            id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            revision: 0,
            classes: Vec::new(),
            class_names: HashMap::new(),
            type_params: Vec::new(),
            well_known: WellKnownTypes {
                object: placeholder,
                string: placeholder,
                cloneable: placeholder,
                serializable: placeholder,
                number: placeholder,
                boolean: placeholder,
                byte: placeholder,
                short: placeholder,
                character: placeholder,
                integer: placeholder,
                long: placeholder,
                float: placeholder,
                double: placeholder,
            },
        };
        store.well_known = minimal_jdk::define_core(&mut store);
        store
    }

    /// [`TypeStore::new`] plus the collection interfaces and classes of `java.util`,
    /// `java.util.function.Function`, `Runnable`, `Iterable` and `Enum`.
    pub fn with_minimal_jdk() -> Self {
        let mut store = Self::new();
        minimal_jdk::define_collections(&mut store);
        store
    }

    /// Reserve an id for `name` without defining it, so self-referential declarations can refer
    /// to it before they exist.
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.class_names.get(name) {
            return *id;
        }
        self.revision += 1;
        let id = ClassId::from_raw(self.classes.len() as u32);
        self.classes.push(None);
        self.class_names.insert(name.to_string(), id);
        id
    }

    pub fn define_class(&mut self, id: ClassId, def: ClassDef) {
        self.revision += 1;
        if id.index() >= self.classes.len() {
            self.classes.resize(id.index() + 1, None);
        }
        self.class_names.insert(def.name.clone(), id);
        self.classes[id.index()] = Some(def);
    }

    /// Define `def` unless a class with the same name is already defined; returns the id either
    /// way.
    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        if let Some(id) = self.class_id(&def.name) {
            return id;
        }
        self.upsert_class(def)
    }

    /// Define `def`, replacing any previous declaration with the same name while keeping its id.
    pub fn upsert_class(&mut self, def: ClassDef) -> ClassId {
        let id = self.intern_class_id(&def.name);
        self.define_class(id, def);
        id
    }

    pub fn class_mut(&mut self, id: ClassId) -> Option<&mut ClassDef> {
        self.revision += 1;
        self.classes.get_mut(id.index())?.as_mut()
    }

    /// Exact lookup by qualified name.
    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        let id = *self.class_names.get(name)?;
        self.classes.get(id.index())?.as_ref()?;
        Some(id)
    }

    pub fn add_type_param(&mut self, name: impl Into<String>, upper_bounds: Vec<Type>) -> TypeVarId {
        self.revision += 1;
        let id = TypeVarId::from_raw(self.type_params.len() as u32);
        self.type_params.push(TypeParamDef::new(name, upper_bounds));
        id
    }

    /// Replace the declaration of a type parameter, typically to install a bound that refers to
    /// the parameter itself (`E extends Enum<E>`).
    pub fn define_type_param(&mut self, id: TypeVarId, def: TypeParamDef) {
        self.revision += 1;
        if let Some(slot) = self.type_params.get_mut(id.to_raw() as usize) {
            *slot = def;
        }
    }

    pub fn type_param_count(&self) -> usize {
        self.type_params.len()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.index())?.as_ref()
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        if id.is_context_local() {
            return None;
        }
        self.type_params.get(id.to_raw() as usize)
    }

    /// Qualified lookup, falling back to implicit `java.lang.*` imports for simple names.
    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        if let Some(id) = self.class_id(name) {
            return Some(id);
        }
        if name.contains('.') {
            return None;
        }
        self.class_id(&format!("java.lang.{name}"))
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }

    fn cache_key(&self) -> Option<EnvKey> {
        Some(EnvKey {
            store: self.id,
            revision: self.revision,
        })
    }
}
