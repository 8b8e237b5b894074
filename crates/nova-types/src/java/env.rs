use std::fmt;

use crate::{ClassDef, ClassId, EnvKey, Type, TypeEnv, TypeParamDef, TypeVarId, WildcardBound};

/// Per-invocation typing context.
///
/// Capture conversion and alpha renaming need fresh type variables. Those are allocated here,
/// not in the shared [`crate::TypeStore`], so the store stays read-only while relations run and
/// callers decide how long synthesized variables live.
///
/// Contexts can be layered: a context created over another context allocates ids above the
/// ones its base already uses, so variables from both remain resolvable.
pub struct TyContext<'env> {
    base: &'env dyn TypeEnv,
    first_local: u32,
    locals: Vec<TypeParamDef>,
}

impl fmt::Debug for TyContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TyContext")
            .field("first_local", &self.first_local)
            .field("locals", &self.locals)
            .finish_non_exhaustive()
    }
}

impl<'env> TyContext<'env> {
    pub fn new(base: &'env dyn TypeEnv) -> Self {
        Self {
            base,
            first_local: base.next_context_local(),
            locals: Vec::new(),
        }
    }

    pub fn base(&self) -> &'env dyn TypeEnv {
        self.base
    }

    /// Clear all context-local allocations.
    ///
    /// Callers that want deterministic IDs across repeated invocations should prefer creating a
    /// fresh context per invocation, but `reset` can be useful when reusing a context object.
    pub fn reset(&mut self) {
        self.locals.clear();
    }

    pub fn local_count(&self) -> usize {
        self.locals.len()
    }

    /// Allocate a fresh context-local type parameter.
    pub fn add_type_param(
        &mut self,
        name: impl Into<String>,
        upper_bounds: Vec<Type>,
        lower_bound: Option<Type>,
    ) -> TypeVarId {
        let index = self.first_local + self.locals.len() as u32;
        self.locals.push(TypeParamDef {
            name: name.into(),
            upper_bounds,
            lower_bound,
            captured: None,
        });
        TypeVarId::new_context_local(index)
    }

    /// Allocate a capture variable for `wildcard` (JLS 5.1.10).
    ///
    /// The variable starts out bounded by `Object`; its real bounds usually depend on the other
    /// captures of the same type, so they are installed with [`TyContext::set_bounds`] once every
    /// capture variable of the type exists.
    pub fn new_capture_var(&mut self, wildcard: WildcardBound) -> TypeVarId {
        let index = self.first_local + self.locals.len() as u32;
        let object = Type::class(self.base.well_known().object, Vec::new());
        self.locals.push(TypeParamDef {
            name: format!("CAP#{}", index + 1),
            upper_bounds: vec![object],
            lower_bound: None,
            captured: Some(wildcard),
        });
        TypeVarId::new_context_local(index)
    }

    /// Install the bounds of a variable owned by this context.
    ///
    /// Returns `false` (and changes nothing) for variables this context does not own.
    pub fn set_bounds(
        &mut self,
        id: TypeVarId,
        upper_bounds: Vec<Type>,
        lower_bound: Option<Type>,
    ) -> bool {
        let Some(def) = self.local_mut(id) else {
            return false;
        };
        def.upper_bounds = upper_bounds;
        def.lower_bound = lower_bound;
        true
    }

    fn local_index(&self, id: TypeVarId) -> Option<usize> {
        let index = id.context_local_index()?;
        let index = index.checked_sub(self.first_local as usize)?;
        (index < self.locals.len()).then_some(index)
    }

    fn local_mut(&mut self, id: TypeVarId) -> Option<&mut TypeParamDef> {
        let index = self.local_index(id)?;
        self.locals.get_mut(index)
    }
}

impl TypeEnv for TyContext<'_> {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.base.class(id)
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        if let Some(index) = self.local_index(id) {
            return self.locals.get(index);
        }
        self.base.type_param(id)
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.base.lookup_class(name)
    }

    fn lookup_class_in_module(&self, module: &str, name: &str) -> Option<ClassId> {
        self.base.lookup_class_in_module(module, name)
    }

    fn well_known(&self) -> &crate::WellKnownTypes {
        self.base.well_known()
    }

    fn next_context_local(&self) -> u32 {
        self.first_local + self.locals.len() as u32
    }

    fn cache_key(&self) -> Option<EnvKey> {
        self.base.cache_key()
    }
}

impl TypeVarId {
    const CONTEXT_LOCAL_BIT: u32 = 1 << 31;

    pub(crate) fn new_context_local(index: u32) -> Self {
        Self(Self::CONTEXT_LOCAL_BIT | index)
    }

    pub fn is_context_local(self) -> bool {
        (self.0 & Self::CONTEXT_LOCAL_BIT) != 0
    }

    pub(crate) fn context_local_index(self) -> Option<usize> {
        if !self.is_context_local() {
            return None;
        }
        Some((self.0 & !Self::CONTEXT_LOCAL_BIT) as usize)
    }
}
