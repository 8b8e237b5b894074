use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use nova_types::{
    ClassDef, ClassId, PrimitiveType, TyContext, Type, TypeEnv, TypeParamDef, TypeVarId,
    WellKnownTypes,
};

use crate::{Mapped, TypeError, TypeRelations};

/// A declaration currently being walked by `as_super` or `closure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SeenDecl {
    Class(ClassId),
    TypeVar(TypeVarId),
}

/// State of one top-level relation query.
///
/// Visitors are stateless and shared; everything a single query needs to remember (subtype loop
/// detection, the `as_super` and closure seen-sets, rank memo, the depth guard, fresh capture variables) lives
/// here and is dropped when the query returns.
pub(crate) struct RelationCx<'a, 'env> {
    relations: &'a TypeRelations,
    env: &'a mut TyContext<'env>,
    operation: &'static str,
    depth: u32,
    exhausted: bool,
    pub(crate) subtype_in_progress: HashSet<(Type, Type)>,
    pub(crate) as_super_seen: HashSet<SeenDecl>,
    pub(crate) closure_in_progress: HashSet<SeenDecl>,
    /// Bumped whenever a closure walk is cut short at a declaration already in progress.
    pub(crate) closure_cuts: u32,
    pub(crate) ranks: HashMap<ClassId, u32>,
    pub(crate) rank_in_progress: HashSet<ClassId>,
}

impl<'a, 'env> RelationCx<'a, 'env> {
    pub(crate) fn new(
        relations: &'a TypeRelations,
        env: &'a mut TyContext<'env>,
        operation: &'static str,
    ) -> Self {
        Self {
            relations,
            env,
            operation,
            depth: 0,
            exhausted: false,
            subtype_in_progress: HashSet::new(),
            as_super_seen: HashSet::new(),
            closure_in_progress: HashSet::new(),
            closure_cuts: 0,
            ranks: HashMap::new(),
            rank_in_progress: HashSet::new(),
        }
    }

    /// Converts the outcome of the query into a result, failing if the depth guard tripped at
    /// any point.
    pub(crate) fn finish<R>(self, value: R) -> Result<R, TypeError> {
        if self.exhausted {
            return Err(TypeError::RecursionLimit {
                operation: self.operation,
                limit: self.relations.config().max_depth,
            });
        }
        Ok(value)
    }

    /// Whether the depth guard has tripped; results computed since then are truncated.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Runs `f` one level deeper, or returns `fallback` once the configured depth is exceeded.
    pub(crate) fn descend<R>(&mut self, fallback: R, f: impl FnOnce(&mut Self) -> R) -> R {
        let limit = self.relations.config().max_depth;
        if self.exhausted {
            return fallback;
        }
        if self.depth >= limit {
            self.exhausted = true;
            tracing::warn!(
                target: "nova.types",
                operation = self.operation,
                limit,
                "type relation exceeded the recursion limit"
            );
            return fallback;
        }
        self.depth += 1;
        let value = f(self);
        self.depth -= 1;
        value
    }

    pub(crate) fn env(&self) -> &TyContext<'env> {
        &*self.env
    }

    pub(crate) fn env_mut(&mut self) -> &mut TyContext<'env> {
        &mut *self.env
    }

    /// The declaration source underneath the per-query context. Class declarations never live in
    /// the context, so borrows from here do not tie up `self`.
    pub(crate) fn decls(&self) -> &'env dyn TypeEnv {
        self.env.base()
    }

    pub(crate) fn class(&self, id: ClassId) -> Option<&'env ClassDef> {
        self.decls().class(id)
    }

    pub(crate) fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.env.type_param(id)
    }

    pub(crate) fn well_known(&self) -> &'env WellKnownTypes {
        self.decls().well_known()
    }

    pub(crate) fn object(&self) -> Type {
        Type::class(self.well_known().object, Vec::new())
    }

    pub(crate) fn is_object(&self, ty: &Type) -> bool {
        matches!(ty, Type::Class(class) if class.def == self.well_known().object)
    }

    pub(crate) fn upper_bound(&self, id: TypeVarId) -> Type {
        nova_types::upper_bound(&*self.env, id)
    }

    /// The lower bound of a capture variable, if it has one.
    pub(crate) fn capture_lower_bound(&self, id: TypeVarId) -> Option<Type> {
        let def = self.type_param(id)?;
        if !def.is_capture() {
            return None;
        }
        def.lower_bound.clone()
    }

    pub(crate) fn is_interface(&self, ty: &Type) -> bool {
        nova_types::is_interface_type(self.decls(), ty)
    }

    pub(crate) fn is_raw(&self, ty: &Type) -> bool {
        nova_types::is_raw(self.decls(), ty)
    }

    pub(crate) fn qualified_name(&self, id: ClassId) -> &'env str {
        self.class(id).map_or("", |def| def.name.as_str())
    }

    // Sibling relations. Every call goes through the depth guard.

    pub(crate) fn erase(&mut self, ty: &Type) -> Mapped {
        let rel = self.relations;
        self.descend(Mapped::Unchanged, |cx| rel.erase.visit(cx, ty))
    }

    pub(crate) fn erasure(&mut self, ty: &Type) -> Type {
        self.erase(ty).into_type(ty)
    }

    pub(crate) fn supertype(&mut self, ty: &Type) -> Type {
        let rel = self.relations;
        self.descend(Type::Error, |cx| rel.supertype.visit(cx, ty))
    }

    pub(crate) fn interfaces(&mut self, ty: &Type) -> Vec<Type> {
        let rel = self.relations;
        self.descend(Vec::new(), |cx| rel.interfaces.visit(cx, ty))
    }

    pub(crate) fn bounding_class(&mut self, ty: &Type) -> Type {
        let rel = self.relations;
        self.descend(Type::Error, |cx| rel.bounding_class.visit(cx, ty))
    }

    pub(crate) fn as_super(&mut self, ty: &Type, target: ClassId) -> Option<Type> {
        let rel = self.relations;
        self.descend(None, |cx| rel.as_super.visit(cx, ty, target))
    }

    pub(crate) fn as_outer_super(&mut self, ty: &Type, target: ClassId) -> Option<Type> {
        let rel = self.relations;
        self.descend(None, |cx| rel.as_super.visit_outer(cx, ty, target))
    }

    pub(crate) fn substitute(&mut self, ty: &Type, from: &[TypeVarId], to: &[Type]) -> Mapped {
        let rel = self.relations;
        self.descend(Mapped::Unchanged, |cx| rel.substitute.visit(cx, ty, from, to))
    }

    pub(crate) fn contains(&mut self, t: &Type, s: &Type) -> bool {
        let rel = self.relations;
        self.descend(false, |cx| rel.contains.visit(cx, t, s))
    }

    pub(crate) fn capture(&mut self, ty: &Type) -> Mapped {
        let rel = self.relations;
        self.descend(Mapped::Unchanged, |cx| rel.capture.visit(cx, ty))
    }

    pub(crate) fn glb(&mut self, t: &Type, s: &Type) -> Type {
        let rel = self.relations;
        self.descend(Type::Error, |cx| rel.glb.visit(cx, t, s))
    }

    /// The public same-type relation, configured by [`crate::RelationsConfig`].
    pub(crate) fn is_same_type(&mut self, t: &Type, s: &Type) -> bool {
        let rel = self.relations;
        self.descend(false, |cx| rel.same_type.visit(cx, t, s))
    }

    /// Same-type as used by containment and closure bookkeeping: wildcards compare structurally
    /// and annotations are ignored.
    pub(crate) fn is_same_type_internal(&mut self, t: &Type, s: &Type) -> bool {
        let rel = self.relations;
        self.descend(false, |cx| rel.internal_same_type.visit(cx, t, s))
    }

    pub(crate) fn closure(&mut self, ty: &Type) -> Arc<[Type]> {
        let rel = self.relations;
        self.descend(Arc::from(Vec::new()), |cx| rel.closure.closure(cx, ty))
    }

    pub(crate) fn union(&mut self, a: &[Type], b: &[Type]) -> Vec<Type> {
        let rel = self.relations;
        self.descend(Vec::new(), |cx| rel.closure.union(cx, a, b))
    }

    pub(crate) fn closure_min(&mut self, types: &[Type]) -> Vec<Type> {
        let rel = self.relations;
        self.descend(Vec::new(), |cx| rel.closure.closure_min(cx, types))
    }

    pub(crate) fn precedes(&mut self, a: &Type, b: &Type) -> bool {
        let rel = self.relations;
        self.descend(false, |cx| rel.precedes.visit(cx, a, b))
    }

    pub(crate) fn rank(&mut self, ty: &Type) -> u32 {
        let rel = self.relations;
        self.descend(0, |cx| rel.precedes.rank(cx, ty))
    }

    pub(crate) fn is_subtype(&mut self, t: &Type, s: &Type) -> bool {
        let rel = self.relations;
        self.descend(false, |cx| rel.subtype.visit(cx, t, s, true))
    }

    pub(crate) fn is_subtype_no_capture(&mut self, t: &Type, s: &Type) -> bool {
        let rel = self.relations;
        self.descend(false, |cx| rel.subtype.visit(cx, t, s, false))
    }

    pub(crate) fn is_subtype_unchecked(&mut self, t: &Type, s: &Type) -> bool {
        let rel = self.relations;
        self.descend(false, |cx| rel.unchecked.visit(cx, t, s))
    }

    pub(crate) fn is_convertible(&mut self, t: &Type, s: &Type) -> bool {
        let rel = self.relations;
        self.descend(false, |cx| rel.convertible.visit(cx, t, s))
    }

    pub(crate) fn is_assignable(&mut self, t: &Type, s: &Type, constant: Option<i32>) -> bool {
        let rel = self.relations;
        self.descend(false, |cx| rel.assignable.visit(cx, t, s, constant))
    }

    pub(crate) fn unboxed_type(&mut self, ty: &Type) -> Option<PrimitiveType> {
        let rel = self.relations;
        self.descend(None, |cx| rel.convertible.unboxed_type(cx, ty))
    }
}
