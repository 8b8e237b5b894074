use std::sync::Arc;

use nova_types::{
    ClassId, Element, Equality, MemberId, PrimitiveType, TyContext, Type, TypeEnv, TypeVarId,
};

use crate::as_super::AsSuperVisitor;
use crate::capture::{CaptureVisitor, GlbVisitor};
use crate::closure::{PrecedesPredicate, TypeClosureVisitor};
use crate::contains::ContainsTypeVisitor;
use crate::convert::{AssignableVisitor, ConvertibleVisitor};
use crate::erase::EraseVisitor;
use crate::member_type::{MemberInfo, MemberTypeVisitor};
use crate::same_type::SameTypeVisitor;
use crate::substitute::SubstituteVisitor;
use crate::subtype::{SubtypeUncheckedVisitor, SubtypeVisitor};
use crate::supertype::{self, BoundingClassVisitor, InterfacesVisitor, SupertypeVisitor};
use crate::validate::{check_known, check_reference, check_value};
use crate::{ConfigError, Mapped, RelationCx, RelationsConfig, TypeError};

/// The type relation engine.
///
/// Owns one instance of every relation. Relations reach each other through the per-query
/// [`RelationCx`], which borrows this registry, so the mutually recursive visitors are wired by
/// construction and nothing needs to be patched in after the fact.
///
/// Queries that only inspect types take any [`TypeEnv`] and run in a scratch [`TyContext`].
/// Queries that may synthesize type variables (capture, glb, substitution, member types) take the
/// caller's context so the results stay resolvable.
#[derive(Debug)]
pub struct TypeRelations {
    config: RelationsConfig,
    pub(crate) erase: EraseVisitor,
    pub(crate) supertype: SupertypeVisitor,
    pub(crate) interfaces: InterfacesVisitor,
    pub(crate) bounding_class: BoundingClassVisitor,
    pub(crate) as_super: AsSuperVisitor,
    pub(crate) substitute: SubstituteVisitor,
    pub(crate) member_type: MemberTypeVisitor,
    pub(crate) contains: ContainsTypeVisitor,
    pub(crate) capture: CaptureVisitor,
    pub(crate) glb: GlbVisitor,
    pub(crate) same_type: SameTypeVisitor,
    pub(crate) internal_same_type: SameTypeVisitor,
    pub(crate) closure: TypeClosureVisitor,
    pub(crate) precedes: PrecedesPredicate,
    pub(crate) subtype: SubtypeVisitor,
    pub(crate) unchecked: SubtypeUncheckedVisitor,
    pub(crate) convertible: ConvertibleVisitor,
    pub(crate) assignable: AssignableVisitor,
}

impl Default for TypeRelations {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRelations {
    /// An engine with the default configuration.
    pub fn new() -> Self {
        Self::assemble(RelationsConfig::default())
    }

    pub fn builder() -> TypeRelationsBuilder {
        TypeRelationsBuilder::default()
    }

    pub fn from_config(config: RelationsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config))
    }

    fn assemble(config: RelationsConfig) -> Self {
        let source_equality = Equality::new(config.include_annotations);
        Self {
            erase: EraseVisitor,
            supertype: SupertypeVisitor,
            interfaces: InterfacesVisitor,
            bounding_class: BoundingClassVisitor,
            as_super: AsSuperVisitor,
            substitute: SubstituteVisitor,
            member_type: MemberTypeVisitor,
            contains: ContainsTypeVisitor,
            capture: CaptureVisitor,
            glb: GlbVisitor,
            same_type: SameTypeVisitor::new(source_equality, config.wildcards_comparable),
            internal_same_type: SameTypeVisitor::internal(),
            closure: TypeClosureVisitor::new(source_equality, config.closure_cache_capacity),
            precedes: PrecedesPredicate,
            subtype: SubtypeVisitor,
            unchecked: SubtypeUncheckedVisitor,
            convertible: ConvertibleVisitor,
            assignable: AssignableVisitor,
            config,
        }
    }

    pub fn config(&self) -> &RelationsConfig {
        &self.config
    }

    /// Number of memoized supertype closures.
    pub fn cached_closures(&self) -> usize {
        self.closure.cached_len()
    }

    pub fn clear_closure_cache(&self) {
        self.closure.clear_cache();
    }

    fn run<'env, R>(
        &self,
        ctx: &mut TyContext<'env>,
        operation: &'static str,
        f: impl FnOnce(&mut RelationCx<'_, 'env>) -> R,
    ) -> Result<R, TypeError> {
        let mut cx = RelationCx::new(self, ctx, operation);
        let value = f(&mut cx);
        cx.finish(value)
    }

    fn run_scratch<R>(
        &self,
        env: &dyn TypeEnv,
        operation: &'static str,
        f: impl FnOnce(&mut RelationCx<'_, '_>) -> R,
    ) -> Result<R, TypeError> {
        let mut ctx = TyContext::new(env);
        self.run(&mut ctx, operation, f)
    }

    // Subtyping and conversions.

    /// `t <: s`, capture-converting `t` first (JLS 4.10).
    pub fn is_subtype(&self, env: &dyn TypeEnv, t: &Type, s: &Type) -> Result<bool, TypeError> {
        check_value("is_subtype", env, t)?;
        check_value("is_subtype", env, s)?;
        self.run_scratch(env, "is_subtype", |cx| cx.is_subtype(t, s))
    }

    /// `t <: s` without capture conversion of `t`.
    pub fn is_subtype_no_capture(
        &self,
        env: &dyn TypeEnv,
        t: &Type,
        s: &Type,
    ) -> Result<bool, TypeError> {
        check_value("is_subtype_no_capture", env, t)?;
        check_value("is_subtype_no_capture", env, s)?;
        self.run_scratch(env, "is_subtype_no_capture", |cx| {
            cx.is_subtype_no_capture(t, s)
        })
    }

    /// Subtyping that also admits unchecked conversion from a raw type.
    pub fn is_subtype_unchecked(
        &self,
        env: &dyn TypeEnv,
        t: &Type,
        s: &Type,
    ) -> Result<bool, TypeError> {
        check_value("is_subtype_unchecked", env, t)?;
        check_value("is_subtype_unchecked", env, s)?;
        self.run_scratch(env, "is_subtype_unchecked", |cx| {
            cx.is_subtype_unchecked(t, s)
        })
    }

    pub fn is_convertible(&self, env: &dyn TypeEnv, t: &Type, s: &Type) -> Result<bool, TypeError> {
        check_value("is_convertible", env, t)?;
        check_value("is_convertible", env, s)?;
        self.run_scratch(env, "is_convertible", |cx| cx.is_convertible(t, s))
    }

    pub fn is_assignable(&self, env: &dyn TypeEnv, t: &Type, s: &Type) -> Result<bool, TypeError> {
        check_value("is_assignable", env, t)?;
        check_value("is_assignable", env, s)?;
        self.run_scratch(env, "is_assignable", |cx| cx.is_assignable(t, s, None))
    }

    /// Assignability of a constant expression of type `t` with the given value: `int` constants
    /// narrow into `byte`, `short` and `char` (and their boxes) when they fit (JLS 5.2).
    pub fn is_assignable_constant(
        &self,
        env: &dyn TypeEnv,
        value: i32,
        t: &Type,
        s: &Type,
    ) -> Result<bool, TypeError> {
        check_value("is_assignable", env, t)?;
        check_value("is_assignable", env, s)?;
        self.run_scratch(env, "is_assignable", |cx| {
            cx.is_assignable(t, s, Some(value))
        })
    }

    // Equivalence.

    /// The public same-type relation. Annotation sensitivity and wildcard comparability come from
    /// [`RelationsConfig`].
    pub fn is_same_type(&self, env: &dyn TypeEnv, t: &Type, s: &Type) -> Result<bool, TypeError> {
        check_known(env, t)?;
        check_known(env, s)?;
        self.run_scratch(env, "is_same_type", |cx| cx.is_same_type(t, s))
    }

    /// Type argument containment: `t` contains `s` (JLS 4.5.1).
    pub fn contains(&self, env: &dyn TypeEnv, t: &Type, s: &Type) -> Result<bool, TypeError> {
        check_value("contains", env, t)?;
        check_value("contains", env, s)?;
        self.run_scratch(env, "contains", |cx| cx.contains(t, s))
    }

    // Structure.

    pub fn erasure(&self, env: &dyn TypeEnv, ty: &Type) -> Result<Mapped, TypeError> {
        if matches!(ty, Type::NoType(_)) {
            return Ok(Mapped::Unchanged);
        }
        check_known(env, ty)?;
        self.run_scratch(env, "erasure", |cx| cx.erase(ty))
    }

    /// The direct superclass; `Type::NONE` for `Object`, primitives and other types without one.
    pub fn supertype(&self, env: &dyn TypeEnv, ty: &Type) -> Result<Type, TypeError> {
        check_value("supertype", env, ty)?;
        self.run_scratch(env, "supertype", |cx| cx.supertype(ty))
    }

    pub fn interfaces(&self, env: &dyn TypeEnv, ty: &Type) -> Result<Vec<Type>, TypeError> {
        check_value("interfaces", env, ty)?;
        self.run_scratch(env, "interfaces", |cx| cx.interfaces(ty))
    }

    /// The superclass (when there is one) followed by the direct superinterfaces.
    pub fn direct_supertypes(&self, env: &dyn TypeEnv, ty: &Type) -> Result<Vec<Type>, TypeError> {
        check_value("direct_supertypes", env, ty)?;
        self.run_scratch(env, "direct_supertypes", |cx| {
            supertype::direct_supertypes(cx, ty)
        })
    }

    /// The supertype of `ty` that is an instantiation of `class`, if any.
    pub fn as_super(
        &self,
        env: &dyn TypeEnv,
        ty: &Type,
        class: ClassId,
    ) -> Result<Option<Type>, TypeError> {
        check_value("as_super", env, ty)?;
        check_class(env, class)?;
        self.run_scratch(env, "as_super", |cx| cx.as_super(ty, class))
    }

    /// Like [`TypeRelations::as_super`], also searching the enclosing types of `ty`.
    pub fn as_outer_super(
        &self,
        env: &dyn TypeEnv,
        ty: &Type,
        class: ClassId,
    ) -> Result<Option<Type>, TypeError> {
        check_value("as_outer_super", env, ty)?;
        check_class(env, class)?;
        self.run_scratch(env, "as_outer_super", |cx| cx.as_outer_super(ty, class))
    }

    // Queries that may allocate type variables in the caller's context.

    /// Replaces `from[i]` by `to[i]` in `ty`. When the lists differ in length only their trailing
    /// elements pair up.
    pub fn substitute(
        &self,
        cx: &mut TyContext<'_>,
        ty: &Type,
        from: &[TypeVarId],
        to: &[Type],
    ) -> Result<Mapped, TypeError> {
        check_known(&*cx, ty)?;
        for replacement in to {
            check_known(&*cx, replacement)?;
        }
        self.run(cx, "substitute", |rcx| rcx.substitute(ty, from, to))
    }

    /// The type of `member` when accessed through a receiver of type `containing`.
    pub fn member_type(
        &self,
        cx: &mut TyContext<'_>,
        containing: &Type,
        member: MemberId,
    ) -> Result<Type, TypeError> {
        check_value("member_type", &*cx, containing)?;
        let info = member_info(&*cx, member).ok_or(TypeError::UnknownMember(member))?;
        self.run(cx, "member_type", |rcx| {
            self.member_type.visit(rcx, containing, &info)
        })
    }

    /// Capture conversion (JLS 5.1.10). Fresh capture variables live in `cx`.
    pub fn capture(&self, cx: &mut TyContext<'_>, ty: &Type) -> Result<Mapped, TypeError> {
        check_value("capture", &*cx, ty)?;
        self.run(cx, "capture", |rcx| rcx.capture(ty))
    }

    /// Greatest lower bound of two reference types; `Type::Error` when none exists.
    pub fn glb(&self, cx: &mut TyContext<'_>, t: &Type, s: &Type) -> Result<Type, TypeError> {
        check_reference("glb", &*cx, t)?;
        check_reference("glb", &*cx, s)?;
        self.run(cx, "glb", |rcx| rcx.glb(t, s))
    }

    // Closures.

    /// `ty` followed by all of its supertypes, most specialized first.
    pub fn closure(&self, env: &dyn TypeEnv, ty: &Type) -> Result<Arc<[Type]>, TypeError> {
        match ty {
            Type::Class(_) | Type::TypeVar(_) | Type::Intersection(_) => {}
            Type::Error => return Ok(Arc::from(vec![Type::Error])),
            other => {
                return Err(TypeError::IllegalArgument {
                    operation: "closure",
                    found: other.kind(),
                })
            }
        }
        check_known(env, ty)?;
        self.run_scratch(env, "closure", |cx| cx.closure(ty))
    }

    /// The minimal elements of an ordered closure, classes before interfaces.
    pub fn closure_min(&self, env: &dyn TypeEnv, types: &[Type]) -> Result<Vec<Type>, TypeError> {
        for ty in types {
            check_value("closure_min", env, ty)?;
        }
        self.run_scratch(env, "closure_min", |cx| cx.closure_min(types))
    }

    /// Whether `a` is ordered before `b` in closures.
    pub fn precedes(&self, env: &dyn TypeEnv, a: &Type, b: &Type) -> Result<bool, TypeError> {
        check_value("precedes", env, a)?;
        check_value("precedes", env, b)?;
        self.run_scratch(env, "precedes", |cx| cx.precedes(a, b))
    }

    /// Length of the longest supertype path from the class of `ty` to `Object`.
    pub fn rank(&self, env: &dyn TypeEnv, ty: &Type) -> Result<u32, TypeError> {
        check_value("rank", env, ty)?;
        self.run_scratch(env, "rank", |cx| cx.rank(ty))
    }

    // Boxing.

    pub fn boxed_class(
        &self,
        env: &dyn TypeEnv,
        primitive: PrimitiveType,
    ) -> Result<ClassId, TypeError> {
        let class = env.well_known().boxed(primitive);
        check_class(env, class)?;
        Ok(class)
    }

    /// The primitive `ty` unboxes to; `None` for types that are not (bounded by) a box class.
    pub fn unboxed_type(
        &self,
        env: &dyn TypeEnv,
        ty: &Type,
    ) -> Result<Option<PrimitiveType>, TypeError> {
        check_value("unboxed_type", env, ty)?;
        self.run_scratch(env, "unboxed_type", |cx| cx.unboxed_type(ty))
    }
}

fn check_class(env: &dyn TypeEnv, class: ClassId) -> Result<(), TypeError> {
    match env.class(class) {
        Some(_) => Ok(()),
        None => Err(TypeError::UnknownClass(class)),
    }
}

fn member_info(env: &dyn TypeEnv, member: MemberId) -> Option<MemberInfo> {
    Some(MemberInfo {
        owner: member.owner(env)?,
        is_static: member.is_static(env)?,
        declared: Element::Member(member).as_type(env)?,
    })
}

/// Assembles a [`TypeRelations`] from a [`RelationsConfig`].
#[derive(Debug, Clone, Default)]
pub struct TypeRelationsBuilder {
    config: RelationsConfig,
}

impl TypeRelationsBuilder {
    pub fn config(mut self, config: RelationsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn include_annotations(mut self, include: bool) -> Self {
        self.config.include_annotations = include;
        self
    }

    pub fn wildcards_comparable(mut self, comparable: bool) -> Self {
        self.config.wildcards_comparable = comparable;
        self
    }

    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn closure_cache_capacity(mut self, capacity: usize) -> Self {
        self.config.closure_cache_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<TypeRelations, ConfigError> {
        TypeRelations::from_config(self.config)
    }
}
