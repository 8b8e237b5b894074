use nova_types::{ClassType, ExecutableType, Type, TypeVarId, WildcardBound};

use crate::RelationCx;

/// Result of a type rewrite.
///
/// Rewrites report `Unchanged` when no sub-node changed, so callers can tell "nothing to do"
/// apart from "produced an equal-looking copy" without comparing trees.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mapped {
    Unchanged,
    Rewritten(Type),
}

impl Mapped {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Mapped::Unchanged)
    }

    /// The resulting type, cloning `original` when nothing changed.
    pub fn into_type(self, original: &Type) -> Type {
        match self {
            Mapped::Unchanged => original.clone(),
            Mapped::Rewritten(ty) => ty,
        }
    }

    pub fn unwrap_or(self, original: Type) -> Type {
        match self {
            Mapped::Unchanged => original,
            Mapped::Rewritten(ty) => ty,
        }
    }

    pub fn as_type<'a>(&'a self, original: &'a Type) -> &'a Type {
        match self {
            Mapped::Unchanged => original,
            Mapped::Rewritten(ty) => ty,
        }
    }
}

/// A recursive rewrite over the structure of a type.
///
/// The default `map` rewrites children of class, array, wildcard, intersection and executable
/// types and leaves every other node alone. Implementations hook type variables (the only leaves
/// that usually need rewriting) or override `map` entirely and fall back to [`walk_type`].
pub(crate) trait StructuralTypeMapping {
    fn map(&self, cx: &mut RelationCx<'_, '_>, ty: &Type) -> Mapped {
        match ty {
            Type::TypeVar(id) => self.map_type_var(cx, *id),
            _ => walk_type(self, cx, ty),
        }
    }

    fn map_type_var(&self, _cx: &mut RelationCx<'_, '_>, _id: TypeVarId) -> Mapped {
        Mapped::Unchanged
    }
}

pub(crate) fn walk_type<M: StructuralTypeMapping + ?Sized>(
    mapping: &M,
    cx: &mut RelationCx<'_, '_>,
    ty: &Type,
) -> Mapped {
    match ty {
        Type::Class(class) => {
            let args = map_list(mapping, cx, &class.args);
            let enclosing = match class.enclosing.as_deref() {
                Some(enclosing) => mapping.map(cx, enclosing),
                None => Mapped::Unchanged,
            };
            if args.is_none() && enclosing.is_unchanged() {
                return Mapped::Unchanged;
            }
            let enclosing = match enclosing {
                Mapped::Unchanged => class.enclosing.clone(),
                Mapped::Rewritten(ty) => Some(Box::new(ty)),
            };
            Mapped::Rewritten(Type::Class(ClassType {
                def: class.def,
                args: args.unwrap_or_else(|| class.args.clone()),
                enclosing,
                erased: false,
                annotations: class.annotations.clone(),
            }))
        }
        Type::Array(component) => match mapping.map(cx, component) {
            Mapped::Unchanged => Mapped::Unchanged,
            Mapped::Rewritten(component) => Mapped::Rewritten(Type::array(component)),
        },
        // `?` is treated as `? extends Object`; it only materializes if the bound is rewritten.
        Type::Wildcard(WildcardBound::Unbounded) => {
            let object = cx.object();
            match mapping.map(cx, &object) {
                Mapped::Unchanged => Mapped::Unchanged,
                Mapped::Rewritten(bound) => Mapped::Rewritten(Type::extends(bound)),
            }
        }
        Type::Wildcard(WildcardBound::Extends(bound)) => match mapping.map(cx, bound) {
            Mapped::Unchanged => Mapped::Unchanged,
            Mapped::Rewritten(bound) => Mapped::Rewritten(Type::extends(bound)),
        },
        Type::Wildcard(WildcardBound::Super(bound)) => match mapping.map(cx, bound) {
            Mapped::Unchanged => Mapped::Unchanged,
            Mapped::Rewritten(bound) => Mapped::Rewritten(Type::super_of(bound)),
        },
        Type::Intersection(bounds) => match map_list(mapping, cx, bounds) {
            Some(bounds) => Mapped::Rewritten(Type::Intersection(bounds)),
            None => Mapped::Unchanged,
        },
        Type::Executable(exec) => match map_executable(mapping, cx, exec) {
            Some(exec) => Mapped::Rewritten(Type::Executable(Box::new(exec))),
            None => Mapped::Unchanged,
        },
        Type::Primitive(_) | Type::TypeVar(_) | Type::NoType(_) | Type::Null | Type::Error => {
            Mapped::Unchanged
        }
    }
}

/// Maps every element; `None` when all of them came back unchanged.
pub(crate) fn map_list<M: StructuralTypeMapping + ?Sized>(
    mapping: &M,
    cx: &mut RelationCx<'_, '_>,
    types: &[Type],
) -> Option<Vec<Type>> {
    let mut out: Option<Vec<Type>> = None;
    for (index, ty) in types.iter().enumerate() {
        match mapping.map(cx, ty) {
            Mapped::Unchanged => {
                if let Some(out) = out.as_mut() {
                    out.push(ty.clone());
                }
            }
            Mapped::Rewritten(new) => {
                let out = out.get_or_insert_with(|| types[..index].to_vec());
                out.push(new);
            }
        }
    }
    out
}

/// Maps the signature of an executable, keeping its type parameters.
pub(crate) fn map_executable<M: StructuralTypeMapping + ?Sized>(
    mapping: &M,
    cx: &mut RelationCx<'_, '_>,
    exec: &ExecutableType,
) -> Option<ExecutableType> {
    let params = map_list(mapping, cx, &exec.params);
    let return_type = mapping.map(cx, &exec.return_type);
    let thrown = map_list(mapping, cx, &exec.thrown);
    let receiver = match exec.receiver.as_ref() {
        Some(receiver) => mapping.map(cx, receiver),
        None => Mapped::Unchanged,
    };
    if params.is_none() && return_type.is_unchanged() && thrown.is_none() && receiver.is_unchanged()
    {
        return None;
    }
    Some(ExecutableType {
        type_params: exec.type_params.clone(),
        params: params.unwrap_or_else(|| exec.params.clone()),
        return_type: return_type.into_type(&exec.return_type),
        receiver: match (receiver, exec.receiver.as_ref()) {
            (Mapped::Rewritten(ty), _) => Some(ty),
            (Mapped::Unchanged, original) => original.cloned(),
        },
        thrown: thrown.unwrap_or_else(|| exec.thrown.clone()),
    })
}
