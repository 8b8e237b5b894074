use nova_types::{ClassId, Type};

use crate::cx::SeenDecl;
use crate::RelationCx;

/// Finds the supertype of a type that is an instantiation of a given class.
#[derive(Debug, Default)]
pub(crate) struct AsSuperVisitor;

impl AsSuperVisitor {
    pub(crate) fn visit(
        &self,
        cx: &mut RelationCx<'_, '_>,
        ty: &Type,
        target: ClassId,
    ) -> Option<Type> {
        match ty {
            Type::Class(class) => {
                if class.def == target {
                    return Some(ty.clone());
                }
                let key = SeenDecl::Class(class.def);
                if !cx.as_super_seen.insert(key) {
                    return None;
                }
                let found = self.search_supertypes(cx, ty, target);
                cx.as_super_seen.remove(&key);
                found
            }
            Type::TypeVar(id) => {
                let key = SeenDecl::TypeVar(*id);
                if !cx.as_super_seen.insert(key) {
                    return None;
                }
                let bound = cx.upper_bound(*id);
                let found = cx.as_super(&bound, target);
                cx.as_super_seen.remove(&key);
                found
            }
            Type::Intersection(bounds) => bounds.iter().find_map(|b| cx.as_super(b, target)),
            Type::Array(_) => {
                let candidate = Type::class(target, Vec::new());
                cx.is_subtype(ty, &candidate).then_some(candidate)
            }
            Type::Error => Some(Type::Error),
            Type::Primitive(_)
            | Type::Wildcard(_)
            | Type::Executable(_)
            | Type::NoType(_)
            | Type::Null => None,
        }
    }

    fn search_supertypes(
        &self,
        cx: &mut RelationCx<'_, '_>,
        ty: &Type,
        target: ClassId,
    ) -> Option<Type> {
        let sup = cx.supertype(ty);
        if matches!(sup, Type::Class(_) | Type::TypeVar(_)) {
            if let Some(found) = cx.as_super(&sup, target) {
                return Some(found);
            }
        }
        if cx.class(target).is_some_and(|def| def.is_interface()) {
            for interface in cx.interfaces(ty) {
                if let Some(found) = cx.as_super(&interface, target) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Like [`AsSuperVisitor::visit`], but also searches the enclosing types of a class type:
    /// members of an outer class are in scope inside its inner classes.
    pub(crate) fn visit_outer(
        &self,
        cx: &mut RelationCx<'_, '_>,
        ty: &Type,
        target: ClassId,
    ) -> Option<Type> {
        match ty {
            Type::Class(_) => {
                let mut current = Some(ty.clone());
                while let Some(candidate) = current {
                    if let Some(found) = cx.as_super(&candidate, target) {
                        return Some(found);
                    }
                    current = match candidate {
                        Type::Class(class) => class.enclosing.map(|enclosing| *enclosing),
                        _ => None,
                    };
                }
                None
            }
            Type::Array(_) | Type::TypeVar(_) | Type::Intersection(_) => {
                cx.as_super(ty, target)
            }
            Type::Error => Some(Type::Error),
            _ => None,
        }
    }
}
