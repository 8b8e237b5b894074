use nova_types::{all_type_args, all_type_params, ClassType, Type};

use crate::RelationCx;

/// Direct superclass of a type; `Type::NONE` when there is none.
#[derive(Debug, Default)]
pub(crate) struct SupertypeVisitor;

impl SupertypeVisitor {
    pub(crate) fn visit(&self, cx: &mut RelationCx<'_, '_>, ty: &Type) -> Type {
        match ty {
            Type::Class(class) => self.visit_class(cx, ty, class),
            Type::TypeVar(id) => {
                let bound = cx.upper_bound(*id);
                match &bound {
                    Type::TypeVar(_) => bound,
                    Type::Intersection(_) => cx.supertype(&bound),
                    _ if cx.is_interface(&bound) => cx.supertype(&bound),
                    _ => bound,
                }
            }
            // Intersections keep their class bound (if any) first.
            Type::Intersection(bounds) => match bounds.first() {
                Some(first) if !first.is_primitive() && !cx.is_interface(first) => first.clone(),
                _ => cx.object(),
            },
            Type::Array(component) => {
                if component.is_primitive() || cx.is_object(component) {
                    array_super_type(cx)
                } else {
                    Type::array(cx.supertype(component))
                }
            }
            Type::Error => Type::Error,
            Type::Primitive(_)
            | Type::Wildcard(_)
            | Type::Executable(_)
            | Type::NoType(_)
            | Type::Null => Type::NONE,
        }
    }

    fn visit_class(&self, cx: &mut RelationCx<'_, '_>, ty: &Type, class: &ClassType) -> Type {
        let Some(def) = cx.class(class.def) else {
            return Type::Error;
        };
        if class.def == cx.well_known().object {
            return Type::NONE;
        }
        let Some(super_class) = def.super_class.as_ref() else {
            return if def.is_interface() {
                cx.object()
            } else {
                Type::NONE
            };
        };
        if cx.is_raw(ty) {
            return cx.erasure(super_class);
        }
        let formals = all_type_params(cx.decls(), class.def);
        if formals.is_empty() {
            return super_class.clone();
        }
        let actuals = all_type_args(&cx.bounding_class(ty));
        cx.substitute(super_class, &formals, &actuals)
            .into_type(super_class)
    }
}

/// `Object & Serializable & Cloneable`, the supertype of arrays whose component has no supertype.
pub(crate) fn array_super_type(cx: &RelationCx<'_, '_>) -> Type {
    let well_known = cx.well_known();
    Type::Intersection(vec![
        Type::class(well_known.object, Vec::new()),
        Type::class(well_known.serializable, Vec::new()),
        Type::class(well_known.cloneable, Vec::new()),
    ])
}

/// Direct superinterfaces of a type.
#[derive(Debug, Default)]
pub(crate) struct InterfacesVisitor;

impl InterfacesVisitor {
    pub(crate) fn visit(&self, cx: &mut RelationCx<'_, '_>, ty: &Type) -> Vec<Type> {
        match ty {
            Type::Class(class) => {
                let Some(def) = cx.class(class.def) else {
                    return Vec::new();
                };
                if def.interfaces.is_empty() {
                    return Vec::new();
                }
                if cx.is_raw(ty) {
                    return def.interfaces.iter().map(|i| cx.erasure(i)).collect();
                }
                let formals = all_type_params(cx.decls(), class.def);
                if formals.is_empty() {
                    return def.interfaces.clone();
                }
                let actuals = all_type_args(ty);
                def.interfaces
                    .iter()
                    .map(|i| cx.substitute(i, &formals, &actuals).into_type(i))
                    .collect()
            }
            Type::TypeVar(id) => {
                let bound = cx.upper_bound(*id);
                match &bound {
                    Type::Intersection(_) => cx.interfaces(&bound),
                    _ if cx.is_interface(&bound) => vec![bound],
                    _ => Vec::new(),
                }
            }
            Type::Intersection(bounds) => match bounds.first() {
                Some(first) if cx.is_interface(first) => bounds.clone(),
                Some(_) => bounds[1..].to_vec(),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}

/// Replaces type variables in enclosing positions by their bounding class, so the full argument
/// list of a receiver can be read off a class type.
#[derive(Debug, Default)]
pub(crate) struct BoundingClassVisitor;

impl BoundingClassVisitor {
    pub(crate) fn visit(&self, cx: &mut RelationCx<'_, '_>, ty: &Type) -> Type {
        match ty {
            Type::TypeVar(_) => {
                let sup = cx.supertype(ty);
                cx.bounding_class(&sup)
            }
            Type::Class(class) => {
                let Some(enclosing) = class.enclosing.as_deref() else {
                    return ty.clone();
                };
                let bounded = cx.bounding_class(enclosing);
                if &bounded == enclosing {
                    return ty.clone();
                }
                Type::Class(ClassType {
                    enclosing: Some(Box::new(bounded)),
                    ..class.clone()
                })
            }
            _ => ty.clone(),
        }
    }
}

/// `directSupertypes`: the superclass (if any) followed by the direct superinterfaces.
pub(crate) fn direct_supertypes(cx: &mut RelationCx<'_, '_>, ty: &Type) -> Vec<Type> {
    let mut out = Vec::new();
    let sup = cx.supertype(ty);
    if !matches!(sup, Type::NoType(_)) {
        out.push(sup);
    }
    out.extend(cx.interfaces(ty));
    out
}
