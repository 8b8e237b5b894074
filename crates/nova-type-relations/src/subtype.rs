use nova_types::{format_type, ClassType, PrimitiveType, Type};

use crate::RelationCx;

/// The subtype relation (JLS 4.10).
#[derive(Debug, Default)]
pub(crate) struct SubtypeVisitor;

impl SubtypeVisitor {
    /// `t <: s`. With `capture` set, `t` is capture-converted first.
    pub(crate) fn visit(&self, cx: &mut RelationCx<'_, '_>, t: &Type, s: &Type, capture: bool) -> bool {
        if matches!(t, Type::Wildcard(_)) {
            return false;
        }
        if t == s || t.is_error() || s.is_error() {
            return true;
        }
        match s {
            Type::Intersection(bounds) => {
                return bounds.iter().all(|bound| {
                    if capture {
                        cx.is_subtype(t, bound)
                    } else {
                        cx.is_subtype_no_capture(t, bound)
                    }
                });
            }
            Type::TypeVar(id) => {
                if let Some(lower) = cx.capture_lower_bound(*id) {
                    if !matches!(lower, Type::Null) {
                        return if capture {
                            cx.is_subtype(t, &lower)
                        } else {
                            cx.is_subtype_no_capture(t, &lower)
                        };
                    }
                }
            }
            _ => {}
        }

        let captured;
        let t = if capture {
            captured = cx.capture(t).into_type(t);
            &captured
        } else {
            t
        };

        match t {
            Type::Primitive(p) => matches!(s, Type::Primitive(q) if widens(*p, *q)),
            Type::Array(component) => self.visit_array(cx, component, s),
            Type::Class(_) | Type::Intersection(_) => match s {
                Type::Class(target) => self.visit_class(cx, t, target),
                _ => false,
            },
            Type::TypeVar(id) => {
                let bound = cx.upper_bound(*id);
                cx.is_subtype_no_capture(&bound, s)
            }
            Type::Null => matches!(
                s,
                Type::Class(_) | Type::Array(_) | Type::TypeVar(_) | Type::Null
            ),
            Type::Error => true,
            Type::Wildcard(_) | Type::Executable(_) | Type::NoType(_) => false,
        }
    }

    fn visit_array(&self, cx: &mut RelationCx<'_, '_>, component: &Type, s: &Type) -> bool {
        match s {
            Type::Array(target) => {
                if component.is_primitive() || target.is_primitive() {
                    component == &**target
                } else {
                    cx.is_subtype_no_capture(component, target)
                }
            }
            Type::Class(class) => {
                class.args.is_empty() && cx.well_known().is_array_supertype(class.def)
            }
            _ => false,
        }
    }

    fn visit_class(&self, cx: &mut RelationCx<'_, '_>, t: &Type, s: &ClassType) -> bool {
        let Some(sup) = cx.as_super(t, s.def) else {
            return false;
        };
        let Type::Class(sup) = &sup else {
            return sup.is_error();
        };
        if sup.def != s.def {
            return false;
        }
        let args_contained = s.args.is_empty() || self.contains_recursive(cx, s, sup);
        let enclosing = match (sup.enclosing.as_deref(), s.enclosing.as_deref()) {
            (Some(sup), Some(s)) => cx.is_subtype_no_capture(sup, s),
            _ => true,
        };
        args_contained && enclosing
    }

    /// `s`'s arguments contain `sup`'s, assuming success for a pair already being checked further
    /// up (F-bounded declarations revisit the same pair).
    fn contains_recursive(&self, cx: &mut RelationCx<'_, '_>, s: &ClassType, sup: &ClassType) -> bool {
        let key = (Type::Class(s.clone()), Type::Class(sup.clone()));
        if !cx.subtype_in_progress.insert(key.clone()) {
            return true;
        }
        let result = s.args.len() == sup.args.len()
            && s
                .args
                .iter()
                .zip(&sup.args)
                .all(|(s_arg, sup_arg)| cx.contains(s_arg, sup_arg));
        cx.subtype_in_progress.remove(&key);
        result
    }
}

/// Primitive widening, including identity.
pub(crate) fn widens(from: PrimitiveType, to: PrimitiveType) -> bool {
    use PrimitiveType::*;
    match from {
        Boolean => to == Boolean,
        Byte => matches!(to, Byte | Short | Int | Long | Float | Double),
        Short => matches!(to, Short | Int | Long | Float | Double),
        Char => matches!(to, Char | Int | Long | Float | Double),
        Int => matches!(to, Int | Long | Float | Double),
        Long => matches!(to, Long | Float | Double),
        Float => matches!(to, Float | Double),
        Double => to == Double,
    }
}

/// Subtyping extended with unchecked conversion from raw types (JLS 5.1.9).
#[derive(Debug, Default)]
pub(crate) struct SubtypeUncheckedVisitor;

impl SubtypeUncheckedVisitor {
    pub(crate) fn visit(&self, cx: &mut RelationCx<'_, '_>, t: &Type, s: &Type) -> bool {
        if let (Type::Array(t_component), Type::Array(s_component)) = (t, s) {
            return if t_component.is_primitive() {
                t_component == s_component
            } else {
                cx.is_subtype_unchecked(t_component, s_component)
            };
        }
        if cx.is_subtype(t, s) {
            return true;
        }
        if let Type::TypeVar(id) = t {
            let bound = cx.upper_bound(*id);
            return cx.is_subtype_unchecked(&bound, s);
        }
        let Type::Class(target) = s else {
            return false;
        };
        if cx.is_raw(s) {
            return false;
        }
        match cx.as_super(t, target.def) {
            Some(sup) if cx.is_raw(&sup) => {
                tracing::debug!(
                    target: "nova.types",
                    from = %format_type(cx.env(), t),
                    to = %format_type(cx.env(), s),
                    "unchecked conversion"
                );
                true
            }
            _ => false,
        }
    }
}
