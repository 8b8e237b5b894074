use nova_types::{Type, WildcardBound};

use crate::RelationCx;

/// Type argument containment (JLS 4.5.1): `t` contains `s` when `lower(t) <: lower(s)` and
/// `upper(s) <: upper(t)`.
#[derive(Debug, Default)]
pub(crate) struct ContainsTypeVisitor;

impl ContainsTypeVisitor {
    pub(crate) fn visit(&self, cx: &mut RelationCx<'_, '_>, t: &Type, s: &Type) -> bool {
        match t {
            Type::Wildcard(bound) => {
                is_same_wildcard(bound, s)
                    || is_capture_of(cx, s, bound)
                    || self.bounds_contain(cx, bound, s)
            }
            Type::Error => true,
            _ => s.is_error() || cx.is_same_type_internal(t, s),
        }
    }

    fn bounds_contain(&self, cx: &mut RelationCx<'_, '_>, t: &WildcardBound, s: &Type) -> bool {
        match (t, s) {
            (WildcardBound::Unbounded, _) => true,

            // `? extends T` contains `? extends S`, `?`, `? super S` and plain `S` when the upper
            // bound of `s` is below `T`.
            (WildcardBound::Extends(upper), Type::Wildcard(WildcardBound::Extends(s_upper))) => {
                let s_upper = capture_upper_bound(cx, s_upper);
                cx.is_subtype_no_capture(&s_upper, upper)
            }
            (
                WildcardBound::Extends(upper),
                Type::Wildcard(WildcardBound::Unbounded | WildcardBound::Super(_)),
            ) => {
                let object = cx.object();
                cx.is_subtype_no_capture(&object, upper)
            }
            (WildcardBound::Extends(upper), _) => {
                let s_upper = capture_upper_bound(cx, s);
                cx.is_subtype_no_capture(&s_upper, upper)
            }

            // `? super T` contains `? super S` and plain `S` when `T` is below the lower bound of
            // `s`; an extends-bounded or unbounded `s` has the null type as lower bound.
            (WildcardBound::Super(lower), Type::Wildcard(WildcardBound::Super(s_lower))) => {
                let s_lower = capture_lower_bound(cx, s_lower);
                cx.is_subtype_no_capture(lower, &s_lower)
            }
            (
                WildcardBound::Super(lower),
                Type::Wildcard(WildcardBound::Unbounded | WildcardBound::Extends(_)),
            ) => cx.is_subtype_no_capture(lower, &Type::Null),
            (WildcardBound::Super(lower), _) => {
                let s_lower = capture_lower_bound(cx, s);
                cx.is_subtype_no_capture(lower, &s_lower)
            }
        }
    }
}

fn is_same_wildcard(t: &WildcardBound, s: &Type) -> bool {
    matches!(s, Type::Wildcard(bound) if bound == t)
}

/// `s` is a capture variable created for the wildcard `t`.
fn is_capture_of(cx: &RelationCx<'_, '_>, s: &Type, t: &WildcardBound) -> bool {
    let Type::TypeVar(id) = s else {
        return false;
    };
    cx.type_param(*id)
        .and_then(|def| def.captured.as_ref())
        .is_some_and(|captured| captured == t)
}

/// Walks from a capture variable to its upper bound, repeatedly.
fn capture_upper_bound(cx: &RelationCx<'_, '_>, ty: &Type) -> Type {
    let mut current = ty.clone();
    while let Type::TypeVar(id) = current {
        if !cx.type_param(id).is_some_and(|def| def.is_capture()) {
            break;
        }
        current = cx.upper_bound(id);
    }
    current
}

/// Walks from a capture variable to its lower bound, repeatedly.
fn capture_lower_bound(cx: &RelationCx<'_, '_>, ty: &Type) -> Type {
    let mut current = ty.clone();
    while let Type::TypeVar(id) = current {
        match cx.capture_lower_bound(id) {
            Some(lower) => current = lower,
            None => break,
        }
    }
    current
}
