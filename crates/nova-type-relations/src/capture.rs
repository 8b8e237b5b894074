use nova_types::{format_type, ClassType, Type, TypeVarId, WildcardBound};

use crate::{Mapped, RelationCx};

/// Capture conversion (JLS 5.1.10).
#[derive(Debug, Default)]
pub(crate) struct CaptureVisitor;

impl CaptureVisitor {
    pub(crate) fn visit(&self, cx: &mut RelationCx<'_, '_>, ty: &Type) -> Mapped {
        let Type::Class(class) = ty else {
            return Mapped::Unchanged;
        };

        let enclosing = match class.enclosing.as_deref() {
            Some(enclosing) => cx.capture(enclosing),
            None => Mapped::Unchanged,
        };
        let has_wildcard = class.args.iter().any(|arg| matches!(arg, Type::Wildcard(_)));
        if !has_wildcard {
            return match enclosing {
                Mapped::Unchanged => Mapped::Unchanged,
                Mapped::Rewritten(enclosing) => Mapped::Rewritten(Type::Class(ClassType {
                    enclosing: Some(Box::new(enclosing)),
                    ..class.clone()
                })),
            };
        }

        let Some(def) = cx.class(class.def) else {
            return Mapped::Unchanged;
        };
        let formals = &def.type_params;
        if formals.len() != class.args.len() {
            return Mapped::Unchanged;
        }

        // Allocate every capture variable first: the bound of one may mention the others.
        let mut captured = Vec::with_capacity(class.args.len());
        let mut fresh = Vec::new();
        for arg in &class.args {
            match arg {
                Type::Wildcard(bound) => {
                    let var = cx.env_mut().new_capture_var(bound.clone());
                    fresh.push(var);
                    captured.push(Type::TypeVar(var));
                }
                other => captured.push(other.clone()),
            }
        }

        for ((formal, arg), cap) in formals.iter().zip(&class.args).zip(&captured) {
            let (Type::Wildcard(bound), Type::TypeVar(var)) = (arg, cap) else {
                continue;
            };
            let declared = cx.upper_bound(*formal);
            let declared = cx.substitute(&declared, formals, &captured).into_type(&declared);
            let (upper, lower) = match bound {
                WildcardBound::Unbounded => (declared, None),
                WildcardBound::Extends(extends) => (cx.glb(extends, &declared), None),
                WildcardBound::Super(lower) => (declared, Some((**lower).clone())),
            };
            let upper_bounds = match upper {
                Type::Intersection(bounds) => bounds,
                other => vec![other],
            };
            cx.env_mut().set_bounds(*var, upper_bounds, lower);
        }

        let result = Type::Class(ClassType {
            def: class.def,
            args: captured,
            enclosing: match enclosing {
                Mapped::Unchanged => class.enclosing.clone(),
                Mapped::Rewritten(enclosing) => Some(Box::new(enclosing)),
            },
            erased: false,
            annotations: class.annotations.clone(),
        });
        tracing::trace!(
            target: "nova.types",
            ty = %format_type(cx.env(), ty),
            captured = %format_type(cx.env(), &result),
            vars = fresh.len(),
            "created capture variables"
        );
        Mapped::Rewritten(result)
    }
}

/// Greatest lower bound of two reference types.
#[derive(Debug, Default)]
pub(crate) struct GlbVisitor;

impl GlbVisitor {
    pub(crate) fn visit(&self, cx: &mut RelationCx<'_, '_>, t: &Type, s: &Type) -> Type {
        if cx.is_subtype_no_capture(t, s) {
            return t.clone();
        }
        if cx.is_subtype_no_capture(s, t) {
            return s.clone();
        }
        let t_closure = cx.closure(t);
        let s_closure = cx.closure(s);
        let bounds = cx.union(&t_closure, &s_closure);
        self.glb_flattened(cx, &bounds, t, s)
    }

    fn glb_flattened(&self, cx: &mut RelationCx<'_, '_>, flat: &[Type], t: &Type, s: &Type) -> Type {
        let bounds = cx.closure_min(flat);
        match bounds.as_slice() {
            [] => return cx.object(),
            [single] => return single.clone(),
            _ => {}
        }

        let mut class_count = 0;
        let mut cvars: Vec<Type> = Vec::new();
        let mut lowers: Vec<Type> = Vec::new();
        for bound in &bounds {
            if cx.is_interface(bound) {
                continue;
            }
            class_count += 1;
            if let Type::TypeVar(id) = bound {
                if let Some(lower) = capture_lower_bound_chain(cx, *id) {
                    cvars.push(bound.clone());
                    lowers.push(lower);
                }
            }
        }

        if class_count > 1 {
            if lowers.is_empty() {
                tracing::debug!(
                    target: "nova.types",
                    t = %format_type(cx.env(), t),
                    s = %format_type(cx.env(), s),
                    "no greatest lower bound: more than one class bound"
                );
                return Type::Error;
            }
            let remaining: Vec<Type> = bounds
                .iter()
                .filter(|bound| !cvars.contains(bound))
                .cloned()
                .collect();
            let merged = cx.union(&remaining, &lowers);
            return cx.descend(Type::Error, |cx| self.glb_flattened(cx, &merged, t, s));
        }

        Type::Intersection(bounds)
    }
}

/// The lower bound reached by following capture variables' lower bounds.
fn capture_lower_bound_chain(cx: &RelationCx<'_, '_>, id: TypeVarId) -> Option<Type> {
    let mut lower = cx.capture_lower_bound(id)?;
    while let Type::TypeVar(next) = lower {
        match cx.capture_lower_bound(next) {
            Some(next_lower) => lower = next_lower,
            None => break,
        }
    }
    (!matches!(lower, Type::Null)).then_some(lower)
}
