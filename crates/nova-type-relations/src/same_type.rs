use std::collections::HashMap;

use nova_types::{ClassId, ClassType, Equality, ExecutableType, Type, TypeVarId, WildcardBound};

use crate::RelationCx;

/// The same-type relation.
///
/// One implementation serves both uses: the public relation (annotation sensitivity and wildcard
/// comparability taken from the configuration) and the internal one used by containment, where
/// wildcards must compare structurally so `List<? extends T>` can be the same as itself.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SameTypeVisitor {
    equality: Equality,
    wildcards_comparable: bool,
}

impl SameTypeVisitor {
    pub(crate) fn new(equality: Equality, wildcards_comparable: bool) -> Self {
        Self {
            equality,
            wildcards_comparable,
        }
    }

    pub(crate) fn internal() -> Self {
        Self::new(Equality::IGNORE_ANNOTATIONS, true)
    }

    pub(crate) fn visit(&self, cx: &mut RelationCx<'_, '_>, t: &Type, s: &Type) -> bool {
        match (t, s) {
            (Type::Error, _) | (_, Type::Error) => true,
            (Type::Wildcard(t), Type::Wildcard(s)) => {
                self.wildcards_comparable && self.same_wildcard(cx, t, s)
            }
            (Type::Wildcard(_), _) | (_, Type::Wildcard(_)) => false,
            (Type::Primitive(t), Type::Primitive(s)) => t == s,
            (Type::Class(t), Type::Class(s)) => self.same_class(cx, t, s),
            (Type::Array(t), Type::Array(s)) => {
                if t.is_primitive() || s.is_primitive() {
                    t == s
                } else {
                    cx.descend(false, |cx| self.visit(cx, t, s))
                }
            }
            (Type::TypeVar(t), Type::TypeVar(s)) => t == s,
            (Type::Intersection(_), Type::Intersection(_)) => self.same_intersection(cx, t, s),
            (Type::Executable(t), Type::Executable(s)) => self.same_executable(cx, t, s, false),
            (Type::NoType(t), Type::NoType(s)) => t == s,
            (Type::Null, Type::Null) => true,
            _ => false,
        }
    }

    fn same_wildcard(&self, cx: &mut RelationCx<'_, '_>, t: &WildcardBound, s: &WildcardBound) -> bool {
        match (t, s) {
            (WildcardBound::Unbounded, WildcardBound::Unbounded) => true,
            (WildcardBound::Extends(t), WildcardBound::Extends(s))
            | (WildcardBound::Super(t), WildcardBound::Super(s)) => {
                cx.descend(false, |cx| self.visit(cx, t, s))
            }
            _ => false,
        }
    }

    fn same_class(&self, cx: &mut RelationCx<'_, '_>, t: &ClassType, s: &ClassType) -> bool {
        if t.def != s.def {
            return false;
        }
        if self.equality.includes_annotations() && t.annotations != s.annotations {
            return false;
        }
        let enclosing_same = match (t.enclosing.as_deref(), s.enclosing.as_deref()) {
            (Some(t), Some(s)) => cx.descend(false, |cx| self.visit(cx, t, s)),
            (None, None) => true,
            _ => false,
        };
        enclosing_same && self.contains_type_equivalent(cx, &t.args, &s.args)
    }

    /// Argument lists are the same when each pair is the same type or the two arguments contain
    /// each other.
    fn contains_type_equivalent(&self, cx: &mut RelationCx<'_, '_>, t: &[Type], s: &[Type]) -> bool {
        t.len() == s.len()
            && t.iter().zip(s).all(|(t, s)| {
                cx.descend(false, |cx| self.visit(cx, t, s))
                    || (cx.contains(t, s) && cx.contains(s, t))
            })
    }

    /// Intersections are synthesized on demand, so they are compared by their parts: the same
    /// superclass and the same set of interfaces, keyed by declaration.
    fn same_intersection(&self, cx: &mut RelationCx<'_, '_>, t: &Type, s: &Type) -> bool {
        let t_super = cx.supertype(t);
        let s_super = cx.supertype(s);
        if !cx.descend(false, |cx| self.visit(cx, &t_super, &s_super)) {
            return false;
        }
        let mut t_interfaces: HashMap<ClassId, Type> = cx
            .interfaces(t)
            .into_iter()
            .filter_map(|ty| Some((ty.as_class()?.def, ty)))
            .collect();
        for s_interface in cx.interfaces(s) {
            let Some(def) = s_interface.as_class().map(|class| class.def) else {
                return false;
            };
            let Some(t_interface) = t_interfaces.remove(&def) else {
                return false;
            };
            if !cx.descend(false, |cx| self.visit(cx, &t_interface, &s_interface)) {
                return false;
            }
        }
        t_interfaces.is_empty()
    }

    fn same_executable(
        &self,
        cx: &mut RelationCx<'_, '_>,
        t: &ExecutableType,
        s: &ExecutableType,
        renamed: bool,
    ) -> bool {
        if t.type_params.len() != s.type_params.len() {
            return false;
        }
        if t.type_params != s.type_params {
            if renamed || !self.has_same_bounds(cx, &t.type_params, &s.type_params) {
                return false;
            }
            let from = &s.type_params;
            let to: Vec<Type> = t.type_params.iter().map(|v| Type::TypeVar(*v)).collect();
            let s_renamed = ExecutableType {
                type_params: t.type_params.clone(),
                params: s
                    .params
                    .iter()
                    .map(|p| cx.substitute(p, from, &to).into_type(p))
                    .collect(),
                return_type: cx
                    .substitute(&s.return_type, from, &to)
                    .into_type(&s.return_type),
                receiver: s.receiver.clone(),
                thrown: s.thrown.clone(),
            };
            return self.same_executable(cx, t, &s_renamed, true);
        }
        t.params.len() == s.params.len()
            && t
                .params
                .iter()
                .zip(&s.params)
                .all(|(t, s)| cx.descend(false, |cx| self.visit(cx, t, s)))
            && cx.descend(false, |cx| self.visit(cx, &t.return_type, &s.return_type))
    }

    /// Pairwise the same bounds once `s`'s variables are renamed to `t`'s.
    fn has_same_bounds(&self, cx: &mut RelationCx<'_, '_>, t: &[TypeVarId], s: &[TypeVarId]) -> bool {
        let to: Vec<Type> = t.iter().map(|v| Type::TypeVar(*v)).collect();
        t.iter().zip(s).all(|(t_var, s_var)| {
            let t_bound = cx.upper_bound(*t_var);
            let s_bound = cx.upper_bound(*s_var);
            let s_bound = cx.substitute(&s_bound, s, &to).into_type(&s_bound);
            cx.descend(false, |cx| self.visit(cx, &t_bound, &s_bound))
        })
    }
}
