use nova_types::{ClassType, Type, WildcardBound};

use crate::mapping::{map_executable, StructuralTypeMapping};
use crate::{Mapped, RelationCx};

/// Generic erasure (JLS 4.6).
#[derive(Debug, Default)]
pub(crate) struct EraseVisitor;

impl EraseVisitor {
    pub(crate) fn visit(&self, cx: &mut RelationCx<'_, '_>, ty: &Type) -> Mapped {
        self.map(cx, ty)
    }

    fn erase_class(&self, cx: &mut RelationCx<'_, '_>, class: &ClassType) -> Mapped {
        if class.erased {
            return Mapped::Unchanged;
        }
        let enclosing = match class.enclosing.as_deref() {
            Some(enclosing) => self.map(cx, enclosing),
            None => Mapped::Unchanged,
        };
        if class.args.is_empty() && enclosing.is_unchanged() {
            return Mapped::Unchanged;
        }
        let enclosing = match enclosing {
            Mapped::Unchanged => class.enclosing.clone(),
            Mapped::Rewritten(ty) => Some(Box::new(ty)),
        };
        Mapped::Rewritten(Type::Class(ClassType {
            def: class.def,
            args: Vec::new(),
            enclosing,
            erased: true,
            annotations: class.annotations.clone(),
        }))
    }

    /// Erases `bound` in place of the node being visited: the result is always a rewrite since
    /// the node itself (a variable, intersection or wildcard) never survives erasure.
    fn erase_to(&self, cx: &mut RelationCx<'_, '_>, bound: &Type) -> Mapped {
        let leftmost = match bound {
            Type::Intersection(bounds) => bounds.first().cloned().unwrap_or_else(|| cx.object()),
            other => other.clone(),
        };
        Mapped::Rewritten(cx.erasure(&leftmost))
    }
}

impl StructuralTypeMapping for EraseVisitor {
    fn map(&self, cx: &mut RelationCx<'_, '_>, ty: &Type) -> Mapped {
        match ty {
            Type::Class(class) => self.erase_class(cx, class),
            Type::TypeVar(id) => {
                let bound = cx.upper_bound(*id);
                self.erase_to(cx, &bound)
            }
            Type::Intersection(_) => self.erase_to(cx, ty),
            Type::Wildcard(WildcardBound::Extends(bound)) => self.erase_to(cx, bound),
            Type::Wildcard(_) => {
                let object = cx.object();
                self.erase_to(cx, &object)
            }
            Type::Array(component) => match self.map(cx, component) {
                Mapped::Unchanged => Mapped::Unchanged,
                Mapped::Rewritten(component) => Mapped::Rewritten(Type::array(component)),
            },
            Type::Executable(exec) => {
                let mapped = map_executable(self, cx, exec);
                if exec.type_params.is_empty() && mapped.is_none() {
                    return Mapped::Unchanged;
                }
                let mut erased = mapped.unwrap_or_else(|| (**exec).clone());
                erased.type_params = Vec::new();
                Mapped::Rewritten(Type::Executable(Box::new(erased)))
            }
            Type::Primitive(_) | Type::NoType(_) | Type::Null | Type::Error => Mapped::Unchanged,
        }
    }
}
