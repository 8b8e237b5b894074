use nova_types::{ExecutableType, Type, TypeVarId};

use crate::mapping::{map_executable, walk_type, StructuralTypeMapping};
use crate::{Mapped, RelationCx};

/// Simultaneous replacement of type variables.
#[derive(Debug, Default)]
pub(crate) struct SubstituteVisitor;

impl SubstituteVisitor {
    /// Replaces `from[i]` by `to[i]` in `ty`.
    ///
    /// When the lists differ in length the leading elements of the longer one are dropped, so
    /// only trailing elements pair up.
    pub(crate) fn visit(
        &self,
        cx: &mut RelationCx<'_, '_>,
        ty: &Type,
        from: &[TypeVarId],
        to: &[Type],
    ) -> Mapped {
        let (from, to) = trim_to_common_suffix(from, to);
        if from.is_empty() {
            return Mapped::Unchanged;
        }
        Substitution { from, to }.map(cx, ty)
    }
}

pub(crate) fn trim_to_common_suffix<'a, 'b>(
    from: &'a [TypeVarId],
    to: &'b [Type],
) -> (&'a [TypeVarId], &'b [Type]) {
    let len = from.len().min(to.len());
    (&from[from.len() - len..], &to[to.len() - len..])
}

struct Substitution<'s> {
    from: &'s [TypeVarId],
    to: &'s [Type],
}

impl StructuralTypeMapping for Substitution<'_> {
    fn map(&self, cx: &mut RelationCx<'_, '_>, ty: &Type) -> Mapped {
        match ty {
            Type::TypeVar(id) => self.map_type_var(cx, *id),
            Type::Executable(exec) if !exec.type_params.is_empty() => {
                self.map_generic_executable(cx, exec)
            }
            _ => walk_type(self, cx, ty),
        }
    }

    fn map_type_var(&self, _cx: &mut RelationCx<'_, '_>, id: TypeVarId) -> Mapped {
        match self.from.iter().position(|from| *from == id) {
            Some(index) => Mapped::Rewritten(self.to[index].clone()),
            None => Mapped::Unchanged,
        }
    }
}

impl Substitution<'_> {
    /// A generic signature gets fresh type variables when the replacement types mention its own
    /// variables (they would otherwise be captured) or when its own bounds change.
    fn map_generic_executable(&self, cx: &mut RelationCx<'_, '_>, exec: &ExecutableType) -> Mapped {
        let own = &exec.type_params;
        let captures_own = self
            .to
            .iter()
            .any(|ty| own.iter().any(|var| ty.mentions_type_var(*var)));
        let bounds_change = own.iter().any(|var| {
            cx.type_param(*var).is_some_and(|def| {
                def.upper_bounds
                    .iter()
                    .chain(def.lower_bound.iter())
                    .any(|bound| self.from.iter().any(|from| bound.mentions_type_var(*from)))
            })
        });

        if !captures_own && !bounds_change {
            return match map_executable(self, cx, exec) {
                Some(exec) => Mapped::Rewritten(Type::Executable(Box::new(exec))),
                None => Mapped::Unchanged,
            };
        }

        let fresh: Vec<TypeVarId> = own
            .iter()
            .map(|var| {
                let name = cx
                    .type_param(*var)
                    .map_or_else(|| "T".to_string(), |def| def.name.clone());
                cx.env_mut().add_type_param(name, Vec::new(), None)
            })
            .collect();
        let fresh_types: Vec<Type> = fresh.iter().map(|var| Type::TypeVar(*var)).collect();
        let rename = Substitution {
            from: own,
            to: &fresh_types,
        };

        for (old, new) in own.iter().zip(&fresh) {
            let (upper, lower) = match cx.type_param(*old) {
                Some(def) => (def.upper_bounds.clone(), def.lower_bound.clone()),
                None => (vec![cx.object()], None),
            };
            let upper = upper
                .iter()
                .map(|bound| {
                    let renamed = rename.map(cx, bound).into_type(bound);
                    self.map(cx, &renamed).into_type(&renamed)
                })
                .collect();
            let lower = lower.map(|bound| {
                let renamed = rename.map(cx, &bound).into_type(&bound);
                self.map(cx, &renamed).into_type(&renamed)
            });
            cx.env_mut().set_bounds(*new, upper, lower);
        }
        tracing::trace!(
            target: "nova.types",
            count = fresh.len(),
            "renamed type parameters of a generic signature"
        );

        let renamed = match map_executable(&rename, cx, exec) {
            Some(renamed) => renamed,
            None => exec.clone(),
        };
        let substituted = map_executable(self, cx, &renamed).unwrap_or(renamed);
        Mapped::Rewritten(Type::Executable(Box::new(ExecutableType {
            type_params: fresh,
            ..substituted
        })))
    }
}
