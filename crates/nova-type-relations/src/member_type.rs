use nova_types::{all_type_args, all_type_params, ClassId, Type, WildcardBound};

use crate::RelationCx;

/// The type of a member as seen through a receiver type ("as member of").
#[derive(Debug, Default)]
pub(crate) struct MemberTypeVisitor;

/// What `member_type` needs to know about the member being viewed.
pub(crate) struct MemberInfo {
    pub(crate) owner: ClassId,
    pub(crate) is_static: bool,
    pub(crate) declared: Type,
}

impl MemberTypeVisitor {
    pub(crate) fn visit(
        &self,
        cx: &mut RelationCx<'_, '_>,
        containing: &Type,
        member: &MemberInfo,
    ) -> Type {
        if member.is_static {
            return member.declared.clone();
        }
        match containing {
            Type::TypeVar(id) => {
                let bound = cx.upper_bound(*id);
                cx.descend(Type::Error, |cx| self.visit(cx, &bound, member))
            }
            Type::Wildcard(bound) => {
                let bound = match bound {
                    WildcardBound::Extends(bound) => (**bound).clone(),
                    WildcardBound::Unbounded | WildcardBound::Super(_) => cx.object(),
                };
                cx.descend(Type::Error, |cx| self.visit(cx, &bound, member))
            }
            Type::Class(_) | Type::Intersection(_) => self.visit_class(cx, containing, member),
            Type::Error => Type::Error,
            _ => member.declared.clone(),
        }
    }

    fn visit_class(&self, cx: &mut RelationCx<'_, '_>, containing: &Type, member: &MemberInfo) -> Type {
        let formals = all_type_params(cx.decls(), member.owner);
        if formals.is_empty() {
            return member.declared.clone();
        }
        let Some(base) = cx.as_outer_super(containing, member.owner) else {
            return member.declared.clone();
        };
        if base.is_error() {
            return Type::Error;
        }
        if cx.is_raw(&base) {
            return cx.erasure(&member.declared);
        }
        let actuals = all_type_args(&base);
        cx.substitute(&member.declared, &formals, &actuals)
            .into_type(&member.declared)
    }
}
