use nova_types::{NoTypeKind, Type, TypeEnv, WildcardBound};

use crate::TypeError;

/// Rejects signatures and package/module pseudo-types, then checks that every id in `ty`
/// resolves in `env`.
pub(crate) fn check_value(operation: &'static str, env: &dyn TypeEnv, ty: &Type) -> Result<(), TypeError> {
    match ty {
        Type::Executable(_) | Type::NoType(NoTypeKind::Package | NoTypeKind::Module) => {
            Err(TypeError::IllegalArgument {
                operation,
                found: ty.kind(),
            })
        }
        _ => check_known(env, ty),
    }
}

/// Like [`check_value`], but also rejects primitives and `void`.
pub(crate) fn check_reference(
    operation: &'static str,
    env: &dyn TypeEnv,
    ty: &Type,
) -> Result<(), TypeError> {
    if ty.is_primitive() || matches!(ty, Type::NoType(_)) {
        return Err(TypeError::IllegalArgument {
            operation,
            found: ty.kind(),
        });
    }
    check_value(operation, env, ty)
}

/// Every class and type variable mentioned by `ty` is declared in `env`.
pub(crate) fn check_known(env: &dyn TypeEnv, ty: &Type) -> Result<(), TypeError> {
    match ty {
        Type::Class(class) => {
            if env.class(class.def).is_none() {
                return Err(TypeError::UnknownClass(class.def));
            }
            if let Some(enclosing) = class.enclosing.as_deref() {
                check_known(env, enclosing)?;
            }
            class.args.iter().try_for_each(|arg| check_known(env, arg))
        }
        Type::TypeVar(id) => match env.type_param(*id) {
            Some(_) => Ok(()),
            None => Err(TypeError::UnknownTypeVar(*id)),
        },
        Type::Array(component) => check_known(env, component),
        Type::Wildcard(WildcardBound::Extends(bound) | WildcardBound::Super(bound)) => {
            check_known(env, bound)
        }
        Type::Intersection(bounds) => bounds.iter().try_for_each(|b| check_known(env, b)),
        Type::Executable(exec) => {
            if let Some(id) = exec.type_params.iter().find(|id| env.type_param(**id).is_none()) {
                return Err(TypeError::UnknownTypeVar(*id));
            }
            exec.params
                .iter()
                .chain(std::iter::once(&exec.return_type))
                .chain(exec.receiver.iter())
                .chain(exec.thrown.iter())
                .try_for_each(|ty| check_known(env, ty))
        }
        Type::Wildcard(WildcardBound::Unbounded)
        | Type::Primitive(_)
        | Type::NoType(_)
        | Type::Null
        | Type::Error => Ok(()),
    }
}
