use std::fmt;

use crate::{ClassId, NoTypeKind, Type, TypeEnv, WildcardBound};

/// Renders `ty` the way Java source spells it, using simple class names.
pub fn format_type(env: &dyn TypeEnv, ty: &Type) -> String {
    TypeDisplay::new(env, ty).to_string()
}

/// [`fmt::Display`] adapter for a type in an environment.
pub struct TypeDisplay<'a> {
    env: &'a dyn TypeEnv,
    ty: &'a Type,
}

impl<'a> TypeDisplay<'a> {
    pub fn new(env: &'a dyn TypeEnv, ty: &'a Type) -> Self {
        Self { env, ty }
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, ty: &Type) -> fmt::Result {
        match ty {
            Type::Primitive(p) => f.write_str(p.name()),
            Type::Class(class) => {
                for annotation in &class.annotations {
                    write!(f, "@{} ", self.class_name(*annotation))?;
                }
                if let Some(enclosing) = class.enclosing.as_deref() {
                    self.write(f, enclosing)?;
                    f.write_str(".")?;
                }
                f.write_str(&self.class_name(class.def))?;
                if !class.args.is_empty() {
                    f.write_str("<")?;
                    self.write_list(f, &class.args, ", ")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            Type::Array(component) => {
                self.write(f, component)?;
                f.write_str("[]")
            }
            Type::TypeVar(id) => match self.env.type_param(*id) {
                Some(def) => f.write_str(&def.name),
                None => write!(f, "T#{}", id.to_raw()),
            },
            Type::Wildcard(WildcardBound::Unbounded) => f.write_str("?"),
            Type::Wildcard(WildcardBound::Extends(bound)) => {
                f.write_str("? extends ")?;
                self.write(f, bound)
            }
            Type::Wildcard(WildcardBound::Super(bound)) => {
                f.write_str("? super ")?;
                self.write(f, bound)
            }
            Type::Intersection(bounds) => self.write_list(f, bounds, " & "),
            Type::Executable(exec) => {
                if !exec.type_params.is_empty() {
                    f.write_str("<")?;
                    for (i, id) in exec.type_params.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        self.write(f, &Type::TypeVar(*id))?;
                    }
                    f.write_str(">")?;
                }
                f.write_str("(")?;
                self.write_list(f, &exec.params, ", ")?;
                f.write_str(")")?;
                self.write(f, &exec.return_type)?;
                if !exec.thrown.is_empty() {
                    f.write_str(" throws ")?;
                    self.write_list(f, &exec.thrown, ", ")?;
                }
                Ok(())
            }
            Type::NoType(NoTypeKind::Void) => f.write_str("void"),
            Type::NoType(NoTypeKind::None) => f.write_str("none"),
            Type::NoType(NoTypeKind::Module) => f.write_str("module"),
            Type::NoType(NoTypeKind::Package) => f.write_str("package"),
            Type::Null => f.write_str("null"),
            Type::Error => f.write_str("<error>"),
        }
    }

    fn write_list(&self, f: &mut fmt::Formatter<'_>, types: &[Type], sep: &str) -> fmt::Result {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            self.write(f, ty)?;
        }
        Ok(())
    }

    fn class_name(&self, id: ClassId) -> String {
        match self.env.class(id) {
            Some(def) => def.simple_name().to_string(),
            None => format!("<class#{}>", id.to_raw()),
        }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, self.ty)
    }
}
