use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::{ClassType, Element, Type, WildcardBound};

/// Structural equality and hashing over types and declarations.
///
/// With `include_annotations` set this agrees with `Type: PartialEq`; without it, type-use
/// annotations are ignored at every depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Equality {
    include_annotations: bool,
}

impl Default for Equality {
    fn default() -> Self {
        Self::STRICT
    }
}

impl Equality {
    pub const STRICT: Equality = Equality {
        include_annotations: true,
    };
    pub const IGNORE_ANNOTATIONS: Equality = Equality {
        include_annotations: false,
    };

    pub const fn new(include_annotations: bool) -> Self {
        Self {
            include_annotations,
        }
    }

    pub fn includes_annotations(&self) -> bool {
        self.include_annotations
    }

    pub fn types_equal(&self, a: &Type, b: &Type) -> bool {
        if self.include_annotations {
            return a == b;
        }
        match (a, b) {
            (Type::Class(a), Type::Class(b)) => self.classes_equal(a, b),
            (Type::Array(a), Type::Array(b)) => self.types_equal(a, b),
            (Type::Wildcard(a), Type::Wildcard(b)) => match (a, b) {
                (WildcardBound::Unbounded, WildcardBound::Unbounded) => true,
                (WildcardBound::Extends(a), WildcardBound::Extends(b))
                | (WildcardBound::Super(a), WildcardBound::Super(b)) => self.types_equal(a, b),
                _ => false,
            },
            (Type::Intersection(a), Type::Intersection(b)) => self.lists_equal(a, b),
            (Type::Executable(a), Type::Executable(b)) => {
                a.type_params == b.type_params
                    && self.lists_equal(&a.params, &b.params)
                    && self.types_equal(&a.return_type, &b.return_type)
                    && self.lists_equal(&a.thrown, &b.thrown)
                    && match (&a.receiver, &b.receiver) {
                        (Some(a), Some(b)) => self.types_equal(a, b),
                        (None, None) => true,
                        _ => false,
                    }
            }
            _ => a == b,
        }
    }

    fn classes_equal(&self, a: &ClassType, b: &ClassType) -> bool {
        a.def == b.def
            && self.lists_equal(&a.args, &b.args)
            && match (a.enclosing.as_deref(), b.enclosing.as_deref()) {
                (Some(a), Some(b)) => self.types_equal(a, b),
                (None, None) => true,
                _ => false,
            }
    }

    fn lists_equal(&self, a: &[Type], b: &[Type]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(a, b)| self.types_equal(a, b))
    }

    pub fn hash_type<H: Hasher>(&self, ty: &Type, state: &mut H) {
        if self.include_annotations {
            ty.hash(state);
            return;
        }
        std::mem::discriminant(ty).hash(state);
        match ty {
            Type::Class(class) => {
                class.def.hash(state);
                class.args.len().hash(state);
                for arg in &class.args {
                    self.hash_type(arg, state);
                }
                if let Some(enclosing) = class.enclosing.as_deref() {
                    self.hash_type(enclosing, state);
                }
            }
            Type::Array(component) => self.hash_type(component, state),
            Type::Wildcard(bound) => {
                std::mem::discriminant(bound).hash(state);
                if let WildcardBound::Extends(b) | WildcardBound::Super(b) = bound {
                    self.hash_type(b, state);
                }
            }
            Type::Intersection(bounds) => {
                for bound in bounds {
                    self.hash_type(bound, state);
                }
            }
            Type::Executable(exec) => {
                exec.type_params.hash(state);
                for param in &exec.params {
                    self.hash_type(param, state);
                }
                self.hash_type(&exec.return_type, state);
            }
            other => other.hash(state),
        }
    }

    pub fn type_hash(&self, ty: &Type) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash_type(ty, &mut hasher);
        hasher.finish()
    }

    /// Declarations are identity-bearing: two elements are equal when they name the same
    /// declaration.
    pub fn elements_equal(&self, a: &Element, b: &Element) -> bool {
        a == b
    }

    pub fn hash_element<H: Hasher>(&self, element: &Element, state: &mut H) {
        element.hash(state);
    }
}

/// A type borrowed together with the [`Equality`] that should be used to compare it, so it can
/// key a hash map.
#[derive(Debug, Clone, Copy)]
pub struct EqKey<'a> {
    pub equality: Equality,
    pub ty: &'a Type,
}

impl<'a> EqKey<'a> {
    pub fn new(equality: Equality, ty: &'a Type) -> Self {
        Self { equality, ty }
    }
}

impl PartialEq for EqKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.equality.types_equal(self.ty, other.ty)
    }
}

impl Eq for EqKey<'_> {}

impl Hash for EqKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.equality.hash_type(self.ty, state);
    }
}
