use nova_types::{PrimitiveType, Type};

use crate::RelationCx;

/// Method invocation conversion (JLS 5.3) without the constant rules: subtyping, unchecked
/// conversion, boxing and unboxing.
#[derive(Debug, Default)]
pub(crate) struct ConvertibleVisitor;

impl ConvertibleVisitor {
    pub(crate) fn visit(&self, cx: &mut RelationCx<'_, '_>, t: &Type, s: &Type) -> bool {
        if t.is_error() {
            return true;
        }
        match (t.is_primitive(), s.is_primitive()) {
            (true, true) | (false, false) => cx.is_subtype_unchecked(t, s),
            (true, false) => {
                let Type::Primitive(primitive) = t else {
                    return false;
                };
                let boxed = Type::class(cx.well_known().boxed(*primitive), Vec::new());
                cx.is_subtype(&boxed, s)
            }
            (false, true) => match cx.unboxed_type(t) {
                Some(primitive) => cx.is_subtype(&Type::Primitive(primitive), s),
                None => false,
            },
        }
    }

    /// The primitive a reference type unboxes to, if any. Type variables bounded by a box class
    /// unbox too.
    pub(crate) fn unboxed_type(&self, cx: &mut RelationCx<'_, '_>, ty: &Type) -> Option<PrimitiveType> {
        if !matches!(ty, Type::Class(_) | Type::TypeVar(_) | Type::Intersection(_)) {
            return None;
        }
        let well_known = cx.well_known();
        PrimitiveType::ALL.into_iter().find(|primitive| {
            let boxed = well_known.boxed(*primitive);
            cx.as_super(ty, boxed)
                .is_some_and(|sup| matches!(sup, Type::Class(class) if class.def == boxed))
        })
    }
}

/// Assignment conversion (JLS 5.2), including narrowing of `int` constants.
#[derive(Debug, Default)]
pub(crate) struct AssignableVisitor;

impl AssignableVisitor {
    /// `constant` is the value of `t` when it is the type of a constant expression.
    pub(crate) fn visit(
        &self,
        cx: &mut RelationCx<'_, '_>,
        t: &Type,
        s: &Type,
        constant: Option<i32>,
    ) -> bool {
        if t.is_error() {
            return true;
        }
        if let (Type::Primitive(source), Some(value)) = (t, constant) {
            if is_int_subrange(*source) {
                match s {
                    Type::Primitive(target) if is_int_subrange(*target) => {
                        if fits(*target, value) {
                            return true;
                        }
                    }
                    Type::Class(_) => {
                        if let Some(target) = cx.unboxed_type(s) {
                            if matches!(
                                target,
                                PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Char
                            ) {
                                return fits(target, value);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        cx.is_convertible(t, s)
    }
}

fn is_int_subrange(primitive: PrimitiveType) -> bool {
    matches!(
        primitive,
        PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Char | PrimitiveType::Int
    )
}

/// Whether an `int` constant is representable in `target`.
fn fits(target: PrimitiveType, value: i32) -> bool {
    match target {
        PrimitiveType::Byte => i8::try_from(value).is_ok(),
        PrimitiveType::Short => i16::try_from(value).is_ok(),
        PrimitiveType::Char => u16::try_from(value).is_ok(),
        PrimitiveType::Int => true,
        _ => false,
    }
}
