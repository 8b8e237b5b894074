//! Java type model used by Nova's type relation engine.
//!
//! Types are plain values ([`Type`]) that can be cloned and shared freely. Declarations (classes,
//! interfaces, type parameters, members) live in a [`TypeEnv`] and are referenced from types by
//! id, so the type graph itself never contains cycles: an F-bounded parameter such as
//! `E extends Enum<E>` is a cycle between declarations, not between nodes.
//!
//! The crate also provides the boundary pieces the relation engine consumes:
//! - [`TypeStore`], an arena of declarations with a bundled minimal JDK,
//! - [`TyContext`], a per-invocation overlay that owns capture variables,
//! - [`Equality`], configurable structural equality/hashing.

#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

mod equality;
mod error;
pub mod java;
mod store;

pub use equality::{EqKey, Equality};
pub use error::ModelError;
pub use java::env::TyContext;
pub use java::format::{format_type, TypeDisplay};
pub use store::{EnvKey, TypeStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(u32);

impl ClassId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a type parameter declaration.
///
/// Ids with the high bit set are owned by a [`TyContext`] rather than by the global store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeVarId(u32);

impl TypeVarId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveType::Boolean)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoTypeKind {
    Void,
    None,
    Module,
    Package,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<Type>),
    Super(Box<Type>),
}

impl WildcardBound {
    pub fn extends_bound(&self) -> Option<&Type> {
        match self {
            WildcardBound::Extends(bound) => Some(bound),
            _ => None,
        }
    }

    pub fn super_bound(&self) -> Option<&Type> {
        match self {
            WildcardBound::Super(bound) => Some(bound),
            _ => None,
        }
    }
}

/// A (possibly parameterized, possibly raw) class or interface type.
///
/// `erased` memoizes that this node is the result of erasure; it does not take part in equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassType {
    pub def: ClassId,
    pub args: Vec<Type>,
    pub enclosing: Option<Box<Type>>,
    #[serde(default)]
    pub erased: bool,
    /// Type-use annotations, by annotation class.
    #[serde(default)]
    pub annotations: Vec<ClassId>,
}

impl PartialEq for ClassType {
    fn eq(&self, other: &Self) -> bool {
        self.def == other.def
            && self.args == other.args
            && self.enclosing == other.enclosing
            && self.annotations == other.annotations
    }
}

impl Eq for ClassType {}

impl std::hash::Hash for ClassType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.def.hash(state);
        self.args.hash(state);
        self.enclosing.hash(state);
        self.annotations.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutableType {
    pub type_params: Vec<TypeVarId>,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub receiver: Option<Type>,
    pub thrown: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Primitive(PrimitiveType),
    Class(ClassType),
    Array(Box<Type>),
    TypeVar(TypeVarId),
    Wildcard(WildcardBound),
    Intersection(Vec<Type>),
    Executable(Box<ExecutableType>),
    NoType(NoTypeKind),
    Null,
    Error,
}

impl Type {
    pub const VOID: Type = Type::NoType(NoTypeKind::Void);
    pub const NONE: Type = Type::NoType(NoTypeKind::None);

    pub fn class(def: ClassId, args: Vec<Type>) -> Type {
        Type::Class(ClassType {
            def,
            args,
            enclosing: None,
            erased: false,
            annotations: Vec::new(),
        })
    }

    /// A member (inner) class type whose enclosing instance type is `enclosing`.
    pub fn nested(enclosing: Type, def: ClassId, args: Vec<Type>) -> Type {
        Type::Class(ClassType {
            def,
            args,
            enclosing: Some(Box::new(enclosing)),
            erased: false,
            annotations: Vec::new(),
        })
    }

    pub fn array(component: Type) -> Type {
        Type::Array(Box::new(component))
    }

    pub fn wildcard() -> Type {
        Type::Wildcard(WildcardBound::Unbounded)
    }

    pub fn extends(bound: Type) -> Type {
        Type::Wildcard(WildcardBound::Extends(Box::new(bound)))
    }

    pub fn super_of(bound: Type) -> Type {
        Type::Wildcard(WildcardBound::Super(Box::new(bound)))
    }

    pub fn int() -> Type {
        Type::Primitive(PrimitiveType::Int)
    }

    pub fn boolean() -> Type {
        Type::Primitive(PrimitiveType::Boolean)
    }

    /// Returns a copy of this class type carrying `annotations`; other kinds are returned as-is.
    pub fn annotated(mut self, annotations: Vec<ClassId>) -> Type {
        if let Type::Class(class) = &mut self {
            class.annotations = annotations;
        }
        self
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Primitive(_) => TypeKind::Primitive,
            Type::Class(_) => TypeKind::Declared,
            Type::Array(_) => TypeKind::Array,
            Type::TypeVar(_) => TypeKind::TypeVariable,
            Type::Wildcard(_) => TypeKind::Wildcard,
            Type::Intersection(_) => TypeKind::Intersection,
            Type::Executable(_) => TypeKind::Executable,
            Type::NoType(NoTypeKind::Void) => TypeKind::Void,
            Type::NoType(NoTypeKind::None) => TypeKind::None,
            Type::NoType(NoTypeKind::Module) => TypeKind::Module,
            Type::NoType(NoTypeKind::Package) => TypeKind::Package,
            Type::Null => TypeKind::Null,
            Type::Error => TypeKind::Error,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    /// Reference types in the JLS sense, plus the error type which stands in for any of them.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Type::Class(_)
                | Type::Array(_)
                | Type::TypeVar(_)
                | Type::Intersection(_)
                | Type::Null
                | Type::Error
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    pub fn as_class(&self) -> Option<&ClassType> {
        match self {
            Type::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Returns `true` if any type variable reachable from this node satisfies `pred`.
    ///
    /// Bounds of referenced variables are not followed.
    pub fn any_type_var(&self, pred: &mut dyn FnMut(TypeVarId) -> bool) -> bool {
        match self {
            Type::TypeVar(id) => pred(*id),
            Type::Class(class) => {
                class.args.iter().any(|arg| arg.any_type_var(pred))
                    || class
                        .enclosing
                        .as_deref()
                        .is_some_and(|enclosing| enclosing.any_type_var(pred))
            }
            Type::Array(component) => component.any_type_var(pred),
            Type::Wildcard(WildcardBound::Extends(bound))
            | Type::Wildcard(WildcardBound::Super(bound)) => bound.any_type_var(pred),
            Type::Intersection(bounds) => bounds.iter().any(|b| b.any_type_var(pred)),
            Type::Executable(exec) => {
                exec.type_params.iter().any(|id| pred(*id))
                    || exec.params.iter().any(|p| p.any_type_var(pred))
                    || exec.return_type.any_type_var(pred)
                    || exec.thrown.iter().any(|t| t.any_type_var(pred))
                    || exec
                        .receiver
                        .as_ref()
                        .is_some_and(|r| r.any_type_var(pred))
            }
            Type::Primitive(_)
            | Type::Wildcard(WildcardBound::Unbounded)
            | Type::NoType(_)
            | Type::Null
            | Type::Error => false,
        }
    }

    pub fn mentions_type_var(&self, id: TypeVarId) -> bool {
        self.any_type_var(&mut |candidate| candidate == id)
    }

    /// Whether this type refers to variables owned by a [`TyContext`].
    pub fn has_context_local_vars(&self) -> bool {
        self.any_type_var(&mut |id| id.is_context_local())
    }
}

/// Coarse classification of a [`Type`], used in diagnostics and argument validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Primitive,
    Declared,
    Array,
    TypeVariable,
    Wildcard,
    Intersection,
    Executable,
    Void,
    None,
    Module,
    Package,
    Null,
    Error,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKind::Primitive => "primitive",
            TypeKind::Declared => "declared",
            TypeKind::Array => "array",
            TypeKind::TypeVariable => "type variable",
            TypeKind::Wildcard => "wildcard",
            TypeKind::Intersection => "intersection",
            TypeKind::Executable => "executable",
            TypeKind::Void => "void",
            TypeKind::None => "none",
            TypeKind::Module => "module",
            TypeKind::Package => "package",
            TypeKind::Null => "null",
            TypeKind::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl ClassKind {
    pub fn is_interface(self) -> bool {
        matches!(self, ClassKind::Interface | ClassKind::Annotation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParamDef {
    pub name: String,
    pub upper_bounds: Vec<Type>,
    pub lower_bound: Option<Type>,
    /// For capture variables: the wildcard this variable was created from.
    #[serde(default)]
    pub captured: Option<WildcardBound>,
}

impl TypeParamDef {
    pub fn new(name: impl Into<String>, upper_bounds: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            upper_bounds,
            lower_bound: None,
            captured: None,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,
    pub is_static: bool,
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub type_params: Vec<TypeVarId>,
    pub params: Vec<Type>,
    pub return_type: Type,
    #[serde(default)]
    pub thrown: Vec<Type>,
    pub is_static: bool,
    pub is_varargs: bool,
    pub is_abstract: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorDef {
    pub type_params: Vec<TypeVarId>,
    pub params: Vec<Type>,
    #[serde(default)]
    pub thrown: Vec<Type>,
    pub is_varargs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Qualified name, e.g. `java.util.Map.Entry`.
    pub name: String,
    pub kind: ClassKind,
    pub module: Option<String>,
    pub enclosing: Option<ClassId>,
    /// Nested classes declared `static` (and all nested interfaces) have no enclosing instance.
    pub is_static: bool,
    pub type_params: Vec<TypeVarId>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
    pub fields: Vec<FieldDef>,
    pub constructors: Vec<ConstructorDef>,
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    /// An empty top-level declaration; callers fill in the rest with struct update syntax.
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            module: None,
            enclosing: None,
            is_static: false,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind.is_interface()
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit(['.', '$']).next().unwrap_or(&self.name)
    }

    /// Whether this class has an enclosing *instance* (a non-static member class).
    pub fn is_inner(&self) -> bool {
        self.enclosing.is_some() && !self.is_static && !self.is_interface()
    }
}

/// A member declared by a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberId {
    Field { owner: ClassId, index: usize },
    Method { owner: ClassId, index: usize },
    Constructor { owner: ClassId, index: usize },
    /// A member class or interface.
    Class(ClassId),
    /// The `index`th type parameter declared by `owner`.
    TypeParam { owner: ClassId, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
    TypeParameter,
    Field,
    Method,
    Constructor,
    Package,
    Module,
}

/// An identity-bearing declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Class(ClassId),
    TypeParam(TypeVarId),
    Member(MemberId),
    Package(String),
    Module(String),
}

impl Element {
    pub fn kind(&self, env: &dyn TypeEnv) -> Option<ElementKind> {
        Some(match self {
            Element::Class(id) | Element::Member(MemberId::Class(id)) => {
                match env.class(*id)?.kind {
                    ClassKind::Class => ElementKind::Class,
                    ClassKind::Interface => ElementKind::Interface,
                    ClassKind::Enum => ElementKind::Enum,
                    ClassKind::Record => ElementKind::Record,
                    ClassKind::Annotation => ElementKind::Annotation,
                }
            }
            Element::TypeParam(_) | Element::Member(MemberId::TypeParam { .. }) => {
                ElementKind::TypeParameter
            }
            Element::Member(MemberId::Field { .. }) => ElementKind::Field,
            Element::Member(MemberId::Method { .. }) => ElementKind::Method,
            Element::Member(MemberId::Constructor { .. }) => ElementKind::Constructor,
            Element::Package(_) => ElementKind::Package,
            Element::Module(_) => ElementKind::Module,
        })
    }

    pub fn simple_name(&self, env: &dyn TypeEnv) -> Option<String> {
        match self {
            Element::Class(id) | Element::Member(MemberId::Class(id)) => {
                Some(env.class(*id)?.simple_name().to_string())
            }
            Element::TypeParam(id) => Some(env.type_param(*id)?.name.clone()),
            Element::Member(member @ MemberId::TypeParam { .. }) => {
                Some(env.type_param(member.type_param(env)?)?.name.clone())
            }
            Element::Member(MemberId::Field { owner, index }) => {
                Some(env.class(*owner)?.fields.get(*index)?.name.clone())
            }
            Element::Member(MemberId::Method { owner, index }) => {
                Some(env.class(*owner)?.methods.get(*index)?.name.clone())
            }
            Element::Member(MemberId::Constructor { .. }) => Some("<init>".to_string()),
            Element::Package(name) | Element::Module(name) => {
                Some(name.rsplit('.').next().unwrap_or(name).to_string())
            }
        }
    }

    pub fn qualified_name(&self, env: &dyn TypeEnv) -> Option<String> {
        match self {
            Element::Class(id) | Element::Member(MemberId::Class(id)) => {
                Some(env.class(*id)?.name.clone())
            }
            Element::Package(name) | Element::Module(name) => Some(name.clone()),
            other => other.simple_name(env),
        }
    }

    pub fn enclosing(&self, env: &dyn TypeEnv) -> Option<Element> {
        match self {
            Element::Class(id) | Element::Member(MemberId::Class(id)) => {
                let def = env.class(*id)?;
                match def.enclosing {
                    Some(outer) => Some(Element::Class(outer)),
                    None => def
                        .name
                        .rsplit_once('.')
                        .map(|(package, _)| Element::Package(package.to_string())),
                }
            }
            Element::Member(MemberId::Field { owner, .. })
            | Element::Member(MemberId::Method { owner, .. })
            | Element::Member(MemberId::Constructor { owner, .. })
            | Element::Member(MemberId::TypeParam { owner, .. }) => Some(Element::Class(*owner)),
            Element::Package(_) => None,
            Element::Module(_) => None,
            Element::TypeParam(_) => None,
        }
    }

    /// The type declared by this element: the generic self type of a class, the variable of a
    /// type parameter, the type of a field, or the signature of a method/constructor.
    pub fn as_type(&self, env: &dyn TypeEnv) -> Option<Type> {
        match self {
            Element::Class(id) | Element::Member(MemberId::Class(id)) => {
                env.class(*id)?;
                Some(generic_self_type(env, *id))
            }
            Element::TypeParam(id) => Some(Type::TypeVar(*id)),
            Element::Member(member @ MemberId::TypeParam { .. }) => {
                Some(Type::TypeVar(member.type_param(env)?))
            }
            Element::Member(MemberId::Field { owner, index }) => {
                Some(env.class(*owner)?.fields.get(*index)?.ty.clone())
            }
            Element::Member(MemberId::Method { owner, index }) => {
                let method = env.class(*owner)?.methods.get(*index)?;
                Some(Type::Executable(Box::new(ExecutableType {
                    type_params: method.type_params.clone(),
                    params: method.params.clone(),
                    return_type: method.return_type.clone(),
                    receiver: None,
                    thrown: method.thrown.clone(),
                })))
            }
            Element::Member(MemberId::Constructor { owner, index }) => {
                let ctor = env.class(*owner)?.constructors.get(*index)?;
                Some(Type::Executable(Box::new(ExecutableType {
                    type_params: ctor.type_params.clone(),
                    params: ctor.params.clone(),
                    return_type: Type::VOID,
                    receiver: None,
                    thrown: ctor.thrown.clone(),
                })))
            }
            Element::Package(_) => Some(Type::NoType(NoTypeKind::Package)),
            Element::Module(_) => Some(Type::NoType(NoTypeKind::Module)),
        }
    }
}

impl MemberId {
    /// The class declaring this member.
    pub fn owner(self, env: &dyn TypeEnv) -> Option<ClassId> {
        match self {
            MemberId::Field { owner, .. }
            | MemberId::Method { owner, .. }
            | MemberId::Constructor { owner, .. }
            | MemberId::TypeParam { owner, .. } => Some(owner),
            MemberId::Class(id) => env.class(id)?.enclosing,
        }
    }

    /// The variable declared by a type-parameter member.
    pub fn type_param(self, env: &dyn TypeEnv) -> Option<TypeVarId> {
        match self {
            MemberId::TypeParam { owner, index } => env.class(owner)?.type_params.get(index).copied(),
            _ => None,
        }
    }

    pub fn is_static(self, env: &dyn TypeEnv) -> Option<bool> {
        Some(match self {
            MemberId::Field { owner, index } => env.class(owner)?.fields.get(index)?.is_static,
            MemberId::Method { owner, index } => env.class(owner)?.methods.get(index)?.is_static,
            MemberId::Constructor { owner, index } => {
                env.class(owner)?.constructors.get(index)?;
                false
            }
            MemberId::Class(id) => !env.class(id)?.is_inner(),
            MemberId::TypeParam { .. } => {
                self.type_param(env)?;
                false
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub string: ClassId,
    pub cloneable: ClassId,
    pub serializable: ClassId,
    pub number: ClassId,
    pub boolean: ClassId,
    pub byte: ClassId,
    pub short: ClassId,
    pub character: ClassId,
    pub integer: ClassId,
    pub long: ClassId,
    pub float: ClassId,
    pub double: ClassId,
}

impl WellKnownTypes {
    pub fn boxed(&self, primitive: PrimitiveType) -> ClassId {
        match primitive {
            PrimitiveType::Boolean => self.boolean,
            PrimitiveType::Byte => self.byte,
            PrimitiveType::Short => self.short,
            PrimitiveType::Char => self.character,
            PrimitiveType::Int => self.integer,
            PrimitiveType::Long => self.long,
            PrimitiveType::Float => self.float,
            PrimitiveType::Double => self.double,
        }
    }

    pub fn unboxed(&self, class: ClassId) -> Option<PrimitiveType> {
        PrimitiveType::ALL
            .into_iter()
            .find(|primitive| self.boxed(*primitive) == class)
    }

    /// `true` for the three classes every array type is a subtype of.
    pub fn is_array_supertype(&self, class: ClassId) -> bool {
        class == self.object || class == self.cloneable || class == self.serializable
    }
}

/// Read access to declarations.
///
/// This is the boundary between the relation engine and whatever produced the declarations
/// (source code, class files, reflection).
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;
    fn lookup_class(&self, name: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnownTypes;

    fn lookup_class_in_module(&self, module: &str, name: &str) -> Option<ClassId> {
        let id = self.lookup_class(name)?;
        match self.class(id)?.module.as_deref() {
            Some(declared) if declared != module => None,
            _ => Some(id),
        }
    }

    /// First context-local type parameter index not used by this environment.
    fn next_context_local(&self) -> u32 {
        0
    }

    /// Identity of the declaration snapshot, for callers that memoize derived data.
    fn cache_key(&self) -> Option<EnvKey> {
        None
    }
}

/// Builds `def<args>` after checking that `args` is either empty (raw) or matches the number of
/// declared type parameters.
pub fn declared_type(env: &dyn TypeEnv, def: ClassId, args: Vec<Type>) -> Result<Type, ModelError> {
    let class_def = env.class(def).ok_or(ModelError::UnknownClass(def))?;
    if !args.is_empty() && args.len() != class_def.type_params.len() {
        return Err(ModelError::ArityMismatch {
            class: class_def.name.clone(),
            expected: class_def.type_params.len(),
            found: args.len(),
        });
    }
    if let Some(arg) = args
        .iter()
        .find(|arg| !arg.is_reference() && !matches!(arg, Type::Wildcard(_)))
    {
        return Err(ModelError::InvalidTypeArgument(arg.kind()));
    }
    Ok(Type::class(def, args))
}

/// A generic class used without type arguments.
pub fn is_raw(env: &dyn TypeEnv, ty: &Type) -> bool {
    let Type::Class(class) = ty else {
        return false;
    };
    if class.args.is_empty() {
        if let Some(def) = env.class(class.def) {
            if !def.type_params.is_empty() {
                return true;
            }
        }
    }
    class
        .enclosing
        .as_deref()
        .is_some_and(|enclosing| is_raw(env, enclosing))
}

pub fn is_interface_type(env: &dyn TypeEnv, ty: &Type) -> bool {
    match ty {
        Type::Class(class) => env.class(class.def).is_some_and(ClassDef::is_interface),
        _ => false,
    }
}

/// The type a class declares for itself: `List<E>` for `interface List<E>`, with the generic
/// enclosing type for inner classes.
pub fn generic_self_type(env: &dyn TypeEnv, def: ClassId) -> Type {
    let Some(class_def) = env.class(def) else {
        return Type::class(def, Vec::new());
    };
    let args = class_def
        .type_params
        .iter()
        .map(|tv| Type::TypeVar(*tv))
        .collect();
    match class_def.enclosing {
        Some(outer) if class_def.is_inner() => {
            Type::nested(generic_self_type(env, outer), def, args)
        }
        _ => Type::class(def, args),
    }
}

/// Type parameters of `def` including those of enclosing classes, outermost first.
pub fn all_type_params(env: &dyn TypeEnv, def: ClassId) -> Vec<TypeVarId> {
    let Some(class_def) = env.class(def) else {
        return Vec::new();
    };
    let mut out = match class_def.enclosing {
        Some(outer) if class_def.is_inner() => all_type_params(env, outer),
        _ => Vec::new(),
    };
    out.extend(class_def.type_params.iter().copied());
    out
}

/// Type arguments of `ty` including those of its enclosing types, outermost first.
pub fn all_type_args(ty: &Type) -> Vec<Type> {
    let Type::Class(class) = ty else {
        return Vec::new();
    };
    let mut out = match class.enclosing.as_deref() {
        Some(enclosing) => all_type_args(enclosing),
        None => Vec::new(),
    };
    out.extend(class.args.iter().cloned());
    out
}

/// The upper bound of a type variable: `Object` if undeclared, the single bound, or an
/// intersection of all declared bounds.
pub fn upper_bound(env: &dyn TypeEnv, id: TypeVarId) -> Type {
    let object = || Type::class(env.well_known().object, Vec::new());
    let Some(def) = env.type_param(id) else {
        return object();
    };
    match def.upper_bounds.as_slice() {
        [] => object(),
        [single] => single.clone(),
        many => Type::Intersection(many.to_vec()),
    }
}

/// The lower bound of a type variable; the null type when absent.
pub fn lower_bound(env: &dyn TypeEnv, id: TypeVarId) -> Type {
    env.type_param(id)
        .and_then(|def| def.lower_bound.clone())
        .unwrap_or(Type::Null)
}
