//! Type-expression model for Nova's field type resolution.
//!
//! Types are modelled the way they appear in declarations ([`Type`]) and the way they exist at
//! runtime after erasure ([`RawType`]). Class metadata is provided by a [`TypeEnv`]; the in-memory
//! [`TypeStore`] is the default implementation.

use std::fmt;

use serde::{Deserialize, Serialize};

mod error;
mod format;
mod store;

pub use error::{Result, TypeError};
pub use format::{format_raw_type, format_type};
pub use store::TypeStore;

/// Identity of a class (or interface) known to a [`TypeEnv`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(u32);

impl ClassId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

/// An erased runtime type: a class plus an array dimension count.
///
/// `RawType { class: List, dims: 2 }` is the runtime identity of `List<String>[][]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RawType {
    pub class: ClassId,
    pub dims: u8,
}

impl RawType {
    /// Deepest array nesting a `RawType` can represent (the JVM limit as well).
    pub const MAX_DIMS: u8 = u8::MAX;

    pub const fn class(class: ClassId) -> Self {
        Self { class, dims: 0 }
    }

    pub const fn array(class: ClassId, dims: u8) -> Self {
        Self { class, dims }
    }

    pub fn is_array(self) -> bool {
        self.dims > 0
    }

    /// The array type whose elements are `self`; `None` past [`RawType::MAX_DIMS`].
    pub fn array_of(self) -> Option<Self> {
        let dims = self.dims.checked_add(1)?;
        Some(Self {
            class: self.class,
            dims,
        })
    }
}

/// A class type parameter, identified by its declaring class and ordinal position.
///
/// The surface name lives in [`TypeParamDef`]; two parameters with the same name declared on
/// different classes are distinct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeVarId {
    pub owner: ClassId,
    pub index: u32,
}

impl TypeVarId {
    pub const fn new(owner: ClassId, index: u32) -> Self {
        Self { owner, index }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<Type>),
    Super(Box<Type>),
}

/// A parameterized type such as `Map<K, List<V>>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenericType {
    pub raw: ClassId,
    pub args: Vec<Type>,
}

impl GenericType {
    pub fn raw_type(&self) -> RawType {
        RawType::class(self.raw)
    }

    /// Check that the argument list matches the raw class's declared parameters.
    pub fn check_arity(&self, env: &dyn TypeEnv) -> Result<()> {
        let def = env.class(self.raw).ok_or(TypeError::UnknownClass(self.raw))?;
        if def.type_params.len() != self.args.len() {
            return Err(TypeError::ArityMismatch {
                class: def.name.clone(),
                expected: def.type_params.len(),
                found: self.args.len(),
            });
        }
        Ok(())
    }
}

/// A type as written in a declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// A concrete runtime type, e.g. `Integer` or the non-generic array `Integer[]`.
    Raw(RawType),
    /// An array whose component is itself a declared type, e.g. `T[]` or `List<X>[]`.
    Array(Box<Type>),
    Generic(GenericType),
    TypeVar(TypeVarId),
    Wildcard(WildcardBound),
}

impl Type {
    pub fn class(id: ClassId) -> Self {
        Type::Raw(RawType::class(id))
    }

    pub fn array(component: Type) -> Self {
        Type::Array(Box::new(component))
    }

    /// Wrap `component` in `dims` array layers.
    pub fn array_n(component: Type, dims: usize) -> Self {
        (0..dims).fold(component, |ty, _| Type::array(ty))
    }

    pub fn type_var(owner: ClassId, index: u32) -> Self {
        Type::TypeVar(TypeVarId::new(owner, index))
    }

    /// Build `raw<args...>`, rejecting argument lists that don't match the declared parameters.
    pub fn generic(env: &dyn TypeEnv, raw: ClassId, args: Vec<Type>) -> Result<Self> {
        let generic = GenericType { raw, args };
        generic.check_arity(env)?;
        Ok(Type::Generic(generic))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParamDef {
    pub name: String,
}

impl TypeParamDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Binary name, e.g. `java.util.List`.
    pub name: String,
    pub kind: ClassKind,
    #[serde(default)]
    pub type_params: Vec<TypeParamDef>,
    /// Declared superclass (`Raw` or `Generic`); `None` only for the hierarchy root and
    /// interfaces.
    #[serde(default)]
    pub super_class: Option<Type>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl ClassDef {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }
}

/// Classes every environment must provide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellKnownTypes {
    /// `java.lang.Object`, the root of every superclass chain.
    pub object: ClassId,
    /// `java.lang.Class<T>`, the metadata wrapper consulted for array contexts.
    pub class: ClassId,
}

/// Read-only class metadata consumed by type resolution.
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;

    fn well_known(&self) -> &WellKnownTypes;

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.class(id.owner)?.type_params.get(id.index as usize)
    }
}
