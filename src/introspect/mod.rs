//! Type introspection for recursive validation
//!
//! Architecture: Explicit Reflection - Types describe their own members
//! - Every validatable type lists its public members once via `members()`
//! - The eligibility rule filters that list into a `TypeDescriptor`
//! - Each descendable property carries an accessor bound to one field

pub mod descend;

pub use descend::{Descend, IntoNode};

use crate::domain::violations::{GraphError, GraphResult, ValidationResult};
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a node in an object graph
pub type NodeRef = Arc<dyn Validatable>;

/// Type-erased property reader bound to a single member of a single type
pub type Accessor = Arc<dyn Fn(&dyn Any) -> GraphResult<PropertyValue> + Send + Sync>;

/// Upcast helper so trait objects can expose their concrete type
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An object that can take part in recursive graph validation.
///
/// `check_constraints` is the single-object check: it reports violations of
/// this object's own fields only, with member names relative to the object.
/// `members` lists the object's public members the way a reflected property
/// list would; the type cache calls it once per concrete type and keeps the
/// descendable subset.
///
/// ```
/// use graph_validator::{MemberInfo, Validatable, ValidationResult};
/// use std::sync::Arc;
///
/// struct Address {
///     city: String,
/// }
///
/// impl Validatable for Address {
///     fn check_constraints(&self) -> Vec<ValidationResult> {
///         if self.city.is_empty() {
///             vec![ValidationResult::for_member("required", "City")]
///         } else {
///             Vec::new()
///         }
///     }
///
///     fn members(&self) -> Vec<MemberInfo> {
///         vec![MemberInfo::text("City")]
///     }
/// }
///
/// struct Customer {
///     address: Option<Arc<Address>>,
/// }
///
/// impl Validatable for Customer {
///     fn members(&self) -> Vec<MemberInfo> {
///         vec![MemberInfo::reference("Address", |c: &Customer| &c.address)]
///     }
/// }
///
/// let customer = Customer {
///     address: Some(Arc::new(Address { city: String::new() })),
/// };
/// let outcome = graph_validator::validate(&customer).unwrap();
/// assert_eq!(outcome.results()[0].member_names(), ["Address.City"]);
/// ```
pub trait Validatable: AsAny + Send + Sync {
    /// Violations of this object's own constraints
    fn check_constraints(&self) -> Vec<ValidationResult> {
        Vec::new()
    }

    /// Public members of this type, in declaration order
    fn members(&self) -> Vec<MemberInfo> {
        Vec::new()
    }

    /// Name of the concrete type, used in logs and errors
    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// Declared kind of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Text content, never descended into
    Text,
    /// Primitives, enums and other inline values
    Value,
    /// A reference that may hold nested validatable objects
    Reference,
}

/// Reflected information about one public member of a type
pub struct MemberInfo {
    name: String,
    kind: MemberKind,
    readable: bool,
    indexed: bool,
    accessor: Option<Accessor>,
}

impl MemberInfo {
    fn plain(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            kind,
            readable: true,
            indexed: false,
            accessor: None,
        }
    }

    /// A text member
    pub fn text(name: impl Into<String>) -> Self {
        Self::plain(name, MemberKind::Text)
    }

    /// A primitive or enum member
    pub fn value(name: impl Into<String>) -> Self {
        Self::plain(name, MemberKind::Value)
    }

    /// A reference member read through a field projection.
    ///
    /// The projection is bound once per type; reading the property only
    /// downcasts the instance and converts the field.
    pub fn reference<T, D, F>(name: impl Into<String>, project: F) -> Self
    where
        T: Validatable,
        D: Descend + ?Sized,
        F: Fn(&T) -> &D + Send + Sync + 'static,
    {
        Self::try_reference(name, move |target: &T| project(target).descend())
    }

    /// A reference member read through a getter that can fail.
    ///
    /// A getter error is a traversal defect and aborts validation.
    pub fn try_reference<T, F>(name: impl Into<String>, getter: F) -> Self
    where
        T: Validatable,
        F: Fn(&T) -> Result<PropertyValue, String> + Send + Sync + 'static,
    {
        let name = name.into();
        let property = name.clone();
        let accessor: Accessor = Arc::new(move |instance: &dyn Any| {
            let target = instance.downcast_ref::<T>().ok_or_else(|| {
                GraphError::access(
                    type_name::<T>(),
                    &property,
                    "instance does not match the described type",
                )
            })?;
            getter(target).map_err(|message| GraphError::access(type_name::<T>(), &property, message))
        });

        Self {
            name,
            kind: MemberKind::Reference,
            readable: true,
            indexed: false,
            accessor: Some(accessor),
        }
    }

    /// Mark the member as not publicly readable
    pub fn write_only(mut self) -> Self {
        self.readable = false;
        self
    }

    /// Mark the member as an indexer that takes parameters
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    /// Declared member name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shape of the member's value
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Whether the member has a getter
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    /// Whether the member takes index parameters
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    /// Whether this member may hold nested validatable objects.
    ///
    /// Readable, parameterless, and neither text nor an inline value.
    pub fn is_descendable(&self) -> bool {
        self.readable
            && !self.indexed
            && self.kind == MemberKind::Reference
            && self.accessor.is_some()
    }
}

impl fmt::Debug for MemberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberInfo")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("readable", &self.readable)
            .field("indexed", &self.indexed)
            .finish()
    }
}

/// Value read from a descendable property
#[derive(Clone)]
pub enum PropertyValue {
    /// Nothing to descend into
    Absent,
    /// A single nested object
    Object(NodeRef),
    /// Elements of a collection; absent elements are skipped
    Collection(Vec<Option<NodeRef>>),
}

impl PropertyValue {
    /// Whether the property held no reference
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("Absent"),
            Self::Object(node) => write!(f, "Object({})", node.type_name()),
            Self::Collection(items) => write!(f, "Collection(len = {})", items.len()),
        }
    }
}

/// A property of a type that is eligible for recursive descent
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: String,
    accessor: Accessor,
}

impl PropertyDescriptor {
    /// Property name used as the path segment for nested violations
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read this property from an instance of the described type
    pub fn get(&self, instance: &dyn Validatable) -> GraphResult<PropertyValue> {
        (self.accessor)(instance.as_any())
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Descendable properties of one concrete type, in declaration order
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    properties: Vec<PropertyDescriptor>,
}

impl TypeDescriptor {
    /// Build the descriptor for an object's concrete type
    pub fn of(object: &dyn Validatable) -> Self {
        Self::from_members(object.as_any().type_id(), object.type_name(), object.members())
    }

    /// Apply the eligibility rule to a reflected member list
    pub fn from_members(
        type_id: TypeId,
        type_name: &'static str,
        members: Vec<MemberInfo>,
    ) -> Self {
        let properties = members
            .into_iter()
            .filter(MemberInfo::is_descendable)
            .filter_map(|member| {
                let MemberInfo { name, accessor, .. } = member;
                accessor.map(|accessor| PropertyDescriptor { name, accessor })
            })
            .collect();

        Self {
            type_id,
            type_name,
            properties,
        }
    }

    /// Concrete type this descriptor was built for
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Name of the described type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Eligible properties in declaration order
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Whether the type has nothing to descend into
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Property names in declaration order
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(PropertyDescriptor::name)
    }
}
