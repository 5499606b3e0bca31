//! Type grammar for service definitions
//!
//! This module provides the recursive type representation shared by
//! arguments and return types, and the classifier that routes each node to
//! its structural category.
//!
//! # Grammar
//!
//! | Node | Example | Notes |
//! |------|---------|-------|
//! | `Primitive(kind)` | `integer` | One of the nine primitive kinds |
//! | `Optional(T)` | `optional<string>` | Value may be absent |
//! | `List(T)` | `list<uuid>` | Ordered, duplicates allowed |
//! | `Set(T)` | `set<rid>` | Unordered, unique |
//! | `Map(K, V)` | `map<string, integer>` | Key-value pairs |
//! | `Reference(name)` | `DatasetId` | Named type defined by the service |
//! | `External(name)` | `com.example.Money` | Type imported from elsewhere |
//!
//! The grammar is a tree: nodes own their children and there are no
//! self-referential types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive kinds supported by the wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Boolean,
    Integer,
    Double,
    String,
    Uuid,
    Rid,
    SafeLong,
    BearerToken,
    DateTime,
}

impl PrimitiveKind {
    /// Every primitive kind, in declaration order
    pub const ALL: [PrimitiveKind; 9] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Integer,
        PrimitiveKind::Double,
        PrimitiveKind::String,
        PrimitiveKind::Uuid,
        PrimitiveKind::Rid,
        PrimitiveKind::SafeLong,
        PrimitiveKind::BearerToken,
        PrimitiveKind::DateTime,
    ];

    /// Lowercase name as written in service definitions
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Double => "double",
            PrimitiveKind::String => "string",
            PrimitiveKind::Uuid => "uuid",
            PrimitiveKind::Rid => "rid",
            PrimitiveKind::SafeLong => "safelong",
            PrimitiveKind::BearerToken => "bearertoken",
            PrimitiveKind::DateTime => "datetime",
        }
    }

    /// Name fragment used by the plain serializer (e.g. `SafeLong`)
    pub fn serializer_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Integer => "Integer",
            PrimitiveKind::Double => "Double",
            PrimitiveKind::String => "String",
            PrimitiveKind::Uuid => "Uuid",
            PrimitiveKind::Rid => "Rid",
            PrimitiveKind::SafeLong => "SafeLong",
            PrimitiveKind::BearerToken => "BearerToken",
            PrimitiveKind::DateTime => "DateTime",
        }
    }

    /// Parse from the lowercase definition name
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural category of a [`TypeNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCategory {
    Primitive,
    Optional,
    List,
    Set,
    Map,
    Reference,
    External,
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeCategory::Primitive => "primitive",
            TypeCategory::Optional => "optional",
            TypeCategory::List => "list",
            TypeCategory::Set => "set",
            TypeCategory::Map => "map",
            TypeCategory::Reference => "reference",
            TypeCategory::External => "external",
        };
        f.write_str(name)
    }
}

/// A node of the type grammar
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeNode {
    /// Primitive value
    Primitive(PrimitiveKind),

    /// optional<T>
    Optional(Box<TypeNode>),

    /// list<T>
    List(Box<TypeNode>),

    /// set<T>
    Set(Box<TypeNode>),

    /// map<K, V>
    Map {
        key: Box<TypeNode>,
        value: Box<TypeNode>,
    },

    /// Named type defined by the service (object, enum, alias, union)
    Reference(String),

    /// Type imported from outside the service definition
    External(String),
}

impl TypeNode {
    /// Structural category of this node
    pub fn category(&self) -> TypeCategory {
        match self {
            TypeNode::Primitive(_) => TypeCategory::Primitive,
            TypeNode::Optional(_) => TypeCategory::Optional,
            TypeNode::List(_) => TypeCategory::List,
            TypeNode::Set(_) => TypeCategory::Set,
            TypeNode::Map { .. } => TypeCategory::Map,
            TypeNode::Reference(_) => TypeCategory::Reference,
            TypeNode::External(_) => TypeCategory::External,
        }
    }

    /// Primitive kind, if this is a primitive node
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            TypeNode::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Check if this is a list or set
    pub fn is_collection(&self) -> bool {
        matches!(self, TypeNode::List(_) | TypeNode::Set(_))
    }

    /// Create a primitive type
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeNode::Primitive(kind)
    }

    /// Create a string type
    pub fn string() -> Self {
        TypeNode::Primitive(PrimitiveKind::String)
    }

    /// Create an integer type
    pub fn integer() -> Self {
        TypeNode::Primitive(PrimitiveKind::Integer)
    }

    /// Create a boolean type
    pub fn boolean() -> Self {
        TypeNode::Primitive(PrimitiveKind::Boolean)
    }

    /// Create an optional<T> type
    pub fn optional(inner: TypeNode) -> Self {
        TypeNode::Optional(Box::new(inner))
    }

    /// Create a list<T> type
    pub fn list(item: TypeNode) -> Self {
        TypeNode::List(Box::new(item))
    }

    /// Create a set<T> type
    pub fn set(item: TypeNode) -> Self {
        TypeNode::Set(Box::new(item))
    }

    /// Create a map<K, V> type
    pub fn map(key: TypeNode, value: TypeNode) -> Self {
        TypeNode::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Create a named reference
    pub fn reference(name: impl Into<String>) -> Self {
        TypeNode::Reference(name.into())
    }

    /// Create an external reference
    pub fn external(name: impl Into<String>) -> Self {
        TypeNode::External(name.into())
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Primitive(kind) => write!(f, "{}", kind),
            TypeNode::Optional(inner) => write!(f, "optional<{}>", inner),
            TypeNode::List(item) => write!(f, "list<{}>", item),
            TypeNode::Set(item) => write!(f, "set<{}>", item),
            TypeNode::Map { key, value } => write!(f, "map<{}, {}>", key, value),
            TypeNode::Reference(name) => f.write_str(name),
            TypeNode::External(name) => write!(f, "external<{}>", name),
        }
    }
}

impl From<PrimitiveKind> for TypeNode {
    fn from(kind: PrimitiveKind) -> Self {
        TypeNode::Primitive(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_is_total() {
        let nodes = [
            (TypeNode::integer(), TypeCategory::Primitive),
            (TypeNode::optional(TypeNode::string()), TypeCategory::Optional),
            (TypeNode::list(TypeNode::integer()), TypeCategory::List),
            (TypeNode::set(TypeNode::integer()), TypeCategory::Set),
            (
                TypeNode::map(TypeNode::string(), TypeNode::integer()),
                TypeCategory::Map,
            ),
            (TypeNode::reference("DatasetId"), TypeCategory::Reference),
            (TypeNode::external("Money"), TypeCategory::External),
        ];

        for (node, expected) in nodes {
            assert_eq!(node.category(), expected, "category of {}", node);
        }
    }

    #[test]
    fn test_primitive_names_round_trip() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(PrimitiveKind::from_name("any"), None);
    }

    #[test]
    fn test_display() {
        let nested = TypeNode::optional(TypeNode::map(
            TypeNode::string(),
            TypeNode::list(TypeNode::reference("Item")),
        ));
        assert_eq!(nested.to_string(), "optional<map<string, list<Item>>>");
        assert_eq!(TypeNode::external("Money").to_string(), "external<Money>");
        assert_eq!(
            TypeNode::primitive(PrimitiveKind::SafeLong).to_string(),
            "safelong"
        );
    }

    #[test]
    fn test_serde_shape() {
        let ty = TypeNode::list(TypeNode::primitive(PrimitiveKind::BearerToken));
        let json = serde_json::to_string(&ty).unwrap();
        assert_eq!(json, r#"{"list":{"primitive":"bearertoken"}}"#);

        let map: TypeNode =
            serde_json::from_str(r#"{"map":{"key":{"primitive":"string"},"value":{"reference":"Foo"}}}"#)
                .unwrap();
        assert_eq!(map, TypeNode::map(TypeNode::string(), TypeNode::reference("Foo")));
    }
}
