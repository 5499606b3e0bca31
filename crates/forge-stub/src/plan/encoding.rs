//! Plain-value encoding selection
//!
//! Decides whether a type can be written as a single textual value or as a
//! repeated list of such values, and names the plain serializer rule that
//! does it.

use crate::error::EncodingError;
use crate::ir::{PrimitiveKind, TypeNode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Collection shape of a repeated encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    List,
    Set,
}

impl CollectionKind {
    fn suffix(&self) -> &'static str {
        match self {
            CollectionKind::List => "List",
            CollectionKind::Set => "Set",
        }
    }
}

/// A plain serializer rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlatEncoding {
    /// One value, one wire entry
    Scalar(PrimitiveKind),
    /// Many values, one wire entry each, sharing the field name
    Repeated {
        item: PrimitiveKind,
        collection: CollectionKind,
    },
}

impl FlatEncoding {
    /// Select the plain encoding for a type
    pub fn for_type(ty: &TypeNode) -> Result<Self, EncodingError> {
        match ty {
            TypeNode::Primitive(kind) => Ok(FlatEncoding::Scalar(*kind)),
            TypeNode::List(item) => Self::repeated(ty, item, CollectionKind::List),
            TypeNode::Set(item) => Self::repeated(ty, item, CollectionKind::Set),
            TypeNode::Optional(_) => Err(EncodingError::unencodable(
                ty,
                "optional values have no plain representation",
            )),
            TypeNode::Map { .. } => Err(EncodingError::unencodable(
                ty,
                "maps have no plain representation",
            )),
            TypeNode::Reference(_) => Err(EncodingError::unencodable(
                ty,
                "named references have no plain representation",
            )),
            TypeNode::External(_) => Err(EncodingError::unencodable(
                ty,
                "external types have no plain representation",
            )),
        }
    }

    fn repeated(
        ty: &TypeNode,
        item: &TypeNode,
        collection: CollectionKind,
    ) -> Result<Self, EncodingError> {
        match Self::for_type(item) {
            Ok(FlatEncoding::Scalar(item)) => Ok(FlatEncoding::Repeated { item, collection }),
            Ok(FlatEncoding::Repeated { .. }) => Err(EncodingError::unencodable(
                ty,
                "nested collections have no plain representation",
            )),
            Err(_) => Err(EncodingError::unencodable(
                ty,
                "only collections of primitives have a plain representation",
            )),
        }
    }

    /// Whether the rule produces many wire entries
    pub fn is_repeated(&self) -> bool {
        matches!(self, FlatEncoding::Repeated { .. })
    }

    /// Primitive kind the rule serializes
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            FlatEncoding::Scalar(kind) | FlatEncoding::Repeated { item: kind, .. } => *kind,
        }
    }

    /// Plain serializer method name (e.g. `serializeIntegerList`)
    pub fn rule_name(&self) -> String {
        match self {
            FlatEncoding::Scalar(kind) => format!("serialize{}", kind.serializer_name()),
            FlatEncoding::Repeated { item, collection } => format!(
                "serialize{}{}",
                item.serializer_name(),
                collection.suffix()
            ),
        }
    }
}

impl fmt::Display for FlatEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rule_name())
    }
}
