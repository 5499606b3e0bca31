//! Argument placement planning
//!
//! Turns one argument definition into a placement instruction: the request
//! slot that receives the value and the rule that encodes it.
//!
//! # Placement Matrix
//!
//! | Location | Type | Slot | Encoding |
//! |----------|------|------|----------|
//! | body | any | body | body serializer for the declared type |
//! | header / query | `optional<T>` | single entry, only when present | `T` per this table |
//! | header / path / query | reference | single entry | string conversion |
//! | header / query | `list<T>`, `set<T>` | all entries with the wire name | repeated plain rule |
//! | header / path / query | primitive | single entry | scalar plain rule |
//!
//! Anything else (maps, external types, bare optionals in a path, nested
//! optionals) is rejected with [`PlanError::IllegalPlacement`].

use crate::config::PlannerConfig;
use crate::error::{EncodingError, PlanError};
use crate::ir::{ArgumentDefinition, ParameterLocation, TypeNode};
use crate::plan::FlatEncoding;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Request slot that receives an argument's value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestSlot {
    /// Request body
    Body,
    /// Header with the given wire name
    Header(String),
    /// Path parameter with the given name
    Path(String),
    /// Query entry with the given wire name
    Query(String),
}

impl RequestSlot {
    /// Wire name of the slot (None for the body)
    pub fn wire_name(&self) -> Option<&str> {
        match self {
            RequestSlot::Body => None,
            RequestSlot::Header(name) | RequestSlot::Path(name) | RequestSlot::Query(name) => {
                Some(name)
            }
        }
    }
}

/// How the value is converted for its slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueEncoding {
    /// Whole-value body serializer keyed by the declared type
    BodySerializer(TypeNode),
    /// Plain serializer rule
    Plain(FlatEncoding),
    /// Generic string conversion of the value
    Stringify,
}

/// When the value is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// Always written
    Always,
    /// Written only when the optional value is present
    WhenPresent,
}

/// Placement of a single argument into the outgoing request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacementInstruction {
    /// Local name of the argument supplying the value
    pub argument: String,
    /// Target slot
    pub slot: RequestSlot,
    /// Encoding rule
    pub encoding: ValueEncoding,
    /// Whether the value is conditional on presence
    pub presence: Presence,
}

impl PlacementInstruction {
    /// Check if the instruction is emitted only for present values
    pub fn is_conditional(&self) -> bool {
        self.presence == Presence::WhenPresent
    }

    /// Check if the instruction fills every entry sharing its wire name
    pub fn is_multi_valued(&self) -> bool {
        matches!(&self.encoding, ValueEncoding::Plain(encoding) if encoding.is_repeated())
    }

    /// Request builder method that applies the instruction (e.g. `putAllQueryParams`)
    pub fn request_method(&self) -> &'static str {
        match (&self.slot, self.is_multi_valued()) {
            (RequestSlot::Body, _) => "body",
            (RequestSlot::Header(_), false) => "putHeaderParams",
            (RequestSlot::Header(_), true) => "putAllHeaderParams",
            (RequestSlot::Path(_), _) => "putPathParams",
            (RequestSlot::Query(_), false) => "putQueryParams",
            (RequestSlot::Query(_), true) => "putAllQueryParams",
        }
    }
}

/// Flat wire locations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Site {
    Header,
    Path,
    Query,
}

/// Planner for individual arguments
pub struct ArgumentPlanner<'a> {
    config: &'a PlannerConfig,
}

impl<'a> ArgumentPlanner<'a> {
    /// Create a new argument planner
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Plan the placement of one argument
    pub fn plan(&self, arg: &ArgumentDefinition) -> Result<PlacementInstruction, PlanError> {
        trace!(
            argument = %arg.name,
            location = %arg.location,
            category = %arg.ty.category(),
            "stub.plan_argument"
        );

        let (slot, site) = match &arg.location {
            ParameterLocation::Body => {
                return Ok(PlacementInstruction {
                    argument: arg.name.clone(),
                    slot: RequestSlot::Body,
                    encoding: ValueEncoding::BodySerializer(arg.ty.clone()),
                    presence: Presence::Always,
                });
            }
            ParameterLocation::Header(name) => (RequestSlot::Header(name.clone()), Site::Header),
            ParameterLocation::Path => (RequestSlot::Path(arg.name.clone()), Site::Path),
            ParameterLocation::Query(name) => (RequestSlot::Query(name.clone()), Site::Query),
        };

        let (encoding, presence) = self
            .encode(site, &arg.ty, Presence::Always)
            .map_err(|source| PlanError::IllegalPlacement {
                argument: arg.name.clone(),
                location: arg.location.clone(),
                ty: arg.ty.clone(),
                source,
            })?;

        Ok(PlacementInstruction {
            argument: arg.name.clone(),
            slot,
            encoding,
            presence,
        })
    }

    fn encode(
        &self,
        site: Site,
        ty: &TypeNode,
        presence: Presence,
    ) -> Result<(ValueEncoding, Presence), EncodingError> {
        match (site, ty) {
            (Site::Header | Site::Query, TypeNode::Optional(inner)) => match presence {
                Presence::Always => self.encode(site, inner, Presence::WhenPresent),
                Presence::WhenPresent => Err(EncodingError::unencodable(
                    ty,
                    "nested optionals have no plain representation",
                )),
            },
            (_, TypeNode::Reference(_)) => Ok((ValueEncoding::Stringify, presence)),
            (Site::Header | Site::Query, TypeNode::List(_) | TypeNode::Set(_)) => {
                if presence == Presence::WhenPresent && !self.config.optional_collections {
                    return Err(EncodingError::unencodable(
                        ty,
                        "optional collections are disabled",
                    ));
                }
                Ok((ValueEncoding::Plain(FlatEncoding::for_type(ty)?), presence))
            }
            (Site::Path, _) => match FlatEncoding::for_type(ty)? {
                encoding @ FlatEncoding::Scalar(_) => {
                    Ok((ValueEncoding::Plain(encoding), presence))
                }
                FlatEncoding::Repeated { .. } => Err(EncodingError::unencodable(
                    ty,
                    "a path segment holds a single value",
                )),
            },
            (Site::Header | Site::Query, _) => {
                Ok((ValueEncoding::Plain(FlatEncoding::for_type(ty)?), presence))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::PrimitiveKind;
    use pretty_assertions::assert_eq;

    fn plan(arg: ArgumentDefinition) -> Result<PlacementInstruction, PlanError> {
        let config = PlannerConfig::default();
        ArgumentPlanner::new(&config).plan(&arg)
    }

    fn every_shape() -> Vec<TypeNode> {
        vec![
            TypeNode::integer(),
            TypeNode::optional(TypeNode::optional(TypeNode::string())),
            TypeNode::list(TypeNode::list(TypeNode::string())),
            TypeNode::set(TypeNode::reference("Tag")),
            TypeNode::map(TypeNode::string(), TypeNode::external("Money")),
            TypeNode::reference("Dataset"),
            TypeNode::external("Money"),
        ]
    }

    #[test]
    fn test_body_accepts_any_type() {
        for ty in every_shape() {
            let instruction = plan(ArgumentDefinition::body("body", ty.clone())).unwrap();
            assert_eq!(instruction.slot, RequestSlot::Body);
            assert_eq!(instruction.encoding, ValueEncoding::BodySerializer(ty));
            assert_eq!(instruction.request_method(), "body");
        }
    }

    #[test]
    fn test_query_list() {
        let instruction = plan(ArgumentDefinition::query(
            "ids",
            "id",
            TypeNode::list(TypeNode::integer()),
        ))
        .unwrap();

        assert_eq!(
            instruction,
            PlacementInstruction {
                argument: "ids".to_string(),
                slot: RequestSlot::Query("id".to_string()),
                encoding: ValueEncoding::Plain(FlatEncoding::Repeated {
                    item: PrimitiveKind::Integer,
                    collection: crate::plan::CollectionKind::List,
                }),
                presence: Presence::Always,
            }
        );
        assert!(instruction.is_multi_valued());
        assert_eq!(instruction.request_method(), "putAllQueryParams");
    }

    #[test]
    fn test_optional_header() {
        let instruction = plan(ArgumentDefinition::header(
            "filter",
            "X-Filter",
            TypeNode::optional(TypeNode::string()),
        ))
        .unwrap();

        assert_eq!(instruction.slot, RequestSlot::Header("X-Filter".to_string()));
        assert_eq!(
            instruction.encoding,
            ValueEncoding::Plain(FlatEncoding::Scalar(PrimitiveKind::String))
        );
        assert!(instruction.is_conditional());
        assert!(!instruction.is_multi_valued());
        assert_eq!(instruction.request_method(), "putHeaderParams");
    }

    #[test]
    fn test_optional_reference_is_stringified() {
        let instruction = plan(ArgumentDefinition::query(
            "page",
            "pageToken",
            TypeNode::optional(TypeNode::reference("PageToken")),
        ))
        .unwrap();

        assert_eq!(instruction.encoding, ValueEncoding::Stringify);
        assert!(instruction.is_conditional());
    }

    #[test]
    fn test_optional_collection() {
        let arg = ArgumentDefinition::header(
            "tags",
            "X-Tag",
            TypeNode::optional(TypeNode::set(TypeNode::string())),
        );

        let instruction = plan(arg.clone()).unwrap();
        assert!(instruction.is_conditional());
        assert!(instruction.is_multi_valued());
        assert_eq!(instruction.request_method(), "putAllHeaderParams");

        let strict = PlannerConfig::default().with_optional_collections(false);
        let err = ArgumentPlanner::new(&strict).plan(&arg).unwrap_err();
        assert!(matches!(err, PlanError::IllegalPlacement { .. }));
    }

    #[test]
    fn test_references_are_stringified() {
        for location in [
            ParameterLocation::header("X-Dataset"),
            ParameterLocation::Path,
            ParameterLocation::query("dataset"),
        ] {
            let arg = ArgumentDefinition::new("dataset", location, TypeNode::reference("DatasetRid"));
            let instruction = plan(arg).unwrap();
            assert_eq!(instruction.encoding, ValueEncoding::Stringify);
            assert_eq!(instruction.presence, Presence::Always);
        }
    }

    #[test]
    fn test_path_is_keyed_by_argument_name() {
        let instruction = plan(ArgumentDefinition::path(
            "datasetRid",
            TypeNode::primitive(PrimitiveKind::Rid),
        ))
        .unwrap();

        assert_eq!(instruction.slot, RequestSlot::Path("datasetRid".to_string()));
        assert_eq!(instruction.slot.wire_name(), Some("datasetRid"));
        assert_eq!(
            instruction.encoding,
            ValueEncoding::Plain(FlatEncoding::Scalar(PrimitiveKind::Rid))
        );
        assert_eq!(instruction.request_method(), "putPathParams");
    }

    #[test]
    fn test_path_rejects_collections_and_optionals() {
        for ty in [
            TypeNode::list(TypeNode::string()),
            TypeNode::set(TypeNode::integer()),
            TypeNode::optional(TypeNode::string()),
        ] {
            let err = plan(ArgumentDefinition::path("segment", ty)).unwrap_err();
            assert!(matches!(err, PlanError::IllegalPlacement { .. }));
        }
    }

    #[test]
    fn test_maps_are_illegal_in_header_and_query() {
        let map = TypeNode::map(TypeNode::string(), TypeNode::integer());
        for ty in [map.clone(), TypeNode::optional(map.clone())] {
            for location in [ParameterLocation::header("X-Map"), ParameterLocation::query("map")] {
                let arg = ArgumentDefinition::new("values", location.clone(), ty.clone());
                match plan(arg).unwrap_err() {
                    PlanError::IllegalPlacement {
                        argument,
                        location: failed_at,
                        ty: failed_ty,
                        ..
                    } => {
                        assert_eq!(argument, "values");
                        assert_eq!(failed_at, location);
                        assert_eq!(failed_ty, ty);
                    }
                    other => panic!("unexpected error: {other}"),
                }
            }
        }
    }

    #[test]
    fn test_external_and_nested_optional_are_illegal() {
        for ty in [
            TypeNode::external("Money"),
            TypeNode::optional(TypeNode::external("Money")),
            TypeNode::optional(TypeNode::optional(TypeNode::integer())),
            TypeNode::list(TypeNode::reference("Tag")),
        ] {
            let err = plan(ArgumentDefinition::query("value", "v", ty)).unwrap_err();
            assert!(matches!(err, PlanError::IllegalPlacement { .. }));
        }
    }
}
