//! Wire types exchanged over the REST API and written by the CLI.
//!
//! Disease and doctor records carry pass-through attributes whose names come from the reference
//! tables, so `EnrichedDisease` and `ScoredDoctor` serialise as flat JSON objects: the
//! pass-through attributes first, followed by the computed fields. Their OpenAPI schemas are
//! written by hand for the same reason.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use triage_types::Probability;
use utoipa::openapi::schema::{AdditionalProperties, ArrayBuilder, ObjectBuilder, Schema, SchemaType};
use utoipa::openapi::RefOr;
use utoipa::ToSchema;

/// Field names used on the wire for computed values.
pub mod fields {
    pub const NAME: &str = "name";
    pub const PROBABILITY: &str = "probability";
    pub const PRECAUTIONS: &str = "precautions";
    pub const TREATMENTS: &str = "treatments";
    pub const LOCATION: &str = "Location";
    pub const SPECIALTY: &str = "Specialty";
    pub const PHONE_NUMBER: &str = "Phone Number";
    pub const SCORE: &str = "Score";
}

/// Value written in place of absent or null doctor profile fields.
pub const MISSING_FIELD_SENTINEL: i64 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Structured error body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    /// Stable machine-readable error kind, e.g. `unknown_disease`.
    pub kind: String,
    /// Human-readable description.
    pub error: String,
}

/// A disease paired with the probability assigned to it.
///
/// This is the input unit of doctor ranking. `name` is accepted as an alias of `disease` so the
/// output of disease prediction can be posted back unchanged; any other fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiseaseProbability {
    #[serde(alias = "name")]
    pub disease: String,
    #[schema(value_type = f64, minimum = 0.0, maximum = 1.0)]
    pub probability: Probability,
}

/// A predicted disease joined with its reference metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedDisease {
    pub name: String,
    pub probability: Probability,
    pub precautions: Vec<serde_json::Value>,
    pub treatments: Vec<serde_json::Value>,
    /// Remaining disease table columns, passed through unchanged.
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl Serialize for EnrichedDisease {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.attributes.len() + 4))?;
        for (key, value) in &self.attributes {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(fields::NAME, &self.name)?;
        map.serialize_entry(fields::PROBABILITY, &self.probability)?;
        map.serialize_entry(fields::PRECAUTIONS, &self.precautions)?;
        map.serialize_entry(fields::TREATMENTS, &self.treatments)?;
        map.end()
    }
}

impl<'s> ToSchema<'s> for EnrichedDisease {
    fn schema() -> (&'s str, RefOr<Schema>) {
        let schema: RefOr<Schema> = ObjectBuilder::new()
            .description(Some(
                "Disease metadata; table columns are passed through as additional properties",
            ))
            .property(fields::NAME, ObjectBuilder::new().schema_type(SchemaType::String))
            .required(fields::NAME)
            .property(
                fields::PROBABILITY,
                ObjectBuilder::new().schema_type(SchemaType::Number),
            )
            .required(fields::PROBABILITY)
            .property(fields::PRECAUTIONS, any_value_array())
            .required(fields::PRECAUTIONS)
            .property(fields::TREATMENTS, any_value_array())
            .required(fields::TREATMENTS)
            .additional_properties(Some(AdditionalProperties::<Schema>::FreeForm(true)))
            .into();
        ("EnrichedDisease", schema)
    }
}

/// A directory entry with its relevance score for a set of predicted diseases.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDoctor {
    /// Profile columns; absent or null values are already replaced by the sentinel.
    pub profile: BTreeMap<String, serde_json::Value>,
    pub location: Vec<String>,
    pub specialty: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub score: f64,
}

impl Serialize for ScoredDoctor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.profile.len() + 4))?;
        for (key, value) in &self.profile {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(fields::LOCATION, &self.location)?;
        map.serialize_entry(fields::SPECIALTY, &self.specialty)?;
        map.serialize_entry(fields::PHONE_NUMBER, &self.phone_numbers)?;
        map.serialize_entry(fields::SCORE, &self.score)?;
        map.end()
    }
}

impl<'s> ToSchema<'s> for ScoredDoctor {
    fn schema() -> (&'s str, RefOr<Schema>) {
        let schema: RefOr<Schema> = ObjectBuilder::new()
            .description(Some(
                "Doctor profile; directory columns are passed through as additional properties",
            ))
            .property(fields::LOCATION, string_array())
            .required(fields::LOCATION)
            .property(fields::SPECIALTY, string_array())
            .required(fields::SPECIALTY)
            .property(fields::PHONE_NUMBER, string_array())
            .required(fields::PHONE_NUMBER)
            .property(fields::SCORE, ObjectBuilder::new().schema_type(SchemaType::Number))
            .required(fields::SCORE)
            .additional_properties(Some(AdditionalProperties::<Schema>::FreeForm(true)))
            .into();
        ("ScoredDoctor", schema)
    }
}

fn string_array() -> ArrayBuilder {
    ArrayBuilder::new().items(ObjectBuilder::new().schema_type(SchemaType::String))
}

fn any_value_array() -> ArrayBuilder {
    ArrayBuilder::new().items(ObjectBuilder::new().schema_type(SchemaType::Value))
}
