use engine::patch_field_schema;
use optional_field::{Field, serde_optional_fields};
use people_core::model::PatchPerson;
use serde::Deserialize;
use utoipa::ToSchema;

#[serde_optional_fields]
#[derive(Debug, Deserialize, ToSchema)]
pub struct PersonPatchRequest {
    /// Must match the id in the path when given.
    pub id: Option<i64>,
    /// The new name. Null clears it, leaving it out keeps the current name.
    #[schema(schema_with = patch_field_schema)]
    pub name: Field<String>,
    /// The new city. Null clears it, leaving it out keeps the current city.
    #[schema(schema_with = patch_field_schema)]
    pub city: Field<String>,
}

impl PersonPatchRequest {
    pub fn into_patch(self) -> PatchPerson {
        PatchPerson::new(self.name, self.city)
    }
}

/// Filters for listing people. Both match case-insensitively anywhere in the field.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PersonSearch {
    pub name: Option<String>,
    pub city: Option<String>,
}
