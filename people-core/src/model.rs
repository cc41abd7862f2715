use optional_field::Field;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A person record. Every field is optional: `id` stays `None` until the
/// person is stored, `name` and `city` carry no constraints.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl Person {
    pub fn new(id: Option<i64>, name: Option<String>, city: Option<String>) -> Self {
        Self { id, name, city }
    }

    /// A person that has not been stored yet.
    pub fn unsaved<N, C>(name: N, city: C) -> Self
    where
        N: Into<String>,
        C: Into<String>,
    {
        Self::new(None, Some(name.into()), Some(city.into()))
    }
}

/// Partial update of a person. `Missing` leaves a field alone,
/// `Present(None)` clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchPerson {
    pub name: Field<String>,
    pub city: Field<String>,
}

impl PatchPerson {
    pub fn new(name: Field<String>, city: Field<String>) -> Self {
        Self { name, city }
    }

    pub fn apply_to(self, person: &mut Person) {
        if let Field::Present(name) = self.name {
            person.name = name;
        }

        if let Field::Present(city) = self.city {
            person.city = city;
        }
    }
}

/// One page of a listing, `total` counts every match across all pages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonPage {
    pub people: Vec<Person>,
    pub total: u64,
}

impl PersonPage {
    pub fn new(people: Vec<Person>, total: u64) -> Self {
        Self { people, total }
    }
}
