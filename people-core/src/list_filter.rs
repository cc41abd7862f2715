use crate::model::Person;
use engine::Pagination;
use engine::list_criteria::{ListCriteria, ListFilter, Tag};

/// Case-insensitive substring match on one field. A person whose field is
/// absent never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonFilter {
    Name(String),
    City(String),
}

impl PersonFilter {
    pub fn matches(&self, person: &Person) -> bool {
        let (field, needle) = match self {
            PersonFilter::Name(n) => (&person.name, n),
            PersonFilter::City(c) => (&person.city, c),
        };

        field
            .as_deref()
            .is_some_and(|f| f.to_lowercase().contains(&needle.to_lowercase()))
    }
}

impl ListFilter for PersonFilter {
    type Criteria = PersonListCriteria;

    fn tag(&self) -> Tag {
        match self {
            PersonFilter::Name(_) => Tag::One,
            PersonFilter::City(_) => Tag::Two,
        }
    }

    fn criteria(pagination: Pagination, default_page_size: u64) -> Self::Criteria {
        PersonListCriteria::new(pagination, default_page_size)
    }
}

pub type PersonListCriteria = ListCriteria<PersonFilter>;

/// Pulls the name and city needles out of the criteria, in that order.
pub fn filter_values(criteria: &PersonListCriteria) -> (Option<&str>, Option<&str>) {
    criteria
        .filters()
        .iter()
        .fold((None, None), |(name, city), f| match f {
            PersonFilter::Name(n) => (Some(n.as_str()), city),
            PersonFilter::City(c) => (name, Some(c.as_str())),
        })
}
