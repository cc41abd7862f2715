use error_stack::ResultExt;
use people_core::list_filter::PersonListCriteria;
use people_core::result::{PersonRepoError, RepoResult};

pub mod memory;
pub mod postgres;

/// Offset and limit for the requested page, both within `i64` so every
/// backend can use them.
pub(crate) fn page_window(list_criteria: &PersonListCriteria) -> RepoResult<(i64, i64)> {
    let offset = list_criteria
        .offset()
        .and_then(|o| i64::try_from(o).ok())
        .ok_or(PersonRepoError::List)
        .attach_with(|| {
            format!(
                "page '{}' with page size '{}' is too large and is not supported",
                list_criteria.page(),
                list_criteria.page_size()
            )
        })?;

    let limit = i64::try_from(list_criteria.page_size())
        .change_context(PersonRepoError::List)
        .attach_with(|| {
            format!(
                "page size '{}' is too large and is not supported",
                list_criteria.page_size()
            )
        })?;

    Ok((offset, limit))
}
