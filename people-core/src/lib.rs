use list_filter::PersonListCriteria;
use model::{PatchPerson, Person, PersonPage};
use result::{OptRepoResult, RepoResult, SourceResult};
use std::sync::Arc;

pub mod list_filter;
pub mod model;
pub mod result;

/// What a `PersonService` runs on: where people are stored and where new
/// people are looked up.
pub trait PersonEngine: Clone + Send + Sync + 'static {
    type Repo: PersonRepository + Send + Sync + 'static;
    type Source: PersonSource + Send + Sync + 'static;

    fn repo(&self) -> Self::Repo;
    fn source(&self) -> Self::Source;
}

pub trait PersonRepository {
    fn get(&self, id: i64) -> impl Future<Output = OptRepoResult<Person>> + Send;

    fn list(
        &self,
        list_criteria: PersonListCriteria,
    ) -> impl Future<Output = RepoResult<PersonPage>> + Send;

    /// Every stored person, ordered by id.
    fn all(&self) -> impl Future<Output = RepoResult<Vec<Person>>> + Send;

    /// Inserts a person without an id under a fresh id, otherwise inserts or
    /// replaces the person stored under its id.
    fn save(&self, person: Person) -> impl Future<Output = RepoResult<Person>> + Send;

    fn save_all(&self, people: Vec<Person>) -> impl Future<Output = RepoResult<Vec<Person>>> + Send;

    /// Replaces the person stored under `id` in one step. `None` when no
    /// person is stored under `id`, in which case nothing is written.
    fn replace(
        &self,
        id: i64,
        person: Person,
    ) -> impl Future<Output = OptRepoResult<Person>> + Send;

    fn exists(&self, id: i64) -> impl Future<Output = RepoResult<bool>> + Send;

    fn patch(
        &self,
        id: i64,
        patch: PatchPerson,
    ) -> impl Future<Output = OptRepoResult<Person>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = OptRepoResult<()>> + Send;
}

/// An external publisher of people.
pub trait PersonSource {
    fn fetch(&self) -> impl Future<Output = SourceResult<Vec<Person>>> + Send;
}

impl<T> PersonRepository for Arc<T>
where
    T: PersonRepository + Send + Sync,
{
    async fn get(&self, id: i64) -> OptRepoResult<Person> {
        (**self).get(id).await
    }

    async fn list(&self, list_criteria: PersonListCriteria) -> RepoResult<PersonPage> {
        (**self).list(list_criteria).await
    }

    async fn all(&self) -> RepoResult<Vec<Person>> {
        (**self).all().await
    }

    async fn save(&self, person: Person) -> RepoResult<Person> {
        (**self).save(person).await
    }

    async fn save_all(&self, people: Vec<Person>) -> RepoResult<Vec<Person>> {
        (**self).save_all(people).await
    }

    async fn replace(&self, id: i64, person: Person) -> OptRepoResult<Person> {
        (**self).replace(id, person).await
    }

    async fn exists(&self, id: i64) -> RepoResult<bool> {
        (**self).exists(id).await
    }

    async fn patch(&self, id: i64, patch: PatchPerson) -> OptRepoResult<Person> {
        (**self).patch(id, patch).await
    }

    async fn delete(&self, id: i64) -> OptRepoResult<()> {
        (**self).delete(id).await
    }
}

impl<T> PersonSource for Arc<T>
where
    T: PersonSource + Send + Sync,
{
    async fn fetch(&self) -> SourceResult<Vec<Person>> {
        (**self).fetch().await
    }
}
