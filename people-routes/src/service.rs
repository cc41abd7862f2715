use crate::error::PersonServiceError;
use crate::metrics;
use crate::report::{self, RenderedReport, ReportFormat};
use crate::{OptServiceResult, ServiceResult};
use chrono::Utc;
use error_stack::ResultExt;
use people_core::list_filter::PersonListCriteria;
use people_core::model::{PatchPerson, Person, PersonPage};
use people_core::{PersonEngine, PersonRepository, PersonSource};
use tracing::{debug, instrument};

#[derive(Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(Person),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct PersonService<T> {
    engine: T,
}

impl<T> PersonService<T>
where
    T: PersonEngine,
{
    pub fn new(engine: T) -> Self {
        PersonService { engine }
    }

    #[instrument(skip_all, name = "service#get")]
    pub async fn get(&self, id: i64) -> OptServiceResult<Person> {
        let person = self
            .engine
            .repo()
            .get(id)
            .await
            .change_context(PersonServiceError)
            .attach_with(|| format!("person id {id}"))?;

        if person.is_some() {
            metrics::increment_people_retrieved();
        }
        Ok(person)
    }

    #[instrument(skip_all, name = "service#list")]
    pub async fn list(&self, list_criteria: PersonListCriteria) -> ServiceResult<PersonPage> {
        let page = self
            .engine
            .repo()
            .list(list_criteria)
            .await
            .change_context(PersonServiceError)?;

        metrics::increment_people_retrieved_by(page.people.len());
        Ok(page)
    }

    /// Stores `person` under a fresh id. Any id it carries is ignored.
    #[instrument(skip_all, name = "service#create")]
    pub async fn create(&self, person: Person) -> ServiceResult<Person> {
        let created = self
            .engine
            .repo()
            .save(Person { id: None, ..person })
            .await
            .change_context(PersonServiceError)?;

        metrics::increment_people_created();
        Ok(created)
    }

    /// Replaces the person stored under `id`. Never stores a person that was
    /// not already there.
    #[instrument(skip_all, name = "service#update")]
    pub async fn update(&self, id: i64, person: Person) -> ServiceResult<UpdateOutcome> {
        let replaced = self
            .engine
            .repo()
            .replace(id, person)
            .await
            .change_context(PersonServiceError)
            .attach_with(|| format!("person id {id}"))?;

        match replaced {
            Some(updated) => {
                metrics::increment_people_updated();
                Ok(UpdateOutcome::Updated(updated))
            }
            None => Ok(UpdateOutcome::NotFound),
        }
    }

    #[instrument(skip_all, name = "service#patch")]
    pub async fn patch(&self, id: i64, patch: PatchPerson) -> OptServiceResult<Person> {
        let patched = self
            .engine
            .repo()
            .patch(id, patch)
            .await
            .change_context(PersonServiceError)
            .attach_with(|| format!("person id {id}"))?;

        if patched.is_some() {
            metrics::increment_people_updated();
        }
        Ok(patched)
    }

    #[instrument(skip_all, name = "service#delete")]
    pub async fn delete(&self, id: i64) -> OptServiceResult<()> {
        let deleted = self
            .engine
            .repo()
            .delete(id)
            .await
            .change_context(PersonServiceError)?;

        if deleted.is_some() {
            metrics::increment_people_deleted();
        }
        Ok(deleted)
    }

    #[instrument(skip_all, name = "service#report", fields(format = ?format))]
    pub async fn report(&self, format: ReportFormat) -> ServiceResult<RenderedReport> {
        let people = self
            .engine
            .repo()
            .all()
            .await
            .change_context(PersonServiceError)?;

        debug!("rendering report of {} people", people.len());
        report::render(format, &people, Utc::now()).change_context(PersonServiceError)
    }

    /// Pulls people from the external source and stores each of them under
    /// a fresh id.
    #[instrument(skip_all, name = "service#lookup")]
    pub async fn lookup_and_save_new_people(&self) -> ServiceResult<Vec<Person>> {
        let fetched = self
            .engine
            .source()
            .fetch()
            .await
            .change_context(PersonServiceError)?;

        debug!("fetched {} people from the external source", fetched.len());

        let saved = self
            .engine
            .repo()
            .save_all(
                fetched
                    .into_iter()
                    .map(|person| Person { id: None, ..person })
                    .collect(),
            )
            .await
            .change_context(PersonServiceError)?;

        metrics::increment_people_imported_by(saved.len());
        Ok(saved)
    }
}
