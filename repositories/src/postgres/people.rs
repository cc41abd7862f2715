use crate::page_window;
use crate::postgres::RepoInitErr;
use crate::postgres::statements::{self, Sql};
use deadpool_postgres::{Object, Pool, Transaction};
use error_stack::{Report, ResultExt};
use optional_field::Field;
use people_core::PersonRepository;
use people_core::list_filter::{PersonListCriteria, filter_values};
use people_core::model::{PatchPerson, Person, PersonPage};
use people_core::result::{OptRepoResult, PersonRepoError, RepoResult};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;
use tokio_stream::StreamExt;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PersonRepo {
    pool: Pool,
}

impl PersonRepo {
    pub async fn new(pool: Pool) -> Result<Self, Report<RepoInitErr>> {
        // fail early when the pool cannot hand out a connection
        let client = pool.get().await.change_context(RepoInitErr)?;
        client
            .prepare_typed_cached(statements::GET.query, statements::GET.types)
            .await
            .change_context(RepoInitErr)
            .attach("people table is not usable")?;

        Ok(Self { pool })
    }

    async fn client(&self, on_err: PersonRepoError) -> RepoResult<Object> {
        self.pool
            .get()
            .await
            .change_context(on_err)
            .attach("failed to get a connection from the pool")
    }
}

// (whether to write the column, value to write)
fn patch_column(field: Field<String>) -> (bool, Option<String>) {
    match field {
        Field::Missing => (false, None),
        Field::Present(value) => (true, value),
    }
}

fn row_to_person(row: Row) -> Person {
    Person::new(row.get("id"), row.get("name"), row.get("city"))
}

async fn save_in(tx: &Transaction<'_>, person: Person) -> RepoResult<Person> {
    let saved = match person.id {
        None => {
            let stmt = tx
                .prepare_typed_cached(statements::INSERT.query, statements::INSERT.types)
                .await
                .change_context(PersonRepoError::Save)?;
            tx.query_one(&stmt, &[&person.name, &person.city])
                .await
                .change_context(PersonRepoError::Save)?
        }
        Some(id) => {
            let stmt = tx
                .prepare_typed_cached(statements::UPSERT.query, statements::UPSERT.types)
                .await
                .change_context(PersonRepoError::Save)?;
            let row = tx
                .query_one(&stmt, &[&id, &person.name, &person.city])
                .await
                .change_context(PersonRepoError::Save)
                .attach_with(|| format!("person id {id}"))?;

            let lock = tx
                .prepare_typed_cached(
                    statements::LOCK_ID_SEQUENCE.query,
                    statements::LOCK_ID_SEQUENCE.types,
                )
                .await
                .change_context(PersonRepoError::Save)?;
            let sync = tx
                .prepare_typed_cached(
                    statements::SYNC_ID_SEQUENCE.query,
                    statements::SYNC_ID_SEQUENCE.types,
                )
                .await
                .change_context(PersonRepoError::Save)?;
            tx.execute(&lock, &[])
                .await
                .change_context(PersonRepoError::Save)?;
            tx.execute(&sync, &[&id])
                .await
                .change_context(PersonRepoError::Save)
                .attach("failed to move the id sequence past an explicit id")?;

            row
        }
    };

    Ok(row_to_person(saved))
}

impl PersonRepository for PersonRepo {
    async fn get(&self, id: i64) -> OptRepoResult<Person> {
        let client = self.client(PersonRepoError::Get).await?;
        let stmt = prepare(&client, &statements::GET, PersonRepoError::Get).await?;

        let person = client
            .query_opt(&stmt, &[&id])
            .await
            .change_context(PersonRepoError::Get)?
            .map(row_to_person);
        Ok(person)
    }

    async fn list(&self, list_criteria: PersonListCriteria) -> RepoResult<PersonPage> {
        let (offset, limit) = page_window(&list_criteria)?;
        let (name, city) = filter_values(&list_criteria);

        let client = self.client(PersonRepoError::List).await?;
        let list = prepare(&client, &statements::LIST, PersonRepoError::List).await?;
        let count = prepare(&client, &statements::COUNT, PersonRepoError::List).await?;

        let params: [&(dyn ToSql + Sync); 4] = [&name, &city, &offset, &limit];
        let people = client
            .query_raw(&list, params)
            .await
            .change_context(PersonRepoError::List)?
            .map(|r| r.map(row_to_person))
            .collect::<Result<Vec<_>, _>>()
            .await
            .change_context(PersonRepoError::List)?;

        let total: i64 = client
            .query_one(&count, &[&name, &city])
            .await
            .change_context(PersonRepoError::List)?
            .get("total");

        debug!("listed {} of {} people", people.len(), total);
        Ok(PersonPage::new(people, total.max(0) as u64))
    }

    async fn all(&self) -> RepoResult<Vec<Person>> {
        let client = self.client(PersonRepoError::All).await?;
        let stmt = prepare(&client, &statements::ALL, PersonRepoError::All).await?;

        let people = client
            .query(&stmt, &[])
            .await
            .change_context(PersonRepoError::All)?
            .into_iter()
            .map(row_to_person)
            .collect();
        Ok(people)
    }

    async fn save(&self, person: Person) -> RepoResult<Person> {
        let mut client = self.client(PersonRepoError::Save).await?;
        let tx = client
            .transaction()
            .await
            .change_context(PersonRepoError::Save)?;

        let saved = save_in(&tx, person).await?;

        tx.commit().await.change_context(PersonRepoError::Save)?;
        Ok(saved)
    }

    async fn save_all(&self, people: Vec<Person>) -> RepoResult<Vec<Person>> {
        let mut client = self.client(PersonRepoError::Save).await?;
        let tx = client
            .transaction()
            .await
            .change_context(PersonRepoError::Save)?;

        let mut saved = Vec::with_capacity(people.len());
        for person in people {
            saved.push(save_in(&tx, person).await?);
        }

        tx.commit()
            .await
            .change_context(PersonRepoError::Save)
            .attach_with(|| format!("failed to commit {} people", saved.len()))?;
        Ok(saved)
    }

    async fn replace(&self, id: i64, person: Person) -> OptRepoResult<Person> {
        let client = self.client(PersonRepoError::Replace).await?;
        let stmt = prepare(&client, &statements::REPLACE, PersonRepoError::Replace).await?;

        let replaced = client
            .query_opt(&stmt, &[&id, &person.name, &person.city])
            .await
            .change_context(PersonRepoError::Replace)
            .attach_with(|| format!("person id {id}"))?
            .map(row_to_person);
        Ok(replaced)
    }

    async fn exists(&self, id: i64) -> RepoResult<bool> {
        let client = self.client(PersonRepoError::Exists).await?;
        let stmt = prepare(&client, &statements::EXISTS, PersonRepoError::Exists).await?;

        let found = client
            .query_one(&stmt, &[&id])
            .await
            .change_context(PersonRepoError::Exists)?
            .get("found");
        Ok(found)
    }

    async fn patch(&self, id: i64, patch: PatchPerson) -> OptRepoResult<Person> {
        let client = self.client(PersonRepoError::Patch).await?;
        let stmt = prepare(&client, &statements::PATCH, PersonRepoError::Patch).await?;

        let (set_name, name) = patch_column(patch.name);
        let (set_city, city) = patch_column(patch.city);

        let person = client
            .query_opt(&stmt, &[&id, &set_name, &name, &set_city, &city])
            .await
            .change_context(PersonRepoError::Patch)?
            .map(row_to_person);
        Ok(person)
    }

    async fn delete(&self, id: i64) -> OptRepoResult<()> {
        let client = self.client(PersonRepoError::Delete).await?;
        let stmt = prepare(&client, &statements::DELETE, PersonRepoError::Delete).await?;

        let deleted = client
            .execute(&stmt, &[&id])
            .await
            .change_context(PersonRepoError::Delete)?;
        Ok((deleted > 0).then_some(()))
    }
}

async fn prepare(
    client: &Object,
    sql: &Sql,
    on_err: PersonRepoError,
) -> RepoResult<tokio_postgres::Statement> {
    client
        .prepare_typed_cached(sql.query, sql.types)
        .await
        .change_context(on_err)
}
