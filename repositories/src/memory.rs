use crate::page_window;
use engine::ArwLock;
use error_stack::{IntoReport, ResultExt};
use people_core::PersonRepository;
use people_core::list_filter::PersonListCriteria;
use people_core::model::{PatchPerson, Person, PersonPage};
use people_core::result::{OptRepoResult, PersonRepoError, RepoResult};
use std::collections::BTreeMap;

#[cfg(test)]
mod tests;

#[derive(Debug)]
struct Store {
    people: BTreeMap<i64, Person>,
    // None once i64::MAX is taken, there is no id left to hand out
    next_id: Option<i64>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            people: BTreeMap::new(),
            next_id: Some(1),
        }
    }
}

/// Gives `person` a fresh id when it has none, then moves `next_id` past
/// the id it ends up with so later ids never collide with stored ones.
fn claim_id(next_id: &mut Option<i64>, person: &mut Person) -> RepoResult<i64> {
    let id = match person.id {
        Some(id) => id,
        None => {
            let id = next_id
                .ok_or(PersonRepoError::Save)
                .attach("every id up to the largest supported id is taken")?;
            person.id = Some(id);
            id
        }
    };

    *next_id = match (*next_id, id.checked_add(1)) {
        (Some(next), Some(after)) => Some(next.max(after)),
        _ => None,
    };
    Ok(id)
}

impl Store {
    fn save(&mut self, mut person: Person) -> RepoResult<Person> {
        let mut next_id = self.next_id;
        let id = claim_id(&mut next_id, &mut person)?;

        self.next_id = next_id;
        self.people.insert(id, person.clone());
        Ok(person)
    }

    // ids are claimed for everyone before anything is stored
    fn save_all(&mut self, people: Vec<Person>) -> RepoResult<Vec<Person>> {
        let mut next_id = self.next_id;
        let claimed = people
            .into_iter()
            .map(|mut person| claim_id(&mut next_id, &mut person).map(|id| (id, person)))
            .collect::<RepoResult<Vec<_>>>()?;

        self.next_id = next_id;
        Ok(claimed
            .into_iter()
            .map(|(id, person)| {
                self.people.insert(id, person.clone());
                person
            })
            .collect())
    }
}

/// Keeps people in memory, ordered by id. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersonRepo {
    db: ArwLock<Store>,
}

impl MemoryPersonRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersonRepository for MemoryPersonRepo {
    async fn get(&self, id: i64) -> OptRepoResult<Person> {
        let db = self.db.read().await;

        Ok(db.people.get(&id).cloned())
    }

    async fn list(&self, list_criteria: PersonListCriteria) -> RepoResult<PersonPage> {
        let (offset, limit) = page_window(&list_criteria)?;
        let db = self.db.read().await;

        let matching = db
            .people
            .values()
            .filter(|person| list_criteria.filters().iter().all(|f| f.matches(person)))
            .collect::<Vec<_>>();

        let people = matching
            .iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(|p| (*p).clone())
            .collect();

        Ok(PersonPage::new(people, matching.len() as u64))
    }

    async fn all(&self) -> RepoResult<Vec<Person>> {
        let db = self.db.read().await;

        Ok(db.people.values().cloned().collect())
    }

    async fn save(&self, person: Person) -> RepoResult<Person> {
        let mut db = self.db.write().await;

        db.save(person)
    }

    async fn save_all(&self, people: Vec<Person>) -> RepoResult<Vec<Person>> {
        let mut db = self.db.write().await;

        db.save_all(people)
    }

    async fn replace(&self, id: i64, person: Person) -> OptRepoResult<Person> {
        let mut db = self.db.write().await;

        Ok(db.people.get_mut(&id).map(|stored| {
            *stored = Person {
                id: Some(id),
                ..person
            };
            stored.clone()
        }))
    }

    async fn exists(&self, id: i64) -> RepoResult<bool> {
        let db = self.db.read().await;

        Ok(db.people.contains_key(&id))
    }

    async fn patch(&self, id: i64, patch: PatchPerson) -> OptRepoResult<Person> {
        let mut db = self.db.write().await;

        Ok(db.people.get_mut(&id).map(|person| {
            patch.apply_to(person);
            person.clone()
        }))
    }

    async fn delete(&self, id: i64) -> OptRepoResult<()> {
        let mut db = self.db.write().await;

        Ok(db.people.remove(&id).map(|_| ()))
    }
}

/// Fails every operation. Used to exercise error paths in higher layers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingPersonRepo;

impl PersonRepository for FailingPersonRepo {
    async fn get(&self, _: i64) -> OptRepoResult<Person> {
        Err(PersonRepoError::Get.into_report())
    }

    async fn list(&self, _: PersonListCriteria) -> RepoResult<PersonPage> {
        Err(PersonRepoError::List.into_report())
    }

    async fn all(&self) -> RepoResult<Vec<Person>> {
        Err(PersonRepoError::All.into_report())
    }

    async fn save(&self, _: Person) -> RepoResult<Person> {
        Err(PersonRepoError::Save.into_report())
    }

    async fn save_all(&self, _: Vec<Person>) -> RepoResult<Vec<Person>> {
        Err(PersonRepoError::Save.into_report())
    }

    async fn replace(&self, _: i64, _: Person) -> OptRepoResult<Person> {
        Err(PersonRepoError::Replace.into_report())
    }

    async fn exists(&self, _: i64) -> RepoResult<bool> {
        Err(PersonRepoError::Exists.into_report())
    }

    async fn patch(&self, _: i64, _: PatchPerson) -> OptRepoResult<Person> {
        Err(PersonRepoError::Patch.into_report())
    }

    async fn delete(&self, _: i64) -> OptRepoResult<()> {
        Err(PersonRepoError::Delete.into_report())
    }
}
