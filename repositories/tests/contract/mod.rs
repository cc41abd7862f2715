use engine::Pagination;
use engine::list_criteria::ListFilter;
use optional_field::Field;
use people_core::PersonRepository;
use people_core::list_filter::{PersonFilter, PersonListCriteria};
use people_core::model::{PatchPerson, Person};

const DEFAULT_PAGE_SIZE: u64 = 20;

fn default_list_criteria() -> PersonListCriteria {
    PersonFilter::criteria(Pagination::default(), DEFAULT_PAGE_SIZE)
}

fn ada() -> Person {
    Person::unsaved("Ada", "London")
}

async fn save_many<R: PersonRepository>(repo: &R, count: usize) -> Vec<Person> {
    let mut saved = Vec::with_capacity(count);
    for i in 0..count {
        saved.push(
            repo.save(Person::unsaved(format!("person {i}"), "Leeds"))
                .await
                .unwrap(),
        );
    }
    saved
}

pub async fn get_unknown_id_returns_none<R: PersonRepository>(repo: &R) {
    let result = repo.get(12345).await.unwrap();

    assert!(result.is_none());
}

pub async fn save_then_get_returns_saved_person<R: PersonRepository>(repo: &R) {
    let saved = repo.save(ada()).await.unwrap();

    let found = repo
        .get(saved.id.expect("saved person has an id"))
        .await
        .unwrap()
        .expect("recently saved person exists");

    assert_eq!(saved, found);
    assert_eq!(Some("Ada"), found.name.as_deref());
    assert_eq!(Some("London"), found.city.as_deref());
}

pub async fn save_without_id_assigns_distinct_ids<R: PersonRepository>(repo: &R) {
    let first = repo.save(Person::default()).await.unwrap();
    let second = repo.save(Person::default()).await.unwrap();

    assert!(first.id.is_some());
    assert!(second.id.is_some());
    assert_ne!(first.id, second.id);
}

pub async fn save_with_existing_id_replaces_person<R: PersonRepository>(repo: &R) {
    let saved = repo.save(ada()).await.unwrap();

    let replaced = repo
        .save(Person::new(saved.id, Some("Grace".into()), None))
        .await
        .unwrap();

    assert_eq!(saved.id, replaced.id);
    assert_eq!(
        Some(replaced),
        repo.get(saved.id.unwrap()).await.unwrap()
    );
    assert_eq!(1, repo.all().await.unwrap().len());
}

pub async fn save_with_explicit_id_keeps_generated_ids_clear_of_it<R: PersonRepository>(
    repo: &R,
) {
    let explicit = repo
        .save(Person::new(Some(500), Some("Linus".into()), None))
        .await
        .unwrap();

    let generated = repo.save(ada()).await.unwrap();

    assert_eq!(Some(500), explicit.id);
    assert!(generated.id.unwrap() > 500);
}

pub async fn deleting_highest_id_does_not_hand_it_out_again<R: PersonRepository>(repo: &R) {
    let saved = save_many(repo, 3).await;
    let highest = saved[2].id.unwrap();
    repo.delete(highest).await.unwrap();

    repo.save(saved[1].clone()).await.unwrap();
    let generated = repo.save(ada()).await.unwrap();

    assert!(generated.id.unwrap() > highest);
}

pub async fn save_with_largest_id_is_accepted_and_never_reused<R: PersonRepository>(repo: &R) {
    let max = repo
        .save(Person::new(Some(i64::MAX), Some("Max".into()), None))
        .await
        .unwrap();
    assert_eq!(Some(i64::MAX), max.id);

    let replaced = repo
        .save(Person::new(Some(i64::MAX), Some("Maxine".into()), None))
        .await
        .unwrap();
    assert_eq!(Some("Maxine"), replaced.name.as_deref());

    assert!(repo.save(ada()).await.is_err());
    assert_eq!(Some(replaced), repo.get(i64::MAX).await.unwrap());
    assert_eq!(1, repo.all().await.unwrap().len());
}

pub async fn replace_existing_person_keeps_its_id<R: PersonRepository>(repo: &R) {
    let id = repo.save(ada()).await.unwrap().id.unwrap();

    let replaced = repo
        .replace(id, Person::new(None, Some("Grace".into()), None))
        .await
        .unwrap()
        .expect("person exists");

    assert_eq!(Person::new(Some(id), Some("Grace".into()), None), replaced);
    assert_eq!(Some(replaced), repo.get(id).await.unwrap());
}

pub async fn replace_unknown_id_writes_nothing<R: PersonRepository>(repo: &R) {
    let replaced = repo.replace(404, ada()).await.unwrap();

    assert!(replaced.is_none());
    assert!(!repo.exists(404).await.unwrap());
}

pub async fn save_all_returns_people_in_order<R: PersonRepository>(repo: &R) {
    let people = vec![
        ada(),
        Person::unsaved("Grace", "Arlington"),
        Person::new(None, None, Some("Nowhere".into())),
    ];

    let saved = repo.save_all(people.clone()).await.unwrap();

    assert_eq!(3, saved.len());
    for (given, saved) in people.iter().zip(&saved) {
        assert!(saved.id.is_some());
        assert_eq!(given.name, saved.name);
        assert_eq!(given.city, saved.city);
    }
    assert_eq!(saved, repo.all().await.unwrap());
}

pub async fn nothing_saved_list_returns_empty_page<R: PersonRepository>(repo: &R) {
    let page = repo.list(default_list_criteria()).await.unwrap();

    assert!(page.people.is_empty());
    assert_eq!(0, page.total);
}

pub async fn list_page_1_or_0_returns_first_page<R: PersonRepository>(repo: &R) {
    let saved = save_many(repo, 3).await;

    let first = repo
        .list(PersonFilter::criteria(
            Pagination::with_page_size(1, 2),
            DEFAULT_PAGE_SIZE,
        ))
        .await
        .unwrap();
    let zeroth = repo
        .list(PersonFilter::criteria(
            Pagination::with_page_size(0, 2),
            DEFAULT_PAGE_SIZE,
        ))
        .await
        .unwrap();

    assert_eq!(&saved[..2], first.people.as_slice());
    assert_eq!(first, zeroth);
}

pub async fn list_pages_past_the_end_are_empty<R: PersonRepository>(repo: &R) {
    save_many(repo, 3).await;

    let page = repo
        .list(PersonFilter::criteria(
            Pagination::with_page_size(4, 2),
            DEFAULT_PAGE_SIZE,
        ))
        .await
        .unwrap();

    assert!(page.people.is_empty());
    assert_eq!(3, page.total);
}

pub async fn list_total_counts_every_match<R: PersonRepository>(repo: &R) {
    save_many(repo, 5).await;
    repo.save(ada()).await.unwrap();

    let page = repo
        .list(
            PersonFilter::criteria(Pagination::with_page_size(2, 2), DEFAULT_PAGE_SIZE)
                .with(PersonFilter::City("leeds".into())),
        )
        .await
        .unwrap();

    assert_eq!(2, page.people.len());
    assert_eq!(5, page.total);
}

pub async fn list_filters_by_name_and_city<R: PersonRepository>(repo: &R) {
    repo.save(ada()).await.unwrap();
    let wanted = repo.save(Person::unsaved("Adam", "Leeds")).await.unwrap();
    repo.save(Person::unsaved("Grace", "Leeds")).await.unwrap();
    repo.save(Person::new(None, None, Some("Leeds".into())))
        .await
        .unwrap();

    let page = repo
        .list(
            default_list_criteria()
                .with(PersonFilter::Name("AD".into()))
                .with(PersonFilter::City("eed".into())),
        )
        .await
        .unwrap();

    assert_eq!(vec![wanted], page.people);
    assert_eq!(1, page.total);
}

pub async fn list_filter_treats_wildcards_literally<R: PersonRepository>(repo: &R) {
    repo.save(ada()).await.unwrap();
    let percent = repo
        .save(Person::unsaved("100% Ada", "Leeds"))
        .await
        .unwrap();
    let underscore = repo
        .save(Person::unsaved("ada_l", "Leeds"))
        .await
        .unwrap();

    for (filter, expected) in [("%", &percent), ("_", &underscore)] {
        let page = repo
            .list(default_list_criteria().with(PersonFilter::Name(filter.into())))
            .await
            .unwrap();

        assert_eq!(vec![expected.clone()], page.people, "filter {filter}");
        assert_eq!(1, page.total);
    }
}

pub async fn all_returns_people_ordered_by_id<R: PersonRepository>(repo: &R) {
    repo.save(Person::new(Some(30), None, None)).await.unwrap();
    repo.save(Person::new(Some(10), None, None)).await.unwrap();
    repo.save(Person::new(Some(20), None, None)).await.unwrap();

    let ids = repo
        .all()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect::<Vec<_>>();

    assert_eq!(vec![Some(10), Some(20), Some(30)], ids);
}

pub async fn exists_tracks_saves_and_deletes<R: PersonRepository>(repo: &R) {
    let id = repo.save(ada()).await.unwrap().id.unwrap();
    assert!(repo.exists(id).await.unwrap());

    repo.delete(id).await.unwrap();
    assert!(!repo.exists(id).await.unwrap());
}

pub async fn patch_changes_only_present_fields<R: PersonRepository>(repo: &R) {
    let id = repo.save(ada()).await.unwrap().id.unwrap();

    let patched = repo
        .patch(id, PatchPerson::new(Field::Missing, Field::Present(None)))
        .await
        .unwrap()
        .expect("person exists");

    assert_eq!(Person::new(Some(id), Some("Ada".into()), None), patched);
    assert_eq!(Some(patched), repo.get(id).await.unwrap());

    let renamed = repo
        .patch(
            id,
            PatchPerson::new(Field::Present(Some("Augusta".into())), Field::Missing),
        )
        .await
        .unwrap()
        .expect("person exists");

    assert_eq!(Some("Augusta"), renamed.name.as_deref());
    assert_eq!(None, renamed.city);
}

pub async fn patch_unknown_id_returns_none<R: PersonRepository>(repo: &R) {
    let patched = repo
        .patch(
            404,
            PatchPerson::new(Field::Present(Some("x".into())), Field::Missing),
        )
        .await
        .unwrap();

    assert!(patched.is_none());
}

pub async fn delete_unknown_id_returns_none<R: PersonRepository>(repo: &R) {
    assert!(repo.delete(404).await.unwrap().is_none());
}

pub async fn delete_removes_person<R: PersonRepository>(repo: &R) {
    let id = repo.save(ada()).await.unwrap().id.unwrap();

    assert_eq!(Some(()), repo.delete(id).await.unwrap());
    assert!(repo.get(id).await.unwrap().is_none());
}

pub async fn page_sizes<R: PersonRepository>(
    repo: &R,
    page: u64,
    page_size: u64,
    expected: usize,
) {
    save_many(repo, 5).await;

    let listed = repo
        .list(PersonFilter::criteria(
            Pagination::with_page_size(page, page_size),
            DEFAULT_PAGE_SIZE,
        ))
        .await
        .unwrap();

    assert_eq!(expected, listed.people.len());
    assert_eq!(5, listed.total);
}
