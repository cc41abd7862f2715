use engine::Pagination;
use engine::list_criteria::ListFilter;
use optional_field::Field;
use people_core::PersonRepository;
use people_core::list_filter::PersonFilter;
use people_core::model::{PatchPerson, Person};

use crate::memory::{FailingPersonRepo, MemoryPersonRepo};

const DEFAULT_PAGE_SIZE: u64 = 20;

#[tokio::test]
async fn in_memory_save_without_id_assigns_increasing_ids() {
    let repo = MemoryPersonRepo::new();

    let first = repo.save(Person::unsaved("Ada", "London")).await.unwrap();
    let second = repo.save(Person::default()).await.unwrap();

    assert_eq!(Some(1), first.id);
    assert_eq!(Some(2), second.id);

    let db = repo.db.read().await;
    assert_eq!(Some(&first), db.people.get(&1));
    assert_eq!(Some(&second), db.people.get(&2));
}

#[tokio::test]
async fn in_memory_save_with_explicit_id_moves_next_id_past_it() {
    let repo = MemoryPersonRepo::new();

    repo.save(Person::new(Some(41), None, None)).await.unwrap();
    let next = repo.save(Person::default()).await.unwrap();

    assert_eq!(Some(42), next.id);
}

#[tokio::test]
async fn in_memory_save_after_largest_id_fails_instead_of_reusing_it() {
    let repo = MemoryPersonRepo::new();
    repo.save(Person::new(Some(i64::MAX), Some("Max".into()), None))
        .await
        .unwrap();

    let fresh = repo.save(Person::unsaved("Fresh", "Leeds")).await;

    assert!(fresh.is_err());
    assert_eq!(
        Some("Max"),
        repo.get(i64::MAX).await.unwrap().unwrap().name.as_deref()
    );
    assert_eq!(1, repo.all().await.unwrap().len());
}

#[tokio::test]
async fn in_memory_explicit_ids_still_save_after_largest_id() {
    let repo = MemoryPersonRepo::new();
    repo.save(Person::new(Some(i64::MAX), None, None))
        .await
        .unwrap();

    let saved = repo.save(Person::new(Some(7), None, None)).await.unwrap();

    assert_eq!(Some(7), saved.id);
    assert!(repo.save(Person::default()).await.is_err());
}

#[tokio::test]
async fn in_memory_save_all_stores_nothing_when_ids_run_out() {
    let repo = MemoryPersonRepo::new();
    repo.save(Person::new(Some(i64::MAX), None, None))
        .await
        .unwrap();

    let saved = repo
        .save_all(vec![
            Person::new(Some(5), Some("Kept out".into()), None),
            Person::unsaved("Fresh", "Leeds"),
        ])
        .await;

    assert!(saved.is_err());
    assert!(!repo.exists(5).await.unwrap());
}

#[tokio::test]
async fn in_memory_deleting_highest_id_does_not_hand_it_out_again() {
    let repo = MemoryPersonRepo::new();
    let first = repo.save(Person::default()).await.unwrap();
    let second = repo.save(Person::default()).await.unwrap();
    repo.delete(second.id.unwrap()).await.unwrap();

    repo.save(first.clone()).await.unwrap();
    let third = repo.save(Person::default()).await.unwrap();

    assert_eq!(Some(3), third.id);
    assert_eq!(Some(4), repo.db.read().await.next_id);
}

#[tokio::test]
async fn in_memory_save_with_existing_id_replaces_person() {
    let repo = MemoryPersonRepo::new();
    let saved = repo.save(Person::unsaved("Ada", "London")).await.unwrap();

    let replaced = repo
        .save(Person::new(saved.id, None, Some("Paris".into())))
        .await
        .unwrap();

    assert_eq!(
        Some(replaced),
        repo.get(saved.id.unwrap()).await.unwrap()
    );
    assert_eq!(1, repo.all().await.unwrap().len());
}

#[tokio::test]
async fn in_memory_list_applies_every_filter() {
    let repo = MemoryPersonRepo::new();
    repo.save(Person::unsaved("Ada", "London")).await.unwrap();
    let wanted = repo.save(Person::unsaved("Adam", "Leeds")).await.unwrap();
    repo.save(Person::unsaved("Grace", "Leeds")).await.unwrap();

    let page = repo
        .list(
            PersonFilter::criteria(Pagination::default(), DEFAULT_PAGE_SIZE)
                .with(PersonFilter::Name("ad".into()))
                .with(PersonFilter::City("LEEDS".into())),
        )
        .await
        .unwrap();

    assert_eq!(vec![wanted], page.people);
    assert_eq!(1, page.total);
}

#[tokio::test]
async fn in_memory_patch_unknown_id_returns_none() {
    let repo = MemoryPersonRepo::new();

    let patched = repo
        .patch(5, PatchPerson::new(Field::Present(None), Field::Missing))
        .await
        .unwrap();

    assert_eq!(None, patched);
}

#[tokio::test]
async fn in_memory_clones_share_the_store() {
    let repo = MemoryPersonRepo::new();
    let clone = repo.clone();

    let saved = repo.save(Person::unsaved("Ada", "London")).await.unwrap();

    assert!(clone.exists(saved.id.unwrap()).await.unwrap());
}

#[tokio::test]
async fn failing_repo_fails_every_call() {
    let repo = FailingPersonRepo;

    assert!(repo.get(1).await.is_err());
    assert!(repo.all().await.is_err());
    assert!(repo.save(Person::default()).await.is_err());
    assert!(repo.replace(1, Person::default()).await.is_err());
    assert!(repo.delete(1).await.is_err());
}
