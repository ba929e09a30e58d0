use crate::dto::{FlashcardsQueryDto, SortKey, SortOrder};
use crate::models::{Flashcard, FlashcardSource};
use crate::repo;
use crate::repo::tests::{create_fixture_user, setup_test_db};

fn manual_card(user_id: &str, front: &str) -> Flashcard {
    Flashcard::new(
        user_id.to_string(),
        front.to_string(),
        "back".to_string(),
        FlashcardSource::Manual,
        None,
    )
}

#[test]
fn test_create_and_get_flashcards() {
    let pool = setup_test_db();
    let user = create_fixture_user(&pool, "a@example.com");

    let rows = vec![
        manual_card(&user.get_id(), "one"),
        manual_card(&user.get_id(), "two"),
    ];
    let created = repo::create_flashcards(&pool, rows).unwrap();
    assert_eq!(created.len(), 2);

    let fetched = repo::get_flashcard(&pool, &user.get_id(), &created[0].get_id())
        .unwrap()
        .unwrap();
    assert_eq!(fetched.get_front(), "one");
}

#[test]
fn test_get_flashcard_scoped_to_owner() {
    let pool = setup_test_db();
    let owner = create_fixture_user(&pool, "a@example.com");
    let stranger = create_fixture_user(&pool, "b@example.com");

    let created =
        repo::create_flashcards(&pool, vec![manual_card(&owner.get_id(), "mine")]).unwrap();

    let as_stranger =
        repo::get_flashcard(&pool, &stranger.get_id(), &created[0].get_id()).unwrap();
    assert!(as_stranger.is_none());
}

#[test]
fn test_list_flashcards_pagination_and_total() {
    let pool = setup_test_db();
    let user = create_fixture_user(&pool, "a@example.com");

    let rows = (0..7)
        .map(|i| manual_card(&user.get_id(), &format!("card {}", i)))
        .collect();
    repo::create_flashcards(&pool, rows).unwrap();

    let query = FlashcardsQueryDto {
        page: 2,
        limit: 3,
        ..Default::default()
    };
    let (page, total) = repo::list_flashcards(&pool, &user.get_id(), &query).unwrap();
    assert_eq!(total, 7);
    assert_eq!(page.len(), 3);

    let last_page = FlashcardsQueryDto {
        page: 3,
        limit: 3,
        ..Default::default()
    };
    let (page, _) = repo::list_flashcards(&pool, &user.get_id(), &last_page).unwrap();
    assert_eq!(page.len(), 1);
}

#[test]
fn test_list_flashcards_source_filter() {
    let pool = setup_test_db();
    let user = create_fixture_user(&pool, "a@example.com");
    let generation = repo::create_generation(
        &pool,
        crate::models::Generation::new(
            user.get_id(),
            "hash".to_string(),
            1500,
            2,
            10,
            "test-model".to_string(),
        ),
    )
    .unwrap();

    repo::create_flashcards(
        &pool,
        vec![
            manual_card(&user.get_id(), "manual card"),
            Flashcard::new(
                user.get_id(),
                "ai card".to_string(),
                "back".to_string(),
                FlashcardSource::AiFull,
                Some(generation.get_id()),
            ),
        ],
    )
    .unwrap();

    let query = FlashcardsQueryDto {
        source: Some(FlashcardSource::AiFull),
        ..Default::default()
    };
    let (rows, total) = repo::list_flashcards(&pool, &user.get_id(), &query).unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].get_front(), "ai card");
}

#[test]
fn test_list_flashcards_sort_order() {
    let pool = setup_test_db();
    let user = create_fixture_user(&pool, "a@example.com");

    repo::create_flashcards(
        &pool,
        (0..3)
            .map(|i| manual_card(&user.get_id(), &format!("card {}", i)))
            .collect(),
    )
    .unwrap();

    let asc = FlashcardsQueryDto {
        sort: SortKey::CreatedAt,
        order: SortOrder::Asc,
        ..Default::default()
    };
    let (rows_asc, _) = repo::list_flashcards(&pool, &user.get_id(), &asc).unwrap();

    let desc = FlashcardsQueryDto {
        sort: SortKey::CreatedAt,
        order: SortOrder::Desc,
        ..Default::default()
    };
    let (rows_desc, _) = repo::list_flashcards(&pool, &user.get_id(), &desc).unwrap();

    let asc_ids: Vec<String> = rows_asc.iter().map(|c| c.get_id()).collect();
    let mut desc_ids: Vec<String> = rows_desc.iter().map(|c| c.get_id()).collect();
    desc_ids.reverse();
    assert_eq!(asc_ids, desc_ids);
}

#[test]
fn test_update_flashcard_partial() {
    let pool = setup_test_db();
    let user = create_fixture_user(&pool, "a@example.com");

    let created =
        repo::create_flashcards(&pool, vec![manual_card(&user.get_id(), "before")]).unwrap();
    let id = created[0].get_id();

    let updated = repo::update_flashcard(
        &pool,
        &user.get_id(),
        &id,
        Some("after".to_string()),
        None,
    )
    .unwrap()
    .unwrap();

    assert_eq!(updated.get_front(), "after");
    assert_eq!(updated.get_back(), "back");
    assert!(updated.get_updated_at() >= updated.get_created_at());
}

#[test]
fn test_update_flashcard_not_owned_returns_none() {
    let pool = setup_test_db();
    let owner = create_fixture_user(&pool, "a@example.com");
    let stranger = create_fixture_user(&pool, "b@example.com");

    let created =
        repo::create_flashcards(&pool, vec![manual_card(&owner.get_id(), "mine")]).unwrap();

    let result = repo::update_flashcard(
        &pool,
        &stranger.get_id(),
        &created[0].get_id(),
        Some("hijacked".to_string()),
        None,
    )
    .unwrap();
    assert!(result.is_none());

    // Unchanged for the owner
    let reloaded = repo::get_flashcard(&pool, &owner.get_id(), &created[0].get_id())
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.get_front(), "mine");
}

#[test]
fn test_delete_flashcard() {
    let pool = setup_test_db();
    let user = create_fixture_user(&pool, "a@example.com");

    let created =
        repo::create_flashcards(&pool, vec![manual_card(&user.get_id(), "doomed")]).unwrap();
    let id = created[0].get_id();

    assert!(repo::delete_flashcard(&pool, &user.get_id(), &id).unwrap());
    assert!(repo::get_flashcard(&pool, &user.get_id(), &id).unwrap().is_none());

    // Second delete is a no-op
    assert!(!repo::delete_flashcard(&pool, &user.get_id(), &id).unwrap());
}
