//! Integration tests for the media factory, relationship graph and lists,
//! run against a fresh SQLite file per test.

use mymedialist::config::SecurityConfig;
use mymedialist::db::{EntryChanges, MediaQuery, NewUser, Store, StoreError, User};
use mymedialist::domain::{
    ConstraintViolation, FieldMap, Media, MediaId, MediaKind, Relationship,
};
use mymedialist::entities::{books, films, list_entries, media, related_media, series};
use mymedialist::services::{MediaError, MediaService, SeaOrmMediaService};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};
use serde_json::{Value, json};

async fn open_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("mymedialist-store-test-{}.db", uuid::Uuid::new_v4()));
    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("Failed to open store")
}

fn fields(value: Value) -> FieldMap {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected a JSON object"),
    }
}

fn fast_hashing() -> SecurityConfig {
    SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
        ..SecurityConfig::default()
    }
}

async fn create_user(store: &Store, username: &str) -> User {
    store
        .create_user(
            NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "password123".to_string(),
                ..NewUser::default()
            },
            &fast_hashing(),
        )
        .await
        .expect("Failed to create user")
}

async fn film(service: &SeaOrmMediaService, title: &str) -> Media {
    service
        .create_film(fields(json!({ "title": title, "release_status": "released" })))
        .await
        .expect("Failed to create film")
}

async fn book(service: &SeaOrmMediaService, title: &str) -> Media {
    service
        .create_book(fields(json!({ "title": title, "release_status": "published" })))
        .await
        .expect("Failed to create book")
}

fn ids(media: Vec<Media>) -> Vec<MediaId> {
    media.into_iter().map(|m| m.id).collect()
}

#[tokio::test]
async fn factory_failure_writes_nothing() {
    let store = open_store().await;
    let service = SeaOrmMediaService::new(store.clone());

    let err = service
        .create_film(fields(json!({ "title": "Film 2" })))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MediaError::Constraint(ConstraintViolation::MissingField(ref f)) if f == "release_status"
    ));

    let err = service
        .create_series(fields(json!({ "airing_status": "not_aired" })))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MediaError::Constraint(ConstraintViolation::MissingField(ref f)) if f == "title"
    ));

    assert_eq!(media::Entity::find().count(&store.conn).await.unwrap(), 0);
    assert_eq!(films::Entity::find().count(&store.conn).await.unwrap(), 0);
    assert_eq!(series::Entity::find().count(&store.conn).await.unwrap(), 0);
}

#[tokio::test]
async fn failed_subtype_insert_rolls_back_base_row() {
    let store = open_store().await;
    let service = SeaOrmMediaService::new(store.clone());

    // the base insert succeeds, the films insert cannot
    store
        .conn
        .execute_unprepared("DROP TABLE films")
        .await
        .unwrap();

    let err = service
        .create_film(fields(json!({ "title": "Solaris", "release_status": "released" })))
        .await
        .unwrap_err();
    assert!(matches!(err, MediaError::Database(_)), "got {err:?}");

    assert_eq!(media::Entity::find().count(&store.conn).await.unwrap(), 0);

    // the store is still usable for other kinds
    let created = book(&service, "Solaris").await;
    assert_eq!(created.kind(), MediaKind::Book);
    assert_eq!(media::Entity::find().count(&store.conn).await.unwrap(), 1);
}

#[tokio::test]
async fn factory_writes_base_and_subtype_rows() {
    let store = open_store().await;
    let service = SeaOrmMediaService::new(store.clone());

    let created = service
        .create_series(fields(json!({
            "title": "The Expanse",
            "episodes": 62,
            "rating": "15",
            "airing_status": "finished_airing",
            "score": 8.5,
            "members": 1200
        })))
        .await
        .unwrap();

    assert_eq!(created.kind(), MediaKind::Series);

    let loaded = service.get(created.id).await.unwrap();
    assert_eq!(loaded, created);
    assert_eq!(media::Entity::find().count(&store.conn).await.unwrap(), 1);
}

#[tokio::test]
async fn deleting_media_cascades() {
    let store = open_store().await;
    let service = SeaOrmMediaService::new(store.clone());
    let user = create_user(&store, "john_smith").await;

    let first = film(&service, "2001: A Space Odyssey").await;
    let second = book(&service, "The Martian").await;
    service.add_sequel(first.id, second.id).await.unwrap();
    store
        .add_list_entry(user.id, first.id, None, None)
        .await
        .unwrap();

    service.delete(first.id).await.unwrap();

    assert_eq!(media::Entity::find().count(&store.conn).await.unwrap(), 1);
    assert_eq!(films::Entity::find().count(&store.conn).await.unwrap(), 0);
    assert_eq!(books::Entity::find().count(&store.conn).await.unwrap(), 1);
    assert_eq!(related_media::Entity::find().count(&store.conn).await.unwrap(), 0);
    assert_eq!(list_entries::Entity::find().count(&store.conn).await.unwrap(), 0);

    let err = service.delete(first.id).await.unwrap_err();
    assert!(matches!(err, MediaError::NotFound(_)));
}

#[tokio::test]
async fn sequel_edge_follows_convention() {
    let store = open_store().await;
    let service = SeaOrmMediaService::new(store.clone());

    let odyssey = film(&service, "2001").await;
    let martian = book(&service, "The Martian").await;

    service.add_sequel(odyssey.id, martian.id).await.unwrap();

    let edge = store
        .find_edge(odyssey.id, martian.id)
        .await
        .unwrap()
        .expect("edge stored");
    assert_eq!(edge.media1, martian.id);
    assert_eq!(edge.media2, odyssey.id);
    assert_eq!(edge.relationship, Relationship::Sequel);

    let sequels = service.get_sequels(odyssey.id).await.unwrap();
    assert_eq!(sequels.len(), 1);
    assert_eq!(sequels[0].title(), "The Martian");

    let prequels = service.get_prequels(martian.id).await.unwrap();
    assert_eq!(ids(prequels), vec![odyssey.id]);

    assert!(service.get_prequels(odyssey.id).await.unwrap().is_empty());
    assert!(service.get_sequels(martian.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn add_prequel_is_the_mirror_of_add_sequel() {
    let store = open_store().await;
    let service = SeaOrmMediaService::new(store.clone());

    let first = film(&service, "Alien").await;
    let second = film(&service, "Aliens").await;

    service.add_prequel(second.id, first.id).await.unwrap();

    let edge = store.find_edge(first.id, second.id).await.unwrap().unwrap();
    assert_eq!(edge.media1, second.id);
    assert_eq!(edge.media2, first.id);

    assert_eq!(ids(service.get_sequels(first.id).await.unwrap()), vec![second.id]);
    assert_eq!(ids(service.get_prequels(second.id).await.unwrap()), vec![first.id]);
}

#[tokio::test]
async fn second_edge_between_a_pair_is_rejected() {
    let store = open_store().await;
    let service = SeaOrmMediaService::new(store.clone());

    let a = film(&service, "Dune").await;
    let b = book(&service, "Dune Messiah").await;

    service
        .add_related(a.id, b.id, Relationship::Related)
        .await
        .unwrap();

    for (x, y, kind) in [
        (a.id, b.id, Relationship::Related),
        (b.id, a.id, Relationship::Related),
        (a.id, b.id, Relationship::Sequel),
        (b.id, a.id, Relationship::Sequel),
    ] {
        let err = service.add_related(x, y, kind).await.unwrap_err();
        assert!(
            matches!(
                err,
                MediaError::Constraint(ConstraintViolation::DuplicateRelationship { .. })
            ),
            "expected duplicate for {x} -> {y}, got {err:?}"
        );
    }

    assert!(service.add_sequel(b.id, a.id).await.is_err());
    assert_eq!(related_media::Entity::find().count(&store.conn).await.unwrap(), 1);
}

#[tokio::test]
async fn unordered_pair_index_backs_the_precheck() {
    let store = open_store().await;
    let service = SeaOrmMediaService::new(store.clone());

    let a = film(&service, "Blade Runner").await;
    let b = film(&service, "Blade Runner 2049").await;

    service.add_sequel(a.id, b.id).await.unwrap();

    let reverse = related_media::ActiveModel {
        media1_id: sea_orm::Set(a.id.value()),
        media2_id: sea_orm::Set(b.id.value()),
        relationship: sea_orm::Set(Relationship::Related),
        ..Default::default()
    };
    let result = related_media::Entity::insert(reverse).exec(&store.conn).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn media_cannot_relate_to_itself() {
    let store = open_store().await;
    let service = SeaOrmMediaService::new(store.clone());
    let a = film(&service, "Memento").await;

    let err = service.add_sequel(a.id, a.id).await.unwrap_err();
    assert!(matches!(
        err,
        MediaError::Constraint(ConstraintViolation::SelfRelationship(_))
    ));
}

#[tokio::test]
async fn related_queries_exclude_subject_and_deduplicate() {
    let store = open_store().await;
    let service = SeaOrmMediaService::new(store.clone());

    let hub = film(&service, "The Lord of the Rings").await;
    let left = book(&service, "The Hobbit").await;
    let right = book(&service, "The Silmarillion").await;
    let sequel = film(&service, "The Two Towers").await;

    service.add_related(hub.id, left.id, Relationship::Related).await.unwrap();
    service.add_related(right.id, hub.id, Relationship::Related).await.unwrap();
    service.add_sequel(hub.id, sequel.id).await.unwrap();

    let related = ids(service.get_related(hub.id).await.unwrap());
    assert_eq!(related.len(), 2);
    assert!(related.contains(&left.id));
    assert!(related.contains(&right.id));
    assert!(!related.contains(&hub.id));
    assert!(!related.contains(&sequel.id));

    assert_eq!(ids(service.get_related(left.id).await.unwrap()), vec![hub.id]);

    let relations = service.relations(hub.id).await.unwrap();
    assert_eq!(relations.related.len(), 2);
    assert_eq!(ids(relations.sequels), vec![sequel.id]);
    assert!(relations.prequels.is_empty());
}

#[tokio::test]
async fn delete_related_works_in_either_direction() {
    let store = open_store().await;
    let service = SeaOrmMediaService::new(store.clone());

    let a = film(&service, "Toy Story").await;
    let b = film(&service, "Toy Story 2").await;

    service.add_sequel(a.id, b.id).await.unwrap();

    // stored as b -> a, deleted as a, b
    service.delete_related(a.id, b.id).await.unwrap();
    assert!(store.find_edge(a.id, b.id).await.unwrap().is_none());

    let err = service.delete_related(b.id, a.id).await.unwrap_err();
    assert!(matches!(err, MediaError::NotFound(_)));

    // the pair can be linked again once the edge is gone
    service.add_prequel(a.id, b.id).await.unwrap();
}

#[tokio::test]
async fn graph_queries_on_missing_media_are_not_found() {
    let store = open_store().await;
    let service = SeaOrmMediaService::new(store.clone());
    let a = film(&service, "Heat").await;

    let err = service.get_sequels(MediaId::new(999)).await.unwrap_err();
    assert!(matches!(err, MediaError::NotFound(_)));

    let err = service.add_sequel(a.id, MediaId::new(999)).await.unwrap_err();
    assert!(matches!(err, MediaError::NotFound(_)));
}

#[tokio::test]
async fn list_entries_default_and_reject_duplicates() {
    let store = open_store().await;
    let service = SeaOrmMediaService::new(store.clone());
    let user = create_user(&store, "john_smith").await;
    let arrival = film(&service, "Arrival").await;

    let entry = store
        .add_list_entry(user.id, arrival.id, None, None)
        .await
        .unwrap();
    assert_eq!(entry.progress, 0);
    assert_eq!(entry.score, None);
    assert_eq!(entry.media.title, "Arrival");

    let err = store
        .add_list_entry(user.id, arrival.id, Some(9.0), Some(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Constraint(ConstraintViolation::Duplicate(_))
    ));

    let err = store
        .add_list_entry(user.id, arrival.id, Some(10.5), None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Constraint(_)));
}

#[tokio::test]
async fn list_for_filters_by_media_type() {
    let store = open_store().await;
    let service = SeaOrmMediaService::new(store.clone());
    let john = create_user(&store, "john_smith").await;
    let jane = create_user(&store, "jane_doe").await;

    let arrival = film(&service, "Arrival").await;
    let heat = film(&service, "Heat").await;
    let dune = book(&service, "Dune").await;

    store.add_list_entry(john.id, arrival.id, None, None).await.unwrap();
    store.add_list_entry(john.id, dune.id, Some(9.5), Some(22)).await.unwrap();
    store.add_list_entry(john.id, heat.id, None, None).await.unwrap();
    store.add_list_entry(jane.id, heat.id, None, None).await.unwrap();

    let films = store.list_entries(john.id, Some(MediaKind::Film)).await.unwrap();
    let titles: Vec<_> = films.iter().map(|e| e.media.title.as_str()).collect();
    assert_eq!(titles, vec!["Arrival", "Heat"]);

    let books = store.list_entries(john.id, Some(MediaKind::Book)).await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].score, Some(9.5));
    assert_eq!(books[0].progress, 22);

    assert!(store.list_entries(john.id, Some(MediaKind::Series)).await.unwrap().is_empty());
    assert_eq!(store.list_entries(john.id, None).await.unwrap().len(), 3);
    assert_eq!(store.list_entries(jane.id, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_entries_update_and_remove() {
    let store = open_store().await;
    let service = SeaOrmMediaService::new(store.clone());
    let user = create_user(&store, "john_smith").await;
    let dune = book(&service, "Dune").await;

    store.add_list_entry(user.id, dune.id, Some(8.0), None).await.unwrap();

    let updated = store
        .update_list_entry(
            user.id,
            dune.id,
            EntryChanges {
                score: None,
                progress: Some(10),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.score, Some(8.0));
    assert_eq!(updated.progress, 10);

    let cleared = store
        .update_list_entry(
            user.id,
            dune.id,
            EntryChanges {
                score: Some(None),
                progress: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.score, None);

    store.remove_list_entry(user.id, dune.id).await.unwrap();
    let err = store.remove_list_entry(user.id, dune.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn user_search_orders_by_last_login() {
    let store = open_store().await;
    let first = create_user(&store, "testUser1").await;
    let second = create_user(&store, "testUser2").await;
    create_user(&store, "someone_else").await;

    let page = store.search_users("test", 0, 10).await.unwrap();
    assert_eq!(page.total, 2);
    let names: Vec<_> = page.users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["testUser1", "testUser2"]);

    store.record_login(second.id).await.unwrap();
    let page = store.search_users("TEST", 0, 10).await.unwrap();
    assert_eq!(page.users[0].id, second.id);
    assert_eq!(page.users[1].id, first.id);

    // LIKE wildcards in the query are matched literally
    assert_eq!(store.search_users("%", 0, 10).await.unwrap().total, 0);
}

#[tokio::test]
async fn duplicate_usernames_are_rejected() {
    let store = open_store().await;
    create_user(&store, "john_smith").await;

    let err = store
        .create_user(
            NewUser {
                username: "john_smith".to_string(),
                password: "password123".to_string(),
                ..NewUser::default()
            },
            &fast_hashing(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Constraint(ConstraintViolation::Duplicate(_))
    ));

    assert!(store.verify_user_password("john_smith", "password123").await.unwrap());
    assert!(!store.verify_user_password("john_smith", "wrong").await.unwrap());
    assert!(!store.verify_user_password("nobody", "password123").await.unwrap());
}

#[tokio::test]
async fn overflowing_pages_are_constraint_errors() {
    let store = open_store().await;

    let err = store
        .list_media(&MediaQuery {
            page: u64::MAX / 2,
            page_size: 100,
            ..MediaQuery::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Constraint(ConstraintViolation::InvalidField { ref field, .. }) if field == "page"
    ));

    let err = store.search_users("test", u64::MAX, 10).await.unwrap_err();
    assert!(matches!(err, StoreError::Constraint(_)));

    let page = store
        .list_media(&MediaQuery {
            page: 5,
            page_size: 10,
            ..MediaQuery::default()
        })
        .await
        .unwrap();
    assert!(page.items.is_empty());
}
