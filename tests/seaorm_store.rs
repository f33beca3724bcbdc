use std::sync::Arc;

use async_graphql::Request;
use linkfeed_graphql::criteria::{FeedCriteria, LinkPredicate};
use linkfeed_graphql::entities::{user, vote};
use linkfeed_graphql::store::{ensure_tables, LinkChanges, NewLink, SeaOrmLinkStore};
use linkfeed_graphql::types::{LinkOrderByInput, Sort};
use linkfeed_graphql::{build_schema, LinkStore, StoreError, UserId};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use serde_json::json;
use tokio_test::assert_ok;

async fn connect() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    ensure_tables(&db).await.unwrap();
    db
}

async fn add_user(db: &DatabaseConnection, id: i32, name: &str) {
    user::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        email: Set(format!("{}@example.com", name)),
        password: Set("hashed".to_string()),
    }
    .insert(db)
    .await
    .unwrap();
}

async fn seeded() -> SeaOrmLinkStore {
    let db = connect().await;
    add_user(&db, 1, "alice").await;
    add_user(&db, 2, "bob").await;

    let store = SeaOrmLinkStore::new(db);
    for (description, url) in [
        ("Fullstack tutorial for GraphQL", "www.howtographql.com"),
        ("GraphQL official website", "graphql.org"),
        ("The Rust programming language", "rust-lang.org"),
    ] {
        store
            .create_link(NewLink {
                description: description.to_string(),
                url: url.to_string(),
                posted_by_id: 1,
            })
            .await
            .unwrap();
    }
    store
}

#[tokio::test]
async fn test_ensure_tables_is_idempotent() {
    let db = connect().await;
    assert_ok!(ensure_tables(&db).await);
}

#[tokio::test]
async fn test_find_and_count_share_predicate() {
    let store = seeded().await;
    let criteria = FeedCriteria::from_args(Some("GraphQL"), None, Some(1), None).unwrap();

    let links = store.find_links(&criteria).await.unwrap();
    let count = store.count_links(&criteria.predicate).await.unwrap();

    assert_eq!(links.len(), 1);
    assert_eq!(links[0].id, 1);
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_match_all_and_ordering() {
    let store = seeded().await;
    assert_eq!(store.count_links(&LinkPredicate::MatchAll).await.unwrap(), 3);

    let order = [LinkOrderByInput {
        url: Some(Sort::Asc),
        ..Default::default()
    }];
    let criteria = FeedCriteria::from_args(None, Some(1), Some(5), Some(order.as_slice())).unwrap();
    let urls: Vec<String> = store
        .find_links(&criteria)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.url)
        .collect();
    assert_eq!(urls, vec!["rust-lang.org", "www.howtographql.com"]);
}

async fn add_link(store: &SeaOrmLinkStore, description: &str, url: &str) -> i32 {
    store
        .create_link(NewLink {
            description: description.to_string(),
            url: url.to_string(),
            posted_by_id: 2,
        })
        .await
        .unwrap()
        .id
}

async fn count(store: &SeaOrmLinkStore, filter: &str) -> u64 {
    store
        .count_links(&LinkPredicate::from_filter(Some(filter)))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_filter_wildcards_match_literally() {
    let store = seeded().await;
    add_link(&store, "Rust book", "doc.rust-lang.org/book").await;

    assert_eq!(count(&store, "_").await, 0);
    assert_eq!(count(&store, "%").await, 0);
    assert_eq!(count(&store, "t_b").await, 0);
    assert_eq!(count(&store, "\\").await, 0);

    add_link(&store, "snake_case naming", "rust-lang.org/100%").await;
    add_link(&store, "path\\to", "example.com").await;
    assert_eq!(count(&store, "_").await, 1);
    assert_eq!(count(&store, "e_c").await, 1);
    assert_eq!(count(&store, "100%").await, 1);
    assert_eq!(count(&store, "h\\t").await, 1);
}

#[tokio::test]
async fn test_secondary_sort_key_breaks_ties() {
    let store = seeded().await;
    let alpha = add_link(&store, "alpha", "shared.example").await;
    let beta = add_link(&store, "beta", "shared.example").await;
    let other = add_link(&store, "gamma", "other.example").await;

    let ids_for = |description: Sort| {
        let order = [
            LinkOrderByInput {
                url: Some(Sort::Desc),
                ..Default::default()
            },
            LinkOrderByInput {
                description: Some(description),
                ..Default::default()
            },
        ];
        FeedCriteria::from_args(Some(".example"), None, None, Some(order.as_slice())).unwrap()
    };

    let desc: Vec<i32> = store
        .find_links(&ids_for(Sort::Desc))
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(desc, vec![beta, alpha, other]);

    let asc: Vec<i32> = store
        .find_links(&ids_for(Sort::Asc))
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(asc, vec![alpha, beta, other]);
}

#[tokio::test]
async fn test_update_and_delete() {
    let store = seeded().await;

    let unchanged = store.update_link(2, LinkChanges::default()).await.unwrap();
    assert_eq!(unchanged.url, "graphql.org");

    let updated = store
        .update_link(
            2,
            LinkChanges {
                description: None,
                url: Some("graphql.org/learn".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description, "GraphQL official website");
    assert_eq!(updated.url, "graphql.org/learn");

    let deleted = store.delete_link(2).await.unwrap();
    assert_eq!(deleted, updated);
    assert_eq!(store.count_links(&LinkPredicate::MatchAll).await.unwrap(), 2);

    assert!(matches!(
        store.delete_link(2).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.update_link(2, LinkChanges::default()).await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_relations() {
    let store = seeded().await;
    vote::ActiveModel {
        link_id: Set(1),
        user_id: Set(2),
    }
    .insert(store.connection())
    .await
    .unwrap();

    let owner = store.link_posted_by(1).await.unwrap().unwrap();
    assert_eq!(owner.name, "alice");

    let voters = store.link_voters(1).await.unwrap();
    assert_eq!(voters.len(), 1);
    assert_eq!(voters[0].name, "bob");

    assert!(store.link_voters(2).await.unwrap().is_empty());
    assert!(store.link_posted_by(99).await.unwrap().is_none());
    assert!(store.link_voters(99).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_schema_over_sqlite() {
    let store = seeded().await;
    let schema = build_schema(Arc::new(store));

    let response = schema
        .execute(
            Request::new(r#"mutation { post(description: "Prisma ORM", url: "prisma.io") { id postedBy { name } } }"#)
                .data(UserId(2)),
        )
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data.into_json().unwrap(),
        json!({ "post": { "id": 4, "postedBy": { "name": "bob" } } })
    );

    let response = schema
        .execute(r#"{ feed(filter: "prisma", orderBy: [{ createdAt: desc }]) { count links { url } } }"#)
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data.into_json().unwrap(),
        json!({ "feed": { "count": 1, "links": [{ "url": "prisma.io" }] } })
    );
}
