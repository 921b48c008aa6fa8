//! Integration tests for `ON DELETE SET NULL` references on contacts and
//! cascading session cleanup.

use agenda_db::models::category::CreateCategory;
use agenda_db::models::contact::CreateContact;
use agenda_db::models::session::CreateSession;
use agenda_db::models::user::CreateUser;
use agenda_db::repositories::{CategoryRepo, ContactRepo, SessionRepo, UserRepo};
use chrono::{Duration, Utc};
use sqlx::PgPool;

async fn new_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn contact_in(category_id: Option<i64>) -> CreateContact {
    CreateContact {
        first_name: "Ana".to_string(),
        last_name: "Souza".to_string(),
        phone: "555".to_string(),
        email: None,
        description: String::new(),
        category_id,
        picture: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_reports_category_name(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let work = CategoryRepo::create(&pool, &CreateCategory { name: "Work".into() })
        .await
        .unwrap();

    let contact = ContactRepo::create(&pool, owner, &contact_in(Some(work.id)))
        .await
        .unwrap();
    assert_eq!(contact.category_id, Some(work.id));
    assert_eq!(contact.category_name.as_deref(), Some("Work"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_category_nulls_reference(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let work = CategoryRepo::create(&pool, &CreateCategory { name: "Work".into() })
        .await
        .unwrap();
    let contact = ContactRepo::create(&pool, owner, &contact_in(Some(work.id)))
        .await
        .unwrap();

    assert!(CategoryRepo::delete(&pool, work.id).await.unwrap());
    assert!(CategoryRepo::find_by_id(&pool, work.id).await.unwrap().is_none());

    let survivor = ContactRepo::find_visible(&pool, contact.id)
        .await
        .unwrap()
        .expect("contact survives its category");
    assert_eq!(survivor.category_id, None);
    assert_eq!(survivor.category_name, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_owner_nulls_reference(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let contact = ContactRepo::create(&pool, owner, &contact_in(None))
        .await
        .unwrap();

    assert!(UserRepo::delete(&pool, owner).await.unwrap());

    let survivor = ContactRepo::find_visible(&pool, contact.id)
        .await
        .unwrap()
        .expect("contact survives its owner");
    assert_eq!(survivor.owner_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_user_removes_sessions(pool: PgPool) {
    let user = new_user(&pool, "owner").await;
    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user,
            refresh_token_hash: "abc".to_string(),
            expires_at: Utc::now() + Duration::days(1),
        },
    )
    .await
    .unwrap();
    assert_eq!(SessionRepo::count_active_for_user(&pool, user).await.unwrap(), 1);

    UserRepo::delete(&pool, user).await.unwrap();
    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_sessions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_categories_list_by_name(pool: PgPool) {
    for name in ["Work", "Family", "Gym"] {
        CategoryRepo::create(&pool, &CreateCategory { name: name.into() })
            .await
            .unwrap();
    }
    let names: Vec<_> = CategoryRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Family", "Gym", "Work"]);
}
