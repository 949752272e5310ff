#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use battlegrid::entities::account;
use battlegrid::errors::{is_unique_violation, AppError};
use battlegrid::repositories::AccountUpdate;
use battlegrid::utils::now_millis;
use sea_orm::{ConnectionTrait, EntityTrait, Set};

#[tokio::test]
async fn test_create_and_find_account() {
    let state = common::test_state().await;

    let id = state
        .accounts
        .create("  ghost_actual ", "ghost@example.com")
        .await
        .unwrap();

    let account = state.accounts.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(account.username, "ghost_actual");
    assert_eq!(account.email, "ghost@example.com");
    assert_eq!(account.level, 1);
    assert_eq!(account.experience, 0);
    assert!(account.is_active);
    assert!(account.avatar.is_none());

    let by_name = state.accounts.find_by_username("ghost_actual").await.unwrap();
    assert_eq!(by_name.map(|a| a.id), Some(id));
}

#[tokio::test]
async fn test_username_length_bounds() {
    let state = common::test_state().await;

    let too_long = "a".repeat(21);
    for name in ["ab", too_long.as_str()] {
        let err = state.accounts.create(name, "x@example.com").await.unwrap_err();
        assert_eq!(
            err,
            AppError::Validation("Username must be between 3 and 20 characters".to_string())
        );
    }

    assert!(state.accounts.create("abc", "a@example.com").await.is_ok());
    assert!(
        state
            .accounts
            .create(&"z".repeat(20), "z@example.com")
            .await
            .is_ok()
    );
    assert_eq!(state.accounts.total_count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_invalid_email_rejected() {
    let state = common::test_state().await;

    let err = state.accounts.create("valid_name", "not-an-email").await.unwrap_err();
    assert_eq!(err.to_string(), "Please enter a valid email address");
    assert_eq!(state.accounts.total_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let state = common::test_state().await;

    state.accounts.create("overwatch", "a@example.com").await.unwrap();
    let err = state
        .accounts
        .create("overwatch", "b@example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UsernameTaken(ref name) if name == "overwatch"));
    assert_eq!(err.to_string(), "Username already exists");
    assert_eq!(state.accounts.total_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_deactivated_username_stays_reserved() {
    let state = common::test_state().await;

    let id = state.accounts.create("reserved", "r@example.com").await.unwrap();
    state.accounts.deactivate(id).await.unwrap();

    assert!(!state.accounts.is_username_available("reserved").await.unwrap());
    assert!(matches!(
        state.accounts.create("reserved", "other@example.com").await,
        Err(AppError::UsernameTaken(_))
    ));
    assert_eq!(state.accounts.active_count().await.unwrap(), 0);
    assert_eq!(state.accounts.total_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_active_list_tracks_deactivation() {
    let state = common::test_state().await;

    let bravo = state.accounts.create("bravo", "b@example.com").await.unwrap();
    state.accounts.create("alpha", "a@example.com").await.unwrap();

    let mut live = state.accounts.observe_active().await.unwrap();
    let names: Vec<String> = live.current().into_iter().map(|a| a.username).collect();
    assert_eq!(names, vec!["alpha", "bravo"]);

    state.accounts.deactivate(bravo).await.unwrap();
    let rows = common::within(live.wait_for(|rows| rows.len() == 1))
        .await
        .unwrap();
    assert_eq!(rows[0].username, "alpha");
}

#[tokio::test]
async fn test_update_profile() {
    let state = common::test_state().await;
    let id = state.accounts.create("medic", "m@example.com").await.unwrap();

    let updated = state
        .accounts
        .update(
            id,
            AccountUpdate {
                email: Some("medic@example.com".to_string()),
                avatar: Some(Some("medic.png".to_string())),
                level: Some(4),
                experience: Some(1200),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.email, "medic@example.com");
    assert_eq!(updated.avatar.as_deref(), Some("medic.png"));
    assert_eq!(updated.level, 4);
    assert_eq!(updated.experience, 1200);

    let cleared = state
        .accounts
        .update(
            id,
            AccountUpdate {
                avatar: Some(None),
                ..AccountUpdate::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.avatar.is_none());
    assert_eq!(cleared.level, 4);

    let bad_level = AccountUpdate {
        level: Some(0),
        ..AccountUpdate::default()
    };
    assert!(state.accounts.update(id, bad_level).await.unwrap_err().is_validation());
}

#[tokio::test]
async fn test_unknown_account_is_not_found() {
    let state = common::test_state().await;

    assert!(state.accounts.find_by_id(99).await.unwrap().is_none());
    assert_eq!(
        state.accounts.deactivate(99).await.unwrap_err(),
        AppError::NotFound {
            entity: "account",
            id: 99
        }
    );
    assert!(matches!(
        state.accounts.delete(99).await,
        Err(AppError::NotFound { .. })
    ));
}

fn raw_account(username: &str, email: &str) -> account::ActiveModel {
    account::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        avatar: Set(None),
        level: Set(1),
        experience: Set(0),
        created_at: Set(now_millis()),
        is_active: Set(true),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_duplicate_insert_is_unique_violation() {
    let state = common::test_state().await;
    state.accounts.create("dup", "dup@example.com").await.unwrap();

    // Bypasses the repository pre-check, as a racing writer would.
    let err = account::Entity::insert(raw_account("dup", "other@example.com"))
        .exec(state.store.db())
        .await
        .unwrap_err();
    assert!(is_unique_violation(&err));
    let message = err.to_string();
    assert_eq!(AppError::from(err), AppError::Database(message));

    account::Entity::insert(raw_account("dup2", "other@example.com"))
        .exec(state.store.db())
        .await
        .unwrap();

    let other = state
        .store
        .db()
        .execute_unprepared("INSERT INTO battle_sessions (user_id) VALUES (NULL)")
        .await
        .unwrap_err();
    assert!(!is_unique_violation(&other));
}
