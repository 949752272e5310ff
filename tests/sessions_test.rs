#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use battlegrid::entities::{Difficulty, EntityKind};
use battlegrid::errors::AppError;
use battlegrid::repositories::{NewPosition, NewSession, PositionUpdate, SessionUpdate};
use battlegrid::state::AppState;

async fn seeded() -> (AppState, i64, i64) {
    let state = common::test_state().await;
    let user = state
        .accounts
        .create("gamemaster", "gm@example.com")
        .await
        .unwrap();
    let session = state
        .sessions
        .start(NewSession::new(user, "Crypt of Ash"))
        .await
        .unwrap();
    (state, user, session)
}

#[tokio::test]
async fn test_start_and_complete_session() {
    let (state, user, id) = seeded().await;

    let started = state.sessions.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(started.user_id, user);
    assert_eq!(started.name, "Crypt of Ash");
    assert_eq!(started.difficulty, Difficulty::Normal);
    assert_eq!(started.player_count, 1);
    assert!(!started.is_completed);
    assert!(started.end_time.is_none());

    let mut active = state.sessions.observe_active(user).await.unwrap();
    assert_eq!(active.len(), 1);

    state.sessions.complete(id).await.unwrap();
    common::within(active.wait_for(<[_]>::is_empty)).await.unwrap();

    let completed = state.sessions.find_by_id(id).await.unwrap().unwrap();
    assert!(completed.is_completed);
    assert!(completed.end_time.unwrap() >= completed.start_time);

    let all = state.sessions.observe_for_user(user).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(state.sessions.delete_completed(user).await.unwrap(), 1);
}

#[tokio::test]
async fn test_session_validation() {
    let (state, user, _) = seeded().await;

    let blank = NewSession::new(user, "   ");
    assert!(state.sessions.start(blank).await.unwrap_err().is_validation());

    let nobody = NewSession {
        player_count: 0,
        ..NewSession::new(user, "Empty table")
    };
    assert!(state.sessions.start(nobody).await.unwrap_err().is_validation());

    let orphan = NewSession::new(9999, "No owner");
    assert!(matches!(
        state.sessions.start(orphan).await,
        Err(AppError::Database(_))
    ));
}

#[tokio::test]
async fn test_place_move_and_deactivate_positions() {
    let (state, _, session) = seeded().await;
    let repo = &state.sessions;

    let hero = repo
        .place(NewPosition::new(session, "Aria", EntityKind::Player, 2, 3))
        .await
        .unwrap();
    let goblin = repo
        .place(NewPosition {
            health: 250,
            max_health: 30,
            ..NewPosition::new(session, "Goblin", EntityKind::Monster, 5, 5)
        })
        .await
        .unwrap();

    let stored = repo.find_position(goblin).await.unwrap().unwrap();
    assert_eq!(stored.health, 30);
    assert_eq!(stored.entity_type, EntityKind::Monster);

    let mut board = repo.observe_session(session).await.unwrap();
    assert_eq!(board.len(), 2);

    repo.move_to(hero, 5, 5).await.unwrap();
    let here = repo.positions_at(session, 5, 5).await.unwrap();
    assert_eq!(here.len(), 2);
    assert!(repo.positions_at(session, 2, 3).await.unwrap().is_empty());

    repo.deactivate(goblin).await.unwrap();
    let rows = common::within(board.wait_for(|rows| rows.len() == 1))
        .await
        .unwrap();
    assert_eq!(rows[0].entity_name, "Aria");
    assert_eq!(repo.positions_at(session, 5, 5).await.unwrap().len(), 1);

    let kept = repo.find_position(goblin).await.unwrap().unwrap();
    assert!(!kept.is_active);
    assert!(matches!(
        repo.move_to(12345, 0, 0).await,
        Err(AppError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_positions_by_type() {
    let (state, _, session) = seeded().await;
    let repo = &state.sessions;

    repo.place_many(vec![
        NewPosition::new(session, "Orc B", EntityKind::Monster, 1, 1),
        NewPosition::new(session, "Orc A", EntityKind::Monster, 1, 2),
        NewPosition::new(session, "Barrel", EntityKind::Object, 4, 4),
    ])
    .await
    .unwrap();
    repo.place_many(Vec::new()).await.unwrap();

    let monsters = repo
        .observe_by_type(session, EntityKind::Monster)
        .await
        .unwrap()
        .current();
    let names: Vec<_> = monsters.into_iter().map(|p| p.entity_name).collect();
    assert_eq!(names, vec!["Orc A", "Orc B"]);

    let blank = NewPosition::new(session, " ", EntityKind::Npc, 0, 0);
    assert!(repo.place(blank).await.unwrap_err().is_validation());
}

#[tokio::test]
async fn test_deleting_session_removes_positions() {
    let (state, _, session) = seeded().await;
    let repo = &state.sessions;

    let token = repo
        .place(NewPosition::new(session, "Shopkeeper", EntityKind::Npc, 0, 0))
        .await
        .unwrap();

    repo.delete(session).await.unwrap();
    assert!(repo.find_by_id(session).await.unwrap().is_none());
    assert!(repo.find_position(token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_deleting_account_cascades() {
    let (state, user, session) = seeded().await;
    let token = state
        .sessions
        .place(NewPosition::new(session, "Aria", EntityKind::Player, 0, 0))
        .await
        .unwrap();

    state.accounts.delete(user).await.unwrap();
    assert!(state.sessions.find_by_id(session).await.unwrap().is_none());
    assert!(state.sessions.find_position(token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_clear_session() {
    let (state, _, session) = seeded().await;
    let repo = &state.sessions;
    repo.place_many(vec![
        NewPosition::new(session, "A", EntityKind::Object, 0, 0),
        NewPosition::new(session, "B", EntityKind::Object, 0, 1),
    ])
    .await
    .unwrap();

    assert_eq!(repo.clear_session(session).await.unwrap(), 2);
    assert_eq!(repo.clear_session(session).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_session_details() {
    let (state, user, id) = seeded().await;
    let mut sessions = state.sessions.observe_for_user(user).await.unwrap();

    let updated = state
        .sessions
        .update_session(
            id,
            SessionUpdate {
                name: Some("  Crypt of Embers ".to_string()),
                description: Some(Some("Second floor".to_string())),
                player_count: Some(4),
                difficulty: Some(Difficulty::Hard),
                ..SessionUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Crypt of Embers");
    assert_eq!(updated.description.as_deref(), Some("Second floor"));
    assert_eq!(updated.player_count, 4);
    assert_eq!(updated.difficulty, Difficulty::Hard);
    assert!(updated.map_data.is_none());

    let rows = common::within(sessions.wait_for(|rows| {
        rows.first().is_some_and(|s| s.name == "Crypt of Embers")
    }))
    .await
    .unwrap();
    assert_eq!(rows[0].player_count, 4);

    let cleared = state
        .sessions
        .update_session(
            id,
            SessionUpdate {
                description: Some(None),
                ..SessionUpdate::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.description.is_none());
    assert_eq!(cleared.name, "Crypt of Embers");

    let blank = SessionUpdate {
        name: Some(" ".to_string()),
        ..SessionUpdate::default()
    };
    assert!(state
        .sessions
        .update_session(id, blank)
        .await
        .unwrap_err()
        .is_validation());
    let nobody = SessionUpdate {
        player_count: Some(0),
        ..SessionUpdate::default()
    };
    assert!(state
        .sessions
        .update_session(id, nobody)
        .await
        .unwrap_err()
        .is_validation());
    assert!(matches!(
        state
            .sessions
            .update_session(4242, SessionUpdate::default())
            .await,
        Err(AppError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_update_position_clamps_health() {
    let (state, _, session) = seeded().await;
    let repo = &state.sessions;

    let goblin = repo
        .place(NewPosition {
            health: 20,
            max_health: 30,
            ..NewPosition::new(session, "Goblin", EntityKind::Monster, 1, 1)
        })
        .await
        .unwrap();
    let placed = repo.find_position(goblin).await.unwrap().unwrap();

    let healed = repo
        .update_position(
            goblin,
            PositionUpdate {
                health: Some(500),
                notes: Some(Some("enraged".to_string())),
                ..PositionUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(healed.health, 30);
    assert_eq!(healed.notes.as_deref(), Some("enraged"));
    assert!(healed.updated_at >= placed.updated_at);

    let hurt = repo
        .update_position(
            goblin,
            PositionUpdate {
                health: Some(-8),
                ..PositionUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(hurt.health, 0);

    // Lowering the maximum pulls current health down with it.
    repo.update_position(
        goblin,
        PositionUpdate {
            health: Some(25),
            ..PositionUpdate::default()
        },
    )
    .await
    .unwrap();
    let weakened = repo
        .update_position(
            goblin,
            PositionUpdate {
                max_health: Some(10),
                entity_name: Some(" Goblin Chief ".to_string()),
                ..PositionUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(weakened.max_health, 10);
    assert_eq!(weakened.health, 10);
    assert_eq!(weakened.entity_name, "Goblin Chief");
    assert_eq!((weakened.x_position, weakened.y_position), (1, 1));

    let broken = PositionUpdate {
        max_health: Some(0),
        ..PositionUpdate::default()
    };
    assert!(repo
        .update_position(goblin, broken)
        .await
        .unwrap_err()
        .is_validation());
    let nameless = PositionUpdate {
        entity_name: Some(String::new()),
        ..PositionUpdate::default()
    };
    assert!(repo
        .update_position(goblin, nameless)
        .await
        .unwrap_err()
        .is_validation());
    assert_eq!(
        repo.find_position(goblin).await.unwrap().unwrap().entity_name,
        "Goblin Chief"
    );
    assert!(matches!(
        repo.update_position(9999, PositionUpdate::default()).await,
        Err(AppError::NotFound { .. })
    ));
}
