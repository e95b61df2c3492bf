use chrono::{Duration, Utc};
use pigeon_server::error::AppError;
use pigeon_server::models::{
    Addressee, AuthUser, ConversationKind, CreateGroupRequest, LoginRequest, MessageFilter,
    NewMessage, RegisterRequest, SendMessageRequest,
};
use pigeon_server::services::{accounts, conversation, friends, groups, messages};
use pigeon_server::store::Stores;

async fn register(stores: &Stores, username: &str) -> AuthUser {
    let user = accounts::register(
        stores.users.as_ref(),
        RegisterRequest {
            username: Some(username.into()),
            email: Some(format!("{}@test.com", username)),
            password: Some("secret".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    AuthUser {
        id: user.id,
        username: user.username,
    }
}

fn ids(summaries: &[pigeon_server::models::UserSummary]) -> Vec<&str> {
    summaries.iter().map(|s| s.id.as_str()).collect()
}

#[tokio::test]
async fn login_issues_a_session_that_authenticates() {
    let stores = Stores::memory();
    let alice = register(&stores, "alice").await;

    let outcome = accounts::login(
        stores.users.as_ref(),
        LoginRequest {
            identifier: Some("ALICE@test.com".into()),
            password: Some("secret".into()),
        },
        Duration::days(1),
    )
    .await
    .unwrap();
    assert_eq!(outcome.user.id, alice.id);

    let caller = accounts::authenticate(stores.users.as_ref(), &outcome.token)
        .await
        .unwrap();
    assert_eq!(caller, alice);

    let err = accounts::login(
        stores.users.as_ref(),
        LoginRequest {
            identifier: Some("alice".into()),
            password: Some("wrong".into()),
        },
        Duration::days(1),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let stores = Stores::memory();
    register(&stores, "alice").await;

    let err = accounts::register(
        stores.users.as_ref(),
        RegisterRequest {
            username: Some("alice".into()),
            email: Some("other@test.com".into()),
            password: Some("secret".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn half_applied_friend_edge_is_completed_by_retry() {
    let stores = Stores::memory();
    let alice = register(&stores, "alice").await;
    let bob = register(&stores, "bob").await;

    // Only the requester's side landed
    assert!(stores
        .users
        .insert_friend_edge(&alice.id, &bob.id)
        .await
        .unwrap());

    let alice_friends = friends::list_friends(stores.users.as_ref(), &alice.id).await.unwrap();
    let bob_friends = friends::list_friends(stores.users.as_ref(), &bob.id).await.unwrap();
    assert_eq!(ids(&alice_friends), vec![bob.id.as_str()]);
    assert!(bob_friends.is_empty());

    let outcome = friends::add_friend(stores.users.as_ref(), &bob, Some(&alice.id))
        .await
        .unwrap();
    assert_eq!(outcome, friends::FriendOutcome::Created);

    let bob_friends = friends::list_friends(stores.users.as_ref(), &bob.id).await.unwrap();
    assert_eq!(ids(&bob_friends), vec![alice.id.as_str()]);

    let again = friends::add_friend(stores.users.as_ref(), &alice, Some(&bob.id))
        .await
        .unwrap();
    assert_eq!(again, friends::FriendOutcome::AlreadyFriends);
    let alice_friends = friends::list_friends(stores.users.as_ref(), &alice.id).await.unwrap();
    assert_eq!(alice_friends.len(), 1);
}

#[tokio::test]
async fn resolver_is_deterministic() {
    let stores = Stores::memory();
    let alice = register(&stores, "alice").await;
    let bob = register(&stores, "bob").await;

    let group = groups::create_group(
        stores.users.as_ref(),
        stores.groups.as_ref(),
        &alice,
        CreateGroupRequest {
            name: Some("team".into()),
            members: vec![bob.id.clone()],
        },
    )
    .await
    .unwrap();

    for _ in 0..3 {
        let filter = conversation::resolve(stores.groups.as_ref(), &alice.id, &group.id, None)
            .await
            .unwrap();
        assert_eq!(
            filter,
            MessageFilter::Group {
                group_id: group.id.clone()
            }
        );

        let filter = conversation::resolve(stores.groups.as_ref(), &alice.id, &bob.id, None)
            .await
            .unwrap();
        assert_eq!(
            filter,
            MessageFilter::Private {
                caller_id: alice.id.clone(),
                peer_id: bob.id.clone()
            }
        );
    }

    let forced = conversation::resolve(
        stores.groups.as_ref(),
        &alice.id,
        &group.id,
        Some(ConversationKind::Private),
    )
    .await
    .unwrap();
    assert_eq!(forced.kind(), ConversationKind::Private);

    let err = conversation::resolve(
        stores.groups.as_ref(),
        &alice.id,
        &bob.id,
        Some(ConversationKind::Group),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn equal_timestamps_keep_insertion_order() {
    let stores = Stores::memory();
    let alice = register(&stores, "alice").await;
    let bob = register(&stores, "bob").await;

    let at = Utc::now();
    let later = at + Duration::seconds(5);
    for (content, timestamp, sender) in [
        ("late", later, &bob),
        ("one", at, &alice),
        ("two", at, &bob),
        ("three", at, &alice),
    ] {
        let recipient = if sender.id == alice.id { &bob } else { &alice };
        stores
            .messages
            .insert_message(&NewMessage {
                id: uuid::Uuid::new_v4().to_string(),
                sender_id: sender.id.clone(),
                addressee: Addressee::Private {
                    recipient_id: recipient.id.clone(),
                },
                content: content.into(),
                media_url: None,
                caption: None,
                timestamp,
            })
            .await
            .unwrap();
    }

    let history = messages::list_messages(&stores, &alice, &bob.id, None)
        .await
        .unwrap();
    let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "two", "three", "late"]);
    assert_eq!(history[1].sender_name, "bob");
}

#[tokio::test]
async fn ambiguous_addressing_writes_nothing() {
    let stores = Stores::memory();
    let alice = register(&stores, "alice").await;
    let bob = register(&stores, "bob").await;

    let err = messages::append_message(
        &stores,
        &alice,
        SendMessageRequest {
            content: Some("hi".into()),
            recipient_id: Some(bob.id.clone()),
            group_id: Some(uuid::Uuid::new_v4().to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));

    let history = messages::list_messages(&stores, &alice, &bob.id, None)
        .await
        .unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn group_creation_with_unknown_member_persists_nothing() {
    let stores = Stores::memory();
    let alice = register(&stores, "alice").await;

    let err = groups::create_group(
        stores.users.as_ref(),
        stores.groups.as_ref(),
        &alice,
        CreateGroupRequest {
            name: Some("team".into()),
            members: vec![uuid::Uuid::new_v4().to_string()],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));

    let mine = groups::list_groups(stores.groups.as_ref(), &alice.id).await.unwrap();
    assert!(mine.is_empty());
}

#[tokio::test]
async fn add_member_is_idempotent() {
    let stores = Stores::memory();
    let alice = register(&stores, "alice").await;
    let bob = register(&stores, "bob").await;

    let group = groups::create_group(
        stores.users.as_ref(),
        stores.groups.as_ref(),
        &alice,
        CreateGroupRequest {
            name: Some("team".into()),
            members: vec![],
        },
    )
    .await
    .unwrap();

    let first = groups::add_member(stores.users.as_ref(), stores.groups.as_ref(), &group.id, Some(&bob.id))
        .await
        .unwrap();
    let second = groups::add_member(stores.users.as_ref(), stores.groups.as_ref(), &group.id, Some(&bob.id))
        .await
        .unwrap();
    assert!(first);
    assert!(!second);

    let details = groups::group_details(stores.users.as_ref(), stores.groups.as_ref(), &group.id)
        .await
        .unwrap();
    let members: Vec<&str> = details.members.iter().map(|m| m.username.as_str()).collect();
    assert_eq!(members, vec!["alice", "bob"]);
}
