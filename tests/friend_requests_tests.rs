use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use lingopal::database::{friend_request_repo, friendship_repo, schema, user_repo};
use lingopal::models::RequestStatus;
use lingopal::services::error::ServiceError;
use lingopal::services::{friend_service, recommendation_service};

async fn test_pool() -> SqlitePool {
    let path = std::env::temp_dir().join(format!("lingopal-test-{}.db", Uuid::new_v4()));
    let pool = SqlitePoolOptions::new()
        .connect(&format!("sqlite://{}?mode=rwc", path.display()))
        .await
        .expect("connect test db");
    schema::ensure_schema(&pool).await.expect("schema");
    pool
}

async fn create_user(pool: &SqlitePool, name: &str, onboarded: bool) -> String {
    let id = Uuid::new_v4().to_string();
    user_repo::insert_user(
        pool,
        user_repo::NewUser {
            id: &id,
            full_name: name,
            email: &format!("{name}@example.com"),
            password_hash: "not-a-real-hash",
            avatar_url: "https://avatar.iran.liara.run/public/1.png",
        },
    )
    .await
    .expect("insert user");

    if onboarded {
        user_repo::mark_onboarded(
            pool,
            &id,
            user_repo::OnboardingUpdate {
                full_name: name,
                bio: "learning languages",
                native_language: "english",
                learning_language: "dutch",
                location: "Utrecht",
            },
        )
        .await
        .expect("onboard user");
    }

    id
}

#[tokio::test]
async fn send_creates_pending_request() {
    let pool = test_pool().await;
    let alice = create_user(&pool, "alice", true).await;
    let bob = create_user(&pool, "bob", true).await;

    let request = friend_service::send_friend_request(&pool, &alice, &bob)
        .await
        .expect("send request");

    assert_eq!(request.sender_id, alice);
    assert_eq!(request.recipient_id, bob);
    assert_eq!(request.status, RequestStatus::Pending);

    let outgoing = friend_service::get_outgoing_friend_reqs(&pool, &alice)
        .await
        .expect("outgoing");
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].id, request.id);
    let recipient = outgoing[0].recipient.as_ref().expect("recipient profile");
    assert_eq!(recipient.id, bob);

    // No friendship yet, only a pending row.
    assert!(!friendship_repo::are_friends(&pool, &alice, &bob)
        .await
        .expect("are_friends"));
}

#[tokio::test]
async fn send_to_self_is_rejected() {
    let pool = test_pool().await;
    let alice = create_user(&pool, "alice", true).await;

    let err = friend_service::send_friend_request(&pool, &alice, &alice)
        .await
        .expect_err("self request must fail");
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn send_to_unknown_recipient_is_not_found() {
    let pool = test_pool().await;
    let alice = create_user(&pool, "alice", true).await;

    let err = friend_service::send_friend_request(&pool, &alice, "no-such-user")
        .await
        .expect_err("unknown recipient must fail");
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn duplicate_request_conflicts_in_both_directions() {
    let pool = test_pool().await;
    let alice = create_user(&pool, "alice", true).await;
    let bob = create_user(&pool, "bob", true).await;

    friend_service::send_friend_request(&pool, &alice, &bob)
        .await
        .expect("first send");

    let same_direction = friend_service::send_friend_request(&pool, &alice, &bob)
        .await
        .expect_err("repeat must fail");
    assert!(matches!(same_direction, ServiceError::Conflict(_)));

    let reversed = friend_service::send_friend_request(&pool, &bob, &alice)
        .await
        .expect_err("reverse must fail");
    assert!(matches!(reversed, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn pair_key_constraint_blocks_raced_inserts() {
    let pool = test_pool().await;
    let alice = create_user(&pool, "alice", true).await;
    let bob = create_user(&pool, "bob", true).await;

    // Bypass the service-level duplicate check, as two racing sends would.
    let first = Uuid::new_v4().to_string();
    friend_request_repo::insert_pending(
        &pool,
        friend_request_repo::NewFriendRequest {
            id: &first,
            sender_id: &alice,
            recipient_id: &bob,
        },
    )
    .await
    .expect("first insert");

    let second = Uuid::new_v4().to_string();
    let err = friend_request_repo::insert_pending(
        &pool,
        friend_request_repo::NewFriendRequest {
            id: &second,
            sender_id: &bob,
            recipient_id: &alice,
        },
    )
    .await
    .expect_err("reverse insert must hit the unique pair key");
    assert!(lingopal::services::error::is_unique_violation(&err));
}

#[tokio::test]
async fn accept_materializes_friendship_both_ways() {
    let pool = test_pool().await;
    let alice = create_user(&pool, "alice", true).await;
    let bob = create_user(&pool, "bob", true).await;

    let request = friend_service::send_friend_request(&pool, &alice, &bob)
        .await
        .expect("send");
    friend_service::accept_friend_request(&pool, &bob, &request.id)
        .await
        .expect("accept");

    assert!(friendship_repo::are_friends(&pool, &alice, &bob)
        .await
        .expect("a-b"));
    assert!(friendship_repo::are_friends(&pool, &bob, &alice)
        .await
        .expect("b-a"));

    let alice_friends = friend_service::get_my_friends(&pool, &alice)
        .await
        .expect("alice friends");
    assert_eq!(alice_friends.len(), 1);
    assert_eq!(alice_friends[0].id, bob);

    let bob_friends = friend_service::get_my_friends(&pool, &bob)
        .await
        .expect("bob friends");
    assert_eq!(bob_friends.len(), 1);
    assert_eq!(bob_friends[0].id, alice);

    // The sender sees the acceptance, the recipient's inbox is resolved.
    let alice_view = friend_service::get_friend_requests(&pool, &alice)
        .await
        .expect("alice requests");
    assert_eq!(alice_view.accepted_requests.len(), 1);
    assert_eq!(alice_view.accepted_requests[0].id, request.id);
    assert_eq!(
        alice_view.accepted_requests[0].status,
        RequestStatus::Accepted
    );

    let bob_view = friend_service::get_friend_requests(&pool, &bob)
        .await
        .expect("bob requests");
    assert!(bob_view.incoming_reqs.is_empty());
}

#[tokio::test]
async fn accept_by_non_recipient_is_forbidden() {
    let pool = test_pool().await;
    let alice = create_user(&pool, "alice", true).await;
    let bob = create_user(&pool, "bob", true).await;
    let carol = create_user(&pool, "carol", true).await;

    let request = friend_service::send_friend_request(&pool, &alice, &bob)
        .await
        .expect("send");

    for actor in [&alice, &carol] {
        let err = friend_service::accept_friend_request(&pool, actor, &request.id)
            .await
            .expect_err("only the recipient may accept");
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    // The request is untouched and no friendship exists.
    let row = friend_request_repo::find_by_id(&pool, &request.id)
        .await
        .expect("lookup")
        .expect("row");
    assert_eq!(row.status, RequestStatus::Pending);
    assert!(!friendship_repo::are_friends(&pool, &alice, &bob)
        .await
        .expect("are_friends"));
}

#[tokio::test]
async fn accept_twice_conflicts() {
    let pool = test_pool().await;
    let alice = create_user(&pool, "alice", true).await;
    let bob = create_user(&pool, "bob", true).await;

    let request = friend_service::send_friend_request(&pool, &alice, &bob)
        .await
        .expect("send");
    friend_service::accept_friend_request(&pool, &bob, &request.id)
        .await
        .expect("first accept");

    let err = friend_service::accept_friend_request(&pool, &bob, &request.id)
        .await
        .expect_err("second accept must fail");
    assert!(matches!(err, ServiceError::Conflict(_)));

    // Still exactly one friend on each side.
    let friends = friend_service::get_my_friends(&pool, &bob)
        .await
        .expect("friends");
    assert_eq!(friends.len(), 1);
}

#[tokio::test]
async fn accept_unknown_request_is_not_found() {
    let pool = test_pool().await;
    let alice = create_user(&pool, "alice", true).await;

    let err = friend_service::accept_friend_request(&pool, &alice, "no-such-request")
        .await
        .expect_err("unknown request must fail");
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn send_between_friends_conflicts() {
    let pool = test_pool().await;
    let alice = create_user(&pool, "alice", true).await;
    let bob = create_user(&pool, "bob", true).await;

    let request = friend_service::send_friend_request(&pool, &alice, &bob)
        .await
        .expect("send");
    friend_service::accept_friend_request(&pool, &bob, &request.id)
        .await
        .expect("accept");

    for (from, to) in [(&alice, &bob), (&bob, &alice)] {
        let err = friend_service::send_friend_request(&pool, from, to)
            .await
            .expect_err("friends must not re-request");
        assert!(matches!(err, ServiceError::Conflict(_)));
    }
}

#[tokio::test]
async fn recommendations_exclude_self_friends_and_request_history() {
    let pool = test_pool().await;
    let alice = create_user(&pool, "alice", true).await;
    let bob = create_user(&pool, "bob", true).await;
    let carol = create_user(&pool, "carol", true).await;
    let dave = create_user(&pool, "dave", true).await;
    let eve = create_user(&pool, "eve", false).await;

    // alice-bob: accepted friendship; alice->carol: still pending.
    let request = friend_service::send_friend_request(&pool, &alice, &bob)
        .await
        .expect("send to bob");
    friend_service::accept_friend_request(&pool, &bob, &request.id)
        .await
        .expect("accept");
    friend_service::send_friend_request(&pool, &alice, &carol)
        .await
        .expect("send to carol");

    let recommended = recommendation_service::get_recommended_users(&pool, &alice)
        .await
        .expect("recommendations");
    let ids: Vec<&str> = recommended.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec![dave.as_str()]);

    // carol received a request from alice: excluded for her as well.
    let for_carol = recommendation_service::get_recommended_users(&pool, &carol)
        .await
        .expect("recommendations for carol");
    let ids: Vec<&str> = for_carol.iter().map(|u| u.id.as_str()).collect();
    assert!(!ids.contains(&alice.as_str()));
    assert!(ids.contains(&bob.as_str()));
    assert!(ids.contains(&dave.as_str()));

    // eve never onboarded, so she shows up for nobody.
    for user in [&alice, &bob, &carol, &dave] {
        let recs = recommendation_service::get_recommended_users(&pool, user)
            .await
            .expect("recommendations");
        assert!(recs.iter().all(|u| u.id != eve));
    }
}
