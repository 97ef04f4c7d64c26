//! Integration tests for the invitation repository.

use orgst_db::models::user::CreateUser;
use orgst_db::repositories::{InvitationRepo, RoleRepo, UserRepo};
use sqlx::PgPool;

async fn create_inviter(pool: &PgPool) -> i64 {
    let input = CreateUser {
        email: "founder@test.com".to_string(),
        display_name: "Founder".to_string(),
        password_hash: "$argon2id$fake".to_string(),
    };
    UserRepo::create(pool, &input).await.unwrap().id
}

/// Creating an invitation persists the role links; the pending lookup sees
/// it until it is accepted.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invitation_lifecycle(pool: PgPool) {
    let inviter = create_inviter(&pool).await;
    let roles = RoleRepo::find_by_keys(&pool, &["mentor".to_string(), "member".to_string()])
        .await
        .unwrap();
    let role_ids: Vec<i64> = roles.iter().map(|r| r.id).collect();

    let invitation = InvitationRepo::create(
        &pool,
        "new@test.com",
        "hash-abc",
        inviter,
        &role_ids,
        7,
    )
    .await
    .unwrap();
    assert_eq!(invitation.status, "pending");

    let keys = InvitationRepo::role_keys(&pool, invitation.id).await.unwrap();
    assert_eq!(keys, vec!["member".to_string(), "mentor".to_string()]);

    let found = InvitationRepo::find_pending_by_token_hash(&pool, "hash-abc")
        .await
        .unwrap();
    assert!(found.is_some());

    let user = InvitationRepo::accept(
        &pool,
        invitation.id,
        &CreateUser {
            email: "new@test.com".to_string(),
            display_name: "New Member".to_string(),
            password_hash: "$argon2id$fake2".to_string(),
        },
    )
    .await
    .unwrap();

    // Roles from the invitation are granted to the new user.
    let user_keys = RoleRepo::keys_for_user(&pool, user.id).await.unwrap();
    assert_eq!(user_keys, vec!["member".to_string(), "mentor".to_string()]);

    // The token no longer validates once accepted.
    let found = InvitationRepo::find_pending_by_token_hash(&pool, "hash-abc")
        .await
        .unwrap();
    assert!(found.is_none());
}

/// A second accept of the same invitation fails and leaves no second user.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_double_accept_rejected(pool: PgPool) {
    let inviter = create_inviter(&pool).await;
    let invitation = InvitationRepo::create(&pool, "dup@test.com", "hash-dup", inviter, &[], 7)
        .await
        .unwrap();

    let first = InvitationRepo::accept(
        &pool,
        invitation.id,
        &CreateUser {
            email: "dup@test.com".to_string(),
            display_name: "First".to_string(),
            password_hash: "h1".to_string(),
        },
    )
    .await;
    assert!(first.is_ok());

    let second = InvitationRepo::accept(
        &pool,
        invitation.id,
        &CreateUser {
            email: "dup2@test.com".to_string(),
            display_name: "Second".to_string(),
            password_hash: "h2".to_string(),
        },
    )
    .await;
    assert!(second.is_err(), "accepted invitation must not accept again");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email LIKE 'dup%'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1, "losing accept must roll back its user row");
}

/// An expired invitation is invisible to the pending lookup.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_invitation_not_pending(pool: PgPool) {
    let inviter = create_inviter(&pool).await;
    let invitation =
        InvitationRepo::create(&pool, "late@test.com", "hash-late", inviter, &[], 7)
            .await
            .unwrap();

    sqlx::query("UPDATE invitations SET expires_at = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(invitation.id)
        .execute(&pool)
        .await
        .unwrap();

    let found = InvitationRepo::find_pending_by_token_hash(&pool, "hash-late")
        .await
        .unwrap();
    assert!(found.is_none());
}
