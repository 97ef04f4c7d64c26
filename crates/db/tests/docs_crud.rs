//! Integration tests for the documents subsystem repositories.
//!
//! Exercises the repository layer against a real database:
//! - Atomic creation of document + initial version
//! - Deterministic slug collision probing
//! - Serialized version appends (no duplicate version numbers)
//! - Tag trimming/idempotency and case-insensitive tag filtering

use assert_matches::assert_matches;
use orgst_db::models::document::{CreateDocument, DocumentFilters};
use orgst_db::models::user::CreateUser;
use orgst_db::repositories::{DocumentRepo, DocumentVersionRepo, ProjectRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_test_user(pool: &PgPool, email: &str) -> i64 {
    let input = CreateUser {
        email: email.to_string(),
        display_name: "Test User".to_string(),
        password_hash: "$argon2id$fake".to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
        .id
}

fn new_doc(title: &str) -> CreateDocument {
    CreateDocument {
        title: title.to_string(),
        body_md: "# Body".to_string(),
        summary: None,
        visibility: None,
        tags: vec![],
        project_id: None,
    }
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Creating a document also creates exactly one version, numbered 1.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_document_with_initial_version(pool: PgPool) {
    let user_id = create_test_user(&pool, "author@test.com").await;

    let doc = DocumentRepo::create(&pool, &new_doc("Getting Started"), user_id)
        .await
        .expect("create should succeed");

    assert_eq!(doc.title, "Getting Started");
    assert_eq!(doc.slug, "getting-started");
    assert_eq!(doc.visibility, "community");
    assert_eq!(doc.created_by, user_id);

    let versions = DocumentVersionRepo::list_by_document(&pool, doc.id)
        .await
        .expect("listing versions should succeed");
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].version_number, 1);
    assert_eq!(versions[0].authored_by, user_id);
}

/// A failed creation leaves no partial state behind.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rolls_back_on_failure(pool: PgPool) {
    let user_id = create_test_user(&pool, "author@test.com").await;

    let mut input = new_doc("Broken");
    input.project_id = Some(999_999); // FK violation after document insert

    let result = DocumentRepo::create(&pool, &input, user_id).await;
    assert!(result.is_err());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "failed create must not leave a document row");

    let versions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM document_versions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(versions, 0, "failed create must not leave a version row");
}

// ---------------------------------------------------------------------------
// Slug allocation
// ---------------------------------------------------------------------------

/// Repeated titles probe base, base-2, base-3, ...
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_slug_collision_sequence(pool: PgPool) {
    let user_id = create_test_user(&pool, "author@test.com").await;

    let first = DocumentRepo::create(&pool, &new_doc("Hello World"), user_id)
        .await
        .unwrap();
    let second = DocumentRepo::create(&pool, &new_doc("Hello World"), user_id)
        .await
        .unwrap();
    let third = DocumentRepo::create(&pool, &new_doc("Hello World!"), user_id)
        .await
        .unwrap();

    assert_eq!(first.slug, "hello-world");
    assert_eq!(second.slug, "hello-world-2");
    assert_eq!(third.slug, "hello-world-3");
}

/// A title with no usable characters falls back to the default token.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_slug_fallback(pool: PgPool) {
    let user_id = create_test_user(&pool, "author@test.com").await;

    let doc = DocumentRepo::create(&pool, &new_doc("???"), user_id)
        .await
        .unwrap();
    assert_eq!(doc.slug, "doc");

    let again = DocumentRepo::create(&pool, &new_doc("!!!"), user_id)
        .await
        .unwrap();
    assert_eq!(again.slug, "doc-2");
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Tag names are trimmed, blanks dropped, and stored case-sensitively, so
/// "Rust" and "rust" are distinct while " Go " collapses into "Go".
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tag_trimming_and_case_sensitivity(pool: PgPool) {
    let user_id = create_test_user(&pool, "author@test.com").await;

    let mut input = new_doc("Tagged");
    input.tags = vec![
        "Rust".to_string(),
        "rust".to_string(),
        " Go ".to_string(),
        "Go".to_string(),
        "".to_string(),
        "   ".to_string(),
    ];
    let doc = DocumentRepo::create(&pool, &input, user_id).await.unwrap();

    let rows = DocumentRepo::tags_for_documents(&pool, &[doc.id])
        .await
        .unwrap();
    let mut names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Go", "Rust", "rust"]);
}

/// The same tag name on two documents resolves to one tag row.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tag_get_or_create_is_idempotent(pool: PgPool) {
    let user_id = create_test_user(&pool, "author@test.com").await;

    let mut a = new_doc("First");
    a.tags = vec!["shared".to_string()];
    let mut b = new_doc("Second");
    b.tags = vec!["shared".to_string()];

    let doc_a = DocumentRepo::create(&pool, &a, user_id).await.unwrap();
    let doc_b = DocumentRepo::create(&pool, &b, user_id).await.unwrap();

    let rows = DocumentRepo::tags_for_documents(&pool, &[doc_a.id, doc_b.id])
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, rows[1].id, "both documents share one tag row");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

// ---------------------------------------------------------------------------
// Version appends
// ---------------------------------------------------------------------------

/// Appends produce a contiguous 1..N sequence, listed newest first.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_version_sequence(pool: PgPool) {
    let user_id = create_test_user(&pool, "author@test.com").await;
    let doc = DocumentRepo::create(&pool, &new_doc("Versioned"), user_id)
        .await
        .unwrap();

    let v2 = DocumentRepo::add_version(&pool, doc.id, "second", user_id)
        .await
        .unwrap();
    let v3 = DocumentRepo::add_version(&pool, doc.id, "third", user_id)
        .await
        .unwrap();
    assert_eq!(v2.version_number, 2);
    assert_eq!(v3.version_number, 3);

    let versions = DocumentVersionRepo::list_by_document(&pool, doc.id)
        .await
        .unwrap();
    let numbers: Vec<i32> = versions.iter().map(|v| v.version_number).collect();
    assert_eq!(numbers, vec![3, 2, 1]);
}

/// Two concurrent appends must never collide on a version number.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_appends_do_not_collide(pool: PgPool) {
    let user_id = create_test_user(&pool, "author@test.com").await;
    let doc = DocumentRepo::create(&pool, &new_doc("Contended"), user_id)
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        DocumentRepo::add_version(&pool, doc.id, "from a", user_id),
        DocumentRepo::add_version(&pool, doc.id, "from b", user_id),
    );
    let a = a.expect("first append should succeed");
    let b = b.expect("second append should succeed");

    let mut numbers = vec![a.version_number, b.version_number];
    numbers.sort();
    assert_eq!(numbers, vec![2, 3], "appends must serialize, never {{2,2}}");
}

/// Appending to a missing document reports not-found.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_version_unknown_document(pool: PgPool) {
    let user_id = create_test_user(&pool, "author@test.com").await;
    let result = DocumentRepo::add_version(&pool, 424242, "body", user_id).await;
    assert_matches!(result, Err(sqlx::Error::RowNotFound));
}

// ---------------------------------------------------------------------------
// Listing and filters
// ---------------------------------------------------------------------------

/// Filters AND together; ordering is creation-time descending.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters(pool: PgPool) {
    let user_id = create_test_user(&pool, "author@test.com").await;
    let project = ProjectRepo::create(
        &pool,
        &orgst_db::models::project::CreateProject {
            name: "Orgst".to_string(),
            description: None,
        },
        user_id,
    )
    .await
    .unwrap();

    let mut rust_doc = new_doc("Rust Handbook");
    rust_doc.summary = Some("Systems programming notes".to_string());
    rust_doc.tags = vec!["Go".to_string()];
    let rust_doc = DocumentRepo::create(&pool, &rust_doc, user_id).await.unwrap();

    let mut go_doc = new_doc("Another Guide");
    go_doc.tags = vec!["go".to_string()];
    go_doc.project_id = Some(project.id);
    let go_doc = DocumentRepo::create(&pool, &go_doc, user_id).await.unwrap();

    // Text filter matches title or summary, case-insensitively.
    let filters = DocumentFilters {
        text: Some("rust".to_string()),
        ..Default::default()
    };
    let docs = DocumentRepo::list(&pool, &filters).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, rust_doc.id);

    let filters = DocumentFilters {
        text: Some("SYSTEMS".to_string()),
        ..Default::default()
    };
    assert_eq!(DocumentRepo::list(&pool, &filters).await.unwrap().len(), 1);

    // Tag filter is case-insensitive even though storage is case-sensitive:
    // documents tagged "Go" and "go" both match tag=go.
    let filters = DocumentFilters {
        tag: Some("go".to_string()),
        ..Default::default()
    };
    let docs = DocumentRepo::list(&pool, &filters).await.unwrap();
    assert_eq!(docs.len(), 2);

    // Project filter restricts to exact association.
    let filters = DocumentFilters {
        project_id: Some(project.id),
        ..Default::default()
    };
    let docs = DocumentRepo::list(&pool, &filters).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, go_doc.id);

    // No filters: everything, newest first.
    let docs = DocumentRepo::list(&pool, &DocumentFilters::default())
        .await
        .unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].id, go_doc.id, "newest document comes first");
}

/// LIKE metacharacters in the text filter match literally instead of
/// acting as wildcards.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_text_filter_metacharacters_match_literally(pool: PgPool) {
    let user_id = create_test_user(&pool, "author@test.com").await;

    let percent_doc = DocumentRepo::create(&pool, &new_doc("100% Complete"), user_id)
        .await
        .unwrap();
    let underscore_doc = DocumentRepo::create(&pool, &new_doc("snake_case notes"), user_id)
        .await
        .unwrap();
    // Would match "snake_case" via a `_` wildcard if the input were not
    // escaped.
    DocumentRepo::create(&pool, &new_doc("snakeXcase notes"), user_id)
        .await
        .unwrap();
    DocumentRepo::create(&pool, &new_doc("Plain Title"), user_id)
        .await
        .unwrap();

    // A bare "%" would match every row as a wildcard.
    let filters = DocumentFilters {
        text: Some("%".to_string()),
        ..Default::default()
    };
    let docs = DocumentRepo::list(&pool, &filters).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, percent_doc.id);

    // "_" would match any single character as a wildcard.
    let filters = DocumentFilters {
        text: Some("snake_case".to_string()),
        ..Default::default()
    };
    let docs = DocumentRepo::list(&pool, &filters).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, underscore_doc.id);

    // A backslash in the input is itself literal.
    let filters = DocumentFilters {
        text: Some("\\".to_string()),
        ..Default::default()
    };
    assert!(DocumentRepo::list(&pool, &filters).await.unwrap().is_empty());
}
