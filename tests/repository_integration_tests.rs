use eduhub::{
    models::{CourseChanges, NewCourse, NewFile, NewUser, PublishedStatus},
    repository::{MemoryRepository, PostgresRepository, Repository, RepositoryError},
};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

// --- Shared Scenarios ---
//
// Each scenario runs against any `Repository`, so the in-memory store and Postgres are
// held to the same contract.

fn new_user(username: &str, email: &str, role_id: Uuid) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        provider: "local".to_string(),
        confirmed: true,
        role_id,
    }
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

async fn assert_user_uniqueness(repo: &dyn Repository) {
    let role = repo.find_role_by_name("Student").await.unwrap().unwrap();
    let name = unique("user");
    let email = format!("{name}@eduhub.test");

    let created = repo.create_user(new_user(&name, &email, role.id)).await.unwrap();
    assert_eq!(created.role.map(|r| r.name).as_deref(), Some("Student"));

    let dup_email = repo
        .create_user(new_user(&unique("other"), &email, role.id))
        .await;
    assert!(matches!(dup_email, Err(RepositoryError::Conflict(m)) if m == "Email already taken"));

    let dup_name = repo
        .create_user(new_user(&name, &format!("{}@eduhub.test", unique("x")), role.id))
        .await;
    assert!(matches!(dup_name, Err(RepositoryError::Conflict(m)) if m == "Username already taken"));

    // Both collide: every store reports the email.
    let dup_both = repo.create_user(new_user(&name, &email, role.id)).await;
    assert!(matches!(dup_both, Err(RepositoryError::Conflict(m)) if m == "Email already taken"));

    let by_username = repo.find_user_by_identifier(&name).await.unwrap().unwrap();
    let by_email = repo.find_user_by_identifier(&email).await.unwrap().unwrap();
    assert_eq!(by_username.id, created.id);
    assert_eq!(by_email.id, created.id);
    assert_eq!(by_email.password_hash, "hash");
}

async fn assert_course_lifecycle(repo: &dyn Repository) {
    let role = repo.find_role_by_name("Instructor").await.unwrap().unwrap();
    let name = unique("tutor");
    let instructor = repo
        .create_user(new_user(&name, &format!("{name}@eduhub.test"), role.id))
        .await
        .unwrap();
    let category = repo.find_category_by_name("Design").await.unwrap().unwrap();
    let file = repo
        .create_file(NewFile {
            name: unique("cover"),
            key: format!("uploads/{}.png", Uuid::new_v4()),
            mime: "image/png".to_string(),
        })
        .await
        .unwrap();

    let course = repo
        .create_course(NewCourse {
            title: "Colour Theory".to_string(),
            description: "Hue, value, chroma".to_string(),
            price: 25,
            published_status: PublishedStatus::Draft,
            thumbnail_id: Some(file.id),
            category_id: Some(category.id),
            instructor_id: instructor.id,
        })
        .await
        .unwrap();
    assert_eq!(course.category.as_ref().map(|c| c.id), Some(category.id));
    assert_eq!(course.thumbnail.as_ref().map(|f| f.id), Some(file.id));
    assert_eq!(course.instructor.as_ref().map(|u| u.id), Some(instructor.id));

    let mine = repo.list_courses_by_instructor(instructor.id).await.unwrap();
    assert_eq!(mine.len(), 1);

    let updated = repo
        .update_course(
            course.id,
            CourseChanges {
                price: Some(30),
                published_status: Some(PublishedStatus::Published),
                thumbnail_id: Some(None),
                ..CourseChanges::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.price, 30);
    assert_eq!(updated.published_status, PublishedStatus::Published);
    assert!(updated.thumbnail.is_none());
    assert_eq!(updated.category.map(|c| c.id), Some(category.id));
    assert_eq!(updated.title, "Colour Theory");

    let deleted = repo.delete_course(course.id).await.unwrap();
    assert_eq!(deleted.map(|c| c.id), Some(course.id));
    assert!(repo.get_course(course.id).await.unwrap().is_none());
    assert!(repo.delete_course(course.id).await.unwrap().is_none());
}

async fn assert_missing_relation_rejected(repo: &dyn Repository) {
    let result = repo
        .create_course(NewCourse {
            title: "Orphan".to_string(),
            description: "No instructor".to_string(),
            price: 0,
            published_status: PublishedStatus::Draft,
            thumbnail_id: None,
            category_id: None,
            instructor_id: Uuid::new_v4(),
        })
        .await;
    assert!(matches!(result, Err(RepositoryError::MissingRelation)));
}

// --- In-Memory Store ---

#[tokio::test]
async fn test_memory_user_uniqueness() {
    assert_user_uniqueness(&MemoryRepository::seeded()).await;
}

#[tokio::test]
async fn test_memory_course_lifecycle() {
    assert_course_lifecycle(&MemoryRepository::seeded()).await;
}

#[tokio::test]
async fn test_memory_missing_relation() {
    assert_missing_relation_rejected(&MemoryRepository::seeded()).await;
}

#[tokio::test]
async fn test_memory_seeded_reference_data() {
    let repo = MemoryRepository::seeded();
    for role in ["Authenticated", "Public", "Instructor", "Student"] {
        assert!(repo.find_role_by_name(role).await.unwrap().is_some());
    }
    assert!(repo.find_role_by_name("instructor").await.unwrap().is_none());
    assert_eq!(repo.list_categories().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_memory_custom_reference_data() {
    let repo = MemoryRepository::new();
    assert!(repo.find_role_by_name("Student").await.unwrap().is_none());

    let role = repo.insert_role("Mentor").await;
    let category = repo.insert_category("Music").await;

    assert_eq!(repo.get_role(role.id).await.unwrap(), Some(role));
    assert_eq!(repo.find_category_by_name("Music").await.unwrap(), Some(category));
}

#[tokio::test]
async fn test_memory_latest_file_wins_for_shared_name() {
    let repo = MemoryRepository::new();
    for key in ["uploads/old.png", "uploads/new.png"] {
        repo.create_file(NewFile {
            name: "cover.png".to_string(),
            key: key.to_string(),
            mime: "image/png".to_string(),
        })
        .await
        .unwrap();
    }

    let found = repo.find_file_by_name("cover.png").await.unwrap().unwrap();
    assert_eq!(found.key, "uploads/new.png");
}

// --- Postgres ---
//
// Run with `DATABASE_URL` pointing at a disposable database:
// cargo test --test repository_integration_tests -- --ignored

async fn postgres() -> PostgresRepository {
    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&db_url)
        .await
        .expect("Failed to connect to database for integration tests.");
    let repo = PostgresRepository::new(pool);
    repo.migrate().await.expect("Failed to run database migrations.");
    repo
}

#[tokio::test]
#[ignore = "requires Postgres via DATABASE_URL"]
async fn test_postgres_user_uniqueness() {
    assert_user_uniqueness(&postgres().await).await;
}

#[tokio::test]
#[ignore = "requires Postgres via DATABASE_URL"]
async fn test_postgres_course_lifecycle() {
    assert_course_lifecycle(&postgres().await).await;
}

#[tokio::test]
#[ignore = "requires Postgres via DATABASE_URL"]
async fn test_postgres_missing_relation() {
    assert_missing_relation_rejected(&postgres().await).await;
}
