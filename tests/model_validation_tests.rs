use eduhub::models::{
    CourseInput, CourseRequest, PublishedStatus, RegisterRequest, Role, User, UserProfile,
};
use serde_json::{Value, json};
use uuid::Uuid;

#[test]
fn test_course_input_distinguishes_absent_from_null() {
    let absent: CourseInput = serde_json::from_value(json!({ "title": "T" })).unwrap();
    assert_eq!(absent.category, None);
    assert_eq!(absent.thumbnail, None);

    let cleared: CourseInput =
        serde_json::from_value(json!({ "category": null, "thumbnail": null })).unwrap();
    assert_eq!(cleared.category, Some(None));
    assert_eq!(cleared.thumbnail, Some(None));

    let named: CourseInput = serde_json::from_value(json!({ "category": "Design" })).unwrap();
    assert_eq!(named.category, Some(Some("Design".to_string())));
}

#[test]
fn test_course_input_keeps_loose_price_and_status() {
    let input: CourseInput = serde_json::from_value(json!({
        "price": "12.50",
        "published_status": 7,
        "instructor": "someone-else"
    }))
    .unwrap();

    assert_eq!(input.price, Some(Some(json!("12.50"))));
    assert_eq!(input.published_status, Some(Some(json!(7))));
}

#[test]
fn test_course_input_keeps_null_price_and_status() {
    let absent: CourseInput = serde_json::from_value(json!({ "title": "T" })).unwrap();
    assert_eq!(absent.price, None);
    assert_eq!(absent.published_status, None);

    let reset: CourseInput =
        serde_json::from_value(json!({ "price": null, "published_status": null })).unwrap();
    assert_eq!(reset.price, Some(None));
    assert_eq!(reset.published_status, Some(None));
}

#[test]
fn test_course_request_without_data() {
    let request: CourseRequest = serde_json::from_value(json!({})).unwrap();
    assert!(request.data.is_none());
}

#[test]
fn test_published_status_whitelist() {
    assert_eq!(
        PublishedStatus::from_input(Some(&json!("published"))),
        PublishedStatus::Published
    );
    assert_eq!(PublishedStatus::from_input(Some(&json!("draft"))), PublishedStatus::Draft);
    assert_eq!(PublishedStatus::from_input(Some(&json!("Published"))), PublishedStatus::Draft);
    assert_eq!(PublishedStatus::from_input(Some(&json!(true))), PublishedStatus::Draft);
    assert_eq!(PublishedStatus::from_input(None), PublishedStatus::Draft);
}

#[test]
fn test_published_status_serializes_lowercase() {
    assert_eq!(serde_json::to_value(PublishedStatus::Published).unwrap(), json!("published"));
}

#[test]
fn test_register_request_tolerates_missing_fields() {
    let request: RegisterRequest =
        serde_json::from_value(json!({ "email": "a@b.c" })).unwrap();
    assert_eq!(request.email.as_deref(), Some("a@b.c"));
    assert!(request.username.is_none());
    assert!(request.password.is_none());
    assert!(request.role.is_none());
}

#[test]
fn test_user_projections_never_carry_password() {
    let role = Role {
        id: Uuid::new_v4(),
        name: "Student".to_string(),
        description: None,
    };
    let user = User {
        id: Uuid::new_v4(),
        username: "zoe".to_string(),
        email: "zoe@eduhub.test".to_string(),
        provider: "local".to_string(),
        confirmed: true,
        role: Some(role),
    };

    let full: Value = serde_json::to_value(&user).unwrap();
    assert!(full.get("password").is_none());
    assert!(full.get("password_hash").is_none());
    assert_eq!(full["role"]["name"], "Student");

    let profile: Value = serde_json::to_value(UserProfile::from(user)).unwrap();
    let mut keys: Vec<_> = profile.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, ["email", "id", "role", "username"]);
}
