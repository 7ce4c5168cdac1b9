//! Behaviour every store backend must share

use pretty_assertions::assert_eq;
use skills_model::{FieldDefinition, FieldType, RatingGap, ResponseUpdate, ValidationError};
use skills_store::{
    validate_manager_review, JsonFileStore, MemoryStore, ResponseStore, SchemaStore, StoreError,
};
use skills_test_utils::{create_intake_with_ratings, create_review, skill_ratings};
use tempfile::TempDir;

async fn exercise<S: ResponseStore + SchemaStore>(store: &S) {
    let a = store
        .create_response(create_intake_with_ratings("Ana", &[("Python", 4), ("SQL", 2)]))
        .await
        .unwrap();
    let b = store
        .create_response(create_intake_with_ratings("Bo", &[("Go", 3)]))
        .await
        .unwrap();

    let listed: Vec<_> = store
        .list_responses()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(listed, vec![a, b]);

    let response = store.get_response(a).await.unwrap().unwrap();
    let review = create_review(&response, &[("Python", 5)]);
    let saved = store.save_manager_review(a, review.clone()).await.unwrap();
    assert_eq!(saved.review(), review);

    let conflict = store
        .save_manager_review(b, create_review(&response, &[("Python", 5)]))
        .await
        .unwrap_err();
    assert!(matches!(conflict, StoreError::Conflict { .. }));

    let updated = store
        .update_response(
            b,
            ResponseUpdate {
                additional_skills: Some("Terraform".to_string()),
                ..ResponseUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.additional_skills.as_deref(), Some("Terraform"));

    let bad = store
        .update_response(
            b,
            ResponseUpdate {
                email: Some(String::new()),
                ..ResponseUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        bad,
        StoreError::Validation(ValidationError::missing("email"))
    );

    store.delete_response(b).await.unwrap();
    assert_eq!(store.delete_response(b).await, Err(StoreError::NotFound(b)));
    assert_eq!(store.list_responses().await.unwrap().len(), 1);

    assert_eq!(store.get_schema().await.unwrap(), None);
    let schema = store
        .create_schema(vec![
            FieldDefinition::new("team", "Team", FieldType::SingleSelect)
                .with_options(["Platform", "Data"])
                .required(),
        ])
        .await
        .unwrap();
    assert_eq!(store.get_schema().await.unwrap(), Some(schema));

    let invalid = store
        .update_schema(vec![FieldDefinition::new("team", "Team", FieldType::MultiSelect)])
        .await
        .unwrap_err();
    assert!(invalid.is_validation());
}

async fn reviewed_response_follows_self_rating_changes<S: ResponseStore>(store: &S) {
    let id = store
        .create_response(create_intake_with_ratings("Ana", &[("Python", 4), ("SQL", 2)]))
        .await
        .unwrap();
    let response = store.get_response(id).await.unwrap().unwrap();
    store
        .save_manager_review(id, create_review(&response, &[("Python", 5), ("SQL", 3)]))
        .await
        .unwrap();

    let updated = store
        .update_response(
            id,
            ResponseUpdate {
                selected_skills: Some(vec!["Python".to_string()]),
                skill_ratings: Some(skill_ratings(&[("Python", 2)])),
                ..ResponseUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.manager_ratings, skill_ratings(&[("Python", 5)]));
    assert_eq!(
        updated.rating_gaps,
        vec![RatingGap {
            skill: "Python".to_string(),
            gap: 3,
        }]
    );
    assert_eq!(validate_manager_review(&updated, &updated.review()), Ok(()));

    let resaved = store
        .save_manager_review(id, updated.review())
        .await
        .unwrap();
    assert_eq!(resaved, updated);
}

#[tokio::test]
async fn memory_store_contract() {
    exercise(&MemoryStore::new()).await;
}

#[tokio::test]
async fn json_file_store_contract() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::open(dir.path().join("responses.json"))
        .await
        .unwrap();
    exercise(&store).await;
}

#[tokio::test]
async fn memory_store_rederives_gaps_on_update() {
    reviewed_response_follows_self_rating_changes(&MemoryStore::new()).await;
}

#[tokio::test]
async fn json_file_store_rederives_gaps_on_update() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::open(dir.path().join("responses.json"))
        .await
        .unwrap();
    reviewed_response_follows_self_rating_changes(&store).await;
}
