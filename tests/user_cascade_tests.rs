mod common;

use mockall::Sequence;
use uuid::Uuid;

use amenity_backend::entities::user::UpdateUserRequest;
use amenity_backend::errors::AppError;
use amenity_backend::use_cases::user::UserHandler;

use common::{amenity_fixture, media_fixture, user_fixture, MockAmenityRepo, MockStore, MockUserRepo};

#[tokio::test]
async fn deleting_another_user_is_forbidden() {
    // No expectations anywhere: a read or write would panic the test.
    let handler = UserHandler::new(MockUserRepo::new(), MockAmenityRepo::new(), MockStore::new());

    let err = handler
        .delete_user(&Uuid::new_v4(), &Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ForbiddenAccess));
}

#[tokio::test]
async fn deleting_an_unknown_user_is_not_found() {
    let mut user_repo = MockUserRepo::new();
    user_repo.expect_user_exists().returning(|_| Ok(false));

    let handler = UserHandler::new(user_repo, MockAmenityRepo::new(), MockStore::new());

    let user_id = Uuid::new_v4();
    let err = handler.delete_user(&user_id, &user_id).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn user_deletion_cascades_to_amenities_and_their_media() {
    let user_id = Uuid::new_v4();
    let amenity = amenity_fixture(Uuid::new_v4(), user_id);
    let amenity_id = amenity.id;
    let media = vec![
        media_fixture(amenity_id, "one.png"),
        media_fixture(amenity_id, "two.png"),
    ];

    let mut seq = Sequence::new();
    let mut user_repo = MockUserRepo::new();
    let mut amenity_repo = MockAmenityRepo::new();
    let mut store = MockStore::new();

    user_repo
        .expect_user_exists()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(true));
    amenity_repo
        .expect_list_amenities_by_owner()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(vec![amenity.clone()]));
    amenity_repo
        .expect_list_media()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(media.clone()));
    store
        .expect_delete()
        .times(2)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    amenity_repo
        .expect_delete_amenity()
        .withf(move |id| *id == amenity_id)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    user_repo
        .expect_delete_user_with_reviews()
        .withf(move |id| *id == user_id)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let handler = UserHandler::new(user_repo, amenity_repo, store);

    handler.delete_user(&user_id, &user_id).await.unwrap();
}

#[tokio::test]
async fn profile_update_hashes_a_new_password() {
    let user_id = Uuid::new_v4();

    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_update_user()
        .withf(|_, changes, password_hash| {
            changes.firstname.is_none()
                && changes.password.as_deref() == Some("tr4vel&Lodging!9")
                && password_hash
                    .as_deref()
                    .is_some_and(|h| h.starts_with("$argon2") && h != "tr4vel&Lodging!9")
        })
        .times(1)
        .returning(|id, _, _| Ok(user_fixture(*id, "$argon2id$stored")));

    let handler = UserHandler::new(user_repo, MockAmenityRepo::new(), MockStore::new());

    let request = UpdateUserRequest {
        password: Some("tr4vel&Lodging!9".to_string()),
        ..Default::default()
    };

    let response = handler.update_profile(&user_id, request).await.unwrap();
    assert_eq!(response.id, user_id);
}

#[tokio::test]
async fn profile_update_rejects_a_weak_password() {
    // The repository must never see the request.
    let handler = UserHandler::new(MockUserRepo::new(), MockAmenityRepo::new(), MockStore::new());

    let request = UpdateUserRequest {
        password: Some("password1!A".to_string()),
        ..Default::default()
    };

    let err = handler
        .update_profile(&Uuid::new_v4(), request)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn profile_update_rejects_a_bad_profile_url() {
    let handler = UserHandler::new(MockUserRepo::new(), MockAmenityRepo::new(), MockStore::new());

    let request = UpdateUserRequest {
        profile: Some("not a url".to_string()),
        ..Default::default()
    };

    let err = handler
        .update_profile(&Uuid::new_v4(), request)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn partial_profile_update_passes_only_present_fields() {
    let user_id = Uuid::new_v4();

    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_update_user()
        .withf(|_, changes, password_hash| {
            changes.firstname.as_deref() == Some("Grace")
                && changes.lastname.is_none()
                && changes.email.is_none()
                && password_hash.is_none()
        })
        .times(1)
        .returning(|id, _, _| {
            let mut user = user_fixture(*id, "$argon2id$stored");
            user.firstname = "Grace".to_string();
            Ok(user)
        });

    let handler = UserHandler::new(user_repo, MockAmenityRepo::new(), MockStore::new());

    let request = UpdateUserRequest {
        firstname: Some("Grace".to_string()),
        ..Default::default()
    };

    let response = handler.update_profile(&user_id, request).await.unwrap();
    assert_eq!(response.firstname, "Grace");
}
