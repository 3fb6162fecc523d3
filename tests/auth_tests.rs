mod common;

use uuid::Uuid;

use amenity_backend::auth::jwt::JwtService;
use amenity_backend::auth::password::hash_password;
use amenity_backend::entities::user::{LoginUser, NewUser};
use amenity_backend::errors::{AppError, AuthError};
use amenity_backend::use_cases::auth::AuthHandler;

use common::{test_config, user_fixture, MockUserRepo};

fn new_user(password: &str) -> NewUser {
    NewUser {
        firstname: "Ada".to_string(),
        lastname: "Lovelace".to_string(),
        username: "ada".to_string(),
        email: "ada@example.com".to_string(),
        password: password.to_string(),
        profile: None,
        is_owner: true,
    }
}

#[tokio::test]
async fn register_hashes_the_password_and_creates_the_user() {
    let user_id = Uuid::new_v4();

    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_create_user()
        .withf(|insert| {
            insert.email == "ada@example.com"
                && insert.password_hash.starts_with("$argon2")
                && insert.is_owner
                && !insert.verified
        })
        .times(1)
        .returning(move |_| Ok(user_id));

    let handler = AuthHandler::new(user_repo, JwtService::new(&test_config()));

    let response = handler.register(new_user("tr4vel&Lodging!9")).await.unwrap();
    assert_eq!(response.id, user_id);
}

#[tokio::test]
async fn register_rejects_a_weak_password() {
    // The repository must never be reached.
    let handler = AuthHandler::new(MockUserRepo::new(), JwtService::new(&test_config()));

    let err = handler.register(new_user("password1!A")).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn register_rejects_a_bad_profile_url() {
    let handler = AuthHandler::new(MockUserRepo::new(), JwtService::new(&test_config()));

    let mut request = new_user("tr4vel&Lodging!9");
    request.profile = Some("ftp://example.com/me.png".to_string());

    let err = handler.register(request).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn login_issues_tokens_for_valid_credentials() {
    let user_id = Uuid::new_v4();
    let password = "tr4vel&Lodging!9";
    let hash = hash_password(password).unwrap();

    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_get_user_by_email()
        .withf(|email| email == "ada@example.com")
        .returning(move |_| Ok(Some(user_fixture(user_id, &hash))));

    let jwt = JwtService::new(&test_config());
    let handler = AuthHandler::new(user_repo, jwt.clone());

    let response = handler
        .login(LoginUser {
            email: "ada@example.com".to_string(),
            password: password.to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.token_type, "Bearer");
    let claims = jwt.decode_jwt(&response.access_token).unwrap().claims;
    assert_eq!(claims.sub, user_id.to_string());
    assert!(claims.owner);
}

#[tokio::test]
async fn login_rejects_a_wrong_password() {
    let hash = hash_password("tr4vel&Lodging!9").unwrap();

    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_get_user_by_email()
        .returning(move |_| Ok(Some(user_fixture(Uuid::new_v4(), &hash))));

    let handler = AuthHandler::new(user_repo, JwtService::new(&test_config()));

    let err = handler
        .login(LoginUser {
            email: "ada@example.com".to_string(),
            password: "wrong-password-0!".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::WrongCredentials));
}

#[tokio::test]
async fn login_rejects_an_unknown_email() {
    let mut user_repo = MockUserRepo::new();
    user_repo.expect_get_user_by_email().returning(|_| Ok(None));

    let handler = AuthHandler::new(user_repo, JwtService::new(&test_config()));

    let err = handler
        .login(LoginUser {
            email: "nobody@example.com".to_string(),
            password: "whatever1!".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::WrongCredentials));
}

#[tokio::test]
async fn refresh_token_issues_a_new_pair() {
    let user_id = Uuid::new_v4();
    let hash = hash_password("tr4vel&Lodging!9").unwrap();

    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_get_user_by_id()
        .withf(move |id| *id == user_id)
        .returning(move |id| Ok(Some(user_fixture(*id, &hash))));

    let jwt = JwtService::new(&test_config());
    let refresh = jwt.create_refresh_jwt(&user_id).unwrap();

    let handler = AuthHandler::new(user_repo, jwt);

    let response = handler.refresh_token(&refresh).await.unwrap();
    assert!(!response.access_token.is_empty());
    assert!(!response.refresh_token.is_empty());
}

#[tokio::test]
async fn refresh_rejects_a_garbage_token() {
    let handler = AuthHandler::new(MockUserRepo::new(), JwtService::new(&test_config()));

    let err = handler.refresh_token("not-a-token").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken));
}
