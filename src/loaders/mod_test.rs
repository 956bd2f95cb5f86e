use super::*;
use crate::credentials::{CredentialStore, MemoryCredentialStore};
use crate::error::TransportError;
use crate::net::test_helpers::MockTransport;
use crate::session::SessionStore;
use serde_json::json;

// =============================================================================
// Helpers
// =============================================================================

fn loaders(mock: &Arc<MockTransport>, credentials: &Arc<MemoryCredentialStore>) -> PageLoaders {
    let session = Arc::new(SessionBootstrap::new(mock.clone(), credentials.clone(), SessionStore::new()));
    PageLoaders::new(mock.clone(), session)
}

fn preview(id: i32, title: &str) -> serde_json::Value {
    json!({
        "poster": { "uid": 7, "username": "kim" },
        "recipe": { "id": id, "title": title, "description": format!("{title} description") }
    })
}

fn recipe_json(id: i32) -> serde_json::Value {
    json!({
        "id": id,
        "poster": { "uid": 7, "username": "kim", "picture": null },
        "thumbnail_path": null,
        "recipe": { "title": "Soup", "description": "Warm", "ingredients": [], "steps": [] }
    })
}

// =============================================================================
// Public routes
// =============================================================================

#[tokio::test]
async fn recipe_not_found_returns_envelope_verbatim() {
    let mock = Arc::new(MockTransport::new().reply(
        "/recipes/99",
        404,
        json!({ "error": "not_found", "description": "no such recipe" }),
    ));
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::new())).recipe(99).await;

    assert_eq!(page, Fetched::Err(ResponseError::new("not_found", "no such recipe")));
}

#[tokio::test]
async fn recipe_success_wraps_payload() {
    let mock = Arc::new(MockTransport::new().reply("/recipes/12", 200, recipe_json(12)));
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::new())).recipe(12).await;

    let page = page.ok().unwrap();
    assert_eq!(page.recipe.id, 12);
    assert_eq!(page.recipe.recipe.title, "Soup");
}

#[tokio::test]
async fn recipes_listing_preserves_order() {
    let mock = Arc::new(MockTransport::new().reply(
        "/recipes/all?offset=0&limit=10",
        200,
        json!([preview(3, "C"), preview(1, "A"), preview(2, "B")]),
    ));
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::new())).recipes(Pagination::default()).await;

    let ids: Vec<i32> = page.ok().unwrap().recipes.iter().map(|p| p.recipe.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[tokio::test]
async fn recipes_page_serializes_as_recipes_object() {
    let listing = json!([preview(1, "A"), preview(2, "B"), preview(3, "C")]);
    let mock = Arc::new(MockTransport::new().reply("/recipes/all?offset=0&limit=10", 200, listing.clone()));
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::new())).recipes(Pagination::default()).await;

    assert_eq!(serde_json::to_value(&page).unwrap(), json!({ "recipes": listing }));
}

#[tokio::test]
async fn recipes_limit_is_clamped() {
    let mock = Arc::new(MockTransport::new().reply("/recipes/all?offset=20&limit=10", 200, json!([])));
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::new()))
        .recipes(Pagination { offset: 20, limit: 500 })
        .await;

    assert!(page.is_ok());
    assert_eq!(mock.calls()[0].path, "/recipes/all?offset=20&limit=10");
}

#[tokio::test]
async fn non_envelope_error_body_is_synthesized() {
    let mock = Arc::new(MockTransport::new().reply_raw("/recipes/5", 500, "Internal Server Error"));
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::new())).recipe(5).await;

    let err = page.err().unwrap();
    assert_eq!(err.error, UNEXPECTED_RESPONSE);
    assert!(err.description.contains("500"));
}

#[tokio::test]
async fn long_non_envelope_body_is_truncated() {
    let html = format!("<html>{}</html>", "é".repeat(2000));
    let mock = Arc::new(MockTransport::new().reply_raw("/recipes/5", 502, &html));
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::new())).recipe(5).await;

    let err = page.err().unwrap();
    assert_eq!(err.error, UNEXPECTED_RESPONSE);
    assert!(err.description.starts_with("status 502: <html>"));
    assert!(err.description.ends_with("..."));
    assert!(err.description.len() < 300);
}

#[test]
fn excerpt_keeps_short_bodies_whole() {
    assert_eq!(excerpt("  Bad Gateway \n"), "Bad Gateway");
}

#[tokio::test]
async fn transport_failure_becomes_network_envelope() {
    let mock = Arc::new(MockTransport::new().fail("/recipes/5", TransportError::Timeout));
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::new())).recipe(5).await;

    assert_eq!(page.err().map(|e| e.error.as_str()), Some(NETWORK_FAILURE));
}

#[tokio::test]
async fn undecodable_success_body_is_synthesized() {
    let mock = Arc::new(MockTransport::new().reply("/recipes/5", 200, json!({ "id": 5 })));
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::new())).recipe(5).await;

    assert_eq!(page.err().map(|e| e.error.as_str()), Some(UNEXPECTED_RESPONSE));
}

#[tokio::test]
async fn profile_fetches_user_then_recipes() {
    let mock = Arc::new(
        MockTransport::new()
            .reply("/users/7", 200, json!({ "uid": 7, "username": "kim" }))
            .reply("/recipes/by/7", 200, json!([preview(1, "A")])),
    );
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::new())).profile(7).await;

    assert_eq!(page.user.ok().map(|u| u.username), Some("kim".to_owned()));
    assert_eq!(page.recipes.ok().map(|r| r.len()), Some(1));
    let paths: Vec<_> = mock.calls().into_iter().map(|c| c.path).collect();
    assert_eq!(paths, vec!["/users/7", "/recipes/by/7"]);
}

#[tokio::test]
async fn profile_keeps_each_half_independent() {
    let mock = Arc::new(
        MockTransport::new()
            .reply("/users/8", 404, json!({ "error": "No user found", "description": "Couldn't find user with the id: 8" }))
            .reply("/recipes/by/8", 200, json!([])),
    );
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::new())).profile(8).await;

    assert_eq!(page.user.err().map(|e| e.error.as_str()), Some("No user found"));
    assert_eq!(page.recipes, Fetched::Ok(vec![]));
}

// =============================================================================
// Authenticated routes
// =============================================================================

#[tokio::test]
async fn your_recipes_without_credential_redirects_before_request() {
    let mock = Arc::new(MockTransport::new());
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::new())).your_recipes().await;

    assert!(page.is_redirect());
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn your_recipes_uses_verified_uid() {
    let mock = Arc::new(
        MockTransport::new()
            .reply("/account/verify", 200, json!({ "uid": 7, "username": "kim" }))
            .reply("/recipes/by/7", 200, json!([preview(4, "D")])),
    );
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::with_token("abc"))).your_recipes().await;

    let recipes = page.data().unwrap().ok().unwrap().recipes;
    assert_eq!(recipes[0].recipe.id, 4);
}

#[tokio::test]
async fn your_recipes_with_rejected_token_redirects_and_clears() {
    let mock = Arc::new(MockTransport::new().reply("/account/verify", 401, json!({})));
    let credentials = Arc::new(MemoryCredentialStore::with_token("expired"));
    let page = loaders(&mock, &credentials).your_recipes().await;

    assert_eq!(page, PageLoad::Redirect { redirect: HOME.to_owned() });
    assert!(credentials.get().is_none());
}

#[tokio::test]
async fn your_recipes_after_verified_bootstrap_skips_verify() {
    let mock = Arc::new(MockTransport::new().reply("/recipes/by/7", 200, json!([preview(4, "D")])));
    let outcome = BootstrapOutcome {
        navigation: SessionStore::new().begin_navigation(),
        state: BootstrapState::Verified(Profile {
            uid: 7,
            username: "kim".to_owned(),
            bio: None,
            location: None,
            picture: None,
            pronouns: None,
        }),
        applied: true,
    };

    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::with_token("abc"))).your_recipes_after(&outcome).await;

    assert_eq!(page.data().unwrap().ok().unwrap().recipes[0].recipe.id, 4);
    assert_eq!(mock.calls().iter().map(|c| c.path.as_str()).collect::<Vec<_>>(), vec!["/recipes/by/7"]);
}

#[tokio::test]
async fn your_recipes_after_anonymous_bootstrap_redirects_without_request() {
    let mock = Arc::new(MockTransport::new());
    let outcome = BootstrapOutcome {
        navigation: SessionStore::new().begin_navigation(),
        state: BootstrapState::Anonymous(AnonymousReason::Rejected),
        applied: true,
    };

    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::new())).your_recipes_after(&outcome).await;

    assert!(page.is_redirect());
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn edit_without_credential_redirects_before_request() {
    let mock = Arc::new(MockTransport::new());
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::new())).edit_recipe(12).await;

    assert!(page.is_redirect());
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn edit_unauthorized_flag_redirects() {
    let mock = Arc::new(MockTransport::new().reply("/recipes/12/edit", 200, json!({ "authorized": false })));
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::with_token("abc"))).edit_recipe(12).await;

    assert!(page.is_redirect());
    assert_eq!(mock.calls()[0].token.as_deref(), Some("abc"));
}

#[tokio::test]
async fn edit_unauthorized_status_redirects() {
    let mock = Arc::new(MockTransport::new().reply(
        "/recipes/12/edit",
        401,
        json!({ "error": "Unauthorized", "description": "Unable to authenticate JWT" }),
    ));
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::with_token("abc"))).edit_recipe(12).await;

    assert!(page.is_redirect());
}

#[tokio::test]
async fn edit_authorized_returns_grant() {
    let mock = Arc::new(MockTransport::new().reply(
        "/recipes/12/edit",
        200,
        json!({ "authorized": true, "recipe": recipe_json(12) }),
    ));
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::with_token("abc"))).edit_recipe(12).await;

    let grant = page.data().unwrap().ok().unwrap();
    assert!(grant.authorized);
    assert_eq!(grant.recipe.map(|r| r.id), Some(12));
}

#[tokio::test]
async fn edit_missing_recipe_returns_envelope() {
    let mock = Arc::new(MockTransport::new().reply(
        "/recipes/99/edit",
        404,
        json!({ "error": "not_found", "description": "no such recipe" }),
    ));
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::with_token("abc"))).edit_recipe(99).await;

    assert_eq!(page, PageLoad::Data(Fetched::Err(ResponseError::new("not_found", "no such recipe"))));
}

#[tokio::test]
async fn account_returns_details_under_data() {
    let mock = Arc::new(MockTransport::new().reply("/account/", 200, json!({ "username": "kim", "email": "k@x.test" })));
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::with_token("abc"))).account().await;

    let value = serde_json::to_value(&page).unwrap();
    assert_eq!(value["data"]["username"], "kim");
}

#[tokio::test]
async fn account_without_credential_redirects() {
    let mock = Arc::new(MockTransport::new());
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::new())).account().await;

    assert_eq!(serde_json::to_value(&page).unwrap(), json!({ "redirect": "/" }));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn account_rejected_redirects() {
    let mock = Arc::new(MockTransport::new().reply("/account/", 401, json!({})));
    let page = loaders(&mock, &Arc::new(MemoryCredentialStore::with_token("abc"))).account().await;

    assert!(page.is_redirect());
}

// =============================================================================
// Pagination
// =============================================================================

#[test]
fn pagination_defaults_to_first_page_of_ten() {
    assert_eq!(Pagination::default(), Pagination { offset: 0, limit: 10 });
}

#[test]
fn pagination_clamp_keeps_small_limits() {
    assert_eq!(Pagination { offset: 5, limit: 3 }.clamped(), Pagination { offset: 5, limit: 3 });
}
