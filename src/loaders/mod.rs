//! Per-route page data loaders.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each loader issues its request(s) and hands back page data. Server
//! failures come back as the `ResponseError` envelope inside `Fetched`; a
//! loader never returns `Err`. Routes that need a signed-in user answer with
//! `PageLoad::Redirect` instead of data when the credential is missing or
//! refused.
//!
//! ERROR HANDLING
//! ==============
//! Non-success bodies that are not an envelope, success bodies that do not
//! decode, and transport failures are folded into a synthesized envelope so
//! every domain fetch has exactly one error shape.

pub mod route;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::credentials::Credential;
use crate::net::endpoints::{self, MAX_PAGE_LIMIT};
use crate::net::transport::{HttpTransport, Reply};
use crate::net::types::{AccountDetails, Fetched, Profile, Recipe, RecipeEditGrant, RecipePreview, ResponseError};
use crate::session::{AnonymousReason, BootstrapOutcome, BootstrapState, SessionBootstrap};

/// Where unauthorized visitors are sent.
pub const HOME: &str = "/";

/// Envelope `error` for requests that never got an HTTP reply.
pub const NETWORK_FAILURE: &str = "network_failure";
/// Envelope `error` for replies that were neither payload nor envelope.
pub const UNEXPECTED_RESPONSE: &str = "unexpected_response";

/// Longest slice of a foreign error body carried into a synthesized envelope.
const MAX_BODY_EXCERPT: usize = 256;

/// Page data, or a redirect for routes that require a signed-in user.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PageLoad<T> {
    Data(T),
    Redirect { redirect: String },
}

impl<T> PageLoad<T> {
    fn redirect_home() -> Self {
        Self::Redirect { redirect: HOME.to_owned() }
    }

    #[must_use]
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    #[must_use]
    pub fn data(self) -> Option<T> {
        match self {
            Self::Data(data) => Some(data),
            Self::Redirect { .. } => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecipePage {
    pub recipe: Recipe,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecipesPage {
    pub recipes: Vec<RecipePreview>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProfilePage {
    pub user: Fetched<Profile>,
    pub recipes: Fetched<Vec<RecipePreview>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AccountPage {
    pub data: AccountDetails,
}

/// Window into `/recipes/all`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { offset: 0, limit: MAX_PAGE_LIMIT }
    }
}

impl Pagination {
    /// Cap `limit` at what the backend will serve.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self { offset: self.offset, limit: self.limit.min(MAX_PAGE_LIMIT) }
    }
}

pub struct PageLoaders {
    transport: Arc<dyn HttpTransport>,
    session: Arc<SessionBootstrap>,
}

impl PageLoaders {
    pub fn new(transport: Arc<dyn HttpTransport>, session: Arc<SessionBootstrap>) -> Self {
        Self { transport, session }
    }

    /// `/recipes/{id}`.
    pub async fn recipe(&self, id: i32) -> Fetched<RecipePage> {
        self.fetch(&endpoints::recipe(id), None).await.map(|recipe| RecipePage { recipe })
    }

    /// `/recipes/all`, in backend order.
    pub async fn recipes(&self, page: Pagination) -> Fetched<RecipesPage> {
        let page = page.clamped();
        self.fetch(&endpoints::recipes_page(page.offset, page.limit), None)
            .await
            .map(|recipes| RecipesPage { recipes })
    }

    /// A user's public profile and their recipes, fetched one after the other.
    pub async fn profile(&self, uid: i32) -> ProfilePage {
        let user = self.fetch(&endpoints::user(uid), None).await;
        let recipes = self.fetch(&endpoints::recipes_by(uid), None).await;
        ProfilePage { user, recipes }
    }

    /// Recipes posted by the signed-in user. Verifies the stored credential
    /// itself; use [`PageLoaders::your_recipes_after`] when a bootstrap has
    /// just run.
    pub async fn your_recipes(&self) -> PageLoad<Fetched<RecipesPage>> {
        let Ok((_, claims)) = self.session.authenticate().await else {
            return PageLoad::redirect_home();
        };
        self.recipes_of(claims.uid).await
    }

    /// Same page, reusing the identity `outcome` already established.
    /// Verifies again only when the bootstrap verified the credential but
    /// could not hydrate the profile.
    pub async fn your_recipes_after(&self, outcome: &BootstrapOutcome) -> PageLoad<Fetched<RecipesPage>> {
        match &outcome.state {
            BootstrapState::Verified(profile) => self.recipes_of(profile.uid).await,
            BootstrapState::Anonymous(AnonymousReason::HydrationFailed) => self.your_recipes().await,
            _ => PageLoad::redirect_home(),
        }
    }

    async fn recipes_of(&self, uid: i32) -> PageLoad<Fetched<RecipesPage>> {
        let recipes = self.fetch(&endpoints::recipes_by(uid), None).await;
        PageLoad::Data(recipes.map(|recipes| RecipesPage { recipes }))
    }

    /// Edit form data. The backend re-checks the credential and answers
    /// `authorized: false` (or 401/403) when the bearer may not edit.
    pub async fn edit_recipe(&self, id: i32) -> PageLoad<Fetched<RecipeEditGrant>> {
        let Some(credential) = self.session.credentials().get() else {
            return PageLoad::redirect_home();
        };
        let (status, grant) = self.request::<RecipeEditGrant>(&endpoints::recipe_edit(id), Some(&credential)).await;
        match (status, grant) {
            (Some(401 | 403), _) | (_, Fetched::Ok(RecipeEditGrant { authorized: false, .. })) => {
                tracing::info!(recipe = id, "edit not authorized; redirecting");
                PageLoad::redirect_home()
            }
            (_, grant) => PageLoad::Data(grant),
        }
    }

    /// Private account details for the signed-in user.
    pub async fn account(&self) -> PageLoad<AccountPage> {
        let Some(credential) = self.session.credentials().get() else {
            return PageLoad::redirect_home();
        };
        match self.session.hydrator().fetch_account(&credential).await {
            Ok(data) => PageLoad::Data(AccountPage { data }),
            Err(e) => {
                tracing::info!(error = %e, "account details unavailable; redirecting");
                PageLoad::redirect_home()
            }
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, credential: Option<&Credential>) -> Fetched<T> {
        self.request(path, credential).await.1
    }

    async fn request<T: DeserializeOwned>(&self, path: &str, credential: Option<&Credential>) -> (Option<u16>, Fetched<T>) {
        let reply = match self.transport.get(path, credential).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(%path, error = %e, "page data request failed");
                return (None, Fetched::Err(ResponseError::new(NETWORK_FAILURE, e.to_string())));
            }
        };

        if !reply.is_success() {
            tracing::debug!(%path, status = reply.status, "page data request returned error envelope");
            return (Some(reply.status), Fetched::Err(envelope_from(&reply)));
        }

        let fetched = match reply.json::<T>() {
            Ok(data) => Fetched::Ok(data),
            Err(e) => {
                tracing::warn!(%path, error = %e, "page data body did not decode");
                Fetched::Err(ResponseError::new(UNEXPECTED_RESPONSE, format!("{path}: {e}")))
            }
        };
        (Some(reply.status), fetched)
    }
}

/// Decode a non-success body as the error envelope, passing it through
/// verbatim when it is one.
fn envelope_from(reply: &Reply) -> ResponseError {
    match serde_json::from_str::<ResponseError>(&reply.body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::debug!(status = reply.status, error = %e, "error body is not an envelope");
            ResponseError::new(UNEXPECTED_RESPONSE, format!("status {}: {}", reply.status, excerpt(&reply.body)))
        }
    }
}

/// Trimmed body cut to `MAX_BODY_EXCERPT` bytes on a char boundary.
fn excerpt(body: &str) -> String {
    let body = body.trim();
    if body.len() <= MAX_BODY_EXCERPT {
        return body.to_owned();
    }
    let mut end = MAX_BODY_EXCERPT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
