//! Path-to-loader dispatch and the per-navigation driver.
//!
//! `Navigator::navigate` runs the session bootstrap first and the route's
//! loader second, mirroring a layout load followed by a page load.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use super::{AccountPage, PageLoad, PageLoaders, Pagination, ProfilePage, RecipePage, RecipesPage};
use crate::error::RouteError;
use crate::net::types::{Fetched, RecipeEditGrant};
use crate::session::{BootstrapOutcome, SessionBootstrap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Recipes(Pagination),
    Recipe(i32),
    EditRecipe(i32),
    YourRecipes,
    Profile(i32),
    Account,
}

impl FromStr for Route {
    type Err = RouteError;

    /// Accepts `/`, `/recipes[?offset=&limit=]`, `/recipes/yours`,
    /// `/recipes/{id}`, `/recipes/{id}/edit`, `/profile/{id}`, `/account`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Ok(Self::Home),
            ["recipes"] => Ok(Self::Recipes(parse_pagination(query)?)),
            ["recipes", "yours"] => Ok(Self::YourRecipes),
            ["recipes", id] => Ok(Self::Recipe(parse_id(id)?)),
            ["recipes", id, "edit"] => Ok(Self::EditRecipe(parse_id(id)?)),
            ["profile", id] => Ok(Self::Profile(parse_id(id)?)),
            ["account"] => Ok(Self::Account),
            _ => Err(RouteError::Unknown(raw.to_owned())),
        }
    }
}

fn parse_id(raw: &str) -> Result<i32, RouteError> {
    raw.parse().map_err(|_| RouteError::InvalidId(raw.to_owned()))
}

fn parse_pagination(query: &str) -> Result<Pagination, RouteError> {
    let mut page = Pagination::default();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let slot = match key {
            "offset" => &mut page.offset,
            "limit" => &mut page.limit,
            _ => continue,
        };
        *slot = value.parse().map_err(|_| RouteError::InvalidQuery(pair.to_owned()))?;
    }
    Ok(page)
}

/// Data produced by a route's loader.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RouteData {
    Home,
    Recipes(Fetched<RecipesPage>),
    Recipe(Fetched<RecipePage>),
    EditRecipe(PageLoad<Fetched<RecipeEditGrant>>),
    YourRecipes(PageLoad<Fetched<RecipesPage>>),
    Profile(ProfilePage),
    Account(PageLoad<AccountPage>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct NavigationResult {
    pub route: Route,
    pub session: BootstrapOutcome,
    pub data: RouteData,
}

pub struct Navigator {
    session: Arc<SessionBootstrap>,
    loaders: PageLoaders,
}

impl Navigator {
    pub fn new(session: Arc<SessionBootstrap>, loaders: PageLoaders) -> Self {
        Self { session, loaders }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionBootstrap> {
        &self.session
    }

    /// Bootstrap the session, then load the route against its outcome.
    pub async fn navigate(&self, route: Route) -> NavigationResult {
        let session = self.session.run().await;
        let data = self.dispatch(route, Some(&session)).await;
        NavigationResult { route, session, data }
    }

    /// Run only the route's loader, without a bootstrap.
    pub async fn load(&self, route: Route) -> RouteData {
        self.dispatch(route, None).await
    }

    async fn dispatch(&self, route: Route, session: Option<&BootstrapOutcome>) -> RouteData {
        tracing::debug!(?route, "loading route");
        match route {
            Route::Home => RouteData::Home,
            Route::Recipes(page) => RouteData::Recipes(self.loaders.recipes(page).await),
            Route::Recipe(id) => RouteData::Recipe(self.loaders.recipe(id).await),
            Route::EditRecipe(id) => RouteData::EditRecipe(self.loaders.edit_recipe(id).await),
            Route::YourRecipes => RouteData::YourRecipes(match session {
                Some(outcome) => self.loaders.your_recipes_after(outcome).await,
                None => self.loaders.your_recipes().await,
            }),
            Route::Profile(uid) => RouteData::Profile(self.loaders.profile(uid).await),
            Route::Account => RouteData::Account(self.loaders.account().await),
        }
    }
}

#[cfg(test)]
#[path = "route_test.rs"]
mod tests;
