//! Resource paths, relative to the configured API base URL.

pub const VERIFY: &str = "/account/verify";
pub const ACCOUNT: &str = "/account/";

/// Largest page the backend will return for `/recipes/all`.
pub const MAX_PAGE_LIMIT: u32 = 10;

#[must_use]
pub fn user(uid: i32) -> String {
    format!("/users/{uid}")
}

#[must_use]
pub fn recipe(id: i32) -> String {
    format!("/recipes/{id}")
}

#[must_use]
pub fn recipe_edit(id: i32) -> String {
    format!("/recipes/{id}/edit")
}

#[must_use]
pub fn recipes_by(uid: i32) -> String {
    format!("/recipes/by/{uid}")
}

#[must_use]
pub fn recipes_page(offset: u32, limit: u32) -> String {
    format!("/recipes/all?offset={offset}&limit={limit}")
}

#[cfg(test)]
#[path = "endpoints_test.rs"]
mod tests;
