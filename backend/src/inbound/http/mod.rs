//! HTTP inbound adapter exposing the REST API.

pub mod articles;
pub mod auth;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token;
pub mod token_config;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` handler on `cfg`.
///
/// The caller mounts this under the version prefix and supplies
/// [`state::HttpState`] as app data.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .service(users::register)
        .service(users::login)
        .service(articles::list_my_articles)
        .service(users::current_user)
        .service(users::update_current_user)
        .service(users::delete_current_user)
        .service(articles::list_articles)
        .service(articles::create_article)
        .service(articles::get_article)
        .service(articles::update_article)
        .service(articles::delete_article);
}
