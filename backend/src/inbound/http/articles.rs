//! Article handlers.
//!
//! Reads are public; writes need a bearer token and, for update and delete,
//! ownership of the article. Listings take `page` and `page_size` query
//! parameters, clamped rather than rejected when out of range.

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::PageRequest;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::domain::{
    ArticleBody, ArticleRevision, ArticleTitle, ArticleValidationError, Error, NewArticle,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{ArticleList, ArticleResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{invalid_field, parse_article_id};

/// Body of article create and update requests.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRequest {
    #[schema(example = "Notes on soft deletes")]
    pub title: String,
    #[schema(example = "Rows are hidden rather than removed.")]
    pub content: String,
}

impl TryFrom<ArticleRequest> for NewArticle {
    type Error = ArticleValidationError;

    fn try_from(value: ArticleRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: ArticleTitle::new(&value.title)?,
            content: ArticleBody::new(value.content)?,
        })
    }
}

/// Paging query. Values are taken as text so that garbage falls back to the
/// defaults instead of failing the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number; values below 1 become 1.
    pub page: Option<String>,
    /// Items per page, 1 to 100; anything else becomes 10.
    #[serde(alias = "pageSize")]
    pub page_size: Option<String>,
}

impl PageQuery {
    fn to_request(&self) -> PageRequest {
        PageRequest::from_raw(self.page.as_deref(), self.page_size.as_deref())
    }
}

/// Newest articles first.
#[utoipa::path(
    get,
    path = "/api/v1/articles",
    params(PageQuery),
    responses(
        (status = 200, description = "A page of articles", body = ArticleList),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "listArticles",
    security([])
)]
#[get("/articles")]
pub async fn list_articles(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<ArticleList>> {
    let page = state.article_query.list(query.to_request()).await?;
    Ok(web::Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/articles/{id}",
    params(("id" = String, Path, description = "Article UUID")),
    responses(
        (status = 200, description = "The article", body = ArticleResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "No such article", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "getArticle",
    security([])
)]
#[get("/articles/{id}")]
pub async fn get_article(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ArticleResponse>> {
    let id = parse_article_id(&path)?;
    let article = state.article_query.get(&id).await?;
    Ok(web::Json((&article).into()))
}

/// Publish an article owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/articles",
    request_body = ArticleRequest,
    responses(
        (status = 201, description = "Article created", body = ArticleResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Author no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "createArticle",
    security(("bearer" = []))
)]
#[post("/articles")]
pub async fn create_article(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<ArticleRequest>,
) -> ApiResult<HttpResponse> {
    let draft = NewArticle::try_from(payload.into_inner()).map_err(invalid_field)?;
    let article = state.articles.create(caller.user_id(), draft).await?;
    Ok(HttpResponse::Created().json(ArticleResponse::from(&article)))
}

#[utoipa::path(
    put,
    path = "/api/v1/articles/{id}",
    params(("id" = String, Path, description = "Article UUID")),
    request_body = ArticleRequest,
    responses(
        (status = 200, description = "Updated article", body = ArticleResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller does not own the article", body = Error),
        (status = 404, description = "No such article", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "updateArticle",
    security(("bearer" = []))
)]
#[put("/articles/{id}")]
pub async fn update_article(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ArticleRequest>,
) -> ApiResult<web::Json<ArticleResponse>> {
    let id = parse_article_id(&path)?;
    let revision: ArticleRevision =
        NewArticle::try_from(payload.into_inner()).map_err(invalid_field)?;
    let article = state
        .articles
        .update(&id, caller.user_id(), revision)
        .await?;
    Ok(web::Json((&article).into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/articles/{id}",
    params(("id" = String, Path, description = "Article UUID")),
    responses(
        (status = 200, description = "Article deleted"),
        (status = 400, description = "Malformed id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller does not own the article", body = Error),
        (status = 404, description = "No such article", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "deleteArticle",
    security(("bearer" = []))
)]
#[delete("/articles/{id}")]
pub async fn delete_article(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_article_id(&path)?;
    state.articles.delete(&id, caller.user_id()).await?;
    Ok(HttpResponse::Ok().finish())
}

/// The caller's own articles, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/articles",
    params(PageQuery),
    responses(
        (status = 200, description = "A page of the caller's articles", body = ArticleList),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "listMyArticles",
    security(("bearer" = []))
)]
#[get("/users/me/articles")]
pub async fn list_my_articles(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<ArticleList>> {
    let page = state
        .article_query
        .list_by_author(caller.user_id(), query.to_request())
        .await?;
    Ok(web::Json(page.into()))
}

#[cfg(test)]
#[path = "articles_tests.rs"]
mod tests;
