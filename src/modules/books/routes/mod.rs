//! HTTP handlers for `/api/books`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookrate_http::error::AppError;
use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString};

use super::models::{Book, BookInput};
use super::store::BookStore;

type ApiResult<T> = Result<T, AppError>;

pub fn router(store: BookStore) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/search", get(search_books))
        .route("/filter", get(filter_books))
        .route("/health", get(health_check))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(store)
}

/// `?rating=` means no rating filter; anything else must parse as an integer.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub rating: Option<i32>,
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct FilterParams {
    pub genre: Option<String>,
    pub status: Option<String>,
}

async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(
    State(store): State<BookStore>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Book>>> {
    let Query(params) = params?;
    let books = store
        .find_all(params.rating, params.genre.as_deref())
        .await?;
    Ok(Json(books))
}

async fn get_book(
    State(store): State<BookStore>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Book>> {
    let Path(id) = id?;
    Ok(Json(store.find_by_id(id).await?))
}

async fn create_book(
    State(store): State<BookStore>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Book>)> {
    let Json(input) = payload?;
    let book = store.create(input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(store): State<BookStore>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> ApiResult<Json<Book>> {
    let Path(id) = id?;
    let Json(input) = payload?;
    Ok(Json(store.update(id, input).await?))
}

async fn delete_book(
    State(store): State<BookStore>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn search_books(
    State(store): State<BookStore>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Book>>> {
    let Query(params) = params?;
    Ok(Json(store.search(&params.query).await?))
}

async fn filter_books(
    State(store): State<BookStore>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Book>>> {
    let Query(params) = params?;
    let books = store
        .find_by_genre_status(params.genre.as_deref(), params.status.as_deref())
        .await?;
    Ok(Json(books))
}
