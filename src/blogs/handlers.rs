use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use mongodb::bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::{
    blogs::{
        dto::{BlogListResponse, BlogMutationResponse, ListQuery, MessageResponse, SearchQuery},
        repo::{author_filter, title_filter, Blog},
        services::{read_blog_form, update_document},
    },
    error::ApiError,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", get(list_blogs))
        .route("/blogs/search", get(search_blogs))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/blogs/create", post(create_blog))
        .route("/blogs/update/:id", put(update_blog))
        .route("/blogs/:id", delete(delete_blog))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
}

#[instrument(skip(state, mp))]
pub async fn create_blog(
    State(state): State<AppState>,
    mp: Multipart,
) -> Result<Json<BlogMutationResponse>, ApiError> {
    let form = read_blog_form(mp, &state.uploads).await?;
    if form.missing_required() {
        return Err(ApiError::BadRequest("All fields are required".into()));
    }

    let blog = form.into_blog();
    Blog::insert(&state.db, &blog).await?;

    info!(blog_id = %blog.id, author = %blog.author, "blog created");
    Ok(Json(BlogMutationResponse {
        message: "Blog created successfully".into(),
        blog: blog.into(),
    }))
}

#[instrument(skip(state))]
pub async fn list_blogs(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<BlogListResponse>, ApiError> {
    let blogs = Blog::find_all(&state.db, author_filter(q.username.as_deref())).await?;
    Ok(Json(BlogListResponse {
        blogs: blogs.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn search_blogs(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<BlogListResponse>, ApiError> {
    let blogs = Blog::find_all(&state.db, title_filter(q.title.as_deref())).await?;
    Ok(Json(BlogListResponse {
        blogs: blogs.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state, mp))]
pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mp: Multipart,
) -> Result<Json<BlogMutationResponse>, ApiError> {
    // The body (including any new image file) is consumed before the
    // not-found and validation checks, matching the create path.
    let form = read_blog_form(mp, &state.uploads).await?;

    let id = ObjectId::parse_str(&id).map_err(anyhow::Error::new)?;
    if Blog::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Blog not found".into()));
    }

    if form.missing_required() {
        return Err(ApiError::BadRequest("All fields are required".into()));
    }

    let updated = Blog::update_by_id(&state.db, id, update_document(&form))
        .await?
        .ok_or_else(|| ApiError::NotFound("Blog not found".into()))?;

    info!(blog_id = %updated.id, "blog updated");
    Ok(Json(BlogMutationResponse {
        message: "Blog updated successfully".into(),
        blog: updated.into(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = ObjectId::parse_str(&id).map_err(anyhow::Error::new)?;
    if !Blog::delete_by_id(&state.db, id).await? {
        return Err(ApiError::NotFound("Blog not found".into()));
    }

    info!(blog_id = %id, "blog deleted");
    Ok(Json(MessageResponse {
        message: "Blog deleted successfully".into(),
    }))
}
