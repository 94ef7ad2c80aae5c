//! Read-only content for the public site.
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use folio::{AboutContent, HomeContent, RepositoryProvider};
use folio_core::content::{BlogFilter, BlogPost, Page, Profile, Project, ProjectFilter};

use crate::{error::Result, middleware::AppState, types::PageQuery};

const PUBLIC_PAGE_SIZE: u32 = 9;

pub(super) fn routes<R>() -> Router<AppState<R>>
where
    R: RepositoryProvider + 'static,
{
    Router::new()
        .route("/api/public/profile", get(profile_handler))
        .route("/api/public/home", get(home_handler))
        .route("/api/public/about", get(about_handler))
        .route("/api/public/projects", get(list_projects_handler))
        .route("/api/public/projects/{slug}", get(project_handler))
        .route("/api/public/blog", get(list_posts_handler))
        .route("/api/public/blog/{slug}", get(post_handler))
}

async fn profile_handler<R>(State(state): State<AppState<R>>) -> Result<Json<Profile>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.public_profile().await?))
}

async fn home_handler<R>(State(state): State<AppState<R>>) -> Result<Json<HomeContent>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.home().await?))
}

async fn about_handler<R>(State(state): State<AppState<R>>) -> Result<Json<AboutContent>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.about().await?))
}

async fn list_projects_handler<R>(
    State(state): State<AppState<R>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Project>>>
where
    R: RepositoryProvider,
{
    let page = Page::new(query.page.unwrap_or(1), PUBLIC_PAGE_SIZE);
    let projects = state
        .folio
        .projects()
        .list(ProjectFilter::default(), page)
        .await?;
    Ok(Json(projects))
}

async fn project_handler<R>(
    State(state): State<AppState<R>>,
    Path(slug): Path<String>,
) -> Result<Json<Project>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.projects().get_by_slug(&slug).await?))
}

async fn list_posts_handler<R>(
    State(state): State<AppState<R>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<BlogPost>>>
where
    R: RepositoryProvider,
{
    let page = Page::new(query.page.unwrap_or(1), PUBLIC_PAGE_SIZE);
    let posts = state
        .folio
        .blog()
        .list(BlogFilter::PublishedOnly, page)
        .await?;
    Ok(Json(posts))
}

/// Drafts are not found here, and every read counts as a view.
async fn post_handler<R>(
    State(state): State<AppState<R>>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.blog().read_published(&slug).await?))
}
