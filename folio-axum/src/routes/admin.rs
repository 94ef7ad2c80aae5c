//! The admin area: dashboard, content CRUD, the contact inbox and account settings.
//!
//! Everything here sits behind the access gate. Handlers additionally require the admin
//! role through [`AdminUser`].
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use folio::{DashboardStats, RepositoryProvider};
use folio_core::content::{
    BlogFilter, BlogPost, BlogPostInput, Certification, CertificationInput, ContactMessage,
    Education, EducationInput, Experience, ExperienceInput, Page, Profile, ProfileInput, Project,
    ProjectFilter, ProjectInput,
};

use crate::{
    error::Result,
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    types::{AccountRequest, ChangePasswordRequest, MessageResponse, PageQuery, UserResponse},
};

const PROJECTS_PAGE_SIZE: u32 = 20;
const POSTS_PAGE_SIZE: u32 = 10;
const CONTACTS_PAGE_SIZE: u32 = 20;

pub(super) fn routes<R>() -> Router<AppState<R>>
where
    R: RepositoryProvider + 'static,
{
    Router::new()
        .route("/admin", get(dashboard_handler))
        .route(
            "/admin/api/projects",
            get(list_projects_handler).post(create_project_handler),
        )
        .route(
            "/admin/api/projects/{id}",
            get(get_project_handler)
                .put(update_project_handler)
                .delete(delete_project_handler),
        )
        .route(
            "/admin/api/blog",
            get(list_posts_handler).post(create_post_handler),
        )
        .route(
            "/admin/api/blog/{id}",
            get(get_post_handler)
                .put(update_post_handler)
                .delete(delete_post_handler),
        )
        .route(
            "/admin/api/experience",
            get(list_experience_handler).post(create_experience_handler),
        )
        .route(
            "/admin/api/experience/{id}",
            get(get_experience_handler)
                .put(update_experience_handler)
                .delete(delete_experience_handler),
        )
        .route(
            "/admin/api/education",
            get(list_education_handler).post(create_education_handler),
        )
        .route(
            "/admin/api/education/{id}",
            get(get_education_handler)
                .put(update_education_handler)
                .delete(delete_education_handler),
        )
        .route(
            "/admin/api/certifications",
            get(list_certifications_handler).post(create_certification_handler),
        )
        .route(
            "/admin/api/certifications/{id}",
            get(get_certification_handler)
                .put(update_certification_handler)
                .delete(delete_certification_handler),
        )
        .route(
            "/admin/api/profile",
            get(get_profile_handler).put(save_profile_handler),
        )
        .route("/admin/api/contacts", get(list_contacts_handler))
        .route(
            "/admin/api/contacts/{id}",
            get(get_contact_handler).delete(delete_contact_handler),
        )
        .route(
            "/admin/api/contacts/{id}/toggle-read",
            post(toggle_read_handler),
        )
        .route("/admin/api/settings/account", put(update_account_handler))
        .route("/admin/api/settings/password", put(change_password_handler))
}

async fn dashboard_handler<R>(
    State(state): State<AppState<R>>,
    _user: AuthUser,
) -> Result<Json<DashboardStats>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.dashboard_stats().await?))
}

// Projects

async fn list_projects_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Project>>>
where
    R: RepositoryProvider,
{
    let page = Page::new(query.page.unwrap_or(1), PROJECTS_PAGE_SIZE);
    let projects = state
        .folio
        .projects()
        .list(ProjectFilter::default(), page)
        .await?;
    Ok(Json(projects))
}

async fn create_project_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Json(input): Json<ProjectInput>,
) -> Result<(StatusCode, Json<Project>)>
where
    R: RepositoryProvider,
{
    let project = state.folio.projects().create(input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

async fn get_project_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Project>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.projects().get(&id).await?))
}

async fn update_project_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<ProjectInput>,
) -> Result<Json<Project>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.projects().update(&id, input).await?))
}

async fn delete_project_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode>
where
    R: RepositoryProvider,
{
    state.folio.projects().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Blog posts, drafts included

async fn list_posts_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<BlogPost>>>
where
    R: RepositoryProvider,
{
    let page = Page::new(query.page.unwrap_or(1), POSTS_PAGE_SIZE);
    Ok(Json(state.folio.blog().list(BlogFilter::All, page).await?))
}

async fn create_post_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Json(input): Json<BlogPostInput>,
) -> Result<(StatusCode, Json<BlogPost>)>
where
    R: RepositoryProvider,
{
    let post = state.folio.blog().create(input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn get_post_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<BlogPost>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.blog().get(&id).await?))
}

async fn update_post_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<BlogPostInput>,
) -> Result<Json<BlogPost>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.blog().update(&id, input).await?))
}

async fn delete_post_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode>
where
    R: RepositoryProvider,
{
    state.folio.blog().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Experience

async fn list_experience_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
) -> Result<Json<Vec<Experience>>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.experience().list().await?))
}

async fn create_experience_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Json(input): Json<ExperienceInput>,
) -> Result<(StatusCode, Json<Experience>)>
where
    R: RepositoryProvider,
{
    let experience = state.folio.experience().create(input).await?;
    Ok((StatusCode::CREATED, Json(experience)))
}

async fn get_experience_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Experience>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.experience().get(&id).await?))
}

async fn update_experience_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<ExperienceInput>,
) -> Result<Json<Experience>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.experience().update(&id, input).await?))
}

async fn delete_experience_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode>
where
    R: RepositoryProvider,
{
    state.folio.experience().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Education

async fn list_education_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
) -> Result<Json<Vec<Education>>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.education().list().await?))
}

async fn create_education_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Json(input): Json<EducationInput>,
) -> Result<(StatusCode, Json<Education>)>
where
    R: RepositoryProvider,
{
    let education = state.folio.education().create(input).await?;
    Ok((StatusCode::CREATED, Json(education)))
}

async fn get_education_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Education>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.education().get(&id).await?))
}

async fn update_education_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<EducationInput>,
) -> Result<Json<Education>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.education().update(&id, input).await?))
}

async fn delete_education_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode>
where
    R: RepositoryProvider,
{
    state.folio.education().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Certifications

async fn list_certifications_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
) -> Result<Json<Vec<Certification>>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.certifications().list().await?))
}

async fn create_certification_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Json(input): Json<CertificationInput>,
) -> Result<(StatusCode, Json<Certification>)>
where
    R: RepositoryProvider,
{
    let certification = state.folio.certifications().create(input).await?;
    Ok((StatusCode::CREATED, Json(certification)))
}

async fn get_certification_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Certification>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.certifications().get(&id).await?))
}

async fn update_certification_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<CertificationInput>,
) -> Result<Json<Certification>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.certifications().update(&id, input).await?))
}

async fn delete_certification_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode>
where
    R: RepositoryProvider,
{
    state.folio.certifications().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Profile

/// `null` until a profile has been saved.
async fn get_profile_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
) -> Result<Json<Option<Profile>>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.profile().get().await?))
}

async fn save_profile_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Json(input): Json<ProfileInput>,
) -> Result<Json<Profile>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.profile().save(input).await?))
}

// Contact inbox

async fn list_contacts_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<ContactMessage>>>
where
    R: RepositoryProvider,
{
    let page = Page::new(query.page.unwrap_or(1), CONTACTS_PAGE_SIZE);
    Ok(Json(state.folio.contacts().list_messages(page).await?))
}

async fn get_contact_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ContactMessage>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.contacts().get_message(&id).await?))
}

async fn toggle_read_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ContactMessage>>
where
    R: RepositoryProvider,
{
    Ok(Json(state.folio.contacts().toggle_read(&id).await?))
}

async fn delete_contact_handler<R>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode>
where
    R: RepositoryProvider,
{
    state.folio.contacts().delete_message(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Settings

async fn update_account_handler<R>(
    State(state): State<AppState<R>>,
    AdminUser(user): AdminUser,
    Json(request): Json<AccountRequest>,
) -> Result<Json<UserResponse>>
where
    R: RepositoryProvider,
{
    let user = state
        .folio
        .update_account(&user.id, &request.name, &request.email)
        .await?;
    Ok(Json(UserResponse { user }))
}

async fn change_password_handler<R>(
    State(state): State<AppState<R>>,
    AdminUser(user): AdminUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>>
where
    R: RepositoryProvider,
{
    state
        .folio
        .change_password(&user.id, &request.current_password, &request.new_password)
        .await?;
    Ok(Json(MessageResponse {
        message: "Password updated".to_string(),
    }))
}
