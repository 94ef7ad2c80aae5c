use chrono::NaiveDate;
use folio_core::{
    Error, NewUser, UserId,
    content::{
        BlogFilter, BlogPostInput, CertificationFields, ExperienceFields, Page, ProfileInput,
        ProjectFilter, ProjectInput,
    },
    error::StorageError,
    repositories::{
        BlogPostRepository, CertificationRepository, ExperienceRepository, PasswordRepository,
        ProfileRepository, ProjectRepository, RepositoryProvider, UserRepository,
    },
};
use folio_storage_sqlite::SqliteRepositoryProvider;
use serde_json::json;

async fn setup() -> SqliteRepositoryProvider {
    let provider = SqliteRepositoryProvider::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    provider.migrate().await.expect("Failed to run migrations");
    provider
}

fn project(slug: &str, order: i64, featured: bool) -> ProjectInput {
    ProjectInput {
        title: slug.to_uppercase(),
        slug: slug.to_string(),
        tech_stack: vec!["Rust".to_string(), "SQLite".to_string()],
        featured,
        order,
        ..ProjectInput::default()
    }
}

fn post(slug: &str, published: bool) -> BlogPostInput {
    BlogPostInput {
        title: slug.to_string(),
        slug: slug.to_string(),
        content: "Body".to_string(),
        tags: vec!["rust".to_string()],
        published,
        ..BlogPostInput::default()
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_migrate_is_idempotent() {
    let provider = setup().await;
    provider.migrate().await.unwrap();
    provider.health_check().await.unwrap();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _folio_migrations")
        .fetch_one(provider.pool())
        .await
        .unwrap();
    assert_eq!(applied, 8);
}

#[tokio::test]
async fn test_user_and_password() {
    let provider = setup().await;
    let users = provider.user();

    let user = users
        .create(NewUser::admin("admin@example.com", Some("Admin".to_string())))
        .await
        .unwrap();
    assert!(user.is_admin());
    assert_eq!(users.count().await.unwrap(), 1);

    let duplicate = users.create(NewUser::admin("admin@example.com", None)).await;
    assert!(matches!(duplicate, Err(e) if e.is_conflict()));

    let updated = users
        .update_account(&user.id, "Ada", "ada@example.com")
        .await
        .unwrap();
    assert_eq!(updated.name.as_deref(), Some("Ada"));
    assert!(users.find_by_email("admin@example.com").await.unwrap().is_none());
    assert!(users.find_by_email("ada@example.com").await.unwrap().is_some());

    let missing = users
        .update_account(&UserId::new("usr_missing"), "X", "x@example.com")
        .await;
    assert!(matches!(missing, Err(e) if e.is_not_found()));

    let passwords = provider.password();
    assert!(passwords.password_hash(&user.id).await.unwrap().is_none());
    passwords.store_password_hash(&user.id, "hash-1").await.unwrap();
    passwords.store_password_hash(&user.id, "hash-2").await.unwrap();
    assert_eq!(
        passwords.password_hash(&user.id).await.unwrap().as_deref(),
        Some("hash-2")
    );
}

#[tokio::test]
async fn test_profile_upsert_keeps_single_row() {
    let provider = setup().await;
    let profiles = provider.profile();
    assert!(profiles.get().await.unwrap().is_none());

    let input = ProfileInput {
        name: "Ada".to_string(),
        title: "Engineer".to_string(),
        bio: "Builds things".to_string(),
        skills: vec!["Rust".to_string()],
        ..ProfileInput::default()
    };
    let saved = profiles.upsert(input.clone()).await.unwrap();
    assert_eq!(saved.socials, json!({}));

    let saved = profiles
        .upsert(ProfileInput {
            title: "Principal Engineer".to_string(),
            socials: Some(json!({"github": "https://github.com/ada"})),
            ..input
        })
        .await
        .unwrap();
    assert_eq!(saved.title, "Principal Engineer");

    let loaded = profiles.get().await.unwrap().unwrap();
    assert_eq!(loaded.socials["github"], "https://github.com/ada");
    assert_eq!(loaded.skills, vec!["Rust"]);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profile")
        .fetch_one(provider.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn test_projects_ordering_and_filters() {
    let provider = setup().await;
    let projects = provider.project();

    projects.create(project("second", 2, false)).await.unwrap();
    projects.create(project("first", 1, true)).await.unwrap();
    let personal = projects
        .create(ProjectInput {
            is_personal: true,
            ..project("side", 3, false)
        })
        .await
        .unwrap();
    assert!(personal.id.starts_with("prj_"));
    assert_eq!(personal.tech_stack, vec!["Rust", "SQLite"]);

    let all = projects
        .list(ProjectFilter::default(), Page::first(10))
        .await
        .unwrap();
    assert_eq!(
        all.iter().map(|p| p.slug.as_str()).collect::<Vec<_>>(),
        ["first", "second", "side"]
    );

    let featured = projects
        .list(ProjectFilter::featured(), Page::first(10))
        .await
        .unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].slug, "first");

    assert_eq!(projects.count(ProjectFilter::personal()).await.unwrap(), 1);
    assert_eq!(projects.count(ProjectFilter::default()).await.unwrap(), 3);

    let page_two = projects
        .list(ProjectFilter::default(), Page::new(2, 2))
        .await
        .unwrap();
    assert_eq!(page_two.len(), 1);
    assert_eq!(page_two[0].slug, "side");
}

#[tokio::test]
async fn test_project_slug_conflict_and_missing() {
    let provider = setup().await;
    let projects = provider.project();

    let original = projects.create(project("folio", 0, false)).await.unwrap();
    let duplicate = projects.create(project("folio", 1, false)).await;
    assert!(matches!(
        duplicate,
        Err(Error::Storage(StorageError::Constraint(_)))
    ));

    let updated = projects
        .update(&original.id, project("folio-v2", 0, true))
        .await
        .unwrap();
    assert_eq!(updated.slug, "folio-v2");
    assert!(updated.featured);
    assert!(projects.find_by_slug("folio").await.unwrap().is_none());

    assert!(matches!(
        projects.update("prj_missing", project("x", 0, false)).await,
        Err(e) if e.is_not_found()
    ));
    assert!(matches!(projects.delete("prj_missing").await, Err(e) if e.is_not_found()));

    projects.delete(&original.id).await.unwrap();
    assert!(projects.find_by_id(&original.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_blog_drafts_and_views() {
    let provider = setup().await;
    let posts = provider.blog_post();

    let published = posts.create(post("hello", true)).await.unwrap();
    posts.create(post("draft", false)).await.unwrap();

    let public = posts
        .list(BlogFilter::PublishedOnly, Page::first(10))
        .await
        .unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].slug, "hello");

    let admin = posts.list(BlogFilter::All, Page::first(10)).await.unwrap();
    assert_eq!(
        admin.iter().map(|p| p.slug.as_str()).collect::<Vec<_>>(),
        ["draft", "hello"]
    );
    assert_eq!(posts.count(BlogFilter::All).await.unwrap(), 2);
    assert_eq!(posts.count(BlogFilter::PublishedOnly).await.unwrap(), 1);

    posts.increment_views(&published.id).await.unwrap();
    posts.increment_views(&published.id).await.unwrap();
    assert_eq!(posts.total_views().await.unwrap(), 2);
    assert_eq!(posts.find_by_slug("hello").await.unwrap().unwrap().views, 2);

    let duplicate = posts.create(post("hello", true)).await;
    assert!(matches!(duplicate, Err(e) if e.is_conflict()));
}

#[tokio::test]
async fn test_resume_ordering() {
    let provider = setup().await;
    let experience = provider.experience();

    let fields = |company: &str, start: NaiveDate, order: i64| ExperienceFields {
        position: "Engineer".to_string(),
        company: company.to_string(),
        location: None,
        start_date: start,
        end_date: None,
        description: None,
        technologies: vec!["Rust".to_string()],
        order,
    };

    experience.create(fields("Older", date(2018, 1, 1), 0)).await.unwrap();
    experience.create(fields("Newer", date(2022, 1, 1), 0)).await.unwrap();
    let pinned = experience.create(fields("Pinned", date(2010, 1, 1), -1)).await.unwrap();
    assert!(pinned.id.starts_with("exp_"));

    let listed = experience.list().await.unwrap();
    assert_eq!(
        listed.iter().map(|e| e.company.as_str()).collect::<Vec<_>>(),
        ["Pinned", "Newer", "Older"]
    );
    assert_eq!(listed[1].start_date, date(2022, 1, 1));

    let certifications = provider.certification();
    let cert = certifications
        .create(CertificationFields {
            name: "CKA".to_string(),
            issuer: "CNCF".to_string(),
            date: date(2023, 3, 14),
            url: Some("https://example.com/cka".to_string()),
            order: 0,
        })
        .await
        .unwrap();
    assert_eq!(certifications.find_by_id(&cert.id).await.unwrap(), Some(cert.clone()));

    certifications.delete(&cert.id).await.unwrap();
    assert!(matches!(certifications.delete(&cert.id).await, Err(e) if e.is_not_found()));
}
