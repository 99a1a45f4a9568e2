/// HTTP handlers for library endpoints
///
/// - Courses: listing, department grid, lookup and search, timeline pages, flattened pdf pages with ad slots
/// - Posts: description edits, image removal, download links, deletion
/// - Ads: creative pool, interstitial draws, view recording
/// - Health: liveness and readiness
pub mod ads;
pub mod courses;
pub mod health;
pub mod posts;

pub use ads::{get_interstitial, get_pool, record_view};
pub use courses::{
    get_course, get_course_pdf, get_course_posts, get_department_grid, get_department_row,
    list_courses, search_courses,
};
pub use health::{health_check, readiness_check};
pub use posts::{delete_post, edit_post, get_post, get_post_downloads, remove_image};

use crate::config::Config;
use crate::interleaver::AdPoolStore;
use crate::services::{AdService, CourseService, PostService};
use actix_web::web;
use appwrite_client::DocumentStore;
use std::sync::Arc;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn DocumentStore>,
    pub posts: Arc<PostService>,
    pub courses: Arc<CourseService>,
    pub ads: Arc<AdService>,
    pub ad_pool: Arc<AdPoolStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        let posts = Arc::new(PostService::new(
            Arc::clone(&store),
            config.store.posts_collection.clone(),
            config.store.bucket_id.clone(),
            config.feed.max_page_size,
        ));
        let courses = Arc::new(CourseService::new(
            Arc::clone(&store),
            config.store.courses_collection.clone(),
            config.feed.max_page_size,
        ));
        let ads = Arc::new(AdService::new(
            Arc::clone(&store),
            config.store.ads_collection.clone(),
            config.ads.active_limit,
            config.ads.slot_size,
        ));
        let ad_pool = Arc::new(AdPoolStore::new(Arc::clone(&ads)));

        Self {
            config: Arc::new(config),
            store,
            posts,
            courses,
            ads,
            ad_pool,
        }
    }
}

/// Register the `/api/v1` routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/courses", web::get().to(list_courses))
            .route("/courses/search", web::get().to(search_courses))
            .route("/courses/departments", web::get().to(get_department_grid))
            .route(
                "/courses/departments/{department}",
                web::get().to(get_department_row),
            )
            .service(
                web::scope("/courses/{course_id}")
                    .route("", web::get().to(get_course))
                    .route("/posts", web::get().to(get_course_posts))
                    .route("/pdf", web::get().to(get_course_pdf)),
            )
            .service(
                web::scope("/posts/{post_id}")
                    .service(
                        web::resource("")
                            .route(web::get().to(get_post))
                            .route(web::patch().to(edit_post))
                            .route(web::delete().to(delete_post)),
                    )
                    .route("/images", web::delete().to(remove_image))
                    .route("/downloads", web::get().to(get_post_downloads)),
            )
            .service(
                web::scope("/ads")
                    .route("/pool", web::get().to(get_pool))
                    .route("/interstitial", web::get().to(get_interstitial))
                    .route("/{ad_id}/views", web::post().to(record_view)),
            ),
    );
}
