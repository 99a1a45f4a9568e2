/// Business logic layer for library-service
///
/// - Post service: course feed pages, description edits, image and post removal
/// - Course service: course lookups
/// - Ad service: active campaigns, creative pools, view recording
pub mod ads;
pub mod courses;
pub mod posts;

pub use ads::AdService;
pub use courses::CourseService;
pub use posts::PostService;
