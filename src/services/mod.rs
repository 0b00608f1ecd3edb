pub mod course_service;
pub mod user_service;

pub use course_service::CourseService;
pub use user_service::UserService;
