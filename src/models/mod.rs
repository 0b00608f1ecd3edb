pub mod course;
pub mod enrollment;
pub mod module;
pub mod notification;
pub mod user;

pub use course::{
    Course, NewCourseRequest, UpdateCourseRequest, UpdateNotifyRequest, UpdateNotifyResponse,
    end_date_for, weeks_between,
};
pub use enrollment::{EnrollRequest, Enrollment};
pub use module::{Module, NewModuleRequest};
pub use notification::{CourseNotification, NotificationKind};
pub use user::{GrantRoleRequest, Instructor, NewUserRequest, User};
