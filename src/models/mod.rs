//! Data models

pub mod college;
pub mod event;
pub mod user;

pub use college::{College, CollegeSettings, NewCollege};
pub use event::{Event, EventStatus, NewEvent, Registration};
pub use user::{NewUser, Role, UpdateProfileRequest, User};
