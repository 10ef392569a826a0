pub mod models;
pub mod services;

pub use models::{Review, ReviewRequest};
pub use services::permissions::{can_delete_review, can_edit_review};
pub use services::review::ReviewService;
