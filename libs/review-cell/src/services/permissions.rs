//! Which review actions to offer the signed-in user. The server enforces the
//! same rules; these only decide what the client attempts.

use shared_models::auth::Identity;

use crate::models::Review;

fn is_author(review: &Review, identity: &Identity) -> bool {
    identity.user_id == Some(review.user_id)
}

/// Only the author may edit.
pub fn can_edit_review(review: &Review, identity: &Identity) -> bool {
    is_author(review, identity)
}

/// The author or an admin may delete.
pub fn can_delete_review(review: &Review, identity: &Identity, admin_role: &str) -> bool {
    is_author(review, identity) || identity.has_role(admin_role)
}
