use tracing::{debug, info};

use shared_gateway::ApiClient;
use shared_models::error::AppError;

use crate::models::{Review, ReviewRequest};

pub struct ReviewService {
    api: ApiClient,
}

impl ReviewService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn reviews_path(movie_id: i64) -> String {
        format!("/movies/{}/reviews", movie_id)
    }

    pub async fn get_reviews(&self, movie_id: i64) -> Result<Vec<Review>, AppError> {
        debug!("Fetching reviews for movie: {}", movie_id);

        self.api
            .get(&Self::reviews_path(movie_id))
            .await
            .map_err(|e| e.into_app_error("Failed to fetch reviews"))
    }

    pub async fn create_review(&self, movie_id: i64, request: &ReviewRequest) -> Result<Review, AppError> {
        debug!("Creating review for movie: {}", movie_id);

        let review: Review = self.api
            .post(&Self::reviews_path(movie_id), request)
            .await
            .map_err(|e| e.into_app_error("Failed to create review"))?;

        info!("Created review {} on movie {}", review.id, movie_id);
        Ok(review)
    }

    pub async fn update_review(
        &self,
        movie_id: i64,
        review_id: i64,
        request: &ReviewRequest,
    ) -> Result<Review, AppError> {
        debug!("Updating review {} on movie {}", review_id, movie_id);

        self.api
            .put(&format!("{}/{}", Self::reviews_path(movie_id), review_id), request)
            .await
            .map_err(|e| e.into_app_error("Failed to update review"))
    }

    pub async fn delete_review(&self, movie_id: i64, review_id: i64) -> Result<(), AppError> {
        debug!("Deleting review {} on movie {}", review_id, movie_id);

        self.api
            .delete(&format!("{}/{}", Self::reviews_path(movie_id), review_id))
            .await
            .map_err(|e| e.into_app_error("Failed to delete review"))
    }
}
