use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use shared_gateway::ApiClient;
use shared_models::error::AppError;
use shared_models::page::Page;

use crate::models::{Movie, MovieQuery, MovieRequest, PosterUpload};

pub struct MovieService {
    api: ApiClient,
}

impl MovieService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /movies` with paging, sort and filters; the page body is returned as parsed.
    pub async fn get_movies(&self, query: &MovieQuery) -> Result<Page<Movie>, AppError> {
        debug!("Fetching movies: {:?}", query);

        self.api
            .get_with_query("/movies", &query.to_query_pairs())
            .await
            .map_err(|e| e.into_app_error("Failed to fetch movies"))
    }

    pub async fn get_movie_by_id(&self, id: i64) -> Result<Movie, AppError> {
        debug!("Fetching movie: {}", id);

        self.api
            .get(&format!("/movies/{}", id))
            .await
            .map_err(|e| e.into_app_error("Failed to fetch movie"))
    }

    pub async fn create_movie(&self, request: &MovieRequest) -> Result<Movie, AppError> {
        debug!("Creating movie: {}", request.title);

        let movie: Movie = self.api
            .post("/movies", request)
            .await
            .map_err(|e| e.into_app_error("Failed to create movie"))?;

        info!("Created movie {} ({})", movie.id, movie.title);
        Ok(movie)
    }

    pub async fn update_movie(&self, id: i64, request: &MovieRequest) -> Result<Movie, AppError> {
        debug!("Updating movie: {}", id);

        self.api
            .put(&format!("/movies/{}", id), request)
            .await
            .map_err(|e| e.into_app_error("Failed to update movie"))
    }

    pub async fn delete_movie(&self, id: i64) -> Result<(), AppError> {
        debug!("Deleting movie: {}", id);

        self.api
            .delete(&format!("/movies/{}", id))
            .await
            .map_err(|e| e.into_app_error("Failed to delete movie"))?;

        info!("Deleted movie {}", id);
        Ok(())
    }

    /// Sends the poster as multipart field `file`; the server answers with the updated movie.
    pub async fn upload_poster(&self, id: i64, poster: PosterUpload) -> Result<Movie, AppError> {
        debug!("Uploading poster {} ({} bytes) for movie {}", poster.file_name, poster.data.len(), id);

        let part = Part::bytes(poster.data)
            .file_name(poster.file_name)
            .mime_str(&poster.content_type)
            .map_err(|_| AppError::Validation(format!("Unsupported content type: {}", poster.content_type)))?;
        let form = Form::new().part("file", part);

        self.api
            .post_multipart(&format!("/movies/{}/poster", id), form)
            .await
            .map_err(|e| e.into_app_error("Failed to upload poster"))
    }
}
