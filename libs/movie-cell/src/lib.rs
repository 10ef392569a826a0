pub mod models;
pub mod services;

pub use models::{Movie, MovieQuery, MovieRequest, PosterUpload, SortDirection};
pub use services::movie::MovieService;
