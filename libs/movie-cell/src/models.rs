use std::fmt;
use std::str::FromStr;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub rating: f64,
    pub release_date: NaiveDate,
    pub poster_url: Option<String>,
    pub description: Option<String>,
    pub average_review_rating: Option<f64>,
    pub review_count: Option<i64>,
}

/// Body of create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRequest {
    pub title: String,
    pub genre: String,
    pub rating: f64,
    pub release_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Movie> for MovieRequest {
    fn from(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            genre: movie.genre.clone(),
            rating: movie.rating,
            release_date: movie.release_date,
            poster_url: movie.poster_url.clone(),
            description: movie.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            other => Err(format!("Unknown sort direction: {}", other)),
        }
    }
}

/// Pagination, sort and filter parameters of the movie listing. Unset fields
/// are left out of the request and the server applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort_by: Option<String>,
    pub direction: Option<SortDirection>,
    pub title: Option<String>,
    pub genres: Vec<String>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub released_after: Option<NaiveDate>,
    pub released_before: Option<NaiveDate>,
}

impl MovieQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_by = Some(field.into());
        self.direction = Some(direction);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genres.push(genre.into());
        self
    }

    pub fn rating_between(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_rating = min;
        self.max_rating = max;
        self
    }

    pub fn released_between(mut self, after: Option<NaiveDate>, before: Option<NaiveDate>) -> Self {
        self.released_after = after;
        self.released_before = before;
        self
    }

    /// Query pairs in wire order: paging and sort first, then filters.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        if let Some(sort_by) = self.sort_by.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("sortBy", sort_by.to_string()));
        }
        if let Some(direction) = self.direction {
            pairs.push(("direction", direction.to_string()));
        }
        if let Some(title) = self.title.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("title", title.to_string()));
        }
        for genre in self.genres.iter().filter(|g| !g.trim().is_empty()) {
            pairs.push(("genres", genre.clone()));
        }
        if let Some(min) = self.min_rating {
            pairs.push(("minRating", min.to_string()));
        }
        if let Some(max) = self.max_rating {
            pairs.push(("maxRating", max.to_string()));
        }
        if let Some(after) = self.released_after {
            pairs.push(("releasedAfter", after.to_string()));
        }
        if let Some(before) = self.released_before {
            pairs.push(("releasedBefore", before.to_string()));
        }

        pairs
    }
}

/// A poster image sent as the `file` part of a multipart upload.
#[derive(Debug, Clone)]
pub struct PosterUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl PosterUpload {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self { file_name, content_type, data }
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
