use std::path::PathBuf;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use movie_cell::{MovieQuery, MovieRequest, SortDirection};
use navigation_cell::View;
use review_cell::ReviewRequest;

#[derive(Parser, Debug)]
#[command(name = "moviehub", author, version, about = "Browse movies and manage reviews on a MovieHub API")]
pub struct Cli {
    /// Overrides MOVIEHUB_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and sign in.
    Register(Credentials),
    /// Sign in and keep the session.
    Login(Credentials),
    /// Forget the stored session.
    Logout,
    /// Show the signed-in identity.
    Whoami,
    #[command(subcommand)]
    Movies(MovieCommand),
    #[command(subcommand)]
    Reviews(ReviewCommand),
}

#[derive(Args, Debug)]
pub struct Credentials {
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "MOVIEHUB_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Subcommand, Debug)]
pub enum MovieCommand {
    List(ListArgs),
    Get { id: i64 },
    Create(MovieFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: MovieFields,
    },
    Delete { id: i64 },
    UploadPoster { id: i64, file: PathBuf },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long, default_value_t = 0)]
    pub page: u32,
    #[arg(long, default_value_t = 12)]
    pub size: u32,
    #[arg(long, default_value = "releaseDate")]
    pub sort_by: String,
    #[arg(long, default_value = "DESC")]
    pub direction: SortDirection,
    #[arg(long)]
    pub title: Option<String>,
    /// May be repeated.
    #[arg(long = "genre")]
    pub genres: Vec<String>,
    #[arg(long)]
    pub min_rating: Option<f64>,
    #[arg(long)]
    pub max_rating: Option<f64>,
    #[arg(long)]
    pub released_after: Option<NaiveDate>,
    #[arg(long)]
    pub released_before: Option<NaiveDate>,
}

impl ListArgs {
    pub fn to_query(&self) -> MovieQuery {
        let mut query = MovieQuery::new()
            .page(self.page)
            .size(self.size)
            .sort_by(self.sort_by.clone(), self.direction)
            .rating_between(self.min_rating, self.max_rating)
            .released_between(self.released_after, self.released_before);

        if let Some(title) = &self.title {
            query = query.title(title.clone());
        }
        for genre in &self.genres {
            query = query.genre(genre.clone());
        }
        query
    }
}

#[derive(Args, Debug)]
pub struct MovieFields {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub genre: String,
    #[arg(long)]
    pub rating: f64,
    #[arg(long)]
    pub release_date: NaiveDate,
    #[arg(long)]
    pub poster_url: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
}

impl MovieFields {
    pub fn to_request(&self) -> MovieRequest {
        MovieRequest {
            title: self.title.clone(),
            genre: self.genre.clone(),
            rating: self.rating,
            release_date: self.release_date,
            poster_url: self.poster_url.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ReviewCommand {
    List { movie_id: i64 },
    Create {
        movie_id: i64,
        #[command(flatten)]
        fields: ReviewFields,
    },
    Update {
        movie_id: i64,
        review_id: i64,
        #[command(flatten)]
        fields: ReviewFields,
    },
    Delete { movie_id: i64, review_id: i64 },
}

#[derive(Args, Debug)]
pub struct ReviewFields {
    /// 1 to 5.
    #[arg(long)]
    pub rating: i32,
    #[arg(long)]
    pub comment: String,
}

impl ReviewFields {
    pub fn to_request(&self) -> ReviewRequest {
        ReviewRequest::new(self.rating, self.comment.clone())
    }
}

impl Command {
    /// The view a command stands for; `None` for commands needing no gate.
    pub fn view(&self) -> Option<View> {
        match self {
            Command::Register(_) => Some(View::Register),
            Command::Login(_) => Some(View::Login),
            Command::Logout | Command::Whoami => None,
            Command::Movies(cmd) => Some(match cmd {
                MovieCommand::List(_) => View::Movies,
                MovieCommand::Get { id } => View::MovieDetail(*id),
                MovieCommand::Create(_) => View::AdminMovieNew,
                MovieCommand::Update { id, .. } | MovieCommand::UploadPoster { id, .. } => View::AdminMovieEdit(*id),
                MovieCommand::Delete { .. } => View::AdminPanel,
            }),
            Command::Reviews(cmd) => Some(match cmd {
                ReviewCommand::List { movie_id }
                | ReviewCommand::Create { movie_id, .. }
                | ReviewCommand::Update { movie_id, .. }
                | ReviewCommand::Delete { movie_id, .. } => View::MovieDetail(*movie_id),
            }),
        }
    }
}
