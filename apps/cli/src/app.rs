use std::sync::Arc;
use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use auth_cell::AuthService;
use movie_cell::{MovieService, PosterUpload};
use navigation_cell::{AccessGate, GuardOutcome, View, ViewRouter};
use review_cell::{can_delete_review, can_edit_review, ReviewService};
use shared_config::AppConfig;
use shared_gateway::ApiClient;
use shared_session::{FileSessionStore, SessionContext, SessionStore};

use crate::commands::{Command, MovieCommand, ReviewCommand};

/// Everything a command needs, wired around one session.
pub struct App {
    auth: AuthService,
    movies: MovieService,
    reviews: ReviewService,
    router: ViewRouter,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(&config.session_file));
        Self::with_store(config, store)
    }

    pub fn with_store(config: &AppConfig, store: Arc<dyn SessionStore>) -> Result<Self> {
        let session = SessionContext::new(store);
        let api = ApiClient::new(config, session.clone())?;

        Ok(Self {
            auth: AuthService::new(api.clone(), config),
            movies: MovieService::new(api.clone()),
            reviews: ReviewService::new(api),
            router: ViewRouter::new(session, AccessGate::from_config(config), View::Home),
        })
    }

    pub fn current_view(&self) -> &View {
        self.router.current()
    }

    fn enter(&mut self, view: View) -> Result<()> {
        match self.router.navigate(view) {
            GuardOutcome::Render(view) => {
                debug!("Rendering {}", view);
                Ok(())
            }
            GuardOutcome::Redirect(View::Login) => bail!("Not signed in. Run `moviehub login` first."),
            GuardOutcome::Redirect(View::Home) => {
                let who = self.auth.identity().map(|i| i.subject).unwrap_or_default();
                bail!("Already signed in as {}. Run `moviehub logout` first.", who)
            }
            GuardOutcome::Redirect(other) => bail!("Administrator role required (redirected to {}).", other),
        }
    }

    /// Runs one command and returns what should be printed.
    pub async fn run(&mut self, command: Command) -> Result<serde_json::Value> {
        if let Some(view) = command.view() {
            self.enter(view)?;
        }

        let held_session = self.auth.session().has_token();
        let output = self.dispatch(command).await;

        // A rejected sign-in also invalidates; only a lost session reads as expiry.
        if self.router.sync() && held_session {
            bail!("Session expired. Run `moviehub login` to sign in again.");
        }
        output
    }

    async fn dispatch(&mut self, command: Command) -> Result<serde_json::Value> {
        match command {
            Command::Register(creds) => {
                self.auth.register(&creds.email, &creds.password).await?;
                info!("Registered {}", creds.email);
                self.whoami()
            }
            Command::Login(creds) => {
                self.auth.login(&creds.email, &creds.password).await?;
                self.whoami()
            }
            Command::Logout => {
                self.auth.logout();
                Ok(serde_json::json!({ "signedOut": true }))
            }
            Command::Whoami => self.whoami(),
            Command::Movies(cmd) => self.movies(cmd).await,
            Command::Reviews(cmd) => self.reviews(cmd).await,
        }
    }

    fn whoami(&self) -> Result<serde_json::Value> {
        let identity = self.auth.identity().filter(|_| self.auth.is_authenticated());
        Ok(serde_json::json!({
            "authenticated": identity.is_some(),
            "admin": self.auth.is_admin(),
            "identity": identity,
        }))
    }

    async fn movies(&mut self, cmd: MovieCommand) -> Result<serde_json::Value> {
        match cmd {
            MovieCommand::List(args) => to_json(&self.movies.get_movies(&args.to_query()).await?),
            MovieCommand::Get { id } => to_json(&self.movies.get_movie_by_id(id).await?),
            MovieCommand::Create(fields) => to_json(&self.movies.create_movie(&fields.to_request()).await?),
            MovieCommand::Update { id, fields } => {
                to_json(&self.movies.update_movie(id, &fields.to_request()).await?)
            }
            MovieCommand::Delete { id } => {
                self.movies.delete_movie(id).await?;
                Ok(serde_json::json!({ "deleted": id }))
            }
            MovieCommand::UploadPoster { id, file } => {
                let data = tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("Failed to read poster file {}", file.display()))?;
                let file_name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "poster".to_string());

                to_json(&self.movies.upload_poster(id, PosterUpload::new(file_name, data)).await?)
            }
        }
    }

    async fn reviews(&mut self, cmd: ReviewCommand) -> Result<serde_json::Value> {
        match cmd {
            ReviewCommand::List { movie_id } => to_json(&self.reviews.get_reviews(movie_id).await?),
            ReviewCommand::Create { movie_id, fields } => {
                to_json(&self.reviews.create_review(movie_id, &fields.to_request()).await?)
            }
            ReviewCommand::Update { movie_id, review_id, fields } => {
                self.check_review_permission(movie_id, review_id, false).await?;
                to_json(&self.reviews.update_review(movie_id, review_id, &fields.to_request()).await?)
            }
            ReviewCommand::Delete { movie_id, review_id } => {
                self.check_review_permission(movie_id, review_id, true).await?;
                self.reviews.delete_review(movie_id, review_id).await?;
                Ok(serde_json::json!({ "deleted": review_id }))
            }
        }
    }

    async fn check_review_permission(&self, movie_id: i64, review_id: i64, delete: bool) -> Result<()> {
        let identity = self.auth.identity().ok_or_else(|| anyhow!("Not signed in."))?;
        let reviews = self.reviews.get_reviews(movie_id).await?;
        let review = reviews
            .iter()
            .find(|r| r.id == review_id)
            .ok_or_else(|| anyhow!("Review {} not found on movie {}", review_id, movie_id))?;

        let allowed = if delete {
            can_delete_review(review, &identity, self.auth.admin_role())
        } else {
            can_edit_review(review, &identity)
        };

        if !allowed {
            bail!("You can only {} your own review", if delete { "delete" } else { "update" });
        }
        Ok(())
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(value)?)
}
