use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    Home,
    Movies,
    MovieDetail(i64),
    AdminPanel,
    AdminMovieNew,
    AdminMovieEdit(i64),
}

/// Who may see a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Only without a session; signed-in users are sent home.
    GuestOnly,
    Authenticated,
    Admin,
}

impl View {
    /// Where authenticated users land when refused an admin view.
    pub const DEFAULT_AUTHENTICATED: View = View::Movies;

    pub fn access(&self) -> Access {
        match self {
            View::Login | View::Register => Access::GuestOnly,
            View::Home | View::Movies | View::MovieDetail(_) => Access::Authenticated,
            View::AdminPanel | View::AdminMovieNew | View::AdminMovieEdit(_) => Access::Admin,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Login => write!(f, "login"),
            View::Register => write!(f, "register"),
            View::Home => write!(f, "home"),
            View::Movies => write!(f, "movies"),
            View::MovieDetail(id) => write!(f, "movie {}", id),
            View::AdminPanel => write!(f, "admin panel"),
            View::AdminMovieNew => write!(f, "new movie"),
            View::AdminMovieEdit(id) => write!(f, "edit movie {}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Render(View),
    Redirect(View),
}

impl GuardOutcome {
    /// The view that ends up on screen.
    pub fn view(&self) -> &View {
        match self {
            GuardOutcome::Render(view) | GuardOutcome::Redirect(view) => view,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, GuardOutcome::Redirect(_))
    }
}
