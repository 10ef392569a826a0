pub mod gate;
pub mod models;
pub mod router;

pub use gate::AccessGate;
pub use models::{Access, GuardOutcome, View};
pub use router::ViewRouter;
