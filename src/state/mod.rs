//! Client-side view state: listings, selection, and session.

pub mod list;
pub mod selection;
pub mod session;

pub use list::{FetchOutcome, FetchTicket, ListState, PageState};
pub use selection::Selection;
pub use session::{AppContext, ListRegistry, Session};
