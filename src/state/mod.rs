// State management module
// Holds the desk's shared state: ticket board, controller and session

pub mod app_state;

pub use app_state::{AppState, SharedState};
