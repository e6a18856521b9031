pub mod build;
pub mod edit;
pub mod node;
pub mod search;
pub mod state;
