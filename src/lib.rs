// Critic: Naive Bayes sentiment classification for movie reviews.
//
// This is the library root. Each module corresponds to a major subsystem
// of the train-once / predict-many workflow.

pub mod config;
pub mod corpus;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod status;
pub mod text;

pub use error::{CriticError, Result};
