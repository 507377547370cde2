pub mod app_state;
pub mod classifier;
pub mod config;
pub mod extractor;
pub mod health;
pub mod normalizer;
pub mod predict;
pub mod renderer;
pub mod routes;
pub mod verdict;
