pub mod app;
pub mod carousel;
pub mod config;
pub mod debounce;
pub mod detail;
pub mod gateway;
pub mod models;
pub mod routes;
pub mod search;
pub mod spotlight;
pub mod tmdb;
pub mod utils;
pub mod views;
