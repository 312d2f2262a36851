pub mod api;
pub mod app;
pub mod config;
pub mod detail;
pub mod error;
pub mod fetch;
pub mod keys;
pub mod model;
pub mod search;
pub mod storage;
pub mod summary;
pub mod title;
pub mod ui;
pub mod watched;
