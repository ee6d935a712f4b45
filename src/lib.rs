pub mod cli;
pub mod config;
pub mod error;
pub mod exiftool;
pub mod export;
pub mod library;
pub mod logging;
pub mod metadata;
pub mod runner;
pub mod xattr;
