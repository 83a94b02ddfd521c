pub mod attributes;
pub mod config;
pub mod documentation;
pub mod problems;
pub mod resolution;
pub mod services;
pub mod text;
pub mod version;
