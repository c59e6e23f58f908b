pub mod api;
pub mod config;
pub mod handler;
pub mod humanize;
pub mod observability;
pub mod source;
pub mod storage;
