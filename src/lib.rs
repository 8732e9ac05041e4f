//! Query layer and configuration behind the CarInsight dashboard.

pub mod config;
pub mod data;
