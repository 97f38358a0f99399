//! Classified ads: browse and filter listings, post and edit your own ads,
//! and total up the profit of completed deals.

pub mod ads;
pub mod app;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod memory;
pub mod session;
pub mod state;
