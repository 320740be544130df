//! Game Library API: game catalog, personal libraries and reviews.
//!
//! This crate provides the REST API behind the service:
//! - Staff-managed catalog of games, developers and categories
//! - Per-user libraries with playtime, favorites and CSV export
//! - One review per user and game, driving each game's derived rating
//! - A per-user notification log

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
