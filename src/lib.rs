//! # Company Directory API Library
//!
//! This library provides the core functionality for the company directory service:
//! entities, repositories, request validation, handlers, and server configuration.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod models;
pub mod repositories;
pub mod server;
pub mod storage;
pub mod telemetry;
pub mod validation;
pub use migration;
