// src/handlers/mod.rs

pub mod admin;
pub mod answers;
pub mod auth;
pub mod explanation;
pub mod gamification;
pub mod questions;
pub mod reports;
pub mod statistics;
pub mod suggestions;
pub mod subscription;
