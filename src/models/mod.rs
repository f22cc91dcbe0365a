// src/models/mod.rs

pub mod achievement;
pub mod answer;
pub mod performance;
pub mod points;
pub mod question;
pub mod report;
pub mod suggestion;
pub mod subscription;
pub mod usage;
pub mod user;
