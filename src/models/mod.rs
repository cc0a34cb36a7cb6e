// src/models/mod.rs

pub mod event;
pub mod question;
pub mod session;
pub mod submission;
