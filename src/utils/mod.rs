// src/utils/mod.rs

pub mod sink;
pub mod time;
