// src/lib.rs

//! Tracker for postings from "Who is hiring?" threads.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod fixtures;
