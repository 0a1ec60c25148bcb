//! Main module for readlog library functionality

pub mod attributes;
pub mod chronology;
pub mod config;
pub mod driver;
pub mod error;
pub mod grammar;
pub mod item;
pub mod microformats;
pub mod parsing;
pub mod testing;
