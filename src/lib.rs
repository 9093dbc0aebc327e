#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod images;
pub mod prelude;
pub mod tables;
