// src/lib.rs — Library root for Rubrix

pub mod api;
pub mod cli;
pub mod evaluator;
pub mod infra;
pub mod provider;
pub mod report;
pub mod util;
