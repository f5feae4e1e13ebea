pub mod analyzer;
pub mod batch;
pub mod config;
pub mod container;
pub mod coverage;
pub mod dependency;
pub mod docs;
pub mod error;
pub mod io;
pub mod paths;
pub mod profiler;
pub mod report;
pub mod skeleton;
pub mod source;
pub mod symbols;
pub mod template;
pub mod tool_runner;

pub use error::{GoforgeError, Result};
