//! Behavior-driven browser tests for the careers site.
//!
//! Feature files are parsed into scenarios, each scenario runs inside a
//! fresh browser [`world::ExecutionContext`], step text is matched against
//! the bindings in [`steps`], and the results plus per-step screenshots are
//! turned into an HTML report by [`report`].

pub mod browser;
pub mod cli;
pub mod error;
pub mod gherkin;
pub mod logging;
pub mod pages;
pub mod report;
pub mod runner;
pub mod steps;
pub mod world;

pub use error::E2eError;
