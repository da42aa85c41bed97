//! Natural-language logic puzzles solved through generated SWI-Prolog programs.
//!
//! A round trip asks a completion model for a program, saves it, consults it in a
//! long-lived engine, queries the solution predicate and asks the model to explain
//! the bindings.

pub mod config;
pub mod error;
pub mod execution;
pub mod extract;
pub mod handlers;
pub mod llm;
pub mod model;
pub mod pipeline;
pub mod printer;
pub mod process;
pub mod store;
pub mod templates;
