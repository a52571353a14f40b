//! # roboscript
//!
//! roboscript is an interpreter for RoboScript, a small line-oriented
//! scripting language that drives a simulated robot on a 2D grid.
//!
//! The pipeline is strictly sequential: [`scan::scanner::Scanner`] turns
//! source text into tokens, [`lexing::parser::Parser`] turns tokens into an
//! AST, and [`engine::runtime::Interpreter`] walks the AST, mutating the
//! robot state and a variable [`engine::environment::Environment`].

pub mod engine;
pub mod error;
pub mod lexing;
pub mod scan;
