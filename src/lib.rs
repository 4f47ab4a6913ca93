//! envdoctor: diagnostics for dotenv-style environment files.
//!
//! The library exposes the pure building blocks the CLI is made of:
//! parsing ([`parser`]), drift detection ([`diff`]), code usage auditing
//! ([`usage`]), lint checks ([`lint`]), secret scanning ([`security`]),
//! and the repair pipeline ([`fix`]).

pub mod cli;
pub mod config;
pub mod diff;
pub mod fix;
pub mod lint;
pub mod models;
pub mod output;
pub mod parser;
pub mod security;
pub mod usage;
pub mod utils;
pub mod walk;
