//! Forksh: executes parsed command trees (simple commands joined by `;`,
//! `||`, `&&`, `|` and `&`) against real processes, pipes and files.

pub mod config;
pub mod script;
pub mod shell;
