// Typed endpoint wrappers
// Feature: Project Dashboard (002-project-dashboard)

pub mod auth;
pub mod project;
pub mod wallet;
