// HTML screens and the transient file links they point at.

pub mod files;
pub mod handlers;
pub mod templates;
