// handlers/mod.rs - HTTP handlers
//
// notes:  JSON CRUD under /api/notes
// pages:  the two static HTML pages
// system: health check
pub mod notes;
pub mod pages;
pub mod system;
