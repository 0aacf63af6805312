// Domains module
pub mod admin;
pub mod auth;
pub mod oauth;
