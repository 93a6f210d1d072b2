pub mod admin;
pub mod auth;
pub mod code_review;
pub mod webhook;
