//! Route handlers organized by resource

pub mod auth;
pub mod content;
pub mod crud;
pub mod education;
pub mod experiences;
pub mod health;
pub mod messages;
pub mod profile;
pub mod projects;
pub mod recommendations;
pub mod social_links;
