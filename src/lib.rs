//! clinic-dash: a dashboard client for the clinic backend.
//!
//! The [`dashboard`] controller holds all view state and talks to the backend
//! through [`api::Backend`]. It is driven either by the local web page
//! ([`web`]) or by one-shot CLI commands ([`cli`]); both render the same
//! state through [`render`].

pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod diagnostics;
pub mod render;
pub mod web;
