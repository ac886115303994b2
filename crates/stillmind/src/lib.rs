//! Core services for the Stillmind mental-wellness platform.
//!
//! The crate is organized around trait seams: repositories and outbound
//! providers are traits so the HTTP routers and services can be exercised with
//! in-memory implementations, while deployments supply real infrastructure.

pub mod assessments;
pub mod auth;
pub mod chat;
pub mod community;
pub mod config;
pub mod error;
pub mod profiles;
pub mod storage;
pub mod telemetry;
