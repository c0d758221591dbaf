//! View models for the profile feed and the project navigator.
//!
//! Two independent engines sit at the core:
//!
//! - [`paginate::PaginationEngine`] loads a cursor-paginated list
//!   incrementally and backs [`profile::ProfileFeed`].
//! - [`navigator::TransitionEngine`] turns pan samples into interactive
//!   dismiss commands and backs [`navigator::ProjectNavigator`].
//!
//! Inputs are plain method calls; outputs are [`signal::Signal`]s observed by
//! the presentation layer.

pub mod config;
pub mod environment;
pub mod error;
pub mod fixture;
pub mod logging;
pub mod models;
pub mod mvi;
pub mod navigator;
pub mod paginate;
pub mod profile;
pub mod signal;
