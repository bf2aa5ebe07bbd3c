//! Translate the text of a Google Slides presentation with an OpenAI model.
//!
//! The pipeline runs strictly forward: [`walker`] extracts text runs,
//! [`planner`] translates them into replacement operations, and [`applier`]
//! writes those back in a single batch update.

pub mod app;
pub mod applier;
pub mod config;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod openai;
pub mod planner;
pub mod retry;
pub mod slides;
pub mod translation;
pub mod walker;
