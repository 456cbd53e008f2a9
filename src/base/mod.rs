//! Core components, types, and utilities for ticket-triage.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Prompt templates for the classifier and drafter.
//! - Common types, pipeline errors, and result handling.

pub mod config;
pub mod prompts;
pub mod types;
