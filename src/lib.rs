//! awsquiz - AWS certification quiz question generator
//!
//! Serves `GET|POST /api/quiz`, which asks an LLM for one multiple-choice
//! question. OpenAI is tried first; Gemini is the fallback when OpenAI fails
//! or returns something that does not parse.

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod providers;
pub mod quiz;
pub mod telemetry;
