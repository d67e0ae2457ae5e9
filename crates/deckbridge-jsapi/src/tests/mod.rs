//! Dispatcher test suites driven through the public entry points.

mod support;
mod tts_endpoints;
