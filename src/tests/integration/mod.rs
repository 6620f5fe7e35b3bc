//! HTTP-level tests against a wiremock server.

mod http_api_tests;
mod workflow_tests;
