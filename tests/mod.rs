//! Integration tests for tvshelf
//!
//! Tests are organized by component:
//! - tvmaze_test: TVMaze API client tests
//! - pagination_test: Show list paging and the in-flight gate
//! - details_test: Show detail, season grouping and episode selection
//! - search_test: Exact-match search flow
//! - favorites_test: Favorites persistence and screen controller
//! - cli_test: Argument parsing and command handlers

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
