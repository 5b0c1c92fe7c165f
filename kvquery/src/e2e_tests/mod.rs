//! End-to-end tests at the query engine level.
//!
//! Each test file covers a specific scenario, seeding an in-memory store with
//! deterministic data and running queries through the full pipeline.

#![cfg(test)]


mod test_drop_stream;
mod test_filter_maybe_more;
mod test_filter_variable;
mod test_integer_family;
mod test_resolve_literal;
mod test_resolve_variable;
mod test_single_read;
mod test_value_filter;
