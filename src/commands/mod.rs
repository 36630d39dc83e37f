//! Command implementations for the CLI
//!
//! - start: run the HTTP server
//! - reload: ask a running server to re-read its workbooks
//! - test: validate configuration and both catalogs
//! - catalog: print a catalog as a table
//! - quote: price a quote request file

pub mod catalog;
pub mod quote;
pub mod reload;
pub mod start;
pub mod test;
