#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Fetch flow for `grid-odata`.
//!
//! This crate drives one grid fetch cycle end to end: decode the grid's
//! request parameters, build the `OData` query (both via `grid-odata`),
//! issue the GET, unwrap JSONP when the service sits on another origin,
//! and normalize the payload into the grid's page shape.
//!
//! # Example
//!
//! ```ignore
//! use grid_odata::{ColumnKind, ColumnMeta, GridSettings};
//! use grid_odata_client::GridODataClient;
//!
//! let settings = GridSettings {
//!     columns: vec![ColumnMeta {
//!         field_name: Some("Name".into()),
//!         kind: Some(ColumnKind::String),
//!         ..ColumnMeta::default()
//!     }],
//!     server_side: true,
//!     ..GridSettings::default()
//! };
//!
//! let client = GridODataClient::new()?;
//! let page = client
//!     .fetch("https://api.example.com/Customers", &params, &settings)
//!     .await?;
//! assert_eq!(page.total_records, page.total_display_records);
//! ```

mod client;
mod config;
mod error;
mod jsonp;
mod transport;

pub use client::GridODataClient;
pub use config::{AjaxOptions, RESERVED_HEADERS};
pub use error::ClientError;
pub use jsonp::unwrap_jsonp;
pub use transport::{HyperTransport, Transport};
