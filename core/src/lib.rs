//! Client core for the travel diary service.
//!
//! # Overview
//! Users keep a diary of trips: each entry has a title, a description and a
//! photo, and lives on a remote service keyed by the user's email. This crate
//! holds everything below the UI: the wire contract, the photo encoder, the
//! local identity store and the state holder the screens observe.
//!
//! # Design
//! - `TravelClient` is stateless. Each CRUD operation is split into
//!   `build_*` (produces an `HttpRequest`) and `parse_*` (consumes an
//!   `HttpResponse`), so the I/O boundary is explicit.
//! - `Transport` executes requests; `UreqTransport` is the real one.
//! - `DiaryModel` runs one round-trip per user action and publishes
//!   `DiaryState` on a watch channel.
//! - `PreferenceStore` persists the signed-in `Identity`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod multipart;
pub mod photo;
pub mod prefs;
pub mod transport;
pub mod types;

pub use client::TravelClient;
pub use config::DiaryConfig;
pub use error::{ApiError, StorageError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use model::{Action, ApiStatus, DiaryModel, DiaryState};
pub use photo::{encode_jpeg, normalize_image_url};
pub use prefs::PreferenceStore;
pub use transport::{Transport, UreqTransport};
pub use types::{ApiResponse, Identity, Travel, TravelForm};
