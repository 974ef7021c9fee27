//! # cidc-client - Async client for a clinical-trial data portal API
//!
//! A Rust client for the data-coordination portal REST backend. It wraps
//! authenticated HTTP calls to the portal's resources (files, accounts,
//! trials, permissions), normalizes the backend's heterogeneous error
//! shapes, submits manifest spreadsheets for validation or ingestion, and
//! resolves batch file downloads with concurrent URL resolution.
//!
//! ## Features
//!
//! - Token-explicit API: every operation takes the caller's bearer token as
//!   a parameter; the client never caches or refreshes credentials
//! - Collection-envelope handling with backend-authoritative pagination
//! - Closed error taxonomy covering the backend's three error-body shapes
//! - Optimistic-concurrency updates via `If-Match` etags, never retried
//! - Multipart manifest submission with flattened validation errors
//! - Concurrent batch download URL resolution (wait-for-all, first-failure)
//!
//! ## Basic Usage
//!
//! ```no_run
//! use cidc_client::{ApiContext, Config, FileQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cidc_client::ApiError> {
//!     let ctx = ApiContext::new(Config::from_env()?);
//!     let token = "...caller-supplied bearer token...";
//!
//!     // Who am I?
//!     if let Some(account) = ctx.get_account_info(token).await? {
//!         println!("logged in as {}", account.email);
//!     }
//!
//!     // Browse ingested files
//!     let files = ctx
//!         .get_files(token, &FileQuery {
//!             trial_ids: Some("10021".to_string()),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("{} of {} files", files.data.len(), files.total);
//!     Ok(())
//! }
//! ```
//!
//! ## Manifest validation
//!
//! ```no_run
//! use cidc_client::{manifest, ApiContext, ManifestForm};
//!
//! # async fn run(ctx: &ApiContext, token: &str) {
//! let form = ManifestForm {
//!     schema: "plasma".to_string(),
//!     file_name: "plasma.xlsx".to_string(),
//!     template: std::fs::read("plasma.xlsx").unwrap(),
//! };
//! let errors = manifest::get_manifest_validation_errors(ctx, token, &form).await;
//! if errors.is_empty() {
//!     manifest::upload_manifest(ctx, token, &form).await.unwrap();
//! }
//! # }
//! ```

pub mod client;
pub mod download;
pub mod error;
pub mod manifest;
pub mod model;
pub mod response;
pub mod rest;
pub mod token;

// Re-export main types for convenience
pub use client::{create_api_client, Config};
pub use download::{get_download_url, get_filelist, trigger_batch_download};
pub use error::{ApiError, Result};
pub use manifest::{get_manifest_validation_errors, upload_manifest, ManifestForm};
pub use model::{Account, DataFile, NewUser, Permission, Role, Trial};
pub use response::{Collection, DataWithMeta, ListMeta};
pub use rest::{ApiContext, FileQuery};
pub use token::decode_email;
