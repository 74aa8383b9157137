//! UpCloud compute client and resource models.
//!
//! Provides typed structures and an asynchronous client for listing,
//! inspecting, creating, starting, stopping and deleting UpCloud servers,
//! along with account, zone, plan and storage lookups.
//!
//! ```no_run
//! # async fn run() -> upcloud_compute::Result<()> {
//! use upcloud_compute::UpcloudClient;
//!
//! let client = UpcloudClient::new("username", "password")?;
//! let account = client.get_account().await?;
//! println!("{} has {} credits", account.username, account.credits);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{UpcloudClient, UpcloudClientBuilder};
pub use models::{
    Account, Interface, IpAddress, Networking, Plan, Server, ServerDetails, ServerSize,
    ServerState, StartServerRequest, StopServerRequest, StopType, Storage, StorageDevice,
    StorageFilter, Tags, Zone,
};

/// Convenient result alias that reuses the shared UpCloud error type.
pub type Result<T> = upcloud_core::Result<T>;
