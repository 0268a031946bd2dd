//! # Core Library
//!
//! Error type, configuration and domain model shared by the campaign client crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;

// Re-export commonly used types
pub use config::{Cluster, Commitment, Config};
pub use error::{AppError, Result};
pub use model::{CampaignDraft, ConnectionState, SubmissionResult, SubmittedCampaign, WalletIdentity};
