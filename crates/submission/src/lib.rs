//! Shorts Maker Submission
//!
//! Turns an edited composition into a render request and tracks it to a
//! downloadable video.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐  ┌──────────────┐
//! │ Composition │  │GlobalSettings│
//! └──────┬──────┘  └──────┬───────┘
//!        │   snapshot     │
//!        ▼                ▼
//! ┌─────────────────────────────────┐
//! │   build_request (payload.rs)    │  ordered multipart fields
//! └───────────────┬─────────────────┘
//!                 ▼
//! ┌─────────────────────────────────┐
//! │ GenerationController            │  idle → in-flight → succeeded | failed
//! │   └── RenderService (service.rs)│  HTTP POST, JSON reply
//! └───────────────┬─────────────────┘
//!                 ▼
//!          DownloadAction
//! ```

pub mod lifecycle;
pub mod payload;
pub mod service;

pub use lifecycle::*;
pub use payload::*;
pub use service::*;
