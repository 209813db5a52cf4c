// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upstream clients for the Railwatch gateway.
//!
//! One thin client per upstream service, each a base URL plus that service's
//! header conventions over a shared [`http::UpstreamHttp`]. Calls are made
//! exactly once; there is no retry, backoff or circuit breaking here.

pub mod chat;
pub mod cms;
pub mod http;
pub mod inference;

pub use chat::{build_exchange, ChatClient};
pub use cms::CmsClient;
pub use inference::InferenceClient;
