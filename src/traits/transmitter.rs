// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::TransportError;
use crate::transport::ContextPacket;

/// Delivery mechanism behind a neural transport channel.
///
/// The transport only caches a packet after `transmit` returns `Ok`.
#[async_trait]
pub trait ContextTransmitter: Send + Sync {
    async fn transmit(&self, channel_id: &str, packet: &ContextPacket)
        -> Result<(), TransportError>;

    fn name(&self) -> &'static str;
}
