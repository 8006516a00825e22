// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::TransportError;
use crate::traits::ContextTransmitter;
use crate::transport::{ContentType, ContextPacket};

/// In-memory transmitter that keeps every delivered packet.
///
/// Stands in for the organization APIs a real deployment would post issues,
/// pull requests, discussions or code pushes to.
#[derive(Debug, Default)]
pub struct RecordingTransmitter {
    delivered: Mutex<Vec<(String, ContextPacket)>>,
}

impl RecordingTransmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(channel_id, packet)` pairs in delivery order
    pub async fn delivered(&self) -> Vec<(String, ContextPacket)> {
        self.delivered.lock().await.clone()
    }
}

#[async_trait]
impl ContextTransmitter for RecordingTransmitter {
    async fn transmit(
        &self,
        channel_id: &str,
        packet: &ContextPacket,
    ) -> Result<(), TransportError> {
        let label_key = match packet.content_type {
            ContentType::Code => "repository",
            _ => "title",
        };
        let label = packet
            .content
            .get(label_key)
            .and_then(|v| v.as_str())
            .unwrap_or("untitled");
        tracing::debug!(
            channel_id,
            content_type = packet.content_type.as_str(),
            "Delivering {} '{}'",
            packet.content_type,
            label
        );

        self.delivered
            .lock()
            .await
            .push((channel_id.to_string(), packet.clone()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
