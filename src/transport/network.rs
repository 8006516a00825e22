// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::errors::TransportError;
use crate::observability::messages::transport::{
    ChannelClosed, ChannelEstablished, ChannelOptimized, ContextTransmitted,
};
use crate::observability::messages::StructuredLog;
use crate::traits::ContextTransmitter;
use crate::transport::channel::{channel_id, ChannelStatus, ChannelType, NeuralChannel};
use crate::transport::packet::{context_hash, extract_dependencies, validate_priority};
use crate::transport::{ContentType, ContextPacket};

/// Result of asking a channel to move up the optimization ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum OptimizeOutcome {
    Upgraded { from: ChannelType, to: ChannelType },
    AlreadyOptimal { channel_type: ChannelType },
}

/// Manages channels between organizations and the packets sent over them.
///
/// Channels are keyed by `source->target` and are directional. Successfully
/// transmitted packets are cached by context hash until their channel closes.
pub struct NeuralTransport {
    channels: BTreeMap<String, NeuralChannel>,
    context_cache: HashMap<String, ContextPacket>,
    transmitter: Arc<dyn ContextTransmitter>,
}

impl NeuralTransport {
    pub fn new(transmitter: Arc<dyn ContextTransmitter>) -> Self {
        Self {
            channels: BTreeMap::new(),
            context_cache: HashMap::new(),
            transmitter,
        }
    }

    /// Open a channel, or return the existing one unchanged.
    pub fn establish_channel(
        &mut self,
        source_org: &str,
        target_org: &str,
        channel_type: ChannelType,
    ) -> &NeuralChannel {
        let id = channel_id(source_org, target_org);
        self.channels.entry(id).or_insert_with_key(|id| {
            let channel = NeuralChannel::new(source_org, target_org, channel_type, Utc::now());
            ChannelEstablished {
                channel_id: id,
                channel_type: channel_type.as_str(),
                bandwidth: channel.bandwidth,
            }
            .log();
            channel
        })
    }

    pub fn channel(&self, source_org: &str, target_org: &str) -> Option<&NeuralChannel> {
        self.channels.get(&channel_id(source_org, target_org))
    }

    fn require_channel(
        &self,
        source_org: &str,
        target_org: &str,
    ) -> Result<&NeuralChannel, TransportError> {
        self.channel(source_org, target_org)
            .ok_or_else(|| TransportError::NoChannel {
                source_org: source_org.to_string(),
                target_org: target_org.to_string(),
            })
    }

    /// Send `content` over an established channel and cache the packet.
    pub async fn transmit_context(
        &mut self,
        source_org: &str,
        target_org: &str,
        content: Map<String, Value>,
        content_type: ContentType,
        priority: u8,
    ) -> Result<ContextPacket, TransportError> {
        let id = self.require_channel(source_org, target_org)?.id();
        let priority = validate_priority(priority)?;

        let hash = context_hash(&content).map_err(|e| TransportError::TransmissionFailed {
            channel_id: id.clone(),
            reason: e.to_string(),
        })?;
        let packet = ContextPacket {
            source_org: source_org.to_string(),
            target_org: target_org.to_string(),
            content_type,
            dependencies: extract_dependencies(&content),
            content,
            timestamp: Utc::now(),
            priority,
            context_hash: hash,
        };

        self.transmitter.transmit(&id, &packet).await?;

        ContextTransmitted {
            channel_id: &id,
            context_hash: &packet.context_hash,
            content_type: content_type.as_str(),
            priority,
        }
        .log();
        self.context_cache
            .insert(packet.context_hash.clone(), packet.clone());
        Ok(packet)
    }

    pub fn cached_packet(&self, context_hash: &str) -> Option<&ContextPacket> {
        self.context_cache.get(context_hash)
    }

    pub fn cache_len(&self) -> usize {
        self.context_cache.len()
    }

    pub fn channel_status(&self, source_org: &str, target_org: &str) -> Option<ChannelStatus> {
        self.channel_status_at(source_org, target_org, Utc::now())
    }

    pub fn channel_status_at(
        &self,
        source_org: &str,
        target_org: &str,
        now: DateTime<Utc>,
    ) -> Option<ChannelStatus> {
        self.channel(source_org, target_org).map(|c| c.status(now))
    }

    /// Every channel's status, healthiest first
    pub fn list_active_channels(&self) -> Vec<ChannelStatus> {
        self.list_active_channels_at(Utc::now())
    }

    pub fn list_active_channels_at(&self, now: DateTime<Utc>) -> Vec<ChannelStatus> {
        let mut statuses: Vec<ChannelStatus> =
            self.channels.values().map(|c| c.status(now)).collect();
        statuses.sort_by(|a, b| b.health_score.total_cmp(&a.health_score));
        statuses
    }

    /// Move a channel one rung up: standard, high-bandwidth, low-latency.
    pub fn optimize_channel(
        &mut self,
        source_org: &str,
        target_org: &str,
    ) -> Result<OptimizeOutcome, TransportError> {
        let id = channel_id(source_org, target_org);
        let channel = self
            .channels
            .get_mut(&id)
            .ok_or_else(|| TransportError::NoChannel {
                source_org: source_org.to_string(),
                target_org: target_org.to_string(),
            })?;

        let from = channel.channel_type;
        match from.upgrade() {
            Some(to) => {
                channel.set_type(to);
                ChannelOptimized {
                    channel_id: &id,
                    from: from.as_str(),
                    to: to.as_str(),
                }
                .log();
                Ok(OptimizeOutcome::Upgraded { from, to })
            }
            None => {
                tracing::info!(channel_id = %id, "Channel already at optimal configuration");
                Ok(OptimizeOutcome::AlreadyOptimal { channel_type: from })
            }
        }
    }

    /// Remove a channel and drop its cached packets. Returns how many were dropped.
    pub fn close_channel(
        &mut self,
        source_org: &str,
        target_org: &str,
    ) -> Result<usize, TransportError> {
        let id = channel_id(source_org, target_org);
        if self.channels.remove(&id).is_none() {
            return Err(TransportError::NoChannel {
                source_org: source_org.to_string(),
                target_org: target_org.to_string(),
            });
        }

        let before = self.context_cache.len();
        self.context_cache
            .retain(|_, p| !(p.source_org == source_org && p.target_org == target_org));
        let purged = before - self.context_cache.len();

        ChannelClosed {
            channel_id: &id,
            purged_packets: purged,
        }
        .log();
        Ok(purged)
    }
}
