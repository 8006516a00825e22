// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for neural transport channels.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A channel was opened between two organizations.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ChannelEstablished<'a> {
    pub channel_id: &'a str,
    pub channel_type: &'a str,
    pub bandwidth: u32,
}

impl Display for ChannelEstablished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Established {} channel {} ({} bandwidth)",
            self.channel_type, self.channel_id, self.bandwidth
        )
    }
}

impl StructuredLog for ChannelEstablished<'_> {
    fn log(&self) {
        tracing::info!(
            channel_id = self.channel_id,
            channel_type = self.channel_type,
            bandwidth = self.bandwidth,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "neural_channel",
            span_name = name,
            channel_id = self.channel_id,
            channel_type = self.channel_type,
        )
    }
}

/// A context packet went out over a channel.
///
/// # Log Level
/// `debug!` - Emitted for every packet
pub struct ContextTransmitted<'a> {
    pub channel_id: &'a str,
    pub context_hash: &'a str,
    pub content_type: &'a str,
    pub priority: u8,
}

impl Display for ContextTransmitted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Transmitted {} context {} over {} (priority {})",
            self.content_type, self.context_hash, self.channel_id, self.priority
        )
    }
}

impl StructuredLog for ContextTransmitted<'_> {
    fn log(&self) {
        tracing::debug!(
            channel_id = self.channel_id,
            context_hash = self.context_hash,
            content_type = self.content_type,
            priority = self.priority,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "context_transmission",
            span_name = name,
            channel_id = self.channel_id,
            context_hash = self.context_hash,
        )
    }
}

/// A channel was upgraded to a faster type.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ChannelOptimized<'a> {
    pub channel_id: &'a str,
    pub from: &'a str,
    pub to: &'a str,
}

impl Display for ChannelOptimized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Optimized channel {}: {} -> {}", self.channel_id, self.from, self.to)
    }
}

impl StructuredLog for ChannelOptimized<'_> {
    fn log(&self) {
        tracing::info!(
            channel_id = self.channel_id,
            from = self.from,
            to = self.to,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("neural_channel", span_name = name, channel_id = self.channel_id)
    }
}

/// A channel was closed and its cached packets dropped.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ChannelClosed<'a> {
    pub channel_id: &'a str,
    pub purged_packets: usize,
}

impl Display for ChannelClosed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Closed channel {} and purged {} cached packets",
            self.channel_id, self.purged_packets
        )
    }
}

impl StructuredLog for ChannelClosed<'_> {
    fn log(&self) {
        tracing::info!(
            channel_id = self.channel_id,
            purged_packets = self.purged_packets,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("neural_channel", span_name = name, channel_id = self.channel_id)
    }
}
