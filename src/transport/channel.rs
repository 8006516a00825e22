// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::TransportError;

/// Channel profile, trading bandwidth against latency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelType {
    #[default]
    Standard,
    HighBandwidth,
    LowLatency,
    UltraLowLatency,
}

impl ChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::Standard => "standard",
            ChannelType::HighBandwidth => "high-bandwidth",
            ChannelType::LowLatency => "low-latency",
            ChannelType::UltraLowLatency => "ultra-low-latency",
        }
    }

    /// `(bandwidth in bps, latency in ms)`
    pub fn specs(&self) -> (u32, f64) {
        match self {
            ChannelType::Standard => (1000, 50.0),
            ChannelType::HighBandwidth => (10000, 100.0),
            ChannelType::LowLatency => (500, 10.0),
            ChannelType::UltraLowLatency => (200, 5.0),
        }
    }

    /// Base health contribution of the channel type
    pub fn type_score(&self) -> f64 {
        match self {
            ChannelType::Standard => 0.7,
            ChannelType::HighBandwidth => 0.8,
            ChannelType::LowLatency => 0.9,
            ChannelType::UltraLowLatency => 0.95,
        }
    }

    /// Next rung of the optimization ladder, if any
    pub fn upgrade(&self) -> Option<ChannelType> {
        match self {
            ChannelType::Standard => Some(ChannelType::HighBandwidth),
            ChannelType::HighBandwidth => Some(ChannelType::LowLatency),
            ChannelType::LowLatency | ChannelType::UltraLowLatency => None,
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelType {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(ChannelType::Standard),
            "high-bandwidth" => Ok(ChannelType::HighBandwidth),
            "low-latency" => Ok(ChannelType::LowLatency),
            "ultra-low-latency" => Ok(ChannelType::UltraLowLatency),
            other => Err(TransportError::UnknownChannelType(other.to_string())),
        }
    }
}

pub fn channel_id(source_org: &str, target_org: &str) -> String {
    format!("{}->{}", source_org, target_org)
}

/// Directed link between two organizations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuralChannel {
    pub source_org: String,
    pub target_org: String,
    pub channel_type: ChannelType,
    pub bandwidth: u32,
    pub latency_ms: f64,
    pub established_at: DateTime<Utc>,
    pub context_preservation: bool,
    pub transport_protocol: String,
}

impl NeuralChannel {
    pub fn new(
        source_org: &str,
        target_org: &str,
        channel_type: ChannelType,
        established_at: DateTime<Utc>,
    ) -> Self {
        let (bandwidth, latency_ms) = channel_type.specs();
        Self {
            source_org: source_org.to_string(),
            target_org: target_org.to_string(),
            channel_type,
            bandwidth,
            latency_ms,
            established_at,
            context_preservation: true,
            transport_protocol: "github-api".to_string(),
        }
    }

    pub fn id(&self) -> String {
        channel_id(&self.source_org, &self.target_org)
    }

    pub(crate) fn set_type(&mut self, channel_type: ChannelType) {
        let (bandwidth, latency_ms) = channel_type.specs();
        self.channel_type = channel_type;
        self.bandwidth = bandwidth;
        self.latency_ms = latency_ms;
    }

    pub fn uptime_seconds(&self, now: DateTime<Utc>) -> f64 {
        let millis = (now - self.established_at).num_milliseconds().max(0);
        millis as f64 / 1000.0
    }

    /// `0.3 * min(uptime_hours / 24, 1) + 0.7 * type_score`, rounded to 2 places
    pub fn health_score(&self, now: DateTime<Utc>) -> f64 {
        let uptime_hours = self.uptime_seconds(now) / 3600.0;
        let uptime_score = (uptime_hours / 24.0).min(1.0);
        let score = uptime_score * 0.3 + self.channel_type.type_score() * 0.7;
        (score * 100.0).round() / 100.0
    }

    pub fn status(&self, now: DateTime<Utc>) -> ChannelStatus {
        ChannelStatus {
            channel_id: self.id(),
            source_org: self.source_org.clone(),
            target_org: self.target_org.clone(),
            channel_type: self.channel_type,
            bandwidth: self.bandwidth,
            latency_ms: self.latency_ms,
            uptime_seconds: self.uptime_seconds(now),
            health_score: self.health_score(now),
            context_preservation: self.context_preservation,
            transport_protocol: self.transport_protocol.clone(),
        }
    }
}

/// Point-in-time view of a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStatus {
    pub channel_id: String,
    pub source_org: String,
    pub target_org: String,
    pub channel_type: ChannelType,
    pub bandwidth: u32,
    pub latency_ms: f64,
    pub uptime_seconds: f64,
    pub health_score: f64,
    pub context_preservation: bool,
    pub transport_protocol: String,
}
