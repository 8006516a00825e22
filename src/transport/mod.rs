// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Neural transport channels between organizations.
//!
//! A [`NeuralTransport`] owns a set of directional channels (`source->target`),
//! each with a [`ChannelType`] profile. Context is wrapped in a
//! [`ContextPacket`], delivered through a pluggable
//! [`ContextTransmitter`](crate::traits::ContextTransmitter) and cached by its
//! 16-character context hash until the channel is closed.
//!
//! Channel health combines uptime (saturating after 24 hours) with the base
//! score of the channel type, and channels can be moved up an optimization
//! ladder one step at a time.

mod channel;
mod network;
mod packet;

pub use channel::{channel_id, ChannelStatus, ChannelType, NeuralChannel};
pub use network::{NeuralTransport, OptimizeOutcome};
pub use packet::{
    context_hash, extract_dependencies, validate_priority, ContentType, ContextPacket,
    CONTEXT_HASH_LEN, MAX_PRIORITY, MIN_PRIORITY,
};
