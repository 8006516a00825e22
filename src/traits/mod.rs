// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod build_backend;
pub mod transmitter;

pub use build_backend::BuildBackend;
pub use transmitter::ContextTransmitter;
