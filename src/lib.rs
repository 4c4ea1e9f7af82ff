//! Light accessory controllers
//!
//! Turns remote requests, physical input events and auto-off expiry into
//! output levels for a single-channel dimmer or a four-channel RGBW light,
//! and keeps the persisted light record in sync.
//!
//! Hardware, storage and the accessory protocol are reached through the
//! traits in [`domain::ports`].
#![cfg_attr(not(test), no_std)]

pub mod color;
pub mod config;
pub mod domain;
pub mod input;
pub mod light;
pub mod rpc;
pub mod runtime;
pub mod timer;
