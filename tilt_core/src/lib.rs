#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core tilt-balancing logic (hardware-agnostic).
//!
//! All device access goes through `tilt_traits::Actuator` and
//! `tilt_traits::Accelerometer`.
//!
//! ## Architecture
//!
//! - **Actuation**: `Motor` → `Axis` → `Controller`; power is remapped onto the
//!   device range on every write (`config::PowerRange`)
//! - **Correction**: per-axis `RollingWindow` plus linear/derivative gains (`sensor`)
//! - **Commands**: single-byte protocol (`command`) applied by the `Rig`
//! - **Threads**: `Sampler` and `CommandServer` feed a `Runner`, which alone
//!   owns the `Rig`

pub mod axis;
pub mod builder;
pub mod command;
pub mod config;
pub mod controller;
pub mod conversions;
pub mod error;
pub mod filter;
pub mod hw_error;
pub mod mocks;
pub mod motor;
pub mod rig;
pub mod runner;
pub mod sampler;
pub mod sensor;
pub mod server;

pub use builder::{RigBuilder, RigChannels};
pub use command::Command;
pub use config::{PowerRange, Tuning};
pub use error::{BuildError, CoreError, Result};
pub use rig::Rig;
pub use runner::{Message, Runner};
pub use sampler::Sampler;
pub use server::CommandServer;
