//! Trading cost models shared by the simulation and the live engine.
//!
//! ### Fee strategies
//! - [`fees::SimpleTradingFees`] : a percentage of the traded amount, or a flat amount per trade
//! - custom strategies : any [`fees::TradingFees`] registered with [`fee_strategy!`] and resolved by name
//!   through [`plugin::FeeStrategies`]

#![deny(unused_must_use, unused_mut)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate, clippy::missing_errors_doc)]

#[macro_use]
extern crate serde;
#[macro_use]
extern crate strum_macros;
#[macro_use]
extern crate tracing;

pub mod error;
pub mod fees;
pub mod plugin;
pub mod types;

pub use inventory;

pub mod prelude {
    #[doc(no_inline)]
    pub use crate::fees::{SimpleTradingFees, TradingFees};
    #[doc(no_inline)]
    pub use crate::plugin::{FeeStrategies, PluginFeeStrategies};
    #[doc(no_inline)]
    pub use crate::types::{OrderType, TradeType};
}
