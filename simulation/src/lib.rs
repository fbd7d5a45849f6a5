/*!
Simulation settings of the tradai platform, read from a generic [`properties::PropertySource`].

# Properties

| key                        | value                                                   |
|----------------------------|---------------------------------------------------------|
| `simulation.trade.fees`    | `0.1%`, `1.5` or the name of a registered fee strategy  |
| `simulation.start`         | `yyyy-MM-dd HH:mm`, `yyyy-MM-dd`, `yyyy-MM` or `yyyy`   |
| `simulation.end`           | same as `simulation.start`                              |
| `simulation.cache.candles` | `true` / `false`, defaults to `false`                   |
| `simulation.initial.funds` | `[USDT]2000.0,[ADA;ETH]100.0`, or `2000.0` for the reference currency |

Loading stops at the first malformed value, see [`error::Error`].
 */

#![deny(unused_must_use, unused_mut, unused_imports, unused_import_braces)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::float_cmp
)]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod error;
pub mod fees;
pub mod grouped;
pub mod properties;
pub mod time;

pub use crate::config::{ConfigurationGroup, SimulationConfig};
pub use crate::error::{Error, Result};
