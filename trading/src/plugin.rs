use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{Error, Result};
use crate::fees::TradingFees;

pub(crate) type FeeStrategyProvider = fn() -> Result<Box<dyn TradingFees>>;

/// A named, zero argument constructor for a custom fee strategy
pub struct FeeStrategyPlugin {
    name: &'static str,
    provider: FeeStrategyProvider,
}

impl Debug for FeeStrategyPlugin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeeStrategyPlugin").field("name", &self.name).finish()
    }
}

impl FeeStrategyPlugin {
    pub const fn new(name: &'static str, provider: FeeStrategyProvider) -> Self { Self { name, provider } }

    pub fn name(&self) -> &'static str { self.name }

    pub fn new_strategy(&self) -> Result<Box<dyn TradingFees>> { (self.provider)() }
}

inventory::collect!(FeeStrategyPlugin);

pub type FeeStrategyPluginRegistry<'a> = HashMap<&'a str, &'a FeeStrategyPlugin>;

pub fn gather_plugins() -> FeeStrategyPluginRegistry<'static> {
    inventory::iter::<FeeStrategyPlugin>
        .into_iter()
        .map(|p| (p.name, p))
        .collect()
}

static FEE_STRATEGY_PLUGIN_REGISTRY: OnceCell<FeeStrategyPluginRegistry<'static>> = OnceCell::new();

pub fn plugin_registry() -> &'static FeeStrategyPluginRegistry<'static> {
    FEE_STRATEGY_PLUGIN_REGISTRY.get_or_init(gather_plugins)
}

pub fn get_fee_strategy_plugin(name: &str) -> Result<&'static FeeStrategyPlugin> {
    plugin_registry()
        .get(name)
        .copied()
        .ok_or_else(|| Error::UnknownFeeStrategy(name.to_string()))
}

/// Resolves custom fee strategies by name.
///
/// This is the only place where a strategy is looked up dynamically, hosts that do not link their
/// strategies through [`fee_strategy!`](crate::fee_strategy) can supply their own implementation.
pub trait FeeStrategies: Send + Sync {
    fn instantiate(&self, name: &str) -> Result<Arc<dyn TradingFees>>;
}

/// Looks up strategies submitted with [`fee_strategy!`](crate::fee_strategy)
#[derive(Debug, Default, Clone, Copy)]
pub struct PluginFeeStrategies;

impl FeeStrategies for PluginFeeStrategies {
    fn instantiate(&self, name: &str) -> Result<Arc<dyn TradingFees>> {
        let plugin = get_fee_strategy_plugin(name)?;
        trace!(name = plugin.name(), "instantiating fee strategy");
        plugin.new_strategy().map(Arc::from)
    }
}

mod macros {
    /// Registers a fee strategy under a name, the type must implement `TradingFees` and `Default`
    #[macro_export]
    macro_rules! fee_strategy {
        ($name:expr, $t:ty) => {
            const _: () = {
                fn provide_fee_strategy() -> $crate::error::Result<Box<dyn $crate::fees::TradingFees>> {
                    Ok(Box::new(<$t as ::std::default::Default>::default()))
                }

                $crate::inventory::submit! {
                    $crate::plugin::FeeStrategyPlugin::new($name, provide_fee_strategy)
                }
            };
        };
    }
}
