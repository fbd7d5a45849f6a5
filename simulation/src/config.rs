use std::sync::Arc;

use chrono::{DateTime, Months, NaiveDateTime, TimeZone, Utc};
use trading::plugin::{FeeStrategies, PluginFeeStrategies};

use crate::error::{Error, Result};
use crate::fees::{TradingFeesResolver, TradingFeesSpec};
use crate::grouped::{parse_grouped_setting_into, GroupedSetting, GroupedSettingError, GroupedSettingView, DEFAULT_KEY};
use crate::properties::PropertySource;
use crate::time::{parse_date_time, DateTimeParser};

pub const TRADE_FEES_PROPERTY: &str = "simulation.trade.fees";
pub const START_PROPERTY: &str = "simulation.start";
pub const END_PROPERTY: &str = "simulation.end";
pub const CACHE_CANDLES_PROPERTY: &str = "simulation.cache.candles";
pub const INITIAL_FUNDS_PROPERTY: &str = "simulation.initial.funds";

/// A group of settings read from a property source
pub trait ConfigurationGroup {
    /// Reads every property of the group, stopping at the first malformed value
    fn read_properties(&mut self, properties: &dyn PropertySource) -> Result<()>;

    /// Whether the group holds enough settings to be used
    fn is_configured(&self) -> bool;
}

/// Settings of a simulated trading session.
///
/// ```yaml
/// simulation:
///   start: 2018-01-01
///   end: 2018-06-01 12:00
///   trade:
///     fees: 0.1%
///   cache:
///     candles: true
///   initial:
///     funds: "[USDT]2000.0,[ADA;ETH]100.0"
/// ```
#[derive(Clone)]
pub struct SimulationConfig {
    trading_fees: Option<TradingFeesSpec>,
    simulation_start: Option<NaiveDateTime>,
    simulation_end: Option<NaiveDateTime>,
    cache_candles: bool,
    initial_funds: GroupedSetting<f64>,
    fee_strategies: Arc<dyn FeeStrategies>,
}

impl std::fmt::Debug for SimulationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationConfig")
            .field("trading_fees", &self.trading_fees)
            .field("simulation_start", &self.simulation_start)
            .field("simulation_end", &self.simulation_end)
            .field("cache_candles", &self.cache_candles)
            .field("initial_funds", &self.initial_funds)
            .finish()
    }
}

impl Default for SimulationConfig {
    fn default() -> Self { Self::with_fee_strategies(Arc::new(PluginFeeStrategies)) }
}

impl SimulationConfig {
    pub fn new() -> Self { Self::default() }

    /// Custom fee strategies named in properties are resolved with `fee_strategies`
    pub fn with_fee_strategies(fee_strategies: Arc<dyn FeeStrategies>) -> Self {
        Self {
            trading_fees: None,
            simulation_start: None,
            simulation_end: None,
            cache_candles: false,
            initial_funds: GroupedSetting::new(),
            fee_strategies,
        }
    }

    pub fn load_from(properties: &dyn PropertySource) -> Result<Self> {
        let mut config = Self::default();
        config.read_properties(properties)?;
        Ok(config)
    }

    /// Defaults to one year ago, evaluated on each call
    pub fn simulation_start(&self) -> NaiveDateTime {
        self.simulation_start.unwrap_or_else(|| {
            let now = util::time::now_local();
            now.checked_sub_months(Months::new(12)).unwrap_or(now)
        })
    }

    /// Defaults to now, evaluated on each call
    pub fn simulation_end(&self) -> NaiveDateTime { self.simulation_end.unwrap_or_else(util::time::now_local) }

    pub fn configured_start(&self) -> Option<NaiveDateTime> { self.simulation_start }

    pub fn configured_end(&self) -> Option<NaiveDateTime> { self.simulation_end }

    pub fn set_simulation_start(&mut self, start: Option<NaiveDateTime>) -> &mut Self {
        self.simulation_start = start;
        self
    }

    pub fn set_simulation_end(&mut self, end: Option<NaiveDateTime>) -> &mut Self {
        self.simulation_end = end;
        self
    }

    /// Accepts the same formats as the `simulation.start` property, a blank string clears the start
    pub fn set_simulation_start_str(&mut self, start: &str) -> Result<&mut Self> {
        self.simulation_start = parse_date_time(Some(start), None)?;
        Ok(self)
    }

    pub fn set_simulation_end_str(&mut self, end: &str) -> Result<&mut Self> {
        self.simulation_end = parse_date_time(Some(end), None)?;
        Ok(self)
    }

    /// Milliseconds since the epoch, converted to the system time zone
    pub fn set_simulation_start_millis(&mut self, millis: i64) -> Result<&mut Self> {
        self.simulation_start = Some(from_millis(millis)?);
        Ok(self)
    }

    pub fn set_simulation_end_millis(&mut self, millis: i64) -> Result<&mut Self> {
        self.simulation_end = Some(from_millis(millis)?);
        Ok(self)
    }

    /// Converted to the system time zone
    pub fn set_simulation_start_at<Tz: TimeZone>(&mut self, start: DateTime<Tz>) -> &mut Self {
        self.simulation_start = Some(util::time::to_local(start));
        self
    }

    pub fn set_simulation_end_at<Tz: TimeZone>(&mut self, end: DateTime<Tz>) -> &mut Self {
        self.simulation_end = Some(util::time::to_local(end));
        self
    }

    pub fn trading_fees(&self) -> Option<&TradingFeesSpec> { self.trading_fees.as_ref() }

    /// Replaces the current fees
    pub fn set_trading_fees(&mut self, fees: Option<TradingFeesSpec>) -> &mut Self {
        self.trading_fees = fees;
        self
    }

    pub fn set_trading_fee_amount(&mut self, amount_per_trade: f64) -> &mut Self {
        self.set_trading_fees(Some(TradingFeesSpec::FixedAmount(amount_per_trade)))
    }

    pub fn set_trading_fee_percentage(&mut self, percentage_per_trade: f64) -> &mut Self {
        self.set_trading_fees(Some(TradingFeesSpec::Percentage(percentage_per_trade)))
    }

    pub fn cache_candles(&self) -> bool { self.cache_candles }

    pub fn set_cache_candles(&mut self, cache_candles: bool) -> &mut Self {
        self.cache_candles = cache_candles;
        self
    }

    /// Initial funds of the reference currency
    pub fn initial_funds(&self) -> f64 { self.initial_amount(DEFAULT_KEY) }

    pub fn set_initial_funds(&self, amount: f64) -> &Self { self.set_initial_amount(DEFAULT_KEY, amount) }

    /// 0 for symbols without initial funds
    pub fn initial_amount(&self, symbol: &str) -> f64 { self.initial_funds.get_or(symbol, 0.0) }

    /// Safe to call while other threads read or write initial amounts
    pub fn set_initial_amount(&self, symbol: &str, amount: f64) -> &Self {
        self.initial_funds.put(symbol, amount);
        self
    }

    pub fn initial_amounts(&self) -> GroupedSettingView<'_, f64> { self.initial_funds.view() }

    fn read_initial_funds(&self, properties: &dyn PropertySource) -> Result<()> {
        let spec = match properties.get_optional_property(INITIAL_FUNDS_PROPERTY)? {
            None => return Ok(()),
            Some(spec) => spec,
        };
        let to_amount = |amount: &str| {
            amount.parse::<f64>().map_err(|e| Error::InvalidGroupedValue {
                setting: "initial funds amount",
                value: amount.to_string(),
                property: INITIAL_FUNDS_PROPERTY.to_string(),
                source: e.into(),
            })
        };
        parse_grouped_setting_into(&spec, to_amount, &self.initial_funds).map_err(|e| match e {
            GroupedSettingError::Syntax(reason) => Error::MalformedGroupedSetting {
                value: spec.clone(),
                property: INITIAL_FUNDS_PROPERTY.to_string(),
                reason,
            },
            GroupedSettingError::Convert(e) => e,
        })
    }
}

fn from_millis(millis: i64) -> Result<NaiveDateTime> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(util::time::to_local)
        .ok_or(Error::InvalidTimestamp(millis))
}

impl ConfigurationGroup for SimulationConfig {
    fn read_properties(&mut self, properties: &dyn PropertySource) -> Result<()> {
        let fees = properties.get_optional_property(TRADE_FEES_PROPERTY)?;
        self.trading_fees =
            TradingFeesResolver::new(self.fee_strategies.as_ref(), TRADE_FEES_PROPERTY).resolve(fees.as_deref())?;
        debug!(fees = ?self.trading_fees, "simulation trading fees");

        let dates = DateTimeParser::default();
        self.simulation_start = dates.parse(
            properties.get_optional_property(START_PROPERTY)?.as_deref(),
            Some(START_PROPERTY),
        )?;
        self.simulation_end = dates.parse(
            properties.get_optional_property(END_PROPERTY)?.as_deref(),
            Some(END_PROPERTY),
        )?;
        debug!(start = ?self.simulation_start, end = ?self.simulation_end, "simulation window");

        self.cache_candles = properties.get_boolean(CACHE_CANDLES_PROPERTY, false)?;

        self.read_initial_funds(properties)?;
        debug!(initial_funds = ?self.initial_funds, cache_candles = self.cache_candles, "simulation settings loaded");
        Ok(())
    }

    fn is_configured(&self) -> bool { self.trading_fees.is_some() && !self.initial_funds.is_empty() }
}
