use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use anyhow::anyhow;
use trading::fees::{SimpleTradingFees, TradingFees};
use trading::plugin::FeeStrategies;

use crate::error::{Error, Result};

/// The fee model a simulation runs with
#[derive(Clone)]
pub enum TradingFeesSpec {
    /// In percent of every trade
    Percentage(f64),
    /// Flat amount per trade
    FixedAmount(f64),
    /// A strategy resolved by name
    Custom {
        name: String,
        strategy: Arc<dyn TradingFees>,
    },
}

impl TradingFeesSpec {
    pub fn strategy(&self) -> Arc<dyn TradingFees> {
        match self {
            TradingFeesSpec::Percentage(p) => Arc::new(SimpleTradingFees::percentage(*p)),
            TradingFeesSpec::FixedAmount(a) => Arc::new(SimpleTradingFees::amount(*a)),
            TradingFeesSpec::Custom { strategy, .. } => strategy.clone(),
        }
    }
}

impl Debug for TradingFeesSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TradingFeesSpec::Percentage(p) => f.debug_tuple("Percentage").field(p).finish(),
            TradingFeesSpec::FixedAmount(a) => f.debug_tuple("FixedAmount").field(a).finish(),
            TradingFeesSpec::Custom { name, .. } => f.debug_struct("Custom").field("name", name).finish(),
        }
    }
}

/// Custom strategies compare by name
impl PartialEq for TradingFeesSpec {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TradingFeesSpec::Percentage(a), TradingFeesSpec::Percentage(b))
            | (TradingFeesSpec::FixedAmount(a), TradingFeesSpec::FixedAmount(b)) => a == b,
            (TradingFeesSpec::Custom { name: a, .. }, TradingFeesSpec::Custom { name: b, .. }) => a == b,
            _ => false,
        }
    }
}

/// Turns the value of a fee property into a [`TradingFeesSpec`].
///
/// A value starting with a digit is numeric : `0.1%` is a percentage, `1.5` a fixed amount. Anything else
/// names a custom strategy looked up in `strategies`, except for values ending with `%` which can only be
/// malformed percentages.
pub struct TradingFeesResolver<'a> {
    strategies: &'a dyn FeeStrategies,
    property: &'a str,
}

impl<'a> TradingFeesResolver<'a> {
    pub fn new(strategies: &'a dyn FeeStrategies, property: &'a str) -> Self { Self { strategies, property } }

    /// A missing or blank value means no fees are configured
    pub fn resolve(&self, fees: Option<&str>) -> Result<Option<TradingFeesSpec>> {
        let spec = match fees.map(str::trim) {
            None | Some("") => return Ok(None),
            Some(s) => s,
        };
        let numeric = spec.starts_with(|c: char| c.is_ascii_digit());
        match spec.strip_suffix('%') {
            Some(rate) if numeric => self.parse_amount(spec, rate).map(|p| Some(TradingFeesSpec::Percentage(p))),
            Some(_) => Err(self.invalid_amount(spec, anyhow!("a percentage must start with a digit"))),
            None if numeric => self.parse_amount(spec, spec).map(|a| Some(TradingFeesSpec::FixedAmount(a))),
            None => self.instantiate(spec).map(Some),
        }
    }

    fn instantiate(&self, name: &str) -> Result<TradingFeesSpec> {
        match self.strategies.instantiate(name) {
            Ok(strategy) => {
                debug!(name, "resolved custom fee strategy");
                Ok(TradingFeesSpec::Custom {
                    name: name.to_string(),
                    strategy,
                })
            }
            Err(source) => {
                warn!(name, "fee strategy could not be instantiated : {}", source);
                Err(Error::FeeStrategyInstantiation {
                    value: name.to_string(),
                    property: self.property.to_string(),
                    source,
                })
            }
        }
    }

    fn parse_amount(&self, spec: &str, amount: &str) -> Result<f64> {
        match amount.trim().parse::<f64>() {
            Ok(a) if a.is_finite() => Ok(a),
            Ok(a) => Err(self.invalid_amount(spec, anyhow!("{} is not a finite amount", a))),
            Err(e) => Err(self.invalid_amount(spec, e.into())),
        }
    }

    fn invalid_amount(&self, spec: &str, source: anyhow::Error) -> Error {
        Error::InvalidFeeAmount {
            value: spec.to_string(),
            property: self.property.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use float_cmp::approx_eq;
    use pretty_assertions::assert_eq;
    use trading::error::Error as TradingError;
    use trading::fees::TradingFees;
    use trading::plugin::{FeeStrategies, PluginFeeStrategies};
    use trading::types::{OrderType, TradeType};

    use crate::error::Error;
    use crate::fees::{TradingFeesResolver, TradingFeesSpec};

    const PROPERTY: &str = "simulation.trade.fees";

    #[derive(Debug, Default)]
    struct TieredFees;

    impl TradingFees for TieredFees {
        fn fees_on_amount(&self, amount: f64, _order_type: OrderType, _side: TradeType) -> f64 {
            if amount > 10_000.0 {
                amount * 0.0005
            } else {
                amount * 0.001
            }
        }

        fn fees_on_total_order_amount(&self, total_order_amount: f64, order_type: OrderType, side: TradeType) -> f64 {
            self.fees_on_amount(total_order_amount, order_type, side)
        }
    }

    trading::fee_strategy!("com.example.MyFees", TieredFees);

    /// Only knows about zero fee exchanges
    struct ZeroFeeStrategies;

    impl FeeStrategies for ZeroFeeStrategies {
        fn instantiate(&self, name: &str) -> trading::error::Result<Arc<dyn TradingFees>> {
            match name {
                "zero" => Ok(Arc::new(trading::fees::SimpleTradingFees::amount(0.0))),
                _ => Err(TradingError::UnknownFeeStrategy(name.to_string())),
            }
        }
    }

    fn resolve(fees: &str) -> crate::error::Result<Option<TradingFeesSpec>> {
        TradingFeesResolver::new(&PluginFeeStrategies, PROPERTY).resolve(Some(fees))
    }

    #[test]
    fn numeric_fees() {
        assert_eq!(resolve("1.5%").unwrap(), Some(TradingFeesSpec::Percentage(1.5)));
        assert_eq!(resolve("1.5").unwrap(), Some(TradingFeesSpec::FixedAmount(1.5)));
        assert_eq!(resolve(" 0.1 % ").unwrap(), Some(TradingFeesSpec::Percentage(0.1)));
        assert_eq!(resolve("2").unwrap(), Some(TradingFeesSpec::FixedAmount(2.0)));
    }

    #[test]
    fn absent_fees() {
        let resolver = TradingFeesResolver::new(&PluginFeeStrategies, PROPERTY);
        assert_eq!(resolver.resolve(None).unwrap(), None);
        assert_eq!(resolver.resolve(Some("  ")).unwrap(), None);
    }

    #[test]
    fn invalid_amounts() {
        for fees in ["%", "abc%", "1.5%%", "1.5abc", "1,5", "-1%", "NaN%", "inf%", ".5%", "1e999", "1e999%"] {
            let err = resolve(fees).unwrap_err();
            assert!(matches!(err, Error::InvalidFeeAmount { .. }), "{}", fees);
            assert_eq!(err.property(), Some(PROPERTY));
            assert_eq!(err.value(), Some(fees));
            assert!(err.is_illegal_configuration());
        }
    }

    #[test]
    fn signed_or_non_digit_values_are_not_amounts() {
        for fees in ["-1", "+2.5", "NaN", "inf", ".5"] {
            let err = resolve(fees).unwrap_err();
            assert!(matches!(err, Error::FeeStrategyInstantiation { .. }), "{}", fees);
            assert_eq!(err.value(), Some(fees));
        }
    }

    #[test]
    fn custom_strategy_by_name() {
        let spec = resolve("com.example.MyFees").unwrap().unwrap();
        assert_eq!(
            spec,
            TradingFeesSpec::Custom {
                name: "com.example.MyFees".to_string(),
                strategy: Arc::new(TieredFees),
            }
        );
        assert!(approx_eq!(
            f64,
            spec.strategy().fees_on_amount(20_000.0, OrderType::Limit, TradeType::Buy),
            10.0,
            epsilon = 1e-9
        ));
    }

    #[test]
    fn unknown_custom_strategy() {
        let err = resolve("com.example.Missing").unwrap_err();
        assert!(matches!(
            &err,
            Error::FeeStrategyInstantiation {
                source: TradingError::UnknownFeeStrategy(_),
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "Error processing trading fees 'com.example.Missing' defined in property 'simulation.trade.fees'"
        );
    }

    #[test]
    fn substitute_strategies() {
        let resolver = TradingFeesResolver::new(&ZeroFeeStrategies, PROPERTY);
        assert!(matches!(resolver.resolve(Some("zero")).unwrap(), Some(TradingFeesSpec::Custom { .. })));
        assert!(resolver.resolve(Some("com.example.MyFees")).is_err());
    }

    #[test]
    fn simple_spec_strategies() {
        let percentage = TradingFeesSpec::Percentage(0.1).strategy();
        assert!(approx_eq!(
            f64,
            percentage.fees_on_amount(1000.0, OrderType::Market, TradeType::Sell),
            1.0,
            epsilon = 1e-9
        ));
        let flat = TradingFeesSpec::FixedAmount(3.0).strategy();
        assert!(approx_eq!(f64, flat.fees_on_amount(1000.0, OrderType::Market, TradeType::Sell), 3.0));
    }
}
