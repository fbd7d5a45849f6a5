#[derive(Debug, PartialEq, Eq, Deserialize, Serialize, Clone, Copy, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderType {
    Limit,
    Market,
}

impl Default for OrderType {
    fn default() -> Self { Self::Limit }
}

#[derive(Display, Copy, Debug, PartialEq, Eq, Clone, Deserialize, Serialize, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TradeType {
    Sell,
    Buy,
}

impl Default for TradeType {
    fn default() -> Self { Self::Buy }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn parse_from_names() {
        assert_eq!(OrderType::from_str("market").ok(), Some(OrderType::Market));
        assert_eq!(TradeType::from_str("sell").ok(), Some(TradeType::Sell));
        assert_eq!(TradeType::Buy.to_string(), "buy");
        assert!(OrderType::from_str("stop").is_err());
    }
}
