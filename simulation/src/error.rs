use config::ConfigError;

fn of_property(property: &Option<String>) -> String {
    property
        .as_ref()
        .map(|p| format!(" of property '{}'", p))
        .unwrap_or_default()
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unrecognized date format in value '{value}'{}. Supported formats are: {supported}", of_property(.property))]
    InvalidDateFormat {
        value: String,
        property: Option<String>,
        supported: String,
    },
    #[error("Invalid trading fee amount '{value}' defined in property '{property}'")]
    InvalidFeeAmount {
        value: String,
        property: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Error processing trading fees '{value}' defined in property '{property}'")]
    FeeStrategyInstantiation {
        value: String,
        property: String,
        #[source]
        source: trading::error::Error,
    },
    #[error("Invalid {setting} '{value}' defined in property '{property}'")]
    InvalidGroupedValue {
        /// What the value stands for, e.g. `initial funds amount`
        setting: &'static str,
        value: String,
        property: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Malformed setting '{value}' defined in property '{property}': {reason}")]
    MalformedGroupedSetting {
        value: String,
        property: String,
        reason: String,
    },
    #[error("Invalid boolean '{value}' defined in property '{property}'")]
    InvalidBoolean { value: String, property: String },
    #[error("Property '{property}' holds '{value}' where a single value is expected")]
    NotAValue { value: String, property: String },
    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(i64),
    #[error("configuration error")]
    Conf(#[from] ConfigError),
}

impl Error {
    /// Whether the error comes from a malformed property value, the caller has to fix it and reload
    pub fn is_illegal_configuration(&self) -> bool { self.value().is_some() }

    /// The property that held the offending value, if known
    pub fn property(&self) -> Option<&str> {
        match self {
            Error::InvalidDateFormat { property, .. } => property.as_deref(),
            Error::InvalidFeeAmount { property, .. }
            | Error::FeeStrategyInstantiation { property, .. }
            | Error::InvalidGroupedValue { property, .. }
            | Error::MalformedGroupedSetting { property, .. }
            | Error::InvalidBoolean { property, .. }
            | Error::NotAValue { property, .. } => Some(property),
            Error::InvalidTimestamp(_) | Error::Conf(_) => None,
        }
    }

    /// The raw offending value
    pub fn value(&self) -> Option<&str> {
        match self {
            Error::InvalidDateFormat { value, .. }
            | Error::InvalidFeeAmount { value, .. }
            | Error::FeeStrategyInstantiation { value, .. }
            | Error::InvalidGroupedValue { value, .. }
            | Error::MalformedGroupedSetting { value, .. }
            | Error::InvalidBoolean { value, .. }
            | Error::NotAValue { value, .. } => Some(value),
            Error::InvalidTimestamp(_) | Error::Conf(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
