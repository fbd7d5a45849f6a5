use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use simulation::fees::TradingFeesSpec;
use simulation::properties::load_config;
use simulation::{ConfigurationGroup, SimulationConfig};

fn init() { let _ = env_logger::builder().is_test(true).try_init(); }

fn test_data(file: &str) -> PathBuf { PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(file) }

#[test]
fn load_yaml_file() {
    init();
    let config = load_config(test_data("simulation.yaml").to_str().unwrap()).unwrap();
    let simulation = SimulationConfig::load_from(&config).unwrap();
    assert_eq!(simulation.trading_fees(), Some(&TradingFeesSpec::Percentage(0.1)));
    assert_eq!(
        simulation.simulation_start(),
        NaiveDate::from_ymd_opt(2018, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    );
    assert_eq!(
        simulation.simulation_end(),
        NaiveDate::from_ymd_opt(2019, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    );
    assert!(simulation.cache_candles());
    assert_eq!(simulation.initial_amount("USDT"), 2000.0);
    assert_eq!(simulation.initial_amount("ETH"), 100.0);
    assert_eq!(simulation.initial_funds(), 10.0);
    assert!(simulation.is_configured());
}

#[test]
fn load_malformed_toml_file() {
    init();
    let dir = tempdir::TempDir::new("simulation").unwrap();
    let path = dir.path().join("broken.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "[simulation]\nstart = \"2018-01-01\"\nend = \"last tuesday\"").unwrap();
    let config = load_config(path.to_str().unwrap()).unwrap();
    let err = SimulationConfig::load_from(&config).unwrap_err();
    assert_eq!(err.property(), Some("simulation.end"));
    assert_eq!(err.value(), Some("last tuesday"));
}

#[test]
fn nested_values_are_rejected() {
    init();
    let dir = tempdir::TempDir::new("simulation").unwrap();
    let path = dir.path().join("nested.yaml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "simulation:\n  trade:\n    fees: [1, 2]\n  start:\n    a: 1").unwrap();
    let config = load_config(path.to_str().unwrap()).unwrap();
    let err = SimulationConfig::load_from(&config).unwrap_err();
    assert!(matches!(err, simulation::Error::NotAValue { .. }), "{}", err);
    assert!(err.is_illegal_configuration());
    assert_eq!(err.property(), Some("simulation.trade.fees"));
}

#[test]
fn missing_file() {
    assert!(matches!(load_config("does/not/exist.yaml"), Err(simulation::Error::Conf(_))));
}
