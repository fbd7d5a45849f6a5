#[macro_use]
extern crate tracing;

use itertools::Itertools;
use simulation::fees::TradingFeesSpec;
use simulation::properties::load_config;
use simulation::{ConfigurationGroup, SimulationConfig};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
enum SimulationCmd {
    /// Print the resolved simulation settings
    Show,
    /// Fail unless the simulation settings are valid and complete
    Check,
}

#[derive(StructOpt, Debug)]
#[structopt(name = "simulation")]
struct SimulationCliOptions {
    /// yaml, toml or json file, TRADER_ prefixed environment variables override its values
    #[structopt(short, long)]
    config: String,
    #[structopt(subcommand)]
    cmd: Option<SimulationCmd>,
}

fn describe_fees(fees: Option<&TradingFeesSpec>) -> String {
    match fees {
        None => "none".to_string(),
        Some(TradingFeesSpec::Percentage(p)) => format!("{}% per trade", p),
        Some(TradingFeesSpec::FixedAmount(a)) => format!("{} per trade", a),
        Some(TradingFeesSpec::Custom { name, .. }) => name.clone(),
    }
}

fn show(conf: &SimulationConfig) {
    println!("start          : {}", conf.simulation_start());
    println!("end            : {}", conf.simulation_end());
    println!("trading fees   : {}", describe_fees(conf.trading_fees()));
    println!("cache candles  : {}", conf.cache_candles());
    let amounts = conf.initial_amounts().to_map();
    for (symbol, amount) in amounts.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        let symbol = if symbol.is_empty() { "<reference>" } else { symbol.as_str() };
        println!("initial funds  : {} {}", amount, symbol);
    }
}

fn main() -> anyhow::Result<()> {
    util::trace::init_tracing_env_subscriber();

    let opts = SimulationCliOptions::from_args();
    let properties = load_config(&opts.config)?;
    let conf = SimulationConfig::load_from(&properties)?;
    info!(config = %opts.config, "simulation settings loaded");
    match opts.cmd.unwrap_or(SimulationCmd::Show) {
        SimulationCmd::Show => show(&conf),
        SimulationCmd::Check => {
            if !conf.is_configured() {
                anyhow::bail!("{} : trading fees and initial funds are required", opts.config);
            }
            info!("simulation settings are valid");
        }
    }
    Ok(())
}
