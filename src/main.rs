use env_logger::Env;
use log::info;
use readout::ExperimentConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = ExperimentConfig::from_env()?;
    let record = readout::run(&config)?;

    info!("finished {} points", record.points.len());
    Ok(())
}
