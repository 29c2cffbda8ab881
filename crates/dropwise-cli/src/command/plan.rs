use std::path::PathBuf;

use dropwise_engine::Observation;

use crate::{schema::config::Config, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlanArg {
    /// Path to the observation file (JSON format)
    observation: PathBuf,
    /// Path to a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlanArg) -> anyhow::Result<()> {
    let PlanArg {
        observation,
        config,
        output,
    } = arg;

    let config = Config::load(config.as_deref())?;
    let observation: Observation = util::read_json_file("observation", observation)?;
    let plan = config.planner().plan(&observation);
    util::write_json(&plan, output.as_deref())
}
