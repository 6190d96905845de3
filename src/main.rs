use clap::Parser;
use sched_talks::utils::logger;
use sched_talks::{CliConfig, Defaults, EnvSnapshot, LocalStorage, SchedPipeline, Settings, TalksEngine};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    let settings = Settings::resolve(&cli.flags(), &EnvSnapshot::capture(), &Defaults::default());
    tracing::info!("Starting sched-talks");
    tracing::debug!("Settings: {:?}", settings);

    // Fragment and README live next to the invocation.
    let storage = LocalStorage::new(".");
    let pipeline = SchedPipeline::new(storage, settings);
    let engine = TalksEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Talks exported to {}", output_path);
        }
        Err(e) => {
            tracing::error!("❌ Export failed: {}", e);
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }
}
