use anyhow::Context;
use clap::Parser;
use quarry::utils::{logger, validation::Validate};
use quarry::{Batch, CliConfig, FederationConfig, QueryManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting quarry");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = FederationConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let manager = config.manager()?;
    match run(&manager, &cli).await {
        Ok(batch) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&batch.rows)?);
            } else {
                write_csv(&batch)?;
            }
            tracing::info!(rows = batch.len(), "query completed");
        }
        Err(e) => {
            tracing::error!("Query failed: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn run(manager: &QueryManager, cli: &CliConfig) -> quarry::Result<Batch> {
    let (source, table) = cli.scan_target()?;
    let mut builder = manager.plan_builder().await?.scan(source, table)?;
    if let Some(predicate) = cli.filter_expr()? {
        builder = builder.filter(predicate)?;
    }
    if !cli.columns.is_empty() {
        builder = builder.project(cli.columns.iter().cloned())?;
    }
    if let Some(limit) = cli.limit {
        builder = builder.limit(limit)?;
    }
    let plan = builder.build()?;
    manager.query(&plan).await
}

fn write_csv(batch: &Batch) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record(batch.schema.column_names())?;
    for row in &batch.rows {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }
    writer.flush()?;
    Ok(())
}
