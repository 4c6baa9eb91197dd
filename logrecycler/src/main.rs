use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;

use logrecycler::cli::RecyclerCli;
use logrecycler::{logging, runner, sinks};
use logrecycler_core::config::RecyclerConfig;
use logrecycler_pipeline::LineProcessorBuilder;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = RecyclerCli::parse();

    if !cli.validate && std::io::stdin().is_terminal() {
        // 파이프 입력이 없으면 사용법만 출력
        eprintln!("{}", RecyclerCli::command().render_help());
        eprintln!("example: my-app 2>&1 | logrecycler --config logrecycler.yaml");
        return Ok(ExitCode::FAILURE);
    }

    logging::init_tracing(&cli.log_level, &cli.log_format)?;

    let config = RecyclerConfig::load(&cli.config)
        .await
        .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;

    if cli.validate {
        LineProcessorBuilder::new()
            .config(config)
            .build()
            .map_err(|e| anyhow::anyhow!("invalid config: {}", e))?;
        eprintln!("{}: configuration is valid", cli.config.display());
        return Ok(ExitCode::SUCCESS);
    }

    let sinks = sinks::build_sinks(&config)?;

    let mut builder = LineProcessorBuilder::new().config(config);
    for sink in sinks {
        builder = builder.sink(sink);
    }
    let processor = builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build line processor: {}", e))?;

    tracing::info!(
        config = %cli.config.display(),
        sinks = ?processor.sink_names(),
        "logrecycler started"
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout().lock();
    let summary = runner::run_stream(&processor, stdin, &mut stdout).await?;

    tracing::info!(
        read = summary.read,
        emitted = summary.emitted,
        discarded = summary.discarded,
        "logrecycler finished"
    );

    Ok(ExitCode::SUCCESS)
}
