use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use supraharmonic_aggregation::{default_config, run_pipeline, save_config, RunBundle};

const QUICKSTART_CONFIG_FILE: &str = "default_config.json";

#[derive(Debug, Parser)]
#[command(name = "supraharmonic-pipeline")]
#[command(about = "Guided pipeline for supraharmonic aggregation analysis")]
struct Cli {
    /// Path to a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for generated artifacts
    #[arg(long, default_value = "manuscript/artifacts")]
    output_dir: PathBuf,

    /// Write the default config into the output directory and run with it
    #[arg(long, default_value_t = false)]
    quickstart: bool,

    /// Write the default configuration JSON to this path and exit
    #[arg(long)]
    write_default_config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    run_id: &'a str,
    artifacts_generated: usize,
    manifest_path: &'a std::path::Path,
    log_path: &'a std::path::Path,
    stats_log_path: &'a std::path::Path,
}

impl<'a> From<&'a RunBundle> for RunSummary<'a> {
    fn from(bundle: &'a RunBundle) -> Self {
        Self {
            run_id: &bundle.run.run_id,
            artifacts_generated: bundle.artifacts.len(),
            manifest_path: &bundle.run_manifest_path,
            log_path: &bundle.run.log_path,
            stats_log_path: &bundle.run.stats_log_path,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(error) = try_main() {
        eprintln!("Pipeline failed: {error:#}");
        std::process::exit(1);
    }
}

/// Config file the run should use. With `--quickstart` and no `--config`,
/// the defaults are first written to `<output_dir>/default_config.json`.
fn resolve_config_path(cli: &Cli) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = &cli.config {
        return Ok(Some(path.clone()));
    }
    if !cli.quickstart {
        return Ok(None);
    }

    let path = cli.output_dir.join(QUICKSTART_CONFIG_FILE);
    save_config(&default_config(), &path)
        .with_context(|| format!("failed to write quickstart config to {}", path.display()))?;
    Ok(Some(path))
}

fn try_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.write_default_config.as_deref() {
        let path = save_config(&default_config(), path)
            .with_context(|| format!("failed to write default config to {}", path.display()))?;
        println!("Wrote default config: {}", path.display());
        return Ok(());
    }

    let config_path = resolve_config_path(&cli)?;
    let bundle = run_pipeline(config_path.as_deref(), &cli.output_dir)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&RunSummary::from(&bundle))?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use supraharmonic_aggregation::{load_config, AnalysisConfig};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("supraharmonic-pipeline").chain(args.iter().copied()))
            .expect("cli args")
    }

    #[test]
    fn defaults_without_flags() {
        let cli = parse(&[]);
        assert_eq!(cli.output_dir, PathBuf::from("manuscript/artifacts"));
        assert!(!cli.quickstart);
        assert_eq!(resolve_config_path(&cli).expect("resolve"), None);
    }

    #[test]
    fn quickstart_writes_default_config_into_output_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("out");
        let cli = parse(&["--quickstart", "--output-dir", out.to_str().expect("utf8")]);

        let path = resolve_config_path(&cli).expect("resolve").expect("config path");
        assert_eq!(path, out.join(QUICKSTART_CONFIG_FILE));
        assert_eq!(load_config(Some(&path)).expect("load"), AnalysisConfig::default());
    }

    #[test]
    fn explicit_config_wins_over_quickstart() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("out");
        let config = dir.path().join("custom.json");
        let cli = parse(&[
            "--quickstart",
            "--config",
            config.to_str().expect("utf8"),
            "--output-dir",
            out.to_str().expect("utf8"),
        ]);

        assert_eq!(resolve_config_path(&cli).expect("resolve"), Some(config));
        assert!(!out.join(QUICKSTART_CONFIG_FILE).exists());
    }
}
