// tts-norm 命令行入口

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tts_norm_lib::{init_logging, CaseMode, EngineConfig, LabelCache, Normalizer};

/// Normalize written German text into its spoken form for speech synthesis.
#[derive(Debug, Parser)]
#[command(name = "tts-norm", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Engine config file (JSON). Defaults to the per-user config if present.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Case mode: as_is, lower or upper_canonical.
    #[arg(long = "case", value_name = "MODE")]
    case_mode: Option<CaseMode>,
    /// Keep several weighted alternatives per chunk.
    #[arg(long)]
    non_deterministic: bool,
    /// Custom whitelist (TSV).
    #[arg(long, value_name = "PATH")]
    whitelist: Option<PathBuf>,
    /// Load built-in tables from this directory.
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Text to normalize. Reads stdin line by line when omitted.
    text: Vec<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write a default config file.
    InitConfig {
        /// Destination path.
        path: PathBuf,
    },
}

impl Cli {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load_from(path)?,
            None => EngineConfig::load()?,
        };
        if let Some(mode) = self.case_mode {
            config.case_mode = mode;
        }
        if self.non_deterministic {
            config.deterministic = false;
        }
        if let Some(path) = &self.whitelist {
            config.custom_table_path = Some(path.clone());
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    if let Some(Commands::InitConfig { path }) = &cli.command {
        EngineConfig::default().save_to(path)?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = cli.engine_config()?;
    let deterministic = config.deterministic;
    let cache = LabelCache::new();
    let engine = Normalizer::new(config, &cache).context("构造规范化引擎失败")?;

    let inputs: Vec<String> = if cli.text.is_empty() {
        std::io::stdin()
            .lock()
            .lines()
            .collect::<std::io::Result<_>>()
            .context("读取标准输入失败")?
    } else {
        vec![cli.text.join(" ")]
    };

    let mut failed = 0usize;
    for (line, result) in inputs.iter().zip(engine.normalize_batch(&inputs)) {
        match result {
            Ok(result) => {
                println!("{}", result.text);
                if !deterministic {
                    for alternatives in result.alternatives() {
                        for alt in alternatives {
                            println!("\t{:.4}\t{}", alt.weight, alt.text);
                        }
                    }
                }
                for failure in &result.failures {
                    eprintln!("unnormalized chunk {}: {}", failure.index, failure.reason);
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("error: {:?}: {}", line, e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} inputs failed", failed, inputs.len());
    }
    Ok(())
}
