use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use criteria_sql::config::{self, CompilerConfig};
use criteria_sql::criteria::{Criteria, RefreshCondition};
use criteria_sql::sql_generator::{CriteriaCompiler, SqlDialect};
use log::info;
use serde::de::DeserializeOwned;

/// criteria-sql - compile query and refresh criteria into parameterized SQL
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML compiler configuration (overrides CRITERIA_SQL_* variables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Target dialect: mysql or clickhouse
    #[arg(long, global = true)]
    dialect: Option<SqlDialect>,

    /// Alias of the COUNT projection
    #[arg(long, global = true)]
    count_alias: Option<String>,

    /// Character replacing '.' in aggregate aliases
    #[arg(long, global = true)]
    alias_separator: Option<String>,

    /// Prefix of generated result aliases
    #[arg(long, global = true)]
    result_alias_prefix: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a read criteria into SELECT and COUNT statements
    Select {
        /// Entity catalog YAML
        #[arg(long)]
        catalog: PathBuf,

        /// Criteria YAML
        #[arg(long)]
        criteria: PathBuf,
    },
    /// Compile a refresh condition into an UPDATE statement
    Refresh {
        /// Entity catalog YAML
        #[arg(long)]
        catalog: PathBuf,

        /// Refresh condition YAML
        #[arg(long)]
        refresh: PathBuf,
    },
}

impl From<&Cli> for config::CliConfig {
    fn from(cli: &Cli) -> Self {
        config::CliConfig {
            dialect: cli.dialect,
            count_alias: cli.count_alias.clone(),
            alias_separator: cli.alias_separator.clone(),
            result_alias_prefix: cli.result_alias_prefix.clone(),
        }
    }
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn build_config(cli: &Cli) -> anyhow::Result<CompilerConfig> {
    let mut config = CompilerConfig::from_env().context("invalid CRITERIA_SQL_* environment")?;
    if let Some(path) = &cli.config {
        config.merge(
            CompilerConfig::from_yaml_file(path)
                .with_context(|| format!("invalid configuration file {}", path.display()))?,
        );
    }
    config
        .merge_cli(cli.into())
        .context("invalid command-line configuration")?;
    Ok(config)
}

fn build_compiler(config: &CompilerConfig, catalog: &Path) -> anyhow::Result<CriteriaCompiler> {
    let compiler = CriteriaCompiler::from_catalog_file(catalog, config)
        .with_context(|| format!("failed to load catalog {}", catalog.display()))?;
    info!(
        "Loaded {} entities, compiling for {}",
        compiler.catalog().len(),
        config.dialect
    );
    Ok(compiler)
}

fn main() -> anyhow::Result<()> {
    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let output = match &cli.command {
        Command::Select { catalog, criteria } => {
            let compiler = build_compiler(&config, catalog)?;
            let criteria: Criteria = read_yaml(criteria)?;
            let parsed = compiler.compile(&criteria)?;
            serde_json::json!({
                "sql": parsed.select_sql,
                "count_sql": parsed.count_sql,
                "values": parsed.values,
                "result_mapping": parsed.result_mapping,
            })
        }
        Command::Refresh { catalog, refresh } => {
            let compiler = build_compiler(&config, catalog)?;
            let refresh: RefreshCondition = read_yaml(refresh)?;
            let parsed = compiler.compile_refresh(&refresh)?;
            serde_json::json!({
                "sql": parsed.sql,
                "values": parsed.values,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
