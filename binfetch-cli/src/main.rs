//! Binfetch CLI
//!
//! Resolves a catalogued tool binary, downloading it on first use.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use binfetch_core::{
    get_all_tool_specs, get_tool_spec, ResolutionCache, ResolverConfig, SearchPath, ToolResolver,
};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "binfetch", version, about = "Fetch prebuilt tool binaries on first use")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Directory installed binaries are cached in
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Release host to download from instead of https://github.com
    #[arg(long, global = true)]
    release_base: Option<String>,

    /// Do not look for the tool on PATH
    #[arg(long, global = true)]
    no_path: bool,

    /// Fail on unrecognized CPU architectures instead of assuming amd64
    #[arg(long, global = true)]
    strict_arch: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve the tool and print its path
    Path {
        #[arg(long, default_value = "fzf")]
        tool: String,
    },
    /// Show where the tool would be downloaded from and installed to
    Info {
        #[arg(long, default_value = "fzf")]
        tool: String,
    },
    /// Resolve the tool and run it with the given arguments
    Run {
        #[arg(long, default_value = "fzf")]
        tool: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

impl GlobalArgs {
    fn config(&self) -> ResolverConfig {
        let mut config = ResolverConfig::from_env();
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = Some(dir.clone());
        }
        if let Some(base) = &self.release_base {
            config.release_base = Some(base.clone());
        }
        if self.no_path {
            config.search_path = SearchPath::Disabled;
        }
        if self.strict_arch {
            config.strict_arch = true;
        }
        config
    }
}

fn resolver_for(tool: &str, config: &ResolverConfig) -> Result<ToolResolver> {
    let spec = get_tool_spec(tool).with_context(|| {
        let known: Vec<&str> = get_all_tool_specs().iter().map(|s| s.name).collect();
        format!("Unknown tool: {} (available: {})", tool, known.join(", "))
    })?;
    Ok(ToolResolver::new(spec, config))
}

fn print_info(resolver: &ToolResolver) {
    let spec = resolver.spec();
    println!("tool:       {} v{}", spec.name, spec.version);
    println!("host:       {}", resolver.host());
    println!("cache path: {}", resolver.cache_filepath().display());

    match resolver.descriptor() {
        Ok(descriptor) => {
            let coordinate = descriptor.coordinate(spec, resolver.release_base());
            println!("platform:   {}_{}", descriptor.label, descriptor.arch.tag);
            if descriptor.arch.fell_back {
                println!("            (architecture {} not recognized)", resolver.host().arch);
            }
            println!("format:     {}", descriptor.format);
            println!("url:        {}", coordinate.url);
        }
        Err(e) => println!("platform:   {}", e),
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.global.config();

    match cli.command {
        Command::Path { tool } => {
            let cache = ResolutionCache::new(resolver_for(&tool, &config)?);
            let path = cache.filepath().await?;
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Info { tool } => {
            print_info(&resolver_for(&tool, &config)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Run { tool, args } => {
            let cache = ResolutionCache::new(resolver_for(&tool, &config)?);
            let path = cache.filepath().await?;

            tracing::debug!("Running {} {:?}", path.display(), args);
            let status = tokio::process::Command::new(&path)
                .args(&args)
                .status()
                .await
                .with_context(|| format!("Failed to run {}", path.display()))?;

            let code = status.code().unwrap_or(1);
            Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.global.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("binfetch_core={}", level).parse()?)
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    tracing::debug!("Starting binfetch v{}", binfetch_core::VERSION);

    run(cli).await
}
