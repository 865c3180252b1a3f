use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use electric_cli::config::config::{render_settings, CheckConfig, PsqlConfig};
use electric_cli::dedent::{dedent_str, min_indent};
use electric_cli::error::CliError;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Clone, Debug)]
pub struct DedentCommandArgs {
    /// File to normalize. Reads stdin when omitted or `-`.
    pub file: Option<PathBuf>,

    /// Print the common indentation before the normalized text
    #[arg(long, default_value_t = false)]
    pub show_indent: bool,
}

#[derive(Parser, Clone, Debug)]
pub struct CompletionsCommandArgs {
    pub shell: Shell,
}

#[derive(Subcommand)]
enum Commands {
    /// Strip common indentation and re-flow wrapped lines
    #[command()]
    Dedent(DedentCommandArgs),

    /// Check that the ElectricSQL sync service is running
    #[command()]
    Check(CheckConfig),

    /// Print the psql connection settings for the ElectricSQL PostgreSQL proxy
    #[command()]
    Psql(PsqlConfig),

    /// Generate a shell completion script
    #[command()]
    Completions(CompletionsCommandArgs),
}

struct ElectricCli {}

impl ElectricCli {
    fn read_input(&self, file: Option<&Path>) -> Result<String, CliError> {
        match file {
            Some(path) if path != Path::new("-") => {
                debug!("Reading input from {}", path.display());
                std::fs::read_to_string(path).map_err(|source| CliError::ReadInput {
                    path: path.to_path_buf(),
                    source,
                })
            }
            _ => {
                debug!("Reading input from stdin");
                let mut input = String::new();
                std::io::stdin().read_to_string(&mut input)?;
                Ok(input)
            }
        }
    }

    fn dedent_cmd(&self, args: DedentCommandArgs) -> Result<()> {
        let input = self.read_input(args.file.as_deref())?;
        let lines = input.split('\n').collect::<Vec<&str>>();
        let indent = min_indent(&lines);
        debug!("Read {} bytes, {} lines, common indent {:?}", input.len(), lines.len(), indent);

        if args.show_indent {
            match indent {
                Some(indent) => println!("common indent: {indent}"),
                None => println!("common indent: none"),
            }
        }

        println!("{}", dedent_str(&input));
        Ok(())
    }

    fn check_cmd(&self, args: CheckConfig) -> Result<()> {
        info!("Checking sync service at {}:{}", args.host, args.http_port);
        println!("{}", render_settings(&args)?);
        Ok(())
    }

    fn psql_cmd(&self, args: PsqlConfig) -> Result<()> {
        info!("Resolved PostgreSQL proxy settings for {}:{}", args.host, args.pg_proxy_port);
        println!("{}", render_settings(&args)?);
        Ok(())
    }

    fn completions_cmd(&self, args: CompletionsCommandArgs) -> Result<()> {
        let mut command = Cli::command();
        let bin_name = command.get_name().to_string();
        clap_complete::generate(args.shell, &mut command, bin_name, &mut std::io::stdout());
        Ok(())
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_on_error(result: Result<()>, failure: &str) {
    if let Err(err) = result {
        eprintln!("{failure}");
        eprintln!("{err:#}");
        process::exit(1)
    }
}

fn main() {
    init_tracing();

    let args = Cli::parse();
    let electric_cli = ElectricCli {};

    match args.command {
        Some(Commands::Dedent(args)) => {
            exit_on_error(electric_cli.dedent_cmd(args), "Failed to normalize input")
        }
        Some(Commands::Check(args)) => {
            exit_on_error(electric_cli.check_cmd(args), "Failed to check sync service")
        }
        Some(Commands::Psql(args)) => {
            exit_on_error(electric_cli.psql_cmd(args), "Failed to resolve psql settings")
        }
        Some(Commands::Completions(args)) => exit_on_error(
            electric_cli.completions_cmd(args),
            "Failed to generate completions",
        ),
        None => {
            eprintln!("No command provided");
            process::exit(1)
        }
    }
}
