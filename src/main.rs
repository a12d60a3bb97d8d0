use clap::{Parser as ClapParser, Subcommand};
use kusto_tool::cli::{self, CliError, RenderOptions, SetOptions};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "kusto")]
#[command(about = "kusto - Render Kusto queries, set commands and literals")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a query template
    Render {
        /// The query template (reads from stdin if not provided)
        query: Option<String>,

        /// Template parameters as a JSON object
        #[arg(short, long)]
        params: Option<String>,
    },

    /// Render a .set-or-append / .set-or-replace command for a query
    Set {
        /// The query template (reads from stdin if not provided)
        query: Option<String>,

        /// Destination table
        #[arg(short, long)]
        table: String,

        /// Folder for the table metadata
        #[arg(short, long, default_value = "")]
        folder: String,

        /// Docstring for the table metadata
        #[arg(short, long, default_value = "")]
        docstring: String,

        /// Replace the table contents instead of appending
        #[arg(long)]
        replace: bool,

        /// Template parameters as a JSON object
        #[arg(short, long)]
        params: Option<String>,
    },

    /// Print a JSON value as a query literal
    Literal {
        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render { query, params } => read_input(query).and_then(|query| {
            cli::execute_render(&RenderOptions { query, params })
        }),
        Commands::Set {
            query,
            table,
            folder,
            docstring,
            replace,
            params,
        } => read_input(query).and_then(|query| {
            cli::execute_set(&SetOptions {
                render: RenderOptions { query, params },
                table,
                folder,
                docstring,
                replace,
            })
        }),
        Commands::Literal { input } => {
            read_input(input).and_then(|json| cli::json_to_literal(&json))
        }
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn read_input(arg: Option<String>) -> Result<String, CliError> {
    match arg {
        Some(s) => Ok(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Ok(buffer.trim_end().to_string())
        }
        None => Err(CliError::NoInput),
    }
}
