use std::path::PathBuf;

use clap::Parser;
use repl::Repl;

mod repl;

/// Parse keyspace queries and print their canonical form.
#[derive(Parser, Debug)]
#[command(name = "keyql", version)]
struct Args {
    /// Statements to evaluate. Starts the REPL when neither this nor --file is given.
    query: Option<String>,

    /// Evaluate the statements in a file instead.
    #[arg(short, long, conflicts_with = "query")]
    file: Option<PathBuf>,

    /// Print the WHERE filters of each statement as a table.
    #[arg(long)]
    filters: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let mut repl = Repl::new(args.filters);

    let result = match (args.file, args.query) {
        (Some(file), _) => repl.eval_file(&file)?,
        (None, Some(query)) => repl.eval_command(&query),
        (None, None) => {
            println!("keyql");
            return repl.run();
        }
    };

    if !repl.print_command_result(result) {
        std::process::exit(1);
    }

    Ok(())
}
