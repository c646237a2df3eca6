use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use segviz::render::ColorStyle;
use segviz::{Command, Outcome, Session, TreeConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "segviz", about = "Segment tree range queries with ASCII visualization")]
struct Cli {
    /// Number of leaves (power of two >= 2).
    #[arg(long, default_value_t = 16)]
    leaves: usize,
    /// Width of each rendered value.
    #[arg(long, default_value_t = 5)]
    node_width: usize,
    /// Saved tree location used by `save` and `load`.
    #[arg(long, default_value = "./data/segtree.json")]
    store: PathBuf,
    /// Disable ANSI colors.
    #[arg(long)]
    plain: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive session reading commands from stdin (default).
    Repl,
    /// Build 1..=L and walk through a query, an update and a merge flip.
    Demo,
    /// Execute `;`-separated session commands, e.g. `run auto; query 1 4`.
    Run {
        /// Commands to execute.
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        script: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = TreeConfig::default()
        .with_leaf_count(cli.leaves)
        .with_node_width(cli.node_width)
        .with_store_path(cli.store)
        .with_color_style(if cli.plain {
            ColorStyle::Plain
        } else {
            ColorStyle::Ansi
        })
        .validate()
        .context("invalid configuration")?;

    let mut session = Session::new(config);
    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => run_repl(&mut session)?,
        Commands::Demo => run_demo(&mut session)?,
        Commands::Run { script } => run_script(&mut session, &script.join(" "))?,
    }

    Ok(())
}

fn run_repl(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{}", Command::usage(session.config().leaf_count));
    loop {
        print!("\n> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("failed to read command")? == 0 {
            break;
        }
        match session.run_line(&line) {
            Outcome::Continue(text) => println!("{}", text),
            Outcome::Quit => break,
        }
    }

    println!("\nClosing down!");
    Ok(())
}

fn run_demo(session: &mut Session) -> Result<()> {
    let last = session.config().leaf_count;
    let script = format!(
        "auto; query 1 {}; query 2 {}; update 1 2; flip; query 3 3",
        last,
        last / 2 + 1
    );
    run_script(session, &script)
}

fn run_script(session: &mut Session, script: &str) -> Result<()> {
    for line in script.split(';').map(str::trim).filter(|l| !l.is_empty()) {
        println!("> {}", line);
        let command = Command::parse(line).with_context(|| format!("invalid command '{}'", line))?;
        match session
            .execute(command)
            .with_context(|| format!("command '{}' failed", line))?
        {
            Outcome::Continue(text) => println!("{}", text),
            Outcome::Quit => break,
        }
    }
    Ok(())
}
