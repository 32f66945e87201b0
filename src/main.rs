use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use agent_sandbox::{
    logging, AgentLoader, ArgumentBag, CapabilityConfig, CapabilityRegistry, Config,
    DocumentParser, ParserMode,
};

#[derive(Parser)]
#[command(name = "agent-sandbox")]
#[command(about = "Load an agent role and preview its persona, rules and tools", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(help = "Path to the role document")]
    role: PathBuf,

    #[arg(help = "Task description passed to the agent")]
    prompt: String,

    #[arg(long, value_enum, help = "Document parser to use (overrides AGENT_SANDBOX_PARSER)")]
    parser: Option<ParserMode>,

    #[arg(long, value_name = "TOOL", help = "Invoke one of the agent's tools after loading")]
    invoke: Option<String>,

    #[arg(long = "arg", value_name = "VALUE", help = "Argument for --invoke; repeat, or use key=value pairs")]
    args: Vec<String>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::from_env();
    if let Some(parser) = cli.parser {
        config.parser = parser;
    }

    let registry =
        CapabilityRegistry::builtin(&CapabilityConfig::new(config.absolute_sandbox_root()));
    let loader = AgentLoader::new(&registry, DocumentParser::new(config.parser));

    let agent = loader
        .load(&cli.role)
        .with_context(|| format!("failed to load role {}", cli.role.display()))?;

    println!("Task: {}", cli.prompt.trim());
    print!("{}", agent.preview());

    if let Some(tool) = &cli.invoke {
        let args = ArgumentBag::from_words(&cli.args);
        match agent.invoke(tool, &args) {
            Ok(output) => println!("{}", serde_json::to_string_pretty(&output)?),
            Err(e) => eprintln!("Tool error: {e}"),
        }
    }

    Ok(())
}
