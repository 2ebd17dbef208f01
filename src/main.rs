use clap::{Parser, Subcommand};

mod bill;
mod cmd;
mod export;
mod render;
mod template;

#[derive(Parser, Debug)]
#[command(
    name = "billgen",
    version,
    about = "Fill an HTML bill template with billing data and render it to a PDF"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a billing record to a PDF
    Render(cmd::render::RenderCommand),
    /// Check a billing record against the template without rendering
    Check(cmd::check::CheckCommand),
    /// Print the expected billing record input format
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render(cmd) => cmd.exec(),
        Command::Check(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
