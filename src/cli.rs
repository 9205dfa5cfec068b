use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Language server for ZX16 assembly")]
pub(crate) struct Cli {
    /// Accept a single TCP connection instead of using stdio
    #[arg(long)]
    pub listen: bool,
    #[arg(long)]
    pub host: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
    /// Run diagnostics on the provided files and print results to stdout
    #[arg(long, num_args = 1..)]
    pub diagnose: Vec<std::path::PathBuf>,
}
