use clap::Parser;

/// Two-player snake on one keyboard.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Run a headless random-input soak of the simulation instead of
    /// opening a window.
    #[arg(long)]
    pub soak: bool,

    /// How many simulation ticks the soak runs for.
    #[arg(long, default_value_t = 100_000)]
    pub soak_ticks: u64,
}
