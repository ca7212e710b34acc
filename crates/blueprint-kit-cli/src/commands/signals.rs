//! `signals` command: blueprint build cost as constant-combinator signals.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use blueprint_kit_lib::{convert_blueprint_to_signals, SignalOptions, DEFAULT_REMAP};

#[derive(Args, Debug, Clone)]
pub struct SignalsArgs {
    /// File holding the blueprint string (defaults to stdin).
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,
    /// Signals per constant combinator.
    #[arg(long, default_value_t = 1)]
    pub capacity: usize,
    /// Do not place a requester chest next to each combinator.
    #[arg(long)]
    pub no_requester: bool,
    /// Requesters do not pull from buffer chests.
    #[arg(long)]
    pub no_buffer_requests: bool,
    /// Quality written on every signal.
    #[arg(long, default_value = "normal")]
    pub quality: String,
}

impl SignalsArgs {
    fn options(&self) -> Result<SignalOptions> {
        let mut options =
            SignalOptions::with_capacity(self.capacity).context("invalid --capacity")?;
        options.include_requester = !self.no_requester;
        options.request_from_buffers = !self.no_buffer_requests;
        options.quality = self.quality.clone();
        Ok(options)
    }
}

/// Handle the signals subcommand.
pub fn handle_signals(plan_string: &str, args: &SignalsArgs) -> Result<String> {
    let options = args.options()?;
    convert_blueprint_to_signals(plan_string, &DEFAULT_REMAP, &options)
        .context("failed to convert blueprint to signals")
}
