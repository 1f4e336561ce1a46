//! Command line access to the mark engine: list the marks of a prefix, look
//! up the mark of one address, and render the rule text of a target.
use std::io::Write;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use log::debug;

use marksrc::rule::{check_entry, netmask_from_prefix_len, parse_uint, TargetOptions};
use marksrc::{Address128, Prefix, ValidConfig};

#[derive(Debug, Clone, Parser)]
#[command(name = "marksrc", version)]
/// Map IPv6 source address sub-ranges onto 32-bit packet marks.
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List every mark of the range together with the sub-prefix it covers.
    Enumerate {
        #[command(flatten)]
        range: RangeArgs,

        /// Stop after this many entries.
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Print the mark of a single address.
    Mark {
        #[command(flatten)]
        range: RangeArgs,

        /// The source address to look up.
        #[arg(short, long)]
        address: Address128,
    },
    /// Print the listing and save forms of the target.
    Rule {
        #[command(flatten)]
        range: RangeArgs,
    },
}

/// The three parameters of a mark range.
#[derive(Debug, Clone, Args)]
pub struct RangeArgs {
    /// Source prefix, `<address>[/<length>]`.
    #[arg(short, long)]
    pub source: Prefix,

    /// End of the client index bits.
    #[arg(long, default_value_t = 128, value_parser = parse_sub_prefix_len)]
    pub sub_prefix_len: u8,

    /// Mark of the first client. Decimal or `0x` hex; a leading zero does
    /// not make it octal.
    #[arg(long, default_value_t = 0, value_parser = parse_mark_offset)]
    pub mark_offset: u32,
}

fn parse_sub_prefix_len(text: &str) -> Result<u8, marksrc::rule::RuleError> {
    parse_uint(text, 0, 128).map(|v| v as u8)
}

fn parse_mark_offset(text: &str) -> Result<u32, marksrc::rule::RuleError> {
    parse_uint(text, 0, u64::from(u32::MAX)).map(|v| v as u32)
}

impl RangeArgs {
    /// Validate the range the same way rule insertion does.
    pub fn to_config(&self) -> anyhow::Result<ValidConfig> {
        let opts = TargetOptions {
            mark_offset: self.mark_offset,
            sub_prefix_len: self.sub_prefix_len,
        };
        let netmask = netmask_from_prefix_len(self.source.len());
        check_entry(self.source.address(), netmask, &opts)
            .with_context(|| format!("rejected mark range for {}", self.source))
    }
}

/// Execute `opt`, writing its report to `out`.
pub fn run(opt: Opt, out: &mut dyn Write) -> anyhow::Result<()> {
    match opt.command {
        Command::Enumerate { range, limit } => {
            let cfg = range.to_config()?;
            debug!("enumerating {} marks", cfg.client_count());

            writeln!(out, "Mark\t\tPrefix")?;
            let limit = limit.unwrap_or(u64::MAX);
            for entry in cfg
                .enumerate()
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
            {
                writeln!(out, "{}", entry)?;
            }
        }
        Command::Mark { range, address } => {
            let cfg = range.to_config()?;
            let mark = cfg.mark_of(&address);
            writeln!(out, "{}\t{:#x}", mark, mark)?;
        }
        Command::Rule { range } => {
            let cfg = range.to_config()?;
            writeln!(out, "{}", cfg.summary())?;
            writeln!(out, "{}", cfg.save())?;
        }
    }
    out.flush()?;
    Ok(())
}
