mod ffi;
mod layout;

use crate::layout::{ReportOptions, StructureSet};
use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

/// Print the in-memory sizes of Mach-O header records
#[derive(Parser, Debug)]
#[command()]
struct Args {
    /// Which group of records to report
    #[arg(long, value_enum, default_value_t = StructureSet::Core)]
    set: StructureSet,
    /// Only report the named record (may be repeated)
    #[arg(long, value_name = "NAME")]
    only: Vec<String>,
    /// Also print each record's alignment
    #[arg(long)]
    align: bool,
    /// Colorize the output
    #[arg(long)]
    color: bool,
    /// Log layout details to stderr
    #[arg(long, short)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let descriptors = layout::select(args.set.descriptors(), &args.only)?;
    log::debug!("reporting {} of {:?} records", descriptors.len(), args.set);

    let options = ReportOptions {
        show_align: args.align,
        color: args.color,
    };
    let stdout = std::io::stdout();
    layout::report(&mut stdout.lock(), &descriptors, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn no_arguments_means_core_report() {
        let args = Args::try_parse_from(["macho_sizes"]).unwrap();
        assert_eq!(args.set, StructureSet::Core);
        assert!(args.only.is_empty());
        assert!(!args.align && !args.color && !args.verbose);
    }

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "macho_sizes",
            "--set",
            "extended",
            "--only",
            "fat_arch",
            "--only",
            "section",
            "--align",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.set, StructureSet::Extended);
        assert_eq!(args.only, ["fat_arch", "section"]);
        assert!(args.align && args.verbose);
    }

    #[test]
    fn rejects_unknown_set() {
        assert!(Args::try_parse_from(["macho_sizes", "--set", "elf"]).is_err());
    }
}
