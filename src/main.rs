#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # differate
//!
//! Converts notebooks to scripts and compares student submissions.
//!
//! Convert every notebook below the current directory:
//!
//! `differate convert`
//!
//! Compare `.py` files of one lab, starting from code cell 5:
//!
//! `differate diff -d "/path/to/Lab 3" -c 5`
//!
//! Convert, then compare two exercises across two folders:
//!
//! `differate convert diff -d "Lab 3/group1" -d "Lab 3/group2" -z 2 -s results`

use std::path::PathBuf;

use anyhow::Result;
use bpaf::*;
use colored::Colorize;
use differate::{
    config::{Action, Config},
    constants::DEFAULT_FILETYPE,
    report::summary_table,
};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Parsed command line.
#[derive(Debug, Clone)]
struct Opts {
    /// `-d`, repeatable.
    dirs:     Vec<PathBuf>,
    /// `-c`.
    cell:     usize,
    /// `-z`.
    numexc:   u32,
    /// `-s`.
    save:     PathBuf,
    /// `-f`.
    filetype: String,
    /// `-v`.
    verbose:  bool,
    /// Positional actions.
    actions:  Vec<Action>,
}

impl From<Opts> for Config {
    fn from(opts: Opts) -> Self {
        let dirs = if opts.dirs.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            opts.dirs
        };

        Config::builder()
            .dirs(dirs)
            .start_cell(opts.cell)
            .exercises(opts.numexc)
            .save_dir(opts.save)
            .filetype(opts.filetype)
            .actions(opts.actions)
            .build()
    }
}

/// Parse the command line arguments
fn options() -> Opts {
    let dirs = short('d')
        .long("dir")
        .help("Directory to scan for files; repeat for several. Default is the current directory")
        .argument::<PathBuf>("DIRECTORY")
        .many();

    let cell = short('c')
        .long("cell")
        .help("Code cell from which to begin the similarity check; 0 compares whole files")
        .argument::<usize>("CELLNUM")
        .fallback(0)
        .display_fallback();

    let numexc = short('z')
        .long("numexc")
        .help("Number of exercises in the lab, each compared separately")
        .argument::<u32>("NUMEXC")
        .fallback(1)
        .display_fallback();

    let save = short('s')
        .long("save")
        .help("Directory to save results to; created if missing. Default is the current directory")
        .argument::<PathBuf>("DIRECTORY")
        .fallback(PathBuf::from("."));

    let filetype = short('f')
        .long("filetype")
        .help("File type to compare")
        .argument::<String>("FILETYPE")
        .fallback(DEFAULT_FILETYPE.to_string())
        .display_fallback();

    let verbose = short('v')
        .long("verbose")
        .help("Log every pairwise ratio")
        .switch();

    let actions = positional::<Action>("ACTION")
        .help("`convert` notebooks to scripts and/or `diff` files; both when omitted")
        .many();

    construct!(Opts {
        dirs,
        cell,
        numexc,
        save,
        filetype,
        verbose,
        actions
    })
    .to_options()
    .descr("Convert notebooks to scripts and compare student submissions for similarity")
    .footer("Outputs per exercise: <label>_similarity.csv, <label>_similarity.svg and one <label>_<name1>_<name2>.diff per pair")
    .run()
}

fn main() -> Result<()> {
    let opts = options();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let level = if opts.verbose { Level::DEBUG } else { Level::INFO };
    let filter_layer = LevelFilter::from_level(level);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let config = Config::from(opts);
    let outcomes = differate::run(&config)?;

    for outcome in &outcomes {
        println!("{}", outcome.comparison.label.bold());
        println!("{}", summary_table(&outcome.comparison));
    }

    Ok(())
}
