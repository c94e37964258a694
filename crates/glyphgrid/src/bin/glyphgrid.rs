use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use glyphgrid::glyphs::synth::{random_codes, render_board, target_at, BoardSpec, XorShift64};
use glyphgrid::image::{frame_to_rgba, gray_to_luma, load_frame};
use glyphgrid::matching::columns_for_len;
use glyphgrid::{Alphabet, CellBox, ReadMode, ScanConfig, ScanReport, Scanner, TemplateLibrary};
use serde::Serialize;

#[derive(Debug, Parser)]
/// Locate a glyph grid and its target strip in an image and report where
/// the target sequence occurs in the grid.
#[command(name = "glyphgrid", version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON (only with the `tracing` feature).
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scan one image.
    Scan {
        /// Image file to scan.
        image: PathBuf,

        /// JSON scan config; command-line options override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Compare decoded codes or raw pixels.
        #[arg(long, value_enum)]
        mode: Option<Mode>,

        /// Read with this alphabet instead of detecting it.
        #[arg(long)]
        alphabet: Option<Alphabet>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,

        /// Also write the JSON report to this file.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Render a synthetic board and print its ground truth.
    Synth {
        #[arg(long, default_value = "digits")]
        alphabet: Alphabet,

        /// Grid index where the target sequence starts.
        #[arg(long, default_value_t = 43)]
        position: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Uniform noise amplitude in gray levels.
        #[arg(long, default_value_t = 8)]
        noise: u8,

        /// Left-to-right brightness ramp in gray levels.
        #[arg(long, default_value_t = 40.0)]
        gradient: f32,

        /// Output PNG path.
        #[arg(long)]
        output: PathBuf,

        /// Print the ground truth as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Write the normalized templates of one alphabet as a PNG contact sheet.
    Templates {
        #[arg(long)]
        alphabet: Alphabet,

        #[arg(long, default_value_t = 10)]
        columns: usize,

        /// Output PNG path.
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Text,
    Pixels,
}

impl From<Mode> for ReadMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Text => ReadMode::Text,
            Mode::Pixels => ReadMode::Pixels,
        }
    }
}

#[derive(Serialize)]
struct SynthTruth<'a> {
    alphabet: Alphabet,
    position: usize,
    grid_codes: &'a [String],
    target_codes: &'a [String],
    grid_cells: &'a [CellBox],
    target_cells: &'a [CellBox],
}

fn init_logging(cli: &Cli) {
    #[cfg(feature = "tracing")]
    {
        let _ = cli.verbose;
        glyphgrid::core::init_tracing(cli.log_json);
    }
    #[cfg(not(feature = "tracing"))]
    {
        if cli.log_json {
            eprintln!("--log-json needs the `tracing` feature; using plain logs");
        }
        let level = glyphgrid::core::level_for_verbosity(cli.verbose);
        if let Err(err) = glyphgrid::core::init_with_level(level) {
            eprintln!("failed to install logger: {err}");
        }
    }
}

fn print_codes(label: &str, codes: &[String], cols: usize) {
    println!("{label}:");
    for row in codes.chunks(cols.max(1)) {
        println!("  {}", row.join(" "));
    }
}

fn print_report(report: &ScanReport) {
    println!("status: {}", report.status);
    if let Some(alphabet) = report.alphabet {
        println!("alphabet: {alphabet}");
    }
    if !report.target_codes.is_empty() {
        println!("target: {}", report.target_codes.join(" "));
    }
    if !report.grid_codes.is_empty() {
        let codes = &report.grid_codes;
        print_codes("grid", codes, columns_for_len(codes.len()));
    }
    if let Some(m) = &report.match_result {
        println!(
            "match: position {} (row {}, col {}), score {:.2}, confidence {:.2}",
            m.position, m.row, m.col, m.score, m.confidence
        );
    }
}

fn run_scan(
    image: PathBuf,
    config: Option<PathBuf>,
    mode: Option<Mode>,
    alphabet: Option<Alphabet>,
    json: bool,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = match config {
        Some(path) => ScanConfig::load_json(path)?,
        None => ScanConfig::default(),
    };
    if let Some(mode) = mode {
        cfg.params.mode = mode.into();
    }
    if alphabet.is_some() {
        cfg.params.alphabet = alphabet;
    }

    let frame = load_frame(&image)?;
    log::info!(
        "scanning {} ({}x{})",
        image.display(),
        frame.width(),
        frame.height()
    );
    let started = std::time::Instant::now();
    let report = Scanner::new(cfg.params.clone()).scan(&frame);
    log::info!("scan took {:.1} ms", started.elapsed().as_secs_f64() * 1e3);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    if let Some(path) = output.or_else(|| cfg.output_path.as_ref().map(PathBuf::from)) {
        report.write_json(&path)?;
        log::info!("report written to {}", path.display());
    }
    Ok(())
}

fn run_synth(
    alphabet: Alphabet,
    position: usize,
    seed: u64,
    noise: u8,
    gradient: f32,
    output: PathBuf,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = XorShift64::new(seed);
    let grid = random_codes(alphabet, 80, &mut rng);
    let target = target_at(&grid, position);
    let spec = BoardSpec {
        noise,
        gradient,
        seed,
        ..BoardSpec::for_alphabet(alphabet)
    };
    let board = render_board(alphabet, &grid, &target, &spec)?;
    frame_to_rgba(&board.frame).save(&output)?;
    log::info!("board written to {}", output.display());

    let position = position % grid.len();
    if json {
        let truth = SynthTruth {
            alphabet,
            position,
            grid_codes: &grid,
            target_codes: &target,
            grid_cells: &board.grid_cells,
            target_cells: &board.target_cells,
        };
        println!("{}", serde_json::to_string_pretty(&truth)?);
    } else {
        let cols = columns_for_len(grid.len());
        println!("alphabet: {alphabet}");
        println!("target: {}", target.join(" "));
        println!(
            "position: {} (row {}, col {})",
            position,
            position / cols + 1,
            position % cols + 1
        );
        print_codes("grid", &grid, cols);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        Command::Scan {
            image,
            config,
            mode,
            alphabet,
            json,
            output,
        } => run_scan(image, config, mode, alphabet, json, output),
        Command::Synth {
            alphabet,
            position,
            seed,
            noise,
            gradient,
            output,
            json,
        } => run_synth(alphabet, position, seed, noise, gradient, output, json),
        Command::Templates {
            alphabet,
            columns,
            output,
        } => {
            let sheet = TemplateLibrary::default().contact_sheet(alphabet, columns);
            gray_to_luma(&sheet).save(&output)?;
            println!(
                "{} templates of {alphabet} written to {}",
                alphabet.glyphs().len(),
                output.display()
            );
            Ok(())
        }
    }
}
