use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use spritesheet::{AnimationSource as _, ExportConfigDef, Margin, PackDirection, PngFileHost};

#[derive(Parser, Debug)]
#[command(name = "spritesheet", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack a document's animation frames into one PNG sprite sheet.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input document manifest JSON.
    #[arg(long)]
    doc: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Export options JSON. Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON report of frame placements here.
    #[arg(long)]
    manifest: Option<PathBuf>,

    #[arg(long, value_enum)]
    direction: Option<DirectionArg>,

    /// Rows, used with column-major packing.
    #[arg(long)]
    rows: Option<u32>,

    /// Columns, used with row-major packing.
    #[arg(long)]
    columns: Option<u32>,

    /// First frame (defaults to the playback start).
    #[arg(long)]
    start: Option<u64>,

    /// Last frame, inclusive (defaults to the playback end).
    #[arg(long)]
    end: Option<u64>,

    #[arg(long)]
    step: Option<u64>,

    /// Crop frames to the union of their non-transparent bounds.
    #[arg(long, overrides_with = "no_trim")]
    trim: bool,

    #[arg(long, overrides_with = "trim")]
    no_trim: bool,

    #[arg(long, overrides_with = "no_skip_blank")]
    skip_blank: bool,

    #[arg(long, overrides_with = "skip_blank")]
    no_skip_blank: bool,

    #[arg(long, overrides_with = "no_only_keyframes")]
    only_keyframes: bool,

    #[arg(long, overrides_with = "only_keyframes")]
    no_only_keyframes: bool,

    #[arg(long, overrides_with = "no_skip_duplicate")]
    skip_duplicate: bool,

    #[arg(long, overrides_with = "skip_duplicate")]
    no_skip_duplicate: bool,

    /// Crop margin as `left,top,right,bottom`.
    #[arg(long, allow_hyphen_values = true)]
    margin: Option<MarginArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionArg {
    #[value(name = "row_major", alias = "horizontal")]
    RowMajor,
    #[value(name = "column_major", alias = "vertical")]
    ColumnMajor,
}

impl From<DirectionArg> for PackDirection {
    fn from(d: DirectionArg) -> Self {
        match d {
            DirectionArg::RowMajor => PackDirection::RowMajor,
            DirectionArg::ColumnMajor => PackDirection::ColumnMajor,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct MarginArg(Margin);

impl FromStr for MarginArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("margin '{s}': {e}"))?;
        let [left, top, right, bottom] = parts[..] else {
            return Err(format!("margin '{s}' must have four comma-separated values"));
        };
        Margin::new(left, top, right, bottom)
            .map(Self)
            .map_err(|e| e.to_string())
    }
}

impl ExportArgs {
    fn overrides(&self) -> ExportConfigDef {
        ExportConfigDef {
            direction: self.direction.map(Into::into),
            rows: self.rows,
            columns: self.columns,
            range_start: self.start,
            range_end: self.end,
            range_step: self.step,
            trim: switch(self.trim, self.no_trim),
            skip_blank: switch(self.skip_blank, self.no_skip_blank),
            only_keyframes: switch(self.only_keyframes, self.no_only_keyframes),
            skip_duplicate: switch(self.skip_duplicate, self.no_skip_duplicate),
            margin: self.margin.map(|m| m.0),
        }
    }
}

/// `--x` / `--no-x` pair; the last one given wins, neither leaves the config file's value.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
    }
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut doc = spritesheet::load_document(&args.doc)
        .with_context(|| format!("load document '{}'", args.doc.display()))?;

    let file_def = match &args.config {
        Some(path) => ExportConfigDef::from_path(path)
            .with_context(|| format!("load export config '{}'", path.display()))?,
        None => ExportConfigDef::default(),
    };
    let cfg = file_def
        .overlaid(args.overrides())
        .resolve(doc.info());

    let mut host = PngFileHost::new(&args.out);
    let report = spritesheet::export_spritesheet(&mut doc, &mut host, &cfg)
        .with_context(|| format!("export '{}'", args.doc.display()))?;

    if let Some(path) = &args.manifest {
        report.write_json(path)?;
    }

    eprintln!(
        "wrote {} ({}x{}, {} frames)",
        args.out.display(),
        report.width,
        report.height,
        report.placements.len()
    );
    Ok(())
}
