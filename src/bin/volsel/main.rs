//! Volsel CLI - select loose mesh parts by bounding-box volume.
//!
//! Usage: volsel <COMMAND> [OPTIONS] <INPUT>
//!
//! Run `volsel --help` for available commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};

use volsel::config::Preset;
use volsel::io;
use volsel::mesh::{extract_selected, EditMesh, ObjectTransform};
use volsel::select::{
    self, find_loose_parts, Direction, Progress, RangeList, SelectMode, SelectOptions,
    ThresholdRange,
};

#[derive(Parser)]
#[command(name = "volsel")]
#[command(author, version, about = "Select loose mesh parts by bounding-box volume", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information and loose part volumes
    Info {
        /// Input mesh file
        input: PathBuf,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Select loose parts whose volume falls into any range
    Select {
        /// Input mesh file
        input: PathBuf,

        /// Threshold range as [LABEL=]MIN:MAX; leave a side empty to disable it
        #[arg(short, long = "range", value_name = "MIN:MAX", allow_hyphen_values = true)]
        ranges: Vec<ThresholdRange>,

        /// Preset file with ranges and select mode
        #[arg(short, long)]
        preset: Option<PathBuf>,

        /// Element kinds to select, e.g. `vert,face` (default: preset mode or all)
        #[arg(short, long)]
        mode: Option<SelectMode>,

        #[command(flatten)]
        transform: TransformArgs,

        /// Write the selection report as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Write the selected geometry to a mesh file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Bake the object transform into the written geometry
        #[arg(long, requires = "output")]
        world: bool,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Create and edit range preset files
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },

    /// Show a short tutorial
    Tutorial,
}

#[derive(Subcommand)]
enum PresetAction {
    /// Create a preset with no ranges
    New {
        /// Preset file
        file: PathBuf,

        /// Element kinds to select
        #[arg(short, long, default_value = "all")]
        mode: SelectMode,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Append a range and make it active
    Add {
        /// Preset file
        file: PathBuf,

        /// Enable Min with this value
        #[arg(long, allow_hyphen_values = true, value_parser = parse_bound)]
        min: Option<f64>,

        /// Enable Max with this value
        #[arg(long, allow_hyphen_values = true, value_parser = parse_bound)]
        max: Option<f64>,

        /// Label (default: "Range N")
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Remove the active range
    Remove {
        /// Preset file
        file: PathBuf,

        /// Make this range active first
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Move the active range up or down
    Move {
        /// Preset file
        file: PathBuf,

        /// Direction to move
        #[arg(value_enum)]
        direction: MoveDirection,

        /// Make this range active first
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Print the ranges of a preset
    Show {
        /// Preset file
        file: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum MoveDirection {
    /// Towards the front of the list
    Up,
    /// Towards the back of the list
    Down,
}

impl From<MoveDirection> for Direction {
    fn from(direction: MoveDirection) -> Self {
        match direction {
            MoveDirection::Up => Direction::Up,
            MoveDirection::Down => Direction::Down,
        }
    }
}

/// Object placement applied before volumes are measured.
#[derive(Args)]
struct TransformArgs {
    /// Object scale as X,Y,Z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    scale: Option<[f64; 3]>,

    /// Object rotation in degrees as X,Y,Z (XYZ Euler)
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    rotate: Option<[f64; 3]>,

    /// Object location as X,Y,Z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    translate: Option<[f64; 3]>,
}

impl TransformArgs {
    fn to_transform(&self) -> ObjectTransform {
        let mut t = ObjectTransform::default();
        if let Some(scale) = self.scale {
            t = t.with_scale(scale);
        }
        if let Some(rotation) = self.rotate {
            t = t.with_rotation_deg(rotation);
        }
        if let Some(location) = self.translate {
            t = t.with_location(location);
        }
        t
    }

    fn apply(&self, mesh: &mut EditMesh) {
        let t = self.to_transform();
        if !t.is_identity() {
            mesh.set_transform(t.to_matrix());
        }
    }
}

fn parse_bound(s: &str) -> Result<f64, String> {
    let value: f64 = s.trim().parse().map_err(|e| format!("'{}': {}", s.trim(), e))?;
    if !value.is_finite() {
        return Err("bound must be finite; omit the flag for no bound".to_string());
    }
    Ok(value)
}

fn parse_vec3(s: &str) -> Result<[f64; 3], String> {
    let values: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("'{}': {}", p.trim(), e)))
        .collect::<Result<_, _>>()?;
    match values.as_slice() {
        &[x, y, z] if values.iter().all(|v| v.is_finite()) => Ok([x, y, z]),
        &[_, _, _] => Err("values must be finite".to_string()),
        _ => Err(format!("expected X,Y,Z, got {} value(s)", values.len())),
    }
}

const TUTORIAL: &str = "\
Volume Select - Quick Tutorial

1) Pick a mesh file (OBJ, PLY, STL, glTF). Every loose part of it is measured.
2) Choose the element kinds with --mode: vert, edge, face, or a list like vert,face.
3) Create ranges with --range MIN:MAX or `volsel preset add`. Leave a side empty
   to disable that bound:
   - If Min is disabled, the range starts from 0.
   - If Max is disabled, the range is open-ended upward.
4) Reorder ranges in a preset with `volsel preset move FILE up|down`.
5) Run `volsel select` to apply the selection; use --output to keep the result.

Notes:
- Volumes are bounding-box volumes in scene units^3 (world-space); use
  --scale, --rotate and --translate to place the object.
- Use large Max values for big scenes.
- `volsel info FILE` lists every part with its volume.
";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input, transform } => {
            cmd_info(&input, &transform)?;
        }

        Commands::Select {
            input,
            ranges,
            preset,
            mode,
            transform,
            report,
            output,
            world,
            sequential,
        } => {
            let args = SelectArgs {
                ranges,
                preset,
                mode,
                report,
                output,
                world,
                sequential,
            };
            cmd_select(&input, &transform, args)?;
        }

        Commands::Preset { action } => {
            cmd_preset(action)?;
        }

        Commands::Tutorial => {
            print!("{}", TUTORIAL);
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Only move forward
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }
        let percent = raw_percent.max(previous);

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {:<28}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &Path, transform: &TransformArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: EditMesh = io::load(input)?;
    transform.apply(&mut mesh);

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Edges: {}", mesh.num_edges());
    println!("Faces: {}", mesh.num_faces());

    let loose_edges = mesh.edge_ids().filter(|&e| mesh.is_loose_edge(e)).count();
    let isolated = mesh.vertex_ids().filter(|&v| mesh.is_isolated_vertex(v)).count();
    println!("Loose edges: {}", loose_edges);
    println!("Isolated vertices: {}", isolated);

    if let Some((min, max)) = mesh.world_bounding_box() {
        println!(
            "Bounding box (world): ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    let parts = find_loose_parts(&mesh);
    let bounds = select::volume::part_bounds_all(&mesh, &parts, true);
    println!("Loose parts: {}", parts.len());

    if !parts.is_empty() {
        println!();
        println!("{:>6} {:>10} {:>14}  {:>32}", "Part", "Vertices", "Volume", "Size");
        for (i, (part, aabb)) in parts.iter().zip(&bounds).enumerate() {
            let (volume, size) = match aabb {
                Some(b) => {
                    let e = b.extent();
                    (b.volume(), format!("{:.4} x {:.4} x {:.4}", e.x, e.y, e.z))
                }
                None => (0.0, "-".to_string()),
            };
            println!("{:>6} {:>10} {:>14.6}  {:>32}", i, part.len(), volume, size);
        }
    }

    Ok(())
}

struct SelectArgs {
    ranges: Vec<ThresholdRange>,
    preset: Option<PathBuf>,
    mode: Option<SelectMode>,
    report: Option<PathBuf>,
    output: Option<PathBuf>,
    world: bool,
    sequential: bool,
}

fn cmd_select(
    input: &Path,
    transform: &TransformArgs,
    args: SelectArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ranges: Vec<ThresholdRange> = Vec::new();
    let mut mode = SelectMode::default();
    if let Some(path) = &args.preset {
        let preset = Preset::load(path)?;
        println!("Preset: {} ({} range(s))", path.display(), preset.ranges.len());
        ranges.extend(preset.ranges);
        mode = preset.mode;
    }
    ranges.extend(args.ranges);
    if let Some(m) = args.mode {
        mode = m;
    }

    let mut mesh: EditMesh = io::load(input)?;
    transform.apply(&mut mesh);
    println!(
        "Loaded: {} vertices, {} edges, {} faces",
        mesh.num_vertices(),
        mesh.num_edges(),
        mesh.num_faces()
    );

    for (i, range) in ranges.iter().enumerate() {
        println!("  [{}] {}", i, range);
    }

    let exec = if args.sequential { "sequential" } else { "parallel" };
    println!("Selecting {} by volume ({} range(s), {})...", mode, ranges.len(), exec);

    let options = SelectOptions::default()
        .with_mode(mode)
        .with_parallel(!args.sequential);
    let progress = create_progress();

    let start = Instant::now();
    let report = select::select_by_ranges_with_progress(&mut mesh, &ranges, &options, &progress)?;
    let elapsed = start.elapsed();

    println!(
        "Matched {} of {} loose parts ({:.2?})",
        report.num_matched(),
        report.parts.len(),
        elapsed
    );
    println!(
        "Selected: {} vertices, {} edges, {} faces",
        report.selected_vertices, report.selected_edges, report.selected_faces
    );

    if let Some(path) = &args.report {
        io::report::save_selection_report(&report, path)?;
        println!("Report: {}", path.display());
    }

    if let Some(path) = &args.output {
        let mut selected = extract_selected(&mesh)?;
        if args.world {
            selected.apply_transform();
        }
        io::save(&selected, path)?;
        println!(
            "Saved: {} ({} vertices, {} faces)",
            path.display(),
            selected.num_vertices(),
            selected.num_faces()
        );
    }

    Ok(())
}

fn cmd_preset(action: PresetAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PresetAction::New { file, mode, force } => {
            if file.exists() && !force {
                return Err(format!("{} already exists (use --force)", file.display()).into());
            }
            Preset::new(RangeList::new(), mode).save(&file)?;
            println!("Created: {}", file.display());
        }

        PresetAction::Add {
            file,
            min,
            max,
            label,
        } => {
            let mut preset = Preset::load(&file)?;
            let mut list = preset.range_list()?;
            let range = list.add();
            if let Some(label) = label {
                range.label = label;
            }
            range.set_min(min);
            range.set_max(max);
            let added = range.to_string();
            preset.set_range_list(list);
            preset.save(&file)?;
            println!("Added: {}", added);
        }

        PresetAction::Remove { file, index } => {
            let mut preset = Preset::load(&file)?;
            let mut list = preset.range_list()?;
            if let Some(i) = index {
                list.set_active(i)?;
            }
            let removed = list.remove_active()?;
            println!("Removed: {}", removed);
            preset.set_range_list(list);
            preset.save(&file)?;
        }

        PresetAction::Move {
            file,
            direction,
            index,
        } => {
            let mut preset = Preset::load(&file)?;
            let mut list = preset.range_list()?;
            if let Some(i) = index {
                list.set_active(i)?;
            }
            if list.move_active(direction.into())? {
                if let (Some(i), Some(range)) = (list.active_index(), list.active()) {
                    println!("Moved '{}' to position {}", range.label, i);
                }
            } else {
                println!("Range is already at the end of the list");
            }
            preset.set_range_list(list);
            preset.save(&file)?;
        }

        PresetAction::Show { file } => {
            let preset = Preset::load(&file)?;
            println!("File: {}", file.display());
            println!("Mode: {}", preset.mode);
            if preset.ranges.is_empty() {
                println!("No ranges");
            }
            for (i, range) in preset.ranges.iter().enumerate() {
                let marker = if preset.active == Some(i) { '*' } else { ' ' };
                println!("{} [{}] {}", marker, i, range);
            }
        }
    }

    Ok(())
}
