//! Warcraft II map (.pud) parser CLI
//!
//! A command-line interface for inspecting, validating and previewing PUD
//! map files.
//!
//! ## Commands
//!
//! - `info` - Display map statistics and the chunk layout
//! - `parse` - Decode a map with output format options
//! - `render` - Rasterize a map preview to PNG or JPEG
//! - `validate` - Validate map format (exit codes for scripting)
//! - `batch` - Process every map in a directory

use clap::{Parser, Subcommand, ValueEnum};
use pud_parser::chunk::scan_known_chunks;
use pud_parser::render::DEFAULT_TILE_PIXEL_SIZE;
use pud_parser::{
    decode_with_report, try_render, DecodeReport, ExportFormat, MapDescription, RenderOptions,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// Warcraft II map (.pud) parser
#[derive(Parser)]
#[command(name = "pud-parser")]
#[command(about = "Warcraft II map (.pud) parser", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (repeat for more); `RUST_LOG` directives
    /// override it
    #[arg(short = 'v', long = "verbosity", action = clap::ArgAction::Count)]
    verbosity: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display map information
    Info {
        /// Path to the map file
        file: PathBuf,
    },
    /// Parse a map file
    Parse {
        /// Path to the map file
        file: PathBuf,
        /// Output format: json, pretty
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
        /// Include every unit placement
        #[arg(long)]
        units: bool,
        /// Include the raw tile grid
        #[arg(long)]
        tiles: bool,
    },
    /// Render a map preview
    Render {
        /// Path to the map file
        file: PathBuf,
        /// Output image path (defaults to <stem>.png next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Image format when no output path is given
        #[arg(short, long, default_value = "png")]
        format: ImageFormat,
        /// Pixels per tile
        #[arg(long, default_value_t = DEFAULT_TILE_PIXEL_SIZE)]
        tile_size: NonZeroU32,
        /// Do not draw gold mines and oil patches
        #[arg(long)]
        no_resources: bool,
        /// Do not draw start locations
        #[arg(long)]
        no_start_locations: bool,
    },
    /// Validate map format
    Validate {
        /// Path to the map file
        file: PathBuf,
        /// Verbose error reporting
        #[arg(short, long)]
        verbose: bool,
    },
    /// Parse multiple map files
    Batch {
        /// Directory containing map files
        directory: PathBuf,
        /// Output directory for JSON files and previews
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also render a PNG preview of each map
        #[arg(long)]
        render: bool,
        /// Generate summary report
        #[arg(long)]
        summary: bool,
        /// Continue on errors
        #[arg(long)]
        continue_on_error: bool,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

/// Preview image formats
#[derive(Clone, Copy, Debug, ValueEnum)]
enum ImageFormat {
    Png,
    Jpeg,
}

impl From<ImageFormat> for ExportFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Png => ExportFormat::Png,
            ImageFormat::Jpeg => ExportFormat::Jpeg,
        }
    }
}

// ============================================================================
// Serializable Output Structures
// ============================================================================

#[derive(Serialize)]
struct MapInfo {
    description: String,
    era: String,
    width: u16,
    height: u16,
    dimensions: String,
    size_class: String,
    version: u16,
    format_tag: String,
    file_size: usize,
    statistics: StatsInfo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    units: Option<Vec<UnitInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tiles: Option<Vec<u16>>,
}

#[derive(Serialize)]
struct StatsInfo {
    total_units: usize,
    gold_mines: usize,
    oil_patches: usize,
    resource_nodes: usize,
    start_locations: usize,
    players: usize,
}

#[derive(Serialize)]
struct UnitInfo {
    x: u16,
    y: u16,
    unit_type: u8,
    kind: String,
    player: u8,
    alteration: u16,
}

#[derive(Serialize)]
struct BatchSummary {
    total_files: usize,
    successful: usize,
    failed: usize,
    total_units: usize,
    era_distribution: BTreeMap<String, usize>,
    size_class_distribution: BTreeMap<String, usize>,
}

// ============================================================================
// Validation Result Structure
// ============================================================================

struct ValidationResult {
    read_valid: bool,
    decode_valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn is_valid(&self) -> bool {
        self.read_valid && self.decode_valid
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match cli.command {
        Commands::Info { file } => cmd_info(&file),
        Commands::Parse {
            file,
            output,
            units,
            tiles,
        } => cmd_parse(&file, output, units, tiles),
        Commands::Render {
            file,
            output,
            format,
            tile_size,
            no_resources,
            no_start_locations,
        } => {
            let options = RenderOptions::default()
                .with_tile_pixel_size(tile_size)
                .with_resources(!no_resources)
                .with_start_locations(!no_start_locations);
            cmd_render(&file, output, format.into(), &options)
        }
        Commands::Validate { file, verbose } => cmd_validate(&file, verbose),
        Commands::Batch {
            directory,
            output,
            render,
            summary,
            continue_on_error,
        } => cmd_batch(&directory, output, render, summary, continue_on_error),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .init();
}

fn load_map(file: &Path) -> Result<(DecodeReport, usize), String> {
    let data = std::fs::read(file).map_err(|e| format!("Error reading file: {e}"))?;
    let report = decode_with_report(&data).map_err(|e| format!("Error decoding map: {e}"))?;
    Ok((report, data.len()))
}

// ============================================================================
// Info Command Implementation
// ============================================================================

fn cmd_info(file: &Path) -> ExitCode {
    let data = match std::fs::read(file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading file: {e}");
            return ExitCode::FAILURE;
        }
    };

    let report = match decode_with_report(&data) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error decoding map: {e}");
            return ExitCode::FAILURE;
        }
    };

    print_info(&report.map, &data);

    ExitCode::SUCCESS
}

#[allow(clippy::cast_precision_loss)]
fn print_info(map: &MapDescription, data: &[u8]) {
    let stats = map.stats();

    println!("=== Map Information ===\n");

    println!("File:");
    println!(
        "  Size: {} bytes ({:.2} KB)",
        data.len(),
        data.len() as f64 / 1024.0
    );
    println!("  Format Tag: {}", map.tag_hex());
    println!("  Version: {}", map.version);

    println!();

    println!("Map:");
    println!("  Description: {}", map.description);
    println!("  Era: {}", map.era);
    println!("  Dimensions: {} ({})", map.dimensions_string(), map.size_class);
    let grid = if map.has_complete_tile_grid() { "complete" } else { "incomplete" };
    println!(
        "  Tile Grid: {} of {} cells ({grid})",
        map.tiles.len(),
        map.expected_tile_count()
    );

    println!();

    println!("Units:");
    println!("  Total: {}", stats.total_units);
    println!("  Gold Mines: {}", stats.gold_mines);
    println!("  Oil Patches: {}", stats.oil_patches);
    println!("  Start Locations: {}", stats.start_locations);
    println!("  Players: {}", stats.players);

    if stats.resource_nodes() > 0 {
        println!();
        println!("Resources:");
        for unit in map.resource_nodes() {
            println!("  {:?} at ({}, {})", unit.kind(), unit.x, unit.y);
        }
    }

    if stats.start_locations > 0 {
        println!();
        println!("Start Locations:");
        for unit in map.start_locations() {
            println!("  Player {} at ({}, {})", unit.player, unit.x, unit.y);
        }
    }

    println!();

    println!("Chunks:");
    for (tag, section) in scan_known_chunks(data) {
        match section {
            Some(s) => println!(
                "  {tag}: payload at 0x{:X}, {} bytes{}",
                s.payload_offset,
                s.length,
                if s.payload(data).is_some() { "" } else { " (truncated)" }
            ),
            None => println!("  {tag}: absent"),
        }
    }
}

// ============================================================================
// Parse Command Implementation
// ============================================================================

fn cmd_parse(file: &Path, output: OutputFormat, include_units: bool, include_tiles: bool) -> ExitCode {
    let (report, file_size) = match load_map(file) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let output_data = build_output(&report, file_size, include_units, include_tiles);

    match output {
        OutputFormat::Json => print_json(&output_data),
        OutputFormat::Pretty => print_pretty(&output_data),
    }

    ExitCode::SUCCESS
}

fn build_output(
    report: &DecodeReport,
    file_size: usize,
    include_units: bool,
    include_tiles: bool,
) -> MapInfo {
    let map = &report.map;
    let stats = map.stats();

    let units = include_units.then(|| {
        map.units
            .iter()
            .map(|u| UnitInfo {
                x: u.x,
                y: u.y,
                unit_type: u.unit_type,
                kind: format!("{:?}", u.kind()),
                player: u.player,
                alteration: u.alteration,
            })
            .collect()
    });

    MapInfo {
        description: map.description.clone(),
        era: map.era.name().to_string(),
        width: map.width,
        height: map.height,
        dimensions: map.dimensions_string(),
        size_class: map.size_class.name().to_string(),
        version: map.version,
        format_tag: map.tag_hex(),
        file_size,
        statistics: StatsInfo {
            total_units: stats.total_units,
            gold_mines: stats.gold_mines,
            oil_patches: stats.oil_patches,
            resource_nodes: stats.resource_nodes(),
            start_locations: stats.start_locations,
            players: stats.players,
        },
        warnings: report.warnings.iter().map(ToString::to_string).collect(),
        units,
        tiles: include_tiles.then(|| map.tiles.clone()),
    }
}

fn print_json(output: &MapInfo) {
    match serde_json::to_string_pretty(output) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing to JSON: {e}"),
    }
}

fn print_pretty(output: &MapInfo) {
    println!("=== Map ===");
    println!("Description: {}", output.description);
    println!("Era: {}", output.era);
    println!("Dimensions: {} ({})", output.dimensions, output.size_class);
    println!("Version: {}", output.version);
    println!("Format Tag: {}", output.format_tag);
    println!("File Size: {} bytes", output.file_size);
    println!();

    let stats = &output.statistics;
    println!("=== Statistics ===");
    println!("Total Units: {}", stats.total_units);
    println!("Gold Mines: {}", stats.gold_mines);
    println!("Oil Patches: {}", stats.oil_patches);
    println!("Resource Nodes: {}", stats.resource_nodes);
    println!("Start Locations: {}", stats.start_locations);
    println!("Players: {}", stats.players);
    println!();

    if !output.warnings.is_empty() {
        println!("=== Warnings ({}) ===", output.warnings.len());
        for warning in &output.warnings {
            println!("  - {warning}");
        }
        println!();
    }

    if let Some(units) = &output.units {
        println!("=== Units ({}) ===", units.len());
        // Only show first 50 units in pretty mode to avoid spam
        let display_count = std::cmp::min(units.len(), 50);
        for unit in &units[..display_count] {
            println!(
                "  ({}, {}) type 0x{:02X} [{}] player {}",
                unit.x, unit.y, unit.unit_type, unit.kind, unit.player
            );
        }
        if units.len() > 50 {
            println!("  ... and {} more units", units.len() - 50);
        }
        println!();
    }

    if let Some(tiles) = &output.tiles {
        println!("=== Tiles ({}) ===", tiles.len());
        let row_len = usize::from(output.width).max(1);
        for row in tiles.chunks(row_len) {
            let line: Vec<String> = row.iter().map(|t| format!("{t:04X}")).collect();
            println!("  {}", line.join(" "));
        }
    }
}

// ============================================================================
// Render Command Implementation
// ============================================================================

fn cmd_render(
    file: &Path,
    output: Option<PathBuf>,
    format: ExportFormat,
    options: &RenderOptions,
) -> ExitCode {
    let (report, _) = match load_map(file) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let output = output.unwrap_or_else(|| default_output_path(file, format));
    info!("output name: {}", output.display());

    let image = match try_render(&report.map, options) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error rendering preview: {e}");
            return ExitCode::FAILURE;
        }
    };
    match image.save(&output) {
        Ok(saved) => {
            println!(
                "Wrote {}x{} {:?} preview to {}",
                image.width(),
                image.height(),
                saved,
                output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error writing preview: {e}");
            ExitCode::FAILURE
        }
    }
}

/// `<stem>.<ext>` next to the input, or the format's default file name when
/// the input has no usable stem.
fn default_output_path(file: &Path, format: ExportFormat) -> PathBuf {
    let dir = file.parent().unwrap_or_else(|| Path::new(""));
    match file.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if !stem.is_empty() => dir.join(format!("{stem}.{}", format.extension())),
        _ => dir.join(format.default_file_name()),
    }
}

// ============================================================================
// Validate Command Implementation
// ============================================================================

fn cmd_validate(file: &Path, verbose: bool) -> ExitCode {
    let result = validate_map(file);

    if verbose {
        print_validation_details(&result, file);
    } else {
        print_validation_summary(&result, file);
    }

    if result.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn validate_map(file: &Path) -> ValidationResult {
    let mut result = ValidationResult {
        read_valid: false,
        decode_valid: false,
        errors: Vec::new(),
        warnings: Vec::new(),
    };

    // Step 1: Read file
    let data = match std::fs::read(file) {
        Ok(d) => {
            result.read_valid = true;
            d
        }
        Err(e) => {
            result.errors.push(format!("Failed to read file: {e}"));
            return result;
        }
    };

    // Step 2: Decode
    match decode_with_report(&data) {
        Ok(report) => {
            result.decode_valid = true;
            result
                .warnings
                .extend(report.warnings.iter().map(ToString::to_string));

            if report.map.stats().start_locations == 0 {
                result
                    .warnings
                    .push("No start locations found in map".to_string());
            }
        }
        Err(e) => {
            result.errors.push(format!("Decoding failed: {e}"));
        }
    }

    result
}

fn print_validation_summary(result: &ValidationResult, file: &Path) {
    let status = if result.is_valid() { "VALID" } else { "INVALID" };
    println!("{}: {}", file.display(), status);
}

fn print_validation_details(result: &ValidationResult, file: &Path) {
    println!("Validating: {}\n", file.display());

    println!("Checks:");
    println!("  File read:         {}", status_icon(result.read_valid));
    println!("  Chunk decoding:    {}", status_icon(result.decode_valid));

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in &result.errors {
            println!("  - {error}");
        }
    }

    if !result.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &result.warnings {
            println!("  - {warning}");
        }
    }

    println!(
        "\nResult: {}",
        if result.is_valid() { "VALID" } else { "INVALID" }
    );
}

fn status_icon(valid: bool) -> &'static str {
    if valid {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

// ============================================================================
// Batch Command Implementation
// ============================================================================

fn cmd_batch(
    directory: &Path,
    output_dir: Option<PathBuf>,
    render_previews: bool,
    summary: bool,
    continue_on_error: bool,
) -> ExitCode {
    let maps = find_maps(directory);

    if maps.is_empty() {
        eprintln!("No .pud files found in {}", directory.display());
        return ExitCode::FAILURE;
    }

    eprintln!("Found {} map files", maps.len());

    if let Some(ref dir) = output_dir {
        if !dir.exists() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                eprintln!("Failed to create output directory: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let mut error_count = 0;
    let mut results: Vec<(PathBuf, MapInfo)> = Vec::new();

    for map in &maps {
        eprint!(
            "Processing {}... ",
            map.file_name().unwrap_or_default().to_string_lossy()
        );

        match process_map(map, output_dir.as_deref(), render_previews) {
            Ok(output) => {
                eprintln!("OK");
                results.push((map.clone(), output));
            }
            Err(e) => {
                eprintln!("ERROR: {e}");
                error_count += 1;
                if !continue_on_error {
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    eprintln!(
        "\nProcessed: {} success, {} errors",
        results.len(),
        error_count
    );

    if summary {
        generate_summary(&results, error_count, output_dir.as_deref());
    }

    if error_count > 0 && !continue_on_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn find_maps(directory: &Path) -> Vec<PathBuf> {
    let mut maps = Vec::new();

    if let Ok(entries) = std::fs::read_dir(directory) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("pud"))
            {
                maps.push(path);
            }
        }
    }

    maps.sort();
    maps
}

fn process_map(map: &Path, output_dir: Option<&Path>, render_preview: bool) -> Result<MapInfo, String> {
    let (report, file_size) = load_map(map)?;
    for warning in &report.warnings {
        warn!(map = %map.display(), "{warning}");
    }

    let output = build_output(&report, file_size, true, false);

    if let Some(dir) = output_dir {
        let stem = map.file_stem().unwrap_or_default();
        let output_file = dir.join(stem).with_extension("json");
        let content = serde_json::to_string_pretty(&output).map_err(|e| e.to_string())?;
        std::fs::write(&output_file, content).map_err(|e| e.to_string())?;
        debug!(path = %output_file.display(), "wrote map description");
    }

    if render_preview {
        let target = match output_dir {
            Some(dir) => dir.join(map.file_stem().unwrap_or_default()).with_extension("png"),
            None => default_output_path(map, ExportFormat::Png),
        };
        try_render(&report.map, &RenderOptions::default())
            .map_err(|e| format!("Error rendering preview: {e}"))?
            .save(&target)
            .map_err(|e| format!("Error writing preview: {e}"))?;
        debug!(path = %target.display(), "wrote preview");
    }

    Ok(output)
}

fn generate_summary(results: &[(PathBuf, MapInfo)], failed: usize, output_dir: Option<&Path>) {
    let mut era_distribution = BTreeMap::new();
    let mut size_class_distribution = BTreeMap::new();
    for (_, info) in results {
        *era_distribution.entry(info.era.clone()).or_insert(0) += 1;
        *size_class_distribution
            .entry(info.size_class.clone())
            .or_insert(0) += 1;
    }

    let summary = BatchSummary {
        total_files: results.len() + failed,
        successful: results.len(),
        failed,
        total_units: results
            .iter()
            .map(|(_, info)| info.statistics.total_units)
            .sum(),
        era_distribution,
        size_class_distribution,
    };

    println!("\n=== Batch Summary ===");
    println!("Files processed: {}", summary.total_files);
    println!("Successful: {}", summary.successful);
    println!("Failed: {}", summary.failed);
    println!("Total units: {}", summary.total_units);

    println!("\nEra distribution:");
    for (era, count) in &summary.era_distribution {
        println!("  {era}: {count}");
    }

    println!("\nSize class distribution:");
    for (size, count) in &summary.size_class_distribution {
        println!("  {size}: {count}");
    }

    if let Some(dir) = output_dir {
        let summary_file = dir.join("summary.json");
        if let Ok(json) = serde_json::to_string_pretty(&summary) {
            if std::fs::write(&summary_file, json).is_ok() {
                println!("\nSummary written to: {}", summary_file.display());
            }
        }
    }
}
