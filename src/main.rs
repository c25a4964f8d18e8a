use std::fs::File;
use std::io::{self, BufRead, BufReader};

use clap::{Parser, ValueEnum};
use composer::config::{ConfigError, EngineConfig};
use composer::doc::{ChildRef, ComponentId};
use composer::engine::EngineCore;
use composer::geom::{GeometryError, Point, Rect};
use composer::input::{drag_transform, resize_transform};
use composer::reducer::{EditError, Operation};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: io::Error },
    #[error("failed to read input: {0}")]
    Read(#[from] io::Error),
    #[error("line {line}: invalid JSON: {source}")]
    Parse { line: usize, source: serde_json::Error },
    #[error("line {line}: {op} rejected: {source}")]
    Rejected { line: usize, op: String, source: EditError },
    #[error("line {line}: gesture rejected: {source}")]
    Gesture { line: usize, source: GeometryError },
    #[error("layout failed: {0}")]
    Layout(EditError),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "composer", about = "Apply component edits from JSON lines and print the resolved layout")]
struct Cli {
    /// JSON-lines file of operations, or `-` for stdin.
    #[arg(long, env = "COMPOSER_INPUT", default_value = "-")]
    input: String,

    /// Grid unit for gesture lines. Overrides `COMPOSER_GRID_SIZE`.
    #[arg(long)]
    grid_size: Option<u32>,

    /// Title of the root component. Overrides `COMPOSER_ROOT_TITLE`.
    #[arg(long)]
    root_title: Option<String>,

    /// Root frame width. Overrides `COMPOSER_ROOT_WIDTH`.
    #[arg(long)]
    root_width: Option<f64>,

    /// Root frame height. Overrides `COMPOSER_ROOT_HEIGHT`.
    #[arg(long)]
    root_height: Option<f64>,

    /// Rendered width for layout output; defaults to the root width.
    #[arg(long)]
    render_width: Option<f64>,

    /// Rendered height for layout output; defaults to the root height.
    #[arg(long)]
    render_height: Option<f64>,

    /// Report rejected lines on stderr and continue instead of stopping.
    #[arg(long)]
    keep_going: bool,

    #[arg(long, value_enum, default_value_t = Output::Layout)]
    output: Output,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    /// Resolved layout of the focused component, or the lowest-id component when unfocused.
    Layout,
    /// Exportable snapshot of every component.
    Snapshot,
}

/// A pointer gesture, snapped with the configured grid before dispatch.
#[derive(Debug, Deserialize)]
#[serde(tag = "gesture", rename_all = "snake_case")]
enum Gesture {
    Drag { component_id: ComponentId, child: ChildRef, x: f64, y: f64 },
    Resize { component_id: ComponentId, child: ChildRef, node: Rect, scale_x: f64, scale_y: f64 },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Line {
    Gesture(Gesture),
    Op(Operation),
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let rendered = Rect::new(
        0.0,
        0.0,
        cli.render_width.unwrap_or(config.root_frame.width),
        cli.render_height.unwrap_or(config.root_frame.height),
    );
    let mut engine = EngineCore::new(config);

    let reader: Box<dyn BufRead> = if cli.input == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&cli.input).map_err(|source| CliError::Open { path: cli.input.clone(), source })?;
        Box::new(BufReader::new(file))
    };

    let mut applied = 0_usize;
    let mut rejected = 0_usize;
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match apply_line(&mut engine, line_no, trimmed) {
            Ok(()) => applied += 1,
            Err(e) if cli.keep_going => {
                eprintln!("{e}");
                rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }
    info!(applied, rejected, "input complete");

    let rendered_json = match cli.output {
        Output::Snapshot => serde_json::to_string_pretty(&engine.snapshot())?,
        Output::Layout => {
            let layout = engine.current_layout(rendered).map_err(CliError::Layout)?;
            serde_json::to_string_pretty(&layout)?
        }
    };
    println!("{rendered_json}");
    Ok(())
}

fn build_config(cli: &Cli) -> Result<EngineConfig, CliError> {
    let mut config = EngineConfig::from_env()?;
    if let Some(grid_size) = cli.grid_size {
        config.grid_size = grid_size;
    }
    if let Some(title) = &cli.root_title {
        config.root_title.clone_from(title);
    }
    if let Some(width) = cli.root_width {
        config.root_frame.width = width;
    }
    if let Some(height) = cli.root_height {
        config.root_frame.height = height;
    }
    config.validate()?;
    Ok(config)
}

fn apply_line(engine: &mut EngineCore, line: usize, text: &str) -> Result<(), CliError> {
    let parsed: Line = serde_json::from_str(text).map_err(|source| CliError::Parse { line, source })?;
    let op = match parsed {
        Line::Op(op) => op,
        Line::Gesture(gesture) => gesture_op(engine, line, gesture)?,
    };
    let name = op.name();
    engine
        .dispatch(op)
        .map(|_| ())
        .map_err(|source| CliError::Rejected { line, op: name.to_owned(), source })
}

fn gesture_op(engine: &EngineCore, line: usize, gesture: Gesture) -> Result<Operation, CliError> {
    let grid = engine.config().grid_size;
    let (component_id, child, transform) = match gesture {
        Gesture::Drag { component_id, child, x, y } => (component_id, child, drag_transform(Point::new(x, y), grid)),
        Gesture::Resize { component_id, child, node, scale_x, scale_y } => {
            let origin = resize_origin(engine, component_id, child)
                .map_err(|source| CliError::Rejected { line, op: "resize".to_owned(), source })?;
            (component_id, child, resize_transform(&node, scale_x, scale_y, &origin, grid))
        }
    };
    let transform = transform.map_err(|source| CliError::Gesture { line, source })?;
    Ok(Operation::HandleTransform { component_id, child, transform })
}

/// Stored geometry of the entity a resize gesture started from.
fn resize_origin(engine: &EngineCore, component_id: ComponentId, child: ChildRef) -> Result<Rect, EditError> {
    let component = engine.state().component(component_id).ok_or(EditError::ComponentNotFound(component_id))?;
    component.position_of(child).ok_or(EditError::ChildNotFound { component: component_id, child })
}
