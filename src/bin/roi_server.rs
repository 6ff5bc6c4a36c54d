use anyhow::Result;
use clap::{Parser, ValueEnum};
use roi_grid::config::{
    EmptyExportPolicy, SessionConfig, DEFAULT_GRID_COLS, DEFAULT_GRID_ROWS, DEFAULT_MAX_CANVAS_WIDTH,
};
use roi_grid::export::JsonLineSink;
use roi_grid::roi::ShapeKind;
use roi_grid::server::{handle_line, ServerState};
use std::io::{self, BufRead, Write};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ToolArg {
    Polygon,
    Circle,
}

impl From<ToolArg> for ShapeKind {
    fn from(tool: ToolArg) -> Self {
        match tool {
            ToolArg::Polygon => ShapeKind::Polygon,
            ToolArg::Circle => ShapeKind::Circle,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EmptyExportArg {
    Emit,
    Suppress,
}

impl From<EmptyExportArg> for EmptyExportPolicy {
    fn from(policy: EmptyExportArg) -> Self {
        match policy {
            EmptyExportArg::Emit => EmptyExportPolicy::Emit,
            EmptyExportArg::Suppress => EmptyExportPolicy::Suppress,
        }
    }
}

/// Region-of-interest grid server (JSON-RPC over stdin/stdout)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Logical grid columns
    #[arg(long, env = "ROI_GRID_COLS", default_value_t = DEFAULT_GRID_COLS)]
    grid_cols: u32,

    /// Logical grid rows
    #[arg(long, env = "ROI_GRID_ROWS", default_value_t = DEFAULT_GRID_ROWS)]
    grid_rows: u32,

    /// Canvas width cap in pixels
    #[arg(long, env = "ROI_MAX_WIDTH", default_value_t = DEFAULT_MAX_CANVAS_WIDTH)]
    max_width: f64,

    /// Shape drawn by default
    #[arg(long, env = "ROI_TOOL", value_enum, default_value_t = ToolArg::Polygon)]
    tool: ToolArg,

    /// Whether Finish posts a payload when no region exists
    #[arg(long, env = "ROI_EMPTY_EXPORT", value_enum, default_value_t = EmptyExportArg::Emit)]
    empty_export: EmptyExportArg,

    /// Log level written to stderr
    #[arg(long, env = "ROI_LOG_LEVEL", default_value = "info")]
    log_level: tracing::Level,
}

impl Args {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            grid_cols: self.grid_cols,
            grid_rows: self.grid_rows,
            max_canvas_width: self.max_width,
            tool: self.tool.into(),
            empty_export: self.empty_export.into(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(args.log_level)
        .init();

    let config = args.session_config();
    config.validate()?;
    tracing::info!(
        "Starting ROI server: grid {}x{}, max width {}, tool {:?}",
        config.grid_cols,
        config.grid_rows,
        config.max_canvas_width,
        config.tool
    );

    let mut state = ServerState::new(config, Box::new(JsonLineSink::new(io::stdout())));
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                continue;
            }
        };

        if let Some(response) = handle_line(&mut state, &line) {
            writeln!(stdout, "{}", response)?;
            stdout.flush()?;
        }
    }

    tracing::info!("Shutting down...");
    Ok(())
}
