use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tierlog::{ColorMode, FileTarget, Format, LevelSpec, LogConfig, RotationConfig};

#[derive(Parser, Debug)]
#[command(version)]
#[command(about = "Write log records through the tierlog global logger.", long_about = None)]
pub struct Args {
    #[arg(long, help = "Append records to this file.", display_order = 0)]
    pub file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Standard)]
    pub format: OutputFormat,

    #[arg(long, help = "File threshold, by name or rank (default: warning).")]
    pub file_level: Option<LevelSpec>,

    #[arg(long, help = "Console threshold, by name or rank (default: warning).")]
    pub console_level: Option<LevelSpec>,

    #[arg(long, help = "Do not write to stdout.")]
    pub no_console: bool,

    #[arg(long, value_enum, default_value_t = Color::Auto)]
    pub color: Color,

    #[arg(long, help = "Rotate the log file once it grows past --max-size-mb.")]
    pub rotate: bool,

    #[arg(long, default_value_t = 0)]
    pub max_size_mb: u64,

    #[arg(long, default_value_t = 0)]
    pub max_backups: usize,

    #[arg(long, default_value_t = 0)]
    pub max_age_days: u64,

    #[arg(long)]
    pub compress: bool,

    #[arg(
        long,
        short = 'l',
        default_value = "info",
        help = "Level of the record: trace, debug, info, warning, error, fatal or print."
    )]
    pub level: String,

    #[arg(
        long,
        short = 'v',
        action = clap::ArgAction::Count,
        help = "Write the logger's own diagnostics to stderr.",
        display_order = 999
    )]
    pub verbose: u8,

    #[arg(help = "Values joined into the message.")]
    pub message: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    Standard,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Color {
    Auto,
    Always,
    Never,
}

impl Args {
    pub fn log_config(&self) -> LogConfig {
        let format = match self.format {
            OutputFormat::Standard => Format::Standard,
            OutputFormat::Json => Format::Json,
        };
        let color = match self.color {
            Color::Auto => ColorMode::Auto,
            Color::Always => ColorMode::Always,
            Color::Never => ColorMode::Never,
        };

        LogConfig {
            file: self.file.clone().map(FileTarget::Path),
            format: Some(format),
            file_level: self.file_level.clone(),
            console_level: self.console_level.clone(),
            console_output: !self.no_console,
            enable_rotation: self.rotate,
            rotation: RotationConfig {
                max_size_mb: self.max_size_mb,
                max_backups: self.max_backups,
                max_age_days: self.max_age_days,
                compress: self.compress,
            },
            color,
        }
    }
}
