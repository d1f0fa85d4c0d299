//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::hardware::PinMap;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "brew-remote")]
#[command(about = "Press a coffee machine's power and brew buttons over HTTP")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "54773")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// CSV file that brew events are appended to
    #[arg(long, default_value = "data.csv")]
    pub data_file: PathBuf,

    /// Root of the sysfs GPIO interface
    #[arg(long, default_value = "/sys/class/gpio")]
    pub gpio_root: PathBuf,

    /// GPIO pin wired to the power button relay
    #[arg(long, default_value = "9")]
    pub pin_power: u32,

    /// GPIO pin wired to the brew button relay
    #[arg(long, default_value = "10")]
    pub pin_brewer: u32,

    /// GPIO pin driving the status light
    #[arg(long, default_value = "11")]
    pub pin_status: u32,

    /// GPIO pin driving the beeper
    #[arg(long, default_value = "5")]
    pub pin_beeper: u32,

    /// Seconds the machine needs to boot before it accepts a brew
    #[arg(long, default_value = "55")]
    pub boot_secs: u64,

    /// Seconds a brew keeps the buttons locked
    #[arg(long, default_value = "15")]
    pub brew_secs: u64,

    /// Drive an in-memory output instead of real GPIO lines
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn pins(&self) -> PinMap {
        PinMap {
            power: self.pin_power,
            brewer: self.pin_brewer,
            status: self.pin_status,
            beeper: self.pin_beeper,
        }
    }

    /// Sequence timings, with the two configurable durations applied
    pub fn timings(&self) -> Timings {
        Timings {
            boot: Duration::from_secs(self.boot_secs),
            brew_lockout: Duration::from_secs(self.brew_secs),
            ..Timings::default()
        }
    }
}

/// Durations used by the relay pulses and the timed sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// How long a button relay is held closed
    pub button_press: Duration,
    /// Lockout after a direct brew, while the machine is brewing
    pub brew_lockout: Duration,
    /// Warm-up time after pressing power
    pub boot: Duration,
    /// Status light toggle period while booting
    pub blink: Duration,
    pub beep_on: Duration,
    pub beep_off: Duration,
    /// Beeps sounded when a brew finishes
    pub beep_count: u32,
    /// Length of the single beep at startup
    pub startup_chime: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            button_press: Duration::from_millis(300),
            brew_lockout: Duration::from_secs(15),
            boot: Duration::from_secs(55),
            blink: Duration::from_secs(1),
            beep_on: Duration::from_millis(300),
            beep_off: Duration::from_millis(300),
            beep_count: 2,
            startup_chime: Duration::from_secs(1),
        }
    }
}
