//! Linux sysfs GPIO driver

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::info;

use super::{DigitalOutput, Level, LineRole, PinMap};
use crate::error::OutputError;

/// Drives the four lines through `/sys/class/gpio`.
///
/// The pins are write-only, so the last written level is tracked here and
/// `toggle` writes its inverse.
#[derive(Debug)]
pub struct SysfsGpio {
    root: PathBuf,
    pins: PinMap,
    levels: Mutex<[Level; 4]>,
}

impl SysfsGpio {
    /// Export every pin, configure it as an output and drive it low
    pub fn open(root: impl Into<PathBuf>, pins: PinMap) -> Result<Self, OutputError> {
        let root = root.into();

        for role in LineRole::ALL {
            let pin = pins.pin(role);
            let pin_dir = root.join(format!("gpio{}", pin));

            if !pin_dir.exists() {
                fs::write(root.join("export"), pin.to_string())
                    .map_err(|source| OutputError::Export { pin, source })?;
            }

            fs::write(pin_dir.join("direction"), "out")
                .map_err(|source| OutputError::Direction { pin, source })?;
        }

        let gpio = Self {
            root,
            pins,
            levels: Mutex::new([Level::Low; 4]),
        };
        for role in LineRole::ALL {
            gpio.write(role, Level::Low)?;
        }

        info!("GPIO lines ready under {}", gpio.root.display());
        Ok(gpio)
    }

    fn value_path(&self, line: LineRole) -> PathBuf {
        self.root
            .join(format!("gpio{}", self.pins.pin(line)))
            .join("value")
    }

    fn write(&self, line: LineRole, level: Level) -> Result<(), OutputError> {
        let mut levels = self.levels.lock().unwrap_or_else(|e| e.into_inner());
        write_value(&self.value_path(line), level)?;
        levels[line.index()] = level;
        Ok(())
    }
}

fn write_value(path: &Path, level: Level) -> Result<(), OutputError> {
    let value = match level {
        Level::High => "1",
        Level::Low => "0",
    };
    fs::write(path, value).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}

impl DigitalOutput for SysfsGpio {
    fn set_high(&self, line: LineRole) -> Result<(), OutputError> {
        self.write(line, Level::High)
    }

    fn set_low(&self, line: LineRole) -> Result<(), OutputError> {
        self.write(line, Level::Low)
    }

    fn toggle(&self, line: LineRole) -> Result<(), OutputError> {
        let mut levels = self.levels.lock().unwrap_or_else(|e| e.into_inner());
        let next = levels[line.index()].inverted();
        write_value(&self.value_path(line), next)?;
        levels[line.index()] = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PINS: PinMap = PinMap { power: 9, brewer: 10, status: 11, beeper: 5 };

    fn fake_sysfs() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("export"), "").unwrap();
        for pin in [9, 10, 11, 5] {
            fs::create_dir(dir.path().join(format!("gpio{}", pin))).unwrap();
        }
        dir
    }

    fn read(dir: &TempDir, pin: u32, file: &str) -> String {
        fs::read_to_string(dir.path().join(format!("gpio{}", pin)).join(file)).unwrap()
    }

    #[test]
    fn open_configures_outputs_low() {
        let dir = fake_sysfs();
        SysfsGpio::open(dir.path(), PINS).unwrap();
        for pin in [9, 10, 11, 5] {
            assert_eq!(read(&dir, pin, "direction"), "out");
            assert_eq!(read(&dir, pin, "value"), "0");
        }
    }

    #[test]
    fn toggle_writes_inverse_of_last_level() {
        let dir = fake_sysfs();
        let gpio = SysfsGpio::open(dir.path(), PINS).unwrap();
        gpio.set_high(LineRole::Status).unwrap();
        assert_eq!(read(&dir, 11, "value"), "1");
        gpio.toggle(LineRole::Status).unwrap();
        assert_eq!(read(&dir, 11, "value"), "0");
        gpio.toggle(LineRole::Status).unwrap();
        assert_eq!(read(&dir, 11, "value"), "1");
    }

    #[test]
    fn open_fails_without_gpio_interface() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no-gpio");
        let err = SysfsGpio::open(&missing, PINS).unwrap_err();
        assert!(matches!(err, OutputError::Export { pin: 9, .. }));
    }
}
