use log::warn;
use nix::sys::termios;
use std::path::PathBuf;
use thiserror::Error;

use crate::timestamp::TimestampFlags;

pub const DEFAULT_BAUD_RATE: u32 = 115_200;
pub const MIN_COLUMN_WIDTH: u32 = 1;
pub const DEFAULT_COLUMN_WIDTH: u32 = 8;
pub const MAX_COLUMN_WIDTH: u32 = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("'-p' (device path) option required")]
    MissingDevice,
    #[error("'-a' (ASCII) and '-m' (MIDI) output formats are exclusive")]
    ConflictingModes,
    #[error("unsupported baud rate {0}")]
    UnsupportedBaudRate(u32),
    #[error("invalid column width {0} (1-128)")]
    InvalidColumnWidth(u32),
}

/// A line speed the terminal driver accepts, paired with its termios constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaudRate {
    rate: u32,
    speed: termios::BaudRate,
}

impl BaudRate {
    pub fn rate(&self) -> u32 {
        self.rate
    }

    pub(crate) fn speed(&self) -> termios::BaudRate {
        self.speed
    }
}

impl Default for BaudRate {
    fn default() -> Self {
        Self {
            rate: DEFAULT_BAUD_RATE,
            speed: termios::BaudRate::B115200,
        }
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = ConfigError;

    fn try_from(rate: u32) -> Result<Self, Self::Error> {
        use termios::BaudRate as B;

        let speed = match rate {
            50 => B::B50,
            75 => B::B75,
            110 => B::B110,
            134 => B::B134,
            150 => B::B150,
            200 => B::B200,
            300 => B::B300,
            600 => B::B600,
            1200 => B::B1200,
            1800 => B::B1800,
            2400 => B::B2400,
            4800 => B::B4800,
            9600 => B::B9600,
            19200 => B::B19200,
            38400 => B::B38400,
            57600 => B::B57600,
            115_200 => B::B115200,
            230_400 => B::B230400,
            #[cfg(target_os = "macos")]
            7200 => B::B7200,
            #[cfg(target_os = "macos")]
            14400 => B::B14400,
            #[cfg(target_os = "macos")]
            28800 => B::B28800,
            #[cfg(target_os = "macos")]
            76800 => B::B76800,
            #[cfg(target_os = "linux")]
            460_800 => B::B460800,
            #[cfg(target_os = "linux")]
            500_000 => B::B500000,
            #[cfg(target_os = "linux")]
            576_000 => B::B576000,
            #[cfg(target_os = "linux")]
            921_600 => B::B921600,
            #[cfg(target_os = "linux")]
            1_000_000 => B::B1000000,
            #[cfg(target_os = "linux")]
            1_152_000 => B::B1152000,
            #[cfg(target_os = "linux")]
            1_500_000 => B::B1500000,
            #[cfg(target_os = "linux")]
            2_000_000 => B::B2000000,
            #[cfg(target_os = "linux")]
            2_500_000 => B::B2500000,
            #[cfg(target_os = "linux")]
            3_000_000 => B::B3000000,
            #[cfg(target_os = "linux")]
            3_500_000 => B::B3500000,
            #[cfg(target_os = "linux")]
            4_000_000 => B::B4000000,
            _ => return Err(ConfigError::UnsupportedBaudRate(rate)),
        };
        Ok(Self { rate, speed })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Raw,
    Ascii,
    Midi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumeralBase {
    #[default]
    Hex,
    Decimal,
}

/// Rendering switches shared by every output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayOptions {
    pub color: bool,
    pub base: NumeralBase,
    pub zero_pad: bool,
    pub single_line: bool,
    pub timestamps: TimestampFlags,
}

/// Fully resolved monitor configuration. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub device: PathBuf,
    pub baud_rate: BaudRate,
    pub mode: OutputMode,
    /// Bytes per line in raw mode and per escaped run in ASCII mode.
    pub column_width: u8,
    pub display: DisplayOptions,
    pub tee_path: Option<PathBuf>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::new(),
            baud_rate: BaudRate::default(),
            mode: OutputMode::Raw,
            column_width: DEFAULT_COLUMN_WIDTH as u8,
            display: DisplayOptions::default(),
            tee_path: None,
        }
    }
}

/// Options exactly as the user gave them, before defaults and validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOptions {
    pub device: Option<PathBuf>,
    pub baud_rate: Option<u32>,
    pub tee_path: Option<PathBuf>,
    pub column_width: Option<u32>,
    pub single_line: bool,
    pub color: bool,
    pub decimal: bool,
    pub zero_pad: bool,
    pub timestamp: bool,
    pub delta_ns: bool,
    pub delta_sec: bool,
    pub ascii: bool,
    pub midi: bool,
}

impl RawOptions {
    /// True when none of the flags that change how bytes are drawn was given.
    pub fn no_display_flags(&self) -> bool {
        !(self.single_line
            || self.color
            || self.decimal
            || self.zero_pad
            || self.timestamp
            || self.delta_ns
            || self.delta_sec
            || self.ascii
            || self.midi)
    }

    pub fn resolve(self) -> Result<MonitorConfig, ConfigError> {
        let device = self.device.clone().ok_or(ConfigError::MissingDevice)?;

        if self.ascii && self.midi {
            return Err(ConfigError::ConflictingModes);
        }

        if self.midi && self.column_width.is_some() {
            warn!("'-w' (column width) does not apply to '-m' (MIDI) output");
        }
        if !self.midi && !self.ascii && self.color {
            warn!("'-c' (color output) requires '-m' (MIDI) or '-a' (ASCII)");
        }
        if self.zero_pad && self.ascii {
            warn!("'-z' (zero prefix) does not apply to '-a' (ASCII) output");
        }

        let color = self.color || self.no_display_flags();

        let baud_rate = match self.baud_rate {
            Some(rate) => BaudRate::try_from(rate)?,
            None => BaudRate::default(),
        };

        let mode = if self.midi {
            OutputMode::Midi
        } else if self.ascii {
            OutputMode::Ascii
        } else {
            OutputMode::Raw
        };

        let column_width = match (mode, self.column_width) {
            (OutputMode::Midi, _) | (_, None) => DEFAULT_COLUMN_WIDTH as u8,
            (_, Some(w)) if (MIN_COLUMN_WIDTH..=MAX_COLUMN_WIDTH).contains(&w) => w as u8,
            (_, Some(w)) => return Err(ConfigError::InvalidColumnWidth(w)),
        };

        Ok(MonitorConfig {
            device,
            baud_rate,
            mode,
            column_width,
            display: DisplayOptions {
                color,
                base: if self.decimal {
                    NumeralBase::Decimal
                } else {
                    NumeralBase::Hex
                },
                zero_pad: self.zero_pad,
                single_line: self.single_line,
                timestamps: TimestampFlags {
                    absolute: self.timestamp,
                    delta_ns: self.delta_ns,
                    delta_sec: self.delta_sec,
                },
            },
            tee_path: self.tee_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_device() -> RawOptions {
        RawOptions {
            device: Some(PathBuf::from("/dev/ttyUSB0")),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_when_only_device_given() {
        let cfg = with_device().resolve().unwrap();
        assert_eq!(cfg.device, PathBuf::from("/dev/ttyUSB0"));
        assert_eq!(cfg.baud_rate.rate(), 115_200);
        assert_eq!(cfg.mode, OutputMode::Raw);
        assert_eq!(cfg.column_width, 8);
        assert_eq!(cfg.display.base, NumeralBase::Hex);
        assert!(cfg.display.color);
        assert!(cfg.tee_path.is_none());
    }

    #[test]
    fn device_is_required() {
        assert_eq!(RawOptions::default().resolve(), Err(ConfigError::MissingDevice));
    }

    #[test]
    fn ascii_and_midi_are_exclusive() {
        let opts = RawOptions {
            ascii: true,
            midi: true,
            ..with_device()
        };
        assert_eq!(opts.resolve(), Err(ConfigError::ConflictingModes));
    }

    #[test]
    fn any_single_display_flag_suppresses_auto_color() {
        let setters: [fn(&mut RawOptions); 8] = [
            |o| o.single_line = true,
            |o| o.decimal = true,
            |o| o.zero_pad = true,
            |o| o.timestamp = true,
            |o| o.delta_ns = true,
            |o| o.delta_sec = true,
            |o| o.ascii = true,
            |o| o.midi = true,
        ];
        for (i, set) in setters.iter().enumerate() {
            let mut opts = with_device();
            set(&mut opts);
            let cfg = opts.resolve().unwrap();
            assert!(!cfg.display.color, "flag #{i} should disable the color default");
        }
    }

    #[test]
    fn explicit_color_is_kept() {
        let opts = RawOptions {
            color: true,
            ascii: true,
            ..with_device()
        };
        assert!(opts.resolve().unwrap().display.color);
    }

    #[test]
    fn unsupported_baud_rate_is_rejected() {
        let opts = RawOptions {
            baud_rate: Some(12_345),
            ..with_device()
        };
        assert_eq!(opts.resolve(), Err(ConfigError::UnsupportedBaudRate(12_345)));
    }

    #[test]
    fn supported_baud_rates_resolve() {
        for rate in [50, 9600, 57_600, 230_400] {
            assert_eq!(BaudRate::try_from(rate).unwrap().rate(), rate);
        }
        assert_eq!(
            BaudRate::try_from(9600).unwrap().speed(),
            termios::BaudRate::B9600
        );
    }

    #[test]
    fn column_width_bounds() {
        for (width, ok) in [(0, false), (1, true), (128, true), (129, false)] {
            let opts = RawOptions {
                column_width: Some(width),
                ..with_device()
            };
            match opts.resolve() {
                Ok(cfg) => {
                    assert!(ok, "width {width} should be rejected");
                    assert_eq!(u32::from(cfg.column_width), width);
                }
                Err(e) => {
                    assert!(!ok, "width {width} should be accepted");
                    assert_eq!(e, ConfigError::InvalidColumnWidth(width));
                }
            }
        }
    }

    #[test]
    fn column_width_is_not_validated_in_midi_mode() {
        let opts = RawOptions {
            midi: true,
            column_width: Some(0),
            ..with_device()
        };
        let cfg = opts.resolve().unwrap();
        assert_eq!(cfg.mode, OutputMode::Midi);
    }

    #[test]
    fn display_flags_map_through() {
        let opts = RawOptions {
            decimal: true,
            zero_pad: true,
            single_line: true,
            delta_sec: true,
            tee_path: Some(PathBuf::from("capture.bin")),
            ..with_device()
        };
        let cfg = opts.resolve().unwrap();
        assert_eq!(cfg.display.base, NumeralBase::Decimal);
        assert!(cfg.display.zero_pad);
        assert!(cfg.display.single_line);
        assert!(cfg.display.timestamps.delta_sec);
        assert!(!cfg.display.timestamps.absolute);
        assert_eq!(cfg.tee_path, Some(PathBuf::from("capture.bin")));
    }
}
