use clap::Parser;
use std::path::PathBuf;
use ttydump_core::RawOptions;

use crate::settings::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "ttydump",
    version,
    about = "Display bytes read from a serial port as raw columns, ASCII or MIDI"
)]
pub struct Cli {
    /// Device path (example: /dev/cu.usbserial*)
    #[arg(short = 'p', value_name = "PATH")]
    pub device: Option<PathBuf>,

    /// Baud rate [default: 115200]
    #[arg(short = 'b', value_name = "RATE")]
    pub baud_rate: Option<u32>,

    /// Binary output file receiving an exact copy of the input
    #[arg(short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Column width, 1-128 bytes [default: 8]
    #[arg(short = 'w', value_name = "BYTES")]
    pub width: Option<u32>,

    /// Single line output (clear the screen instead of starting a new line)
    #[arg(short = 'x')]
    pub single_line: bool,

    /// Color output (on when no other display option is given)
    #[arg(short = 'c')]
    pub color: bool,

    /// Decimal output
    #[arg(short = 'd')]
    pub decimal: bool,

    /// Zero prefix output
    #[arg(short = 'z')]
    pub zero: bool,

    /// Show timestamp (ns since the epoch)
    #[arg(short = 't')]
    pub timestamp: bool,

    /// Show time delta (ns)
    #[arg(short = 'n')]
    pub delta_ns: bool,

    /// Show time delta (sec)
    #[arg(short = 's')]
    pub delta_sec: bool,

    /// ASCII output format
    #[arg(short = 'a')]
    pub ascii: bool,

    /// MIDI output format
    #[arg(short = 'm')]
    pub midi: bool,

    /// List available serial ports and exit
    #[arg(short = 'l', long = "list")]
    pub list: bool,
}

impl Cli {
    /// Merge with saved settings; command-line values win.
    pub fn into_options(self, settings: &Settings) -> RawOptions {
        let column_width = match self.width {
            Some(w) => Some(w),
            None if !self.midi => settings.column_width,
            None => None,
        };
        RawOptions {
            device: self.device.or_else(|| settings.device.clone()),
            baud_rate: self.baud_rate.or(settings.baud_rate),
            tee_path: self.output,
            column_width,
            single_line: self.single_line,
            color: self.color,
            decimal: self.decimal,
            zero_pad: self.zero,
            timestamp: self.timestamp,
            delta_ns: self.delta_ns,
            delta_sec: self.delta_sec,
            ascii: self.ascii,
            midi: self.midi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttydump_core::{NumeralBase, OutputMode};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ttydump").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn short_flags_combine() {
        let cli = parse(&["-p", "/dev/ttyUSB0", "-b", "9600", "-adzt", "-w", "16"]);
        let cfg = cli.into_options(&Settings::default()).resolve().unwrap();
        assert_eq!(cfg.baud_rate.rate(), 9600);
        assert_eq!(cfg.mode, OutputMode::Ascii);
        assert_eq!(cfg.column_width, 16);
        assert_eq!(cfg.display.base, NumeralBase::Decimal);
        assert!(cfg.display.timestamps.absolute);
        assert!(!cfg.display.color);
    }

    #[test]
    fn settings_fill_missing_values() {
        let settings = Settings {
            device: Some(PathBuf::from("/dev/ttyACM0")),
            baud_rate: Some(57_600),
            column_width: Some(32),
        };
        let cfg = parse(&["-b", "38400"]).into_options(&settings).resolve().unwrap();
        assert_eq!(cfg.device, PathBuf::from("/dev/ttyACM0"));
        assert_eq!(cfg.baud_rate.rate(), 38_400);
        assert_eq!(cfg.column_width, 32);
    }

    #[test]
    fn settings_width_is_ignored_for_midi() {
        let settings = Settings {
            column_width: Some(32),
            ..Default::default()
        };
        let opts = parse(&["-p", "/dev/midi", "-m"]).into_options(&settings);
        assert_eq!(opts.column_width, None);
    }

    #[test]
    fn tee_path_and_list() {
        let cli = parse(&["-l"]);
        assert!(cli.list);
        let opts = parse(&["-p", "/dev/ttyS0", "-o", "dump.bin"]).into_options(&Settings::default());
        assert_eq!(opts.tee_path, Some(PathBuf::from("dump.bin")));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["ttydump", "-q"]).is_err());
    }
}
