//! Core functionalities: device acquisition, byte formatting, read loop.

pub mod config;
pub mod device;
pub mod format;
pub mod monitor;
pub mod ports;
pub mod signal;
pub mod tee;
pub mod timestamp;

pub use config::{
    BaudRate, ConfigError, DisplayOptions, MonitorConfig, NumeralBase, OutputMode, RawOptions,
};
pub use device::{DeviceError, DeviceSession, DeviceState};
pub use format::Formatter;
pub use monitor::{MonitorError, ReadLoop, StopReason, READ_CHUNK_SIZE};
pub use ports::{list_ports, PortInfo, PortKind};
pub use tee::TeeSink;
pub use timestamp::{TimestampFlags, TimestampTracker};
