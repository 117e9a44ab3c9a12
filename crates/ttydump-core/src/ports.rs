use serialport::{SerialPortInfo, SerialPortType};
use std::fmt;

/// Bus a port hangs off. Only USB ports carry identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortKind {
    Usb {
        vid: u16,
        pid: u16,
        product: Option<String>,
    },
    Pci,
    Bluetooth,
    Unknown,
}

impl From<SerialPortType> for PortKind {
    fn from(port_type: SerialPortType) -> Self {
        match port_type {
            SerialPortType::UsbPort(usb) => PortKind::Usb {
                vid: usb.vid,
                pid: usb.pid,
                product: usb.product,
            },
            SerialPortType::PciPort => PortKind::Pci,
            SerialPortType::BluetoothPort => PortKind::Bluetooth,
            SerialPortType::Unknown => PortKind::Unknown,
        }
    }
}

/// A candidate `-p` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub path: String,
    pub kind: PortKind,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        Self {
            path: info.port_name,
            kind: info.port_type.into(),
        }
    }
}

impl fmt::Display for PortInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PortKind::Usb { vid, pid, product } => {
                write!(f, "{} ({vid:04X}:{pid:04X}) USB", self.path)?;
                match product {
                    Some(product) => write!(f, " {product}"),
                    None => Ok(()),
                }
            }
            PortKind::Pci => write!(f, "{} PCI", self.path),
            PortKind::Bluetooth => write!(f, "{} Bluetooth", self.path),
            PortKind::Unknown => write!(f, "{} Unknown", self.path),
        }
    }
}

/// Serial ports the OS reports. Enumeration failures yield an empty list.
pub fn list_ports() -> Vec<PortInfo> {
    match serialport::available_ports() {
        Ok(ports) => ports.into_iter().map(PortInfo::from).collect(),
        Err(e) => {
            log::warn!("port enumeration failed: {e}");
            Vec::new()
        }
    }
}
