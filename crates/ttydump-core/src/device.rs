use log::{info, warn};
use nix::errno::Errno;
use nix::fcntl::{Flock, FlockArg, OFlag};
use nix::sys::termios::{self, ControlFlags, FlushArg, SetArg, SpecialCharacterIndices};
use nix::unistd;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::os::fd::{AsFd, AsRawFd, IntoRawFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::BaudRate;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("opening device {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("couldn't obtain exclusive lock on '{path}': {source}")]
    Busy {
        path: PathBuf,
        #[source]
        source: Errno,
    },
    #[error("configuring '{path}': {op}: {source}")]
    ConfigFailed {
        path: PathBuf,
        op: &'static str,
        #[source]
        source: Errno,
    },
}

impl DeviceError {
    /// True when the advisory lock had been taken before the failure.
    pub fn was_locked(&self) -> bool {
        matches!(self, Self::ConfigFailed { .. })
    }
}

/// How far acquisition got. Teardown undoes each step from the top down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeviceState {
    Unopened,
    Opened,
    Locked,
    Configured,
}

/// An exclusively locked TTY configured for raw reads.
///
/// The lock is released and the descriptor closed exactly once, by
/// [`DeviceSession::close`] or on drop, whichever comes first.
pub struct DeviceSession {
    path: PathBuf,
    baud_rate: BaudRate,
    state: DeviceState,
    /// Held while `Opened`.
    file: Option<File>,
    /// Held while `Locked` or `Configured`.
    lock: Option<Flock<File>>,
}

impl DeviceSession {
    pub fn open(path: impl AsRef<Path>, baud_rate: BaudRate) -> Result<Self, DeviceError> {
        let path = path.as_ref().to_path_buf();

        info!("Opening device {}...", path.display());
        let file = OpenOptions::new()
            .read(true)
            .custom_flags((OFlag::O_NOCTTY | OFlag::O_SYNC).bits())
            .open(&path)
            .map_err(|source| DeviceError::OpenFailed {
                path: path.clone(),
                source,
            })?;
        info!("Opened {}", path.display());

        let mut session = match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(locked) => Self {
                path,
                baud_rate,
                state: DeviceState::Locked,
                file: None,
                lock: Some(locked),
            },
            Err((file, errno)) => {
                // Dropping the unlocked session closes the descriptor.
                let session = Self {
                    path,
                    baud_rate,
                    state: DeviceState::Opened,
                    file: Some(file),
                    lock: None,
                };
                return Err(DeviceError::Busy {
                    path: session.path.clone(),
                    source: errno,
                });
            }
        };

        session.configure()?;
        session.state = DeviceState::Configured;
        Ok(session)
    }

    fn configure(&mut self) -> Result<(), DeviceError> {
        let Some(file) = self.file() else {
            return Err(self.config_error("tcgetattr", Errno::EBADF));
        };
        let fd = file.as_fd();

        let mut tty = termios::tcgetattr(fd).map_err(|e| self.config_error("tcgetattr", e))?;

        termios::cfmakeraw(&mut tty);
        termios::cfsetospeed(&mut tty, self.baud_rate.speed())
            .map_err(|e| self.config_error("cfsetospeed", e))?;
        termios::cfsetispeed(&mut tty, self.baud_rate.speed())
            .map_err(|e| self.config_error("cfsetispeed", e))?;

        tty.control_flags |= ControlFlags::CREAD | ControlFlags::CS8 | ControlFlags::CLOCAL;

        // Block until at least one byte; 0.1 s inter-byte timer.
        tty.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
        tty.control_chars[SpecialCharacterIndices::VTIME as usize] = 1;

        termios::tcsetattr(fd, SetArg::TCSANOW, &tty)
            .map_err(|e| self.config_error("tcsetattr", e))?;

        if let Err(e) = termios::tcflush(fd, FlushArg::TCIOFLUSH) {
            warn!("tcflush on '{}': {e}", self.path.display());
        }
        Ok(())
    }

    fn config_error(&self, op: &'static str, source: Errno) -> DeviceError {
        DeviceError::ConfigFailed {
            path: self.path.clone(),
            op,
            source,
        }
    }

    fn file(&self) -> Option<&File> {
        self.lock.as_deref().or(self.file.as_ref())
    }

    fn file_mut(&mut self) -> Option<&mut File> {
        match self.lock.as_mut() {
            Some(locked) => Some(&mut **locked),
            None => self.file.as_mut(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn baud_rate(&self) -> BaudRate {
        self.baud_rate
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Release the lock, then close the descriptor. Failures are logged only.
    pub fn close(mut self) {
        self.teardown();
    }

    /// Walk the state back down to `Unopened`, one step at a time.
    fn teardown(&mut self) {
        if self.state >= DeviceState::Locked {
            if let Some(locked) = self.lock.take() {
                match locked.unlock() {
                    Ok(file) => self.file = Some(file),
                    Err((locked, errno)) => {
                        warn!("Couldn't unlock '{}': {errno}", self.path.display());
                        discard_lock(&self.path, locked);
                    }
                }
            }
            self.state = DeviceState::Opened;
        }

        if self.state >= DeviceState::Opened {
            if let Some(file) = self.file.take() {
                close_fd(&self.path, file.into_raw_fd());
            }
            self.state = DeviceState::Unopened;
        }
    }
}

/// Close the descriptor behind a lock that refused to unlock.
///
/// `Flock`'s own drop panics when `LOCK_UN` fails, so it must not run.
/// Closing the descriptor drops the lock with it.
fn discard_lock(path: &Path, locked: Flock<File>) {
    let fd = locked.as_raw_fd();
    std::mem::forget(locked);
    close_fd(path, fd);
}

fn close_fd(path: &Path, fd: RawFd) {
    if let Err(errno) = unistd::close(fd) {
        warn!("Couldn't close '{}': {errno}", path.display());
    }
}

impl fmt::Debug for DeviceSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceSession")
            .field("path", &self.path)
            .field("baud_rate", &self.baud_rate.rate())
            .field("state", &self.state)
            .finish()
    }
}

impl Read for DeviceSession {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.file_mut() {
            Some(file) => file.read(buf),
            None => Err(io::Error::from(io::ErrorKind::NotConnected)),
        }
    }
}

impl Drop for DeviceSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
