use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::sync::atomic::{AtomicBool, Ordering};

static STOP_REQUESTED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_stop(_: nix::libc::c_int) {
    STOP_REQUESTED.store(true, Ordering::SeqCst);
}

/// Set once SIGINT or SIGTERM has arrived. Pass it to
/// [`ReadLoop::with_stop_flag`](crate::ReadLoop::with_stop_flag).
pub fn stop_flag() -> &'static AtomicBool {
    &STOP_REQUESTED
}

/// Make SIGINT and SIGTERM stop the read loop instead of killing the process.
///
/// A signal that lands in a blocked `read` makes it return `EINTR`; one that
/// lands anywhere else is seen through [`stop_flag`] before the next read.
pub fn install_stop_handler() -> nix::Result<()> {
    // No SA_RESTART: the blocked read must return.
    let action = SigAction::new(
        SigHandler::Handler(on_stop),
        SaFlags::empty(),
        SigSet::empty(),
    );
    for signal in [Signal::SIGINT, Signal::SIGTERM] {
        // SAFETY: the handler only stores to an atomic.
        unsafe { sigaction(signal, &action) }?;
    }
    Ok(())
}
