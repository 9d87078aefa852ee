//! Process hardening for a tool that holds mnemonics in memory
//!
//! Core dumps are disabled via `setrlimit(RLIMIT_CORE, 0)` so a crash never
//! writes seed material to disk. Best-effort: containers and unprivileged
//! users may refuse, which is logged and otherwise ignored.

use std::sync::atomic::{AtomicBool, Ordering};

static CORE_DUMPS_DISABLED: AtomicBool = AtomicBool::new(false);

/// Disable core dumps for the current process.
///
/// Returns `true` if core dumps are off after the call.
pub fn disable_core_dumps() -> bool {
    if CORE_DUMPS_DISABLED.swap(true, Ordering::SeqCst) {
        return true;
    }

    #[cfg(unix)]
    {
        unix::disable_core_dumps_impl()
    }

    #[cfg(not(unix))]
    {
        log::warn!("Core dump prevention not supported on this platform");
        false
    }
}

#[cfg(unix)]
mod unix {
    pub fn disable_core_dumps_impl() -> bool {
        let rlim = libc::rlimit {
            rlim_cur: 0,
            rlim_max: 0,
        };
        // SAFETY: setrlimit only reads the struct passed by reference
        let result = unsafe { libc::setrlimit(libc::RLIMIT_CORE, &rlim) };
        if result != 0 {
            log::warn!(
                "Failed to disable core dumps: {}",
                std::io::Error::last_os_error()
            );
            return false;
        }
        log::debug!("Core dumps disabled");
        true
    }
}
