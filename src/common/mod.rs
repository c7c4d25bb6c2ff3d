pub mod io;

/// Format an io::Error the way GNU tools print it: the strerror text
/// without the "(os error N)" suffix Rust appends.
pub fn io_error_msg(e: &std::io::Error) -> String {
    let msg = e.to_string();
    match msg.find(" (os error") {
        Some(pos) => msg[..pos].to_string(),
        None => msg,
    }
}

/// Restore the default SIGPIPE disposition so that piping into e.g.
/// `head` terminates the tool silently instead of raising a write error.
pub fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
