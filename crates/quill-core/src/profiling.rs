//! Profiling utilities based on the `puffin` crate.

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

/// Turn scope collection on or off.
///
/// Scopes are compiled in everywhere but cost almost nothing while disabled.
pub fn set_enabled(enabled: bool) {
    puffin::set_scopes_on(enabled);
}

/// Mark the start of a new profiling frame.
///
/// Call this once per batch of work (for example once per tessellated scene)
/// to organize profiling data.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(feature = "profiling-server")]
mod server {
    use std::sync::OnceLock;

    static PROFILING_SERVER: OnceLock<puffin_http::Server> = OnceLock::new();

    /// Enable puffin and serve the data to `puffin_viewer` on the given address.
    ///
    /// # Example
    /// ```no_run
    /// quill_core::profiling::init_profiling("0.0.0.0:8585");
    /// ```
    pub fn init_profiling(addr: &str) {
        puffin::set_scopes_on(true);

        match puffin_http::Server::new(addr) {
            Ok(server) => {
                tracing::info!("Puffin profiler server started on http://{}", addr);
                let _ = PROFILING_SERVER.set(server);
            }
            Err(e) => {
                tracing::error!("Failed to start puffin server: {}", e);
            }
        }
    }
}

#[cfg(feature = "profiling-server")]
pub use server::init_profiling;
