pub mod api_config;
pub mod constants;
pub mod env;
pub mod logging;

/// Resident memory of this process in MB, or 0 when it cannot be read.
pub async fn get_memory_usage() -> u64 {
    use sysinfo::{get_current_pid, System};
    let pid = match get_current_pid() {
        Ok(pid) => pid,
        Err(_) => return 0,
    };
    let mut sys = System::new();
    sys.refresh_process(pid);
    sys.process(pid).map(|p| p.memory()).unwrap_or(0) / (1024 * 1024) // Convert to MB
}
