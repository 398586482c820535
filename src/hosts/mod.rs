//! Reading and toggling mappings of the system hosts file.

pub use elevate::{elevation_command, Platform};
pub use entry::{parse, status, toggle, HostEntry};
pub use file::HostsFile;

mod elevate;
mod entry;
mod file;

/// Location of the hosts file on the current platform.
pub fn default_path() -> &'static str {
    cfg_if! {
        if #[cfg(target_os = "windows")] {
            const PATH: &str = r"C:\Windows\System32\drivers\etc\hosts";
        } else {
            const PATH: &str = "/etc/hosts";
        }
    }
    PATH
}
