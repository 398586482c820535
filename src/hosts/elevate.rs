use std::ffi::OsStr;
use std::path::Path;

use crate::{Error, Result};

/// How privileged commands are launched.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Platform {
    /// `pkexec`, polkit based.
    Unix,
    /// `osascript ... with administrator privileges`.
    MacOs,
    /// PowerShell `Start-Process -Verb RunAs`, prompts through UAC.
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        cfg_if! {
            if #[cfg(target_os = "windows")] {
                const CURRENT: Platform = Platform::Windows;
            } else if #[cfg(target_os = "macos")] {
                const CURRENT: Platform = Platform::MacOs;
            } else {
                const CURRENT: Platform = Platform::Unix;
            }
        }
        CURRENT
    }
}

/// Builds the program and arguments which run `exe args...` with
/// administrator rights on the given platform.
pub fn elevation_command(platform: Platform, exe: &str, args: &[&str]) -> (String, Vec<String>) {
    match platform {
        Platform::Unix => {
            let mut argv = Vec::with_capacity(args.len() + 1);
            argv.push(exe.to_string());
            argv.extend(args.iter().map(|it| it.to_string()));
            ("pkexec".into(), argv)
        }
        Platform::MacOs => {
            let cmdline = std::iter::once(exe)
                .chain(args.iter().copied())
                .map(sh_quote)
                .collect::<Vec<_>>()
                .join(" ");
            let script = format!(
                "do shell script \"{}\" with administrator privileges",
                applescript_escape(&cmdline)
            );
            ("osascript".into(), vec!["-e".into(), script])
        }
        Platform::Windows => {
            let arglist = args
                .iter()
                .map(|it| ps_quote(&format!("\"{}\"", it)))
                .collect::<Vec<_>>()
                .join(",");
            let mut script = format!(
                "$p = Start-Process -Verb RunAs -Wait -PassThru -FilePath {}",
                ps_quote(exe)
            );
            if !arglist.is_empty() {
                script.push_str(" -ArgumentList ");
                script.push_str(&arglist);
            }
            script.push_str("; exit $p.ExitCode");
            (
                "powershell".into(),
                vec!["-NoProfile".into(), "-Command".into(), script],
            )
        }
    }
}

/// Runs the current executable again with `args` under administrator rights
/// and waits for it.
pub(crate) async fn rerun_elevated<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let exe = std::env::current_exe()?;
    let args = args
        .into_iter()
        .map(|it| it.as_ref().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    let args = args.iter().map(String::as_str).collect::<Vec<_>>();

    let (program, argv) = elevation_command(Platform::current(), &path_str(&exe), &args);

    info!("request privilege: {} {:?}", program, argv);

    let output = tokio::process::Command::new(&program)
        .args(&argv)
        .output()
        .await
        .map_err(|e| Error::ElevationFailure(format!("cannot launch {}: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(Error::ElevationFailure(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }

    Ok(())
}

#[inline]
fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn sh_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

fn applescript_escape(s: &str) -> String {
    s.replace('\\', r"\\").replace('"', "\\\"")
}

fn ps_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
