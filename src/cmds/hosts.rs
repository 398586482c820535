use std::process::ExitCode;

use anyhow::Result;
use hostsmith::hosts::{HostEntry, HostsFile};

#[inline]
fn state(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

fn render(entries: &[HostEntry]) -> String {
    let width = entries.iter().map(|it| it.ip.len()).max().unwrap_or(0);

    let mut s = String::new();
    for ent in entries {
        s.push_str(&format!(
            "{:<8}  {:<width$}  {}\n",
            state(ent.enabled),
            ent.ip,
            ent.hostnames.join(" "),
            width = width
        ));
    }
    s
}

pub(crate) async fn list(hosts: &HostsFile, json: bool) -> Result<ExitCode> {
    let entries = hosts.entries().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", render(&entries));
    }

    Ok(ExitCode::SUCCESS)
}

pub(crate) async fn raw(hosts: &HostsFile) -> Result<ExitCode> {
    print!("{}", hosts.raw().await?);
    Ok(ExitCode::SUCCESS)
}

pub(crate) async fn status(hosts: &HostsFile, ip: &str) -> Result<ExitCode> {
    let enabled = hosts.ip_status(ip).await?;
    println!("{}", state(enabled));
    Ok(ExitCode::SUCCESS)
}

pub(crate) async fn toggle(hosts: &HostsFile, ip: &str, elevate: bool) -> Result<ExitCode> {
    let enabled = if elevate {
        hosts.toggle_ip_elevated(ip).await?
    } else {
        hosts.toggle_ip(ip).await?
    };
    println!("{}", state(enabled));
    Ok(ExitCode::SUCCESS)
}

pub(crate) async fn access(hosts: &HostsFile) -> Result<ExitCode> {
    let readable = hosts.can_read().await?;
    let writable = hosts.can_write().await?;

    println!("path:     {}", hosts.path().display());
    println!("readable: {}", readable);
    println!("writable: {}", writable);

    Ok(ExitCode::SUCCESS)
}
