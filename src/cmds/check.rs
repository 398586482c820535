use std::process::ExitCode;

use super::EXIT_INVALID;

fn verdict(valid: bool) -> (&'static str, u8) {
    if valid {
        ("valid", 0)
    } else {
        ("invalid", EXIT_INVALID)
    }
}

fn report(valid: bool) -> ExitCode {
    let (msg, code) = verdict(valid);
    println!("{}", msg);
    ExitCode::from(code)
}

pub(crate) fn check_domain(domain: &str) -> ExitCode {
    report(hostsmith::validate_domain(domain))
}

pub(crate) fn check_port(port: f64) -> ExitCode {
    report(hostsmith::validate_port(port))
}
