use std::process::ExitCode;

use hostsmith::Error;

pub(crate) use check::{check_domain, check_port};
pub(crate) use hosts::{access, list, raw, status, toggle};

mod check;
mod hosts;

// 2 is taken by clap for usage errors
pub(crate) const EXIT_INVALID: u8 = 1;
pub(crate) const EXIT_FAILURE: u8 = 3;
pub(crate) const EXIT_NOT_FOUND: u8 = 4;

fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<Error>() {
        Some(Error::IpNotFound(_)) => EXIT_NOT_FOUND,
        Some(Error::InvalidIp(_)) => EXIT_INVALID,
        _ => EXIT_FAILURE,
    }
}

pub(crate) fn exit_code(err: &anyhow::Error) -> ExitCode {
    ExitCode::from(exit_status(err))
}
