use std::borrow::Cow;
use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid configuration '{0}'")]
    InvalidConfig(Cow<'static, str>),

    #[error("invalid ip address '{0}'")]
    InvalidIp(String),

    #[error("IP address {0} not found in hosts file")]
    IpNotFound(String),

    #[error("failed to read hosts file {0}: {1}")]
    HostsRead(PathBuf, io::Error),

    #[error("failed to write hosts file {0}: {1}")]
    HostsWrite(PathBuf, io::Error),

    #[error("failed to create backup file {0}: {1}")]
    BackupFailure(PathBuf, io::Error),

    #[error("failed to check permissions of {0}: {1}")]
    AccessCheck(PathBuf, io::Error),

    #[error("privileged operation failed: {0}")]
    ElevationFailure(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error), // source and Display delegate to anyhow::Error
}
