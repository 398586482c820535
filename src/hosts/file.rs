use std::ffi::OsString;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{elevate, parse, status, toggle, HostEntry};
use crate::config::HostsConfig;
use crate::{Error, Result};

const TEMP_PREFIX: &str = ".hostsmith";

/// A hosts file on disk.
#[derive(Debug, Clone)]
pub struct HostsFile {
    path: PathBuf,
    backup_ext: Option<String>,
}

impl Default for HostsFile {
    fn default() -> Self {
        Self::new(super::default_path())
    }
}

impl HostsFile {
    /// Opens `path`, keeping a `.bak` copy before every modification.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup_ext: Some("bak".into()),
        }
    }

    pub fn from_config(c: &HostsConfig) -> Self {
        Self {
            path: c.path(),
            backup_ext: if c.backup {
                Some(Clone::clone(&c.backup_ext))
            } else {
                None
            },
        }
    }

    /// Sets the extension of the backup file, `None` disables backups.
    pub fn backup(mut self, ext: Option<String>) -> Self {
        self.backup_ext = ext;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the backup is written, if backups are enabled.
    pub fn backup_path(&self) -> Option<PathBuf> {
        self.backup_ext
            .as_deref()
            .map(|ext| sibling(&self.path, ext))
    }

    /// Reads the whole file.
    pub async fn raw(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| anyhow!(Error::HostsRead(Clone::clone(&self.path), e)))
    }

    pub async fn entries(&self) -> Result<Vec<HostEntry>> {
        let content = self.raw().await?;
        Ok(parse(&content))
    }

    /// Returns whether the mapping of `ip` is currently enabled.
    pub async fn ip_status(&self, ip: &str) -> Result<bool> {
        let entries = self.entries().await?;
        status(&entries, ip)
    }

    /// Enables or disables every mapping of `ip` and returns the new state.
    pub async fn toggle_ip(&self, ip: &str) -> Result<bool> {
        let origin = self.raw().await?;
        let (content, enabled) = toggle(&origin, ip)?;

        if let Some(backup) = self.backup_path() {
            tokio::fs::write(&backup, &origin)
                .await
                .map_err(|e| Error::BackupFailure(Clone::clone(&backup), e))?;
            debug!("backup {} to {}", self.path.display(), backup.display());
        }

        let path = Clone::clone(&self.path);
        tokio::task::spawn_blocking(move || {
            replace(&path, content.as_bytes()).map_err(|e| Error::HostsWrite(path, e))
        })
        .await??;

        info!(
            "{} {} in {}",
            if enabled { "enabled" } else { "disabled" },
            ip,
            self.path.display()
        );

        Ok(enabled)
    }

    /// Like [`HostsFile::toggle_ip`], but asks for administrator rights when
    /// the file is not writable by the current user.
    pub async fn toggle_ip_elevated(&self, ip: &str) -> Result<bool> {
        if self.can_write().await? {
            return self.toggle_ip(ip).await;
        }

        // fail fast instead of prompting for a password
        status(&self.entries().await?, ip)?;

        let mut args: Vec<OsString> = vec!["--hosts".into(), self.path.clone().into()];
        if self.backup_ext.is_none() {
            args.push("--no-backup".into());
        }
        args.push("toggle".into());
        args.push(ip.into());

        elevate::rerun_elevated(args).await?;

        self.ip_status(ip).await
    }

    /// Returns false when reading is denied to the current user.
    pub async fn can_read(&self) -> Result<bool> {
        match tokio::fs::File::open(&self.path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => Ok(false),
            Err(e) => bail!(Error::AccessCheck(Clone::clone(&self.path), e)),
        }
    }

    /// Returns false when writing is denied to the current user.
    ///
    /// The containing directory must be writable too, since updates are
    /// written next to the file and renamed over it.
    pub async fn can_write(&self) -> Result<bool> {
        let opened = tokio::fs::OpenOptions::new()
            .write(true)
            .open(&self.path)
            .await;

        match opened {
            Ok(_) => (),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => return Ok(false),
            Err(e) => bail!(Error::AccessCheck(Clone::clone(&self.path), e)),
        }

        let dir = parent_dir(&self.path).to_path_buf();
        let created = tokio::task::spawn_blocking(move || {
            // uniquely named, removed on drop
            tempfile::Builder::new()
                .prefix(TEMP_PREFIX)
                .tempfile_in(&dir)
                .map(drop)
                .map_err(|e| (dir, e))
        })
        .await?;

        match created {
            Ok(()) => Ok(true),
            Err((_, e)) if e.kind() == ErrorKind::PermissionDenied => Ok(false),
            Err((dir, e)) => bail!(Error::AccessCheck(dir, e)),
        }
    }
}

/// Replaces `path` with `content` through a sibling temporary file, so the
/// file is either fully old or fully new.
fn replace(path: &Path, content: &[u8]) -> io::Result<()> {
    let perm = std::fs::metadata(path)?.permissions();

    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(parent_dir(path))?;
    tmp.write_all(content)?;
    tmp.as_file().set_permissions(perm)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

#[inline]
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// `/etc/hosts` + `bak` => `/etc/hosts.bak`
fn sibling(path: &Path, ext: &str) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOSTS: &str = "127.0.0.1 localhost\n# 10.0.0.1 dev.example.com\n";

    fn init() {
        pretty_env_logger::try_init_timed().ok();
    }

    async fn list_dir(dir: &Path) -> anyhow::Result<Vec<String>> {
        let mut names = vec![];
        let mut rd = tokio::fs::read_dir(dir).await?;
        while let Some(ent) = rd.next_entry().await? {
            names.push(ent.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    async fn setup(content: &str) -> anyhow::Result<(tempfile::TempDir, HostsFile)> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("hosts");
        tokio::fs::write(&path, content).await?;
        Ok((dir, HostsFile::new(path)))
    }

    #[test]
    fn test_sibling() {
        assert_eq!(
            PathBuf::from("/etc/hosts.bak"),
            sibling(Path::new("/etc/hosts"), "bak")
        );
        assert_eq!(
            PathBuf::from("hosts.txt.bak"),
            sibling(Path::new("hosts.txt"), "bak")
        );
    }

    #[test]
    fn test_from_config() {
        let c = HostsConfig {
            path: Some("/tmp/hosts".into()),
            backup: false,
            backup_ext: "orig".into(),
        };
        let f = HostsFile::from_config(&c);
        assert_eq!(Path::new("/tmp/hosts"), f.path());
        assert!(f.backup_path().is_none());

        let c = HostsConfig {
            backup: true,
            ..c
        };
        let f = HostsFile::from_config(&c);
        assert_eq!(Some(PathBuf::from("/tmp/hosts.orig")), f.backup_path());
    }

    #[tokio::test]
    async fn test_read() -> anyhow::Result<()> {
        init();

        let (_dir, f) = setup(HOSTS).await?;

        assert_eq!(HOSTS, f.raw().await?);

        let entries = f.entries().await?;
        assert_eq!(2, entries.len());

        assert!(f.ip_status("127.0.0.1").await?);
        assert!(!f.ip_status("10.0.0.1").await?);

        let err = f.ip_status("10.0.0.2").await.unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::IpNotFound(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let f = HostsFile::new(dir.path().join("nope"));

        let err = f.raw().await.unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::HostsRead(..))));

        let err = f.can_read().await.unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::AccessCheck(..))));

        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_ip() -> anyhow::Result<()> {
        init();

        let (_dir, f) = setup(HOSTS).await?;

        assert!(!f.toggle_ip("127.0.0.1").await?);
        assert!(!f.ip_status("127.0.0.1").await?);

        let backup = f.backup_path().unwrap();
        assert_eq!(HOSTS, tokio::fs::read_to_string(&backup).await?);

        assert!(f.toggle_ip("10.0.0.1").await?);
        assert_eq!(
            "# 127.0.0.1 localhost\n10.0.0.1 dev.example.com\n",
            f.raw().await?
        );

        // backup holds the previous revision
        assert_eq!(
            "# 127.0.0.1 localhost\n# 10.0.0.1 dev.example.com\n",
            tokio::fs::read_to_string(&backup).await?
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_replaces_file() -> anyhow::Result<()> {
        let (dir, f) = setup(HOSTS).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perm = std::fs::Permissions::from_mode(0o640);
            tokio::fs::set_permissions(f.path(), perm).await?;
        }

        f.toggle_ip("127.0.0.1").await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = tokio::fs::metadata(f.path()).await?.permissions().mode();
            assert_eq!(0o640, mode & 0o777);
        }

        // no temporary file is left behind
        let mut names = list_dir(dir.path()).await?;
        names.sort();
        assert_eq!(vec!["hosts", "hosts.bak"], names);

        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_unknown_ip() -> anyhow::Result<()> {
        let (_dir, f) = setup(HOSTS).await?;
        let f = f.backup(Some("orig".into()));

        let err = f.toggle_ip("192.168.0.1").await.unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::IpNotFound(_))));

        // nothing is written on failure
        assert_eq!(HOSTS, f.raw().await?);
        assert!(!f.backup_path().unwrap().exists());

        Ok(())
    }

    #[tokio::test]
    async fn test_access() -> anyhow::Result<()> {
        let (dir, f) = setup(HOSTS).await?;

        assert!(f.can_read().await?);
        assert!(f.can_write().await?);

        // nothing is left behind by the directory check
        assert_eq!(vec!["hosts"], list_dir(dir.path()).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_can_write_keeps_user_files() -> anyhow::Result<()> {
        let (dir, f) = setup(HOSTS).await?;

        let mine = dir.path().join("hosts.test_write");
        tokio::fs::write(&mine, "precious").await?;

        assert!(f.can_write().await?);
        assert_eq!("precious", tokio::fs::read_to_string(&mine).await?);

        let mut names = list_dir(dir.path()).await?;
        names.sort();
        assert_eq!(vec!["hosts", "hosts.test_write"], names);

        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_ip_elevated_writable() -> anyhow::Result<()> {
        let (_dir, f) = setup(HOSTS).await?;
        assert!(!f.toggle_ip_elevated("127.0.0.1").await?);
        Ok(())
    }
}
