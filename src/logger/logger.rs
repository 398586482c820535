use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;
use garde::Validate;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use slog::{Drain, Logger};

const DEFAULT_CHAN_SIZE: usize = 1024;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    Drop,
    Block,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Off,
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl Level {
    fn to_slog(self) -> Option<slog::Level> {
        match self {
            Level::Trace => Some(slog::Level::Trace),
            Level::Debug => Some(slog::Level::Debug),
            Level::Info => Some(slog::Level::Info),
            Level::Warn => Some(slog::Level::Warning),
            Level::Error => Some(slog::Level::Error),
            Level::Off => None,
        }
    }
}

impl From<Level> for LevelFilter {
    fn from(value: Level) -> Self {
        match value {
            Level::Off => LevelFilter::Off,
            Level::Trace => LevelFilter::Trace,
            Level::Debug => LevelFilter::Debug,
            Level::Info => LevelFilter::Info,
            Level::Warn => LevelFilter::Warn,
            Level::Error => LevelFilter::Error,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Hash, Validate)]
#[garde(allow_unvalidated)]
pub struct FileConfig {
    #[garde(length(min = 1))]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[garde(allow_unvalidated)]
pub struct Config {
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub line_num: bool,

    // no header
    #[serde(default)]
    pub noh: bool,

    // async ctrl
    #[garde(range(min = 1))]
    pub chan_size: Option<usize>,
    pub overflow: Option<Overflow>,

    /// Log to the terminal. Records go to stderr so command output stays clean.
    #[serde(default, alias = "stdout")]
    pub console: bool,
    #[garde(dive)]
    pub file: Option<FileConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: Default::default(),
            console: true,
            file: None,
            line_num: false,
            noh: false,
            chan_size: None,
            overflow: None,
        }
    }
}

/// Installs the global logger described by `c` and routes the `log` macros into it.
pub fn init_global(c: &Config) -> anyhow::Result<()> {
    c.validate()
        .map_err(|e| crate::Error::InvalidConfig(format!("logger: {}", e).into()))?;

    if let Some(l) = new_logger(c)? {
        slog_scope::set_global_logger(l).cancel_reset();
        slog_stdlog::init().ok();
        log::set_max_level(c.level.into());
    }
    Ok(())
}

fn custom_timestamp(w: &mut dyn Write) -> io::Result<()> {
    write!(w, "{}", Local::now().format("%Y-%m-%dT%H:%M:%S.%3f%z"))
}

fn custom_header(
    fn_timestamp: &dyn slog_term::ThreadSafeTimestampFn<Output = io::Result<()>>,
    mut rd: &mut dyn slog_term::RecordDecorator,
    record: &slog::Record,
    use_file_location: bool,
) -> io::Result<bool> {
    rd.start_timestamp()?;
    fn_timestamp(&mut rd)?;

    rd.start_whitespace()?;
    write!(rd, " ")?;

    rd.start_level()?;
    write!(rd, "{}", record.level().as_short_str())?;

    rd.start_whitespace()?;

    if use_file_location {
        rd.start_location()?;
        write!(
            rd,
            " [{}:{}]",
            record.location().file,
            record.location().line,
        )?;
    } else {
        write!(rd, " [{}]", record.module())?;
    }

    rd.start_whitespace()?;
    write!(rd, " ")?;

    rd.start_msg()?;
    let mut count_rd = slog_term::CountingWriter::new(&mut rd);
    write!(count_rd, "{}", record.msg())?;
    Ok(count_rd.count() != 0)
}

fn no_header(
    _fn_timestamp: &dyn slog_term::ThreadSafeTimestampFn<Output = io::Result<()>>,
    mut rd: &mut dyn slog_term::RecordDecorator,
    record: &slog::Record,
    _use_file_location: bool,
) -> io::Result<bool> {
    rd.start_msg()?;
    let mut count_rd = slog_term::CountingWriter::new(&mut rd);
    write!(count_rd, "{}", record.msg())?;
    Ok(count_rd.count() != 0)
}

fn async_drain<D>(c: &Config, drain: D) -> slog::Fuse<slog_async::Async>
where
    D: Drain<Err = slog::Never, Ok = ()> + Send + 'static,
{
    slog_async::Async::new(drain)
        .chan_size(c.chan_size.unwrap_or(DEFAULT_CHAN_SIZE))
        .overflow_strategy(match c.overflow {
            Some(Overflow::Block) | None => slog_async::OverflowStrategy::Block,
            Some(Overflow::Drop) => slog_async::OverflowStrategy::DropAndReport,
        })
        .build()
        .fuse()
}

fn new_logger(c: &Config) -> anyhow::Result<Option<Logger>> {
    if !c.console && c.file.is_none() {
        return Ok(None);
    }

    let Some(lvl) = c.level.to_slog() else {
        return Ok(None);
    };

    let filter = move |it: &slog::Record| it.level().is_at_least(lvl);

    let create_console_logger = || {
        let decorator = slog_term::TermDecorator::new().stderr().build();
        let mut bu = slog_term::FullFormat::new(decorator);
        bu = bu.use_custom_timestamp(custom_timestamp);
        bu = bu.use_custom_header_print(if c.noh { no_header } else { custom_header });
        if c.line_num {
            bu = bu.use_file_location();
        }
        async_drain(c, bu.build().fuse())
    };

    let l = match &c.file {
        Some(fc) => {
            let path = Path::new(&fc.path);

            if let Some(dir) = path.parent().filter(|it| !it.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)?;
            }

            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let file = io::BufWriter::with_capacity(16 * 1024, file);

            let decorator = slog_term::PlainDecorator::new(file);

            let mut bu = slog_term::FullFormat::new(decorator);
            bu = bu.use_custom_timestamp(custom_timestamp);
            bu = bu.use_custom_header_print(if c.noh { no_header } else { custom_header });
            if c.line_num {
                bu = bu.use_file_location();
            }

            let drain = async_drain(c, bu.build().fuse());

            if c.console {
                let console = create_console_logger();
                let drain = slog::Duplicate(console, drain).fuse();
                let drain = slog::Filter::new(drain, filter).fuse();
                Logger::root(drain, slog::o!())
            } else {
                let drain = slog::Filter::new(drain, filter).fuse();
                Logger::root(drain, slog::o!())
            }
        }
        None => {
            let drain = create_console_logger();
            let drain = slog::Filter::new(drain, filter).fuse();
            Logger::root(drain, slog::o!())
        }
    };

    Ok(Some(l))
}
