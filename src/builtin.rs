use crate::logger::{self, Config as LoggerConfig};

pub fn setup_logger(c: &LoggerConfig) -> crate::Result<()> {
    logger::init_global(c)?;
    debug!("logger is ready: level={:?}", c.level);
    Ok(())
}
