use log::{info, LevelFilter};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::error::{LadderError, LadderResult};

pub fn init_file_logger(log_dir: &str, level: LevelFilter) -> LadderResult<()> {
    let current_date = chrono::offset::Utc::now().date_naive().to_string();
    let path = format!("{}/{}.log", log_dir, current_date);

    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%H:%M:%S)(utc)} {l} - {m}\n",
        )))
        .build(&path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .build(Root::builder().appender("logfile").build(level))
        .map_err(|err| LadderError::Logger(err.to_string()))?;

    log4rs::init_config(config).map_err(|err| LadderError::Logger(err.to_string()))?;
    info!("File logger initialized: {}", path);

    Ok(())
}
