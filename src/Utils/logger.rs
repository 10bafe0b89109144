use crate::numerical::BVP_error::{BvpError, BvpResult};
use chrono::Local;
use csv::Writer;
use log::{info, warn};
use simplelog::*;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Destination for ordered 2-column numeric rows: (x, y) of a trajectory or (h, error) of a study.
/// Persisting under an existing name overwrites it.
pub trait ResultSink {
    fn persist(&mut self, name: &str, rows: &[(f64, f64)]) -> BvpResult<()>;
}

/// `<directory>/<name>.txt`, one space-separated row per line
#[derive(Debug, Clone)]
pub struct TextFileSink {
    directory: PathBuf,
}

impl TextFileSink {
    pub fn new(directory: impl AsRef<Path>) -> BvpResult<Self> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{}.txt", name))
    }
}

impl ResultSink for TextFileSink {
    fn persist(&mut self, name: &str, rows: &[(f64, f64)]) -> BvpResult<()> {
        let path = self.path_for(name);
        let mut file = BufWriter::new(File::create(&path)?);
        for (x, y) in rows {
            writeln!(file, "{} {}", x, y)?;
        }
        file.flush()?;
        info!("{} rows saved to {}", rows.len(), path.display());
        Ok(())
    }
}

/// `<directory>/<name>.csv` written with the csv crate, optional header record
#[derive(Debug, Clone)]
pub struct CsvSink {
    directory: PathBuf,
    headers: Option<(String, String)>,
}

impl CsvSink {
    pub fn new(directory: impl AsRef<Path>) -> BvpResult<Self> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;
        Ok(Self {
            directory,
            headers: None,
        })
    }

    pub fn with_headers(mut self, first: &str, second: &str) -> Self {
        self.headers = Some((first.to_string(), second.to_string()));
        self
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{}.csv", name))
    }
}

impl ResultSink for CsvSink {
    fn persist(&mut self, name: &str, rows: &[(f64, f64)]) -> BvpResult<()> {
        let path = self.path_for(name);
        let mut writer = Writer::from_path(&path)?;
        if let Some((first, second)) = &self.headers {
            writer.write_record([first, second])?;
        }
        for (x, y) in rows {
            writer.write_record(&[x.to_string(), y.to_string()])?;
        }
        writer.flush()?;
        info!("{} rows saved to {}", rows.len(), path.display());
        Ok(())
    }
}

/// Keeps everything in memory, keyed by name
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub records: BTreeMap<String, Vec<(f64, f64)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Vec<(f64, f64)>> {
        self.records.get(name)
    }
}

impl ResultSink for MemorySink {
    fn persist(&mut self, name: &str, rows: &[(f64, f64)]) -> BvpResult<()> {
        self.records.insert(name.to_string(), rows.to_vec());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Txt,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = BvpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" | "text" => Ok(OutputFormat::Txt),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(BvpError::Config(format!(
                "output format must be txt or csv, got '{}'",
                other
            ))),
        }
    }
}

/// File sink of the requested format rooted at `directory`
pub fn sink_for(format: OutputFormat, directory: impl AsRef<Path>) -> BvpResult<Box<dyn ResultSink>> {
    Ok(match format {
        OutputFormat::Txt => Box::new(TextFileSink::new(directory)?),
        OutputFormat::Csv => Box::new(CsvSink::new(directory)?.with_headers("x", "y")),
    })
}

pub fn parse_level(loglevel: &str) -> BvpResult<LevelFilter> {
    match loglevel.to_lowercase().as_str() {
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" => Ok(LevelFilter::Off),
        other => Err(BvpError::Config(format!(
            "loglevel must be debug, info, warn, error or off, got '{}'",
            other
        ))),
    }
}

/// Terminal logger plus, if `log_to_file`, a `log_<date>_<time>.txt` file logger.
/// A logger installed earlier stays in place.
pub fn init_logging(loglevel: Option<&str>, log_to_file: bool) -> BvpResult<()> {
    let level = match loglevel {
        Some(level) => parse_level(level)?,
        None => LevelFilter::Info,
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if log_to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        loggers.push(WriteLogger::new(level, Config::default(), File::create(name)?));
    }
    if CombinedLogger::init(loggers).is_err() {
        warn!("logger already initialized, keeping the existing one");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_sink_writes_space_separated_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = TextFileSink::new(dir.path().join("data")).unwrap();
        sink.persist("shooting_2", &[(0.0, 0.0), (0.5, 1.25), (1.0, 2.0)])
            .unwrap();
        let content = fs::read_to_string(sink.path_for("shooting_2")).unwrap();
        assert_eq!(content, "0 0\n0.5 1.25\n1 2\n");

        // overwrite, no append
        sink.persist("shooting_2", &[(1.0, 2.0)]).unwrap();
        let content = fs::read_to_string(sink.path_for("shooting_2")).unwrap();
        assert_eq!(content, "1 2\n");
    }

    #[test]
    fn csv_sink_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvSink::new(dir.path()).unwrap().with_headers("h", "error");
        sink.persist("convergence", &[(0.01, 1e-10), (0.005, 2.5e-11)])
            .unwrap();
        let content = fs::read_to_string(sink.path_for("convergence")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["h,error", "0.01,0.0000000001", "0.005,0.000000000025"]);
    }

    #[test]
    fn unwritable_destination_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = TextFileSink::new(dir.path()).unwrap();
        // a directory occupies the target file name
        fs::create_dir_all(sink.path_for("blocked")).unwrap();
        assert!(matches!(
            sink.persist("blocked", &[(0.0, 0.0)]),
            Err(BvpError::Io(_))
        ));
    }

    #[test]
    fn memory_sink_keeps_rows() {
        let mut sink = MemorySink::new();
        sink.persist("a", &[(1.0, 2.0)]).unwrap();
        assert_eq!(sink.get("a"), Some(&vec![(1.0, 2.0)]));
        assert!(sink.get("b").is_none());
    }

    #[test]
    fn formats_and_levels() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Txt);
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
        assert!(matches!(parse_level("loud"), Err(BvpError::Config(_))));
    }

    #[test]
    fn sink_factory() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = sink_for(OutputFormat::Csv, dir.path()).unwrap();
        sink.persist("quasi_2", &[(0.0, 0.0)]).unwrap();
        assert!(dir.path().join("quasi_2.csv").exists());
    }
}
