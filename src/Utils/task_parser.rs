/// parse a task document with structure like
/// ```text
/// problem
/// x0: 0.0
/// x1: 1.0
/// study
/// study_resolutions: 100, 200, 400
/// ```
/// i.e. titles followed by pairs key: value1, value2 into a [`TaskConfig`].
/// Lines starting with //, #, % or ; are comments. Keys that are not present keep their defaults.
use crate::Utils::logger::OutputFormat;
use crate::numerical::BVP_config::BvpConfig;
use crate::numerical::BVP_error::{BvpError, BvpResult};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, map_res, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;

type SectionMap = HashMap<String, Vec<TaskValue>>;
type DocumentMap = HashMap<String, SectionMap>;

/// value types a task document can hold
#[derive(Debug, Clone, PartialEq)]
pub enum TaskValue {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl TaskValue {
    /// integers are accepted where floats are expected
    pub fn as_float(&self) -> Option<f64> {
        match self {
            TaskValue::Float(f) => Some(*f),
            TaskValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_usize(&self) -> Option<usize> {
        match self {
            TaskValue::Integer(i) if *i >= 0 => Some(*i as usize),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let TaskValue::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }
}

impl Display for TaskValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskValue::String(s) => write!(f, "{}", s),
            TaskValue::Float(val) => write!(f, "{}", val),
            TaskValue::Integer(val) => write!(f, "{}", val),
            TaskValue::Boolean(val) => write!(f, "{}", val),
        }
    }
}

/// identifier: letters, digits and underscores, not starting with a digit
fn parse_identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    parser.parse(input)
}

/// section title, trailing whitespace and newlines dropped
fn parse_title(input: &str) -> IResult<&str, String> {
    let (input, result) = parse_identifier(input)?;
    Ok((input.trim(), result))
}

fn parse_value(input: &str) -> IResult<&str, TaskValue> {
    // a single value ends at a comma, whitespace, newline or semicolon
    let value_parser = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\n' | ';'));
    let mut value_parser = map_res(value_parser, |s: &str| -> Result<TaskValue, String> {
        let s = s.trim();
        if let Ok(val) = s.parse::<i64>() {
            Ok(TaskValue::Integer(val))
        } else if let Ok(val) = s.parse::<f64>() {
            Ok(TaskValue::Float(val))
        } else if let Ok(val) = s.parse::<bool>() {
            Ok(TaskValue::Boolean(val))
        } else {
            Ok(TaskValue::String(s.to_string()))
        }
    });
    value_parser.parse(input)
}

fn parse_value_list(input: &str) -> IResult<&str, Vec<TaskValue>> {
    let (input, _) = space0(input)?;
    let separator_coma = delimited(space0, tag(","), space0);
    let mut value_parser = separated_list0(separator_coma, parse_value);
    value_parser.parse(input)
}

/// key: value1, value2
fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<TaskValue>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_identifier, colon_separator, parse_value_list);
    let (input, result) = parser.parse(input)?;
    Ok((input.trim(), result))
}

fn parse_section(input: &str) -> IResult<&str, (String, SectionMap)> {
    let (input, _) = space0(input)?;
    let (input, title) = parse_title(input)?;
    let (input, _) = multispace0(input)?;
    let mut parser = many1(terminated(parse_key_value_pair, space0));
    let (input, pairs) = parser.parse(input)?;
    Ok((input, (title, pairs.into_iter().collect())))
}

/// drops comment lines (starting with //, #, %, or ;) and empty lines
fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the whole document into title -> (key -> values). Later sections with the same
/// title are merged into earlier ones.
pub fn parse_document(input: &str) -> BvpResult<DocumentMap> {
    let filtered = filter_comments(input);
    if filtered.trim().is_empty() {
        return Ok(HashMap::new());
    }
    let mut parser = many1(delimited(space0, parse_section, multispace0));
    let (remaining, sections) = parser
        .parse(filtered.as_str())
        .map_err(|e| BvpError::Config(format!("parsing error: {:?}", e)))?;
    if !remaining.trim().is_empty() {
        return Err(BvpError::Config(format!(
            "failed to parse entire document, remaining: '{}'",
            remaining
        )));
    }
    let mut document: DocumentMap = HashMap::new();
    for (title, section) in sections {
        document.entry(title).or_default().extend(section);
    }
    Ok(document)
}

/// Everything the command line driver needs: the problem, the solver options and the study.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskConfig {
    pub problem: BvpConfig,
    /// secant seeds for y'(x0)
    pub initial_slopes: (f64, f64),
    /// δ of the √y linearization
    pub regularization: f64,
    /// resolutions solved by both shooting and quasilinearization
    pub batch_resolutions: Vec<usize>,
    /// resolutions of the nested-grid convergence study (shooting)
    pub study_resolutions: Vec<usize>,
    pub output_dir: String,
    pub format: OutputFormat,
    pub parallel: bool,
    pub loglevel: String,
    pub log_to_file: bool,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            problem: BvpConfig::default(),
            initial_slopes: (1.0, 3.0),
            regularization: 1e-10,
            batch_resolutions: vec![100, 200, 400, 500, 750, 800, 1000],
            study_resolutions: vec![100, 200, 400, 500, 750, 800, 10000],
            output_dir: "data".to_string(),
            format: OutputFormat::Txt,
            parallel: false,
            loglevel: "info".to_string(),
            log_to_file: false,
        }
    }
}

/// typed access to one section of the parsed document
struct Section<'a> {
    title: &'a str,
    values: Option<&'a SectionMap>,
}

impl<'a> Section<'a> {
    fn new(document: &'a DocumentMap, title: &'a str) -> Self {
        Self {
            title,
            values: document.get(title),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Vec<TaskValue>> {
        self.values.and_then(|section| section.get(key))
    }

    fn wrong_type(&self, key: &str, expected: &str, values: &[TaskValue]) -> BvpError {
        let shown: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        BvpError::Config(format!(
            "{}.{} must be {}, got '{}'",
            self.title,
            key,
            expected,
            shown.join(", ")
        ))
    }

    fn single(&self, key: &str) -> Option<&'a TaskValue> {
        self.get(key).and_then(|values| match values.as_slice() {
            [value] => Some(value),
            _ => None,
        })
    }

    fn float(&self, key: &str, default: f64) -> BvpResult<f64> {
        match self.get(key) {
            None => Ok(default),
            Some(values) => self
                .single(key)
                .and_then(TaskValue::as_float)
                .ok_or_else(|| self.wrong_type(key, "a number", values)),
        }
    }

    fn usize(&self, key: &str, default: usize) -> BvpResult<usize> {
        match self.get(key) {
            None => Ok(default),
            Some(values) => self
                .single(key)
                .and_then(TaskValue::as_usize)
                .ok_or_else(|| self.wrong_type(key, "a non-negative integer", values)),
        }
    }

    fn boolean(&self, key: &str, default: bool) -> BvpResult<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(values) => self
                .single(key)
                .and_then(TaskValue::as_boolean)
                .ok_or_else(|| self.wrong_type(key, "true or false", values)),
        }
    }

    fn string(&self, key: &str, default: &str) -> BvpResult<String> {
        match self.get(key) {
            None => Ok(default.to_string()),
            Some(values) => self
                .single(key)
                .map(|value| value.to_string())
                .ok_or_else(|| self.wrong_type(key, "a single value", values)),
        }
    }

    fn usize_list(&self, key: &str, default: &[usize]) -> BvpResult<Vec<usize>> {
        match self.get(key) {
            None => Ok(default.to_vec()),
            Some(values) => values
                .iter()
                .map(|value| value.as_usize())
                .collect::<Option<Vec<usize>>>()
                .ok_or_else(|| self.wrong_type(key, "a list of non-negative integers", values)),
        }
    }

    fn float_pair(&self, key: &str, default: (f64, f64)) -> BvpResult<(f64, f64)> {
        match self.get(key) {
            None => Ok(default),
            Some(values) => match values.as_slice() {
                [first, second] => first
                    .as_float()
                    .zip(second.as_float())
                    .ok_or_else(|| self.wrong_type(key, "two numbers", values)),
                _ => Err(self.wrong_type(key, "two numbers", values)),
            },
        }
    }
}

impl TaskConfig {
    /// Builds the configuration from a task document; absent keys keep their defaults.
    pub fn parse(input: &str) -> BvpResult<Self> {
        let document = parse_document(input)?;
        let defaults = TaskConfig::default();

        let problem = Section::new(&document, "problem");
        let solver = Section::new(&document, "solver");
        let study = Section::new(&document, "study");
        let logging = Section::new(&document, "logging");

        let config = BvpConfig {
            x0: problem.float("x0", defaults.problem.x0)?,
            x1: problem.float("x1", defaults.problem.x1)?,
            y0: problem.float("y0", defaults.problem.y0)?,
            y1: problem.float("y1", defaults.problem.y1)?,
            tolerance: solver.float("tolerance", defaults.problem.tolerance)?,
            max_iterations: solver.usize("max_iterations", defaults.problem.max_iterations)?,
        };
        config
            .validate()
            .map_err(|e| BvpError::Config(e.to_string()))?;

        let format = study.string("format", "txt")?.parse::<OutputFormat>()?;
        let task = TaskConfig {
            problem: config,
            initial_slopes: solver.float_pair("initial_slopes", defaults.initial_slopes)?,
            regularization: solver.float("regularization", defaults.regularization)?,
            batch_resolutions: study
                .usize_list("batch_resolutions", &defaults.batch_resolutions)?,
            study_resolutions: study
                .usize_list("study_resolutions", &defaults.study_resolutions)?,
            output_dir: study.string("output_dir", &defaults.output_dir)?,
            format,
            parallel: study.boolean("parallel", defaults.parallel)?,
            loglevel: logging.string("loglevel", &defaults.loglevel)?,
            log_to_file: logging.boolean("log_to_file", defaults.log_to_file)?,
        };
        if task.regularization < 0.0 {
            return Err(BvpError::Config(format!(
                "solver.regularization must be non-negative, got {}",
                task.regularization
            )));
        }
        Ok(task)
    }

    pub fn from_file(path: impl AsRef<Path>) -> BvpResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

/////////////////////////////TESTS////////////////////////////////////////////////////
