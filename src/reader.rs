//! Instance file reader.
//!
//! # Format
//!
//! Whitespace-separated integers, blank lines ignored:
//!
//! ```text
//! nb_tasks nb_resources
//! capacity_0 ... capacity_{R-1}
//! pt_0 w_0 pt_1 w_1 ... pt_{R-1} w_{R-1}      (one line per task)
//! nb_successors succ_1 ... succ_k             (one line per task)
//! ```
//!
//! Tokens beyond those a line needs are ignored, except on successor
//! lines: there a positive count is followed by every listed id, however
//! many there are, and a count of zero or less means no successors.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::info;

use crate::models::Instance;
use crate::validation::ValidationError;

/// Errors raised while loading an instance.
#[derive(Debug)]
pub enum InstanceError {
    /// The file could not be read.
    Io(std::io::Error),
    /// A line is missing or holds an unexpected token.
    Parse {
        /// 1-based line number among non-blank lines.
        line: usize,
        /// Human-readable description.
        message: String,
    },
    /// The tables parsed but do not form a consistent instance.
    Invalid(Vec<ValidationError>),
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read instance: {e}"),
            Self::Parse { line, message } => write!(f, "line {line}: {message}"),
            Self::Invalid(errors) => {
                write!(f, "invalid instance:")?;
                for e in errors {
                    write!(f, " {e};")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for InstanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InstanceError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<Vec<ValidationError>> for InstanceError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Invalid(errors)
    }
}

/// Reads an instance file.
pub fn read_instance(path: impl AsRef<Path>) -> Result<Instance, InstanceError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let instance = parse_instance(&text)?;
    info!(
        "loaded {}: {} tasks, {} resources, horizon {}",
        path.display(),
        instance.nb_tasks(),
        instance.nb_resources(),
        instance.horizon()
    );
    Ok(instance)
}

/// Parses instance text.
pub fn parse_instance(text: &str) -> Result<Instance, InstanceError> {
    let mut lines = Lines::new(text);

    let header = lines.next_ints(2, "task and resource counts")?;
    let nb_tasks = lines.count(header[0], "task count")?;
    let nb_resources = lines.count(header[1], "resource count")?;

    let mut capacity = lines.next_ints(nb_resources, "capacities")?;
    capacity.truncate(nb_resources);

    let mut processing_time = Vec::with_capacity(nb_tasks);
    let mut weights = vec![Vec::with_capacity(nb_tasks); nb_resources];
    for i in 0..nb_tasks {
        let values = lines.next_ints(2 * nb_resources, &format!("task {i} durations and weights"))?;
        let values = &values[..2 * nb_resources];
        processing_time.push(values.iter().step_by(2).copied().collect::<Vec<_>>());
        for (r, pair) in values.chunks_exact(2).enumerate() {
            weights[r].push(pair[1]);
        }
    }

    let mut successors = Vec::with_capacity(nb_tasks);
    for i in 0..nb_tasks {
        let values = lines.next_ints(1, &format!("task {i} successors"))?;
        // A positive count takes every id on the line; the count itself is
        // not cross-checked.
        let succs = if values[0] > 0 {
            values[1..]
                .iter()
                .map(|&j| lines.count(j, "successor id"))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            Vec::new()
        };
        successors.push(succs);
    }

    Ok(Instance::new(capacity, processing_time, weights, successors)?)
}

impl FromStr for Instance {
    type Err = InstanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_instance(s)
    }
}

/// Non-blank line cursor.
struct Lines<'a> {
    inner: std::str::Lines<'a>,
    line: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines(),
            line: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> InstanceError {
        InstanceError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    /// Next line as integers; at least `min` of them. Extra tokens are kept.
    fn next_ints(&mut self, min: usize, what: &str) -> Result<Vec<i64>, InstanceError> {
        self.line += 1;
        let next = self.inner.by_ref().map(str::trim).find(|l| !l.is_empty());
        let line = next.ok_or_else(|| self.error(format!("missing line for {what}")))?;
        let values = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<i64>()
                    .map_err(|_| self.error(format!("'{tok}' is not an integer in {what}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if values.len() < min {
            return Err(self.error(format!(
                "expected {min} values for {what}, found {}",
                values.len()
            )));
        }
        Ok(values)
    }

    fn count(&self, value: i64, what: &str) -> Result<usize, InstanceError> {
        usize::try_from(value).map_err(|_| self.error(format!("{what} {value} is negative")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    const SAMPLE: &str = "
3 2
4 2

3 2 0 0
2 1 5 1
0 0 4 2

1 1
1 2
0
";

    #[test]
    fn test_parse_sample() {
        let inst = parse_instance(SAMPLE).unwrap();
        assert_eq!(inst.nb_tasks(), 3);
        assert_eq!(inst.nb_resources(), 2);
        assert_eq!(inst.capacities(), &[4, 2]);
        assert_eq!(inst.processing_time(1, 1), 5);
        assert_eq!(inst.weight(0, 0), 2);
        assert_eq!(inst.weight(1, 2), 2);
        assert_eq!(inst.successors(0), &[1]);
        assert_eq!(inst.successors(1), &[2]);
        assert!(inst.successors(2).is_empty());
        assert_eq!(inst.horizon(), 12);
        assert!(!inst.is_compatible(0, 1));
    }

    #[test]
    fn test_from_str() {
        let inst: Instance = SAMPLE.parse().unwrap();
        assert_eq!(inst.nb_tasks(), 3);
    }

    #[test]
    fn test_extra_tokens_ignored() {
        let inst = parse_instance("1 1 9\n5 7\n3 2 8\n0 4\n").unwrap();
        assert_eq!(inst.capacities(), &[5]);
        assert!(inst.successors(0).is_empty());
    }

    #[test]
    fn test_missing_line() {
        let err = parse_instance("2 1\n5\n3 2\n").unwrap_err();
        match err {
            InstanceError::Parse { line, message } => {
                assert_eq!(line, 4);
                assert!(message.contains("task 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_integer_token() {
        let err = parse_instance("1 1\nfive\n3 2\n0\n").unwrap_err();
        assert!(matches!(err, InstanceError::Parse { line: 2, .. }));
        assert!(err.to_string().contains("'five'"));
    }

    #[test]
    fn test_short_line() {
        let err = parse_instance("1 2\n5 5\n3 2 1\n0\n").unwrap_err();
        assert!(matches!(err, InstanceError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_successor_line_takes_all_listed_ids() {
        // Declared count disagrees with the listed ids; the ids win.
        let inst = parse_instance("3 1\n5\n3 2\n3 2\n3 2\n2 1\n1 0 2\n-1 0\n").unwrap();
        assert_eq!(inst.successors(0), &[1]);
        assert_eq!(inst.successors(1), &[0, 2]);
        assert!(inst.successors(2).is_empty());
    }

    #[test]
    fn test_negative_successor_id() {
        let err = parse_instance("1 1\n5\n3 2\n1 -4\n").unwrap_err();
        assert!(matches!(err, InstanceError::Parse { line: 4, .. }));
    }

    #[test]
    fn test_huge_durations_load() {
        let text = format!("2 1\n5\n{m} 1\n{m} 1\n0\n0\n", m = i64::MAX);
        let inst = parse_instance(&text).unwrap();
        assert_eq!(inst.horizon(), i64::MAX);
    }

    #[test]
    fn test_negative_count() {
        let err = parse_instance("-1 1\n5\n").unwrap_err();
        assert!(matches!(err, InstanceError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_unknown_successor() {
        let err = parse_instance("1 1\n5\n3 2\n1 4\n").unwrap_err();
        match err {
            InstanceError::Invalid(errors) => {
                assert_eq!(errors[0].kind, ValidationErrorKind::InvalidSuccessor);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_instance("/nonexistent/instance.txt").unwrap_err();
        assert!(matches!(err, InstanceError::Io(_)));
    }

    #[test]
    fn test_read_file() {
        let path = std::env::temp_dir().join(format!("u-cumulative-{}.txt", std::process::id()));
        std::fs::write(&path, SAMPLE).unwrap();
        let inst = read_instance(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(inst.horizon(), 12);
    }
}
