//! TOML job files
//!
//! ```toml
//! dry_run = false
//!
//! [[job]]
//! file = "app/Http/Kernel.php"
//! property = "middleware"
//! value = "throttle"
//!
//! [[job]]
//! file = "app/Http/Requests/CountryRequest.php"
//! method = "rules"
//! path = ["name", 0]
//! value = { class = "App\\Rules\\Country" }
//! ```

use coder_order::{CoderError, MethodQuery, Value};
use coder_php::{parse_fragment, Job, JobTarget, ParseError};
use coder_syntax::{ArrayPath, PathError, PathSegment, UnknownVisibility, Visibility};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Errors loading a job file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML or has unknown fields
    #[error("invalid job file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Job names no target, or two
    #[error("job {index}: {message}")]
    Target { index: usize, message: String },

    /// Job path is malformed
    #[error("job {index}: invalid path: {source}")]
    Path {
        index: usize,
        #[source]
        source: PathError,
    },

    /// Job value cannot be inserted
    #[error("job {index}: {source}")]
    Value {
        index: usize,
        #[source]
        source: ValueError,
    },

    /// Job visibility is not a PHP keyword
    #[error("job {index}: {source}")]
    Visibility {
        index: usize,
        #[source]
        source: UnknownVisibility,
    },
}

/// Errors turning a configured value into a [`Value`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    /// Value has no literal form
    #[error(transparent)]
    Shape(#[from] CoderError),

    /// `code` is not one PHP expression
    #[error(transparent)]
    Code(#[from] ParseError),
}

/// Contents of a job file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobFile {
    /// Report without writing files
    #[serde(default)]
    pub dry_run: bool,
    /// `[[job]]` tables, in order
    #[serde(default, rename = "job")]
    pub jobs: Vec<JobSpec>,
}

impl JobFile {
    /// Parse job file text
    ///
    /// # Errors
    /// Returns [`ConfigError::Toml`] for malformed TOML or unknown fields
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a job file
    ///
    /// # Errors
    /// - [`ConfigError::Io`] if the file cannot be read
    /// - [`ConfigError::Toml`] as in [`JobFile::parse`]
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&text)
    }

    /// Build runnable jobs; relative files are resolved against `base`
    ///
    /// # Errors
    /// Returns the first job that does not convert
    pub fn to_jobs(&self, base: &Path) -> Result<Vec<Job>, ConfigError> {
        self.jobs
            .iter()
            .enumerate()
            .map(|(index, spec)| spec.to_job(index, base))
            .collect()
    }
}

/// One `[[job]]` table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSpec {
    pub file: PathBuf,
    pub property: Option<String>,
    pub method: Option<String>,
    pub visibility: Option<String>,
    #[serde(rename = "static")]
    pub is_static: Option<bool>,
    pub parameters: Option<Vec<String>>,
    #[serde(default)]
    pub path: PathSpec,
    pub value: ValueSpec,
}

impl JobSpec {
    fn to_job(&self, index: usize, base: &Path) -> Result<Job, ConfigError> {
        let target_error = |message: &str| ConfigError::Target {
            index,
            message: message.to_string(),
        };
        let target = match (&self.property, &self.method) {
            (Some(property), None) => {
                if self.visibility.is_some() || self.is_static.is_some() || self.parameters.is_some() {
                    return Err(target_error("visibility, static and parameters only apply to methods"));
                }
                JobTarget::Property(property.trim_start_matches('$').to_string())
            }
            (None, Some(method)) => JobTarget::Return(self.query(index, method)?),
            (Some(_), Some(_)) => return Err(target_error("set either property or method, not both")),
            (None, None) => return Err(target_error("missing property or method")),
        };

        let path = self
            .path
            .to_path()
            .map_err(|source| ConfigError::Path { index, source })?;
        let value = self
            .value
            .to_value()
            .map_err(|source| ConfigError::Value { index, source })?;
        let file = if self.file.is_relative() {
            base.join(&self.file)
        } else {
            self.file.clone()
        };

        Ok(Job {
            file,
            target,
            path,
            value,
        })
    }

    fn query(&self, index: usize, method: &str) -> Result<MethodQuery, ConfigError> {
        let mut query = MethodQuery::new(method);
        if let Some(visibility) = &self.visibility {
            let visibility: Visibility = visibility
                .parse()
                .map_err(|source| ConfigError::Visibility { index, source })?;
            query = query.visibility(visibility);
        }
        if let Some(is_static) = self.is_static {
            query = query.is_static(is_static);
        }
        if let Some(parameters) = &self.parameters {
            query = query.parameters(parameters.iter().map(|p| p.trim_start_matches('$')));
        }
        Ok(query)
    }
}

/// `path` of a job: dot notation or an array of keys and indexes
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PathSpec {
    Dotted(String),
    Segments(Vec<SegmentSpec>),
}

impl Default for PathSpec {
    fn default() -> Self {
        PathSpec::Dotted(String::new())
    }
}

impl PathSpec {
    /// Convert to an [`ArrayPath`]
    ///
    /// # Errors
    /// Returns [`PathError`] for malformed dot notation
    pub fn to_path(&self) -> Result<ArrayPath, PathError> {
        match self {
            PathSpec::Dotted(text) => text.parse(),
            PathSpec::Segments(segments) => Ok(segments
                .iter()
                .map(|segment| match segment {
                    SegmentSpec::Index(i) => PathSegment::Index(*i),
                    SegmentSpec::Key(key) => PathSegment::Key(key.clone()),
                })
                .collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SegmentSpec {
    Index(i64),
    Key(String),
}

/// `value` of a job
///
/// Scalars map to the matching literal. Tables select references,
/// code and null: `{ class = "Foo" }`, `{ class = "Foo", constant = "BAR" }`,
/// `{ code = "foo()" }`, `{ null = true }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ValueSpec(pub toml::Value);

impl ValueSpec {
    /// Convert to a validated [`Value`]
    ///
    /// # Errors
    /// - [`ValueError::Shape`] for arrays, datetimes and unknown tables
    /// - [`ValueError::Code`] if `code` does not parse as one expression
    pub fn to_value(&self) -> Result<Value, ValueError> {
        let value = match &self.0 {
            toml::Value::Boolean(b) => Value::Bool(*b),
            toml::Value::Integer(i) => Value::Int(*i),
            toml::Value::Float(x) => Value::Float(*x),
            toml::Value::String(s) => Value::String(s.clone()),
            toml::Value::Table(table) => table_value(table)?,
            other => {
                return Err(CoderError::unsupported(format!("{} values cannot be inserted", other.type_str())).into())
            }
        };
        value.validate()?;
        Ok(value)
    }
}

fn table_value(table: &toml::Table) -> Result<Value, ValueError> {
    let mut keys: Vec<&str> = table.keys().map(String::as_str).collect();
    keys.sort_unstable();
    let text = |key: &str| table.get(key).and_then(toml::Value::as_str);

    match (keys.as_slice(), text("class"), text("constant"), text("code")) {
        (["class"], Some(class), _, _) => Ok(Value::ClassRef(class.to_string())),
        (["class", "constant"], Some(class), Some(constant), _) => Ok(Value::class_constant(class, constant)),
        (["code"], _, _, Some(code)) => Ok(Value::Opaque(parse_fragment(code)?)),
        (["null"], _, _, _) if table.get("null").and_then(toml::Value::as_bool) == Some(true) => Ok(Value::Null),
        _ => Err(CoderError::unsupported(format!("table with keys [{}]", keys.join(", "))).into()),
    }
}
