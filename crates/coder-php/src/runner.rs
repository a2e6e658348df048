//! File jobs
//!
//! A [`Job`] names a PHP file, a target array and a value. The
//! [`Runner`] reads each file once, applies every job for it in order,
//! and writes the file back only when its text changed.

use crate::egress::render;
use crate::error::RunError;
use crate::ingress::{parse_source, SourceUnit};
use coder_order::{insert_into_property_array, insert_into_return_array, CoderResult, MethodQuery, Outcome, Value};
use coder_syntax::ArrayPath;
use futures::future::join_all;
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

/// Array a job inserts into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobTarget {
    /// Initializer of the property with this name (without `$`)
    Property(String),
    /// Array returned by the matching method
    Return(MethodQuery),
}

impl Display for JobTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            JobTarget::Property(name) => write!(f, "property '${name}'"),
            JobTarget::Return(query) => write!(f, "return of {query}"),
        }
    }
}

/// One insertion into one file
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    /// PHP file to edit
    pub file: PathBuf,
    /// Target array
    pub target: JobTarget,
    /// Path from the target to the array receiving the value
    pub path: ArrayPath,
    /// Value to insert
    pub value: Value,
}

impl Job {
    /// Insert into a property array
    pub fn property(file: impl Into<PathBuf>, property: impl Into<String>, path: ArrayPath, value: Value) -> Self {
        Self {
            file: file.into(),
            target: JobTarget::Property(property.into()),
            path,
            value,
        }
    }

    /// Insert into a method's returned array
    pub fn method_return(file: impl Into<PathBuf>, query: MethodQuery, path: ArrayPath, value: Value) -> Self {
        Self {
            file: file.into(),
            target: JobTarget::Return(query),
            path,
            value,
        }
    }
}

/// Apply one job to a parsed file
///
/// # Errors
/// Propagates the insertion error; the unit is unchanged on error, since
/// arrays on the path are only created below the first missing key
pub fn apply_job(unit: &mut SourceUnit, job: &Job) -> CoderResult<Outcome> {
    match &job.target {
        JobTarget::Property(name) => insert_into_property_array(unit.tree_mut(), name, &job.path, &job.value),
        JobTarget::Return(query) => insert_into_return_array(unit.tree_mut(), query, &job.path, &job.value),
    }
}

/// Result of one job in a batch
#[derive(Debug, Clone)]
pub struct JobReport {
    /// Position of the job in the batch
    pub index: usize,
    /// File the job edits
    pub file: PathBuf,
    /// Human-readable target
    pub target: String,
    /// Outcome or failure
    pub result: Result<Outcome, RunError>,
}

/// Results of a batch, in job order
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One report per job
    pub jobs: Vec<JobReport>,
    /// Files whose text changed on disk
    pub files_written: Vec<PathBuf>,
}

impl BatchReport {
    /// Check that no job failed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.jobs.iter().all(|job| job.result.is_ok())
    }

    /// Failed jobs
    pub fn failed(&self) -> impl Iterator<Item = &JobReport> {
        self.jobs.iter().filter(|job| job.result.is_err())
    }

    /// Number of jobs that modified their file
    #[must_use]
    pub fn modified_count(&self) -> usize {
        self.jobs
            .iter()
            .filter(|job| matches!(job.result, Ok(Outcome::Modified)))
            .count()
    }
}

/// Runs jobs against files on disk
#[derive(Debug, Clone, Default)]
pub struct Runner {
    dry_run: bool,
}

impl Runner {
    /// Create a runner that writes changed files
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute results without writing files
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run a single job
    ///
    /// # Errors
    /// Returns the job's [`RunError`]
    pub async fn run(&self, job: Job) -> Result<Outcome, RunError> {
        let mut report = self.run_batch(vec![job]).await;
        match report.jobs.pop() {
            Some(job) => job.result,
            None => Ok(Outcome::Unchanged),
        }
    }

    /// Run jobs, grouped by file
    ///
    /// Files are processed concurrently; jobs for the same file run in
    /// batch order against one parse of it. Paths naming the same file
    /// through `..`, `.` or symlinks share a group. A job failing leaves
    /// the other jobs for its file in effect.
    pub async fn run_batch(&self, jobs: Vec<Job>) -> BatchReport {
        let mut groups: Vec<(PathBuf, PathBuf, Vec<(usize, Job)>)> = Vec::new();
        for (index, job) in jobs.into_iter().enumerate() {
            // Unreadable paths keep their spelling and fail in their own group
            let key = tokio::fs::canonicalize(&job.file)
                .await
                .unwrap_or_else(|_| job.file.clone());
            match groups.iter_mut().find(|(existing, _, _)| *existing == key) {
                Some((_, _, group)) => group.push((index, job)),
                None => groups.push((key, job.file.clone(), vec![(index, job)])),
            }
        }
        tracing::debug!("Running batch over {} files", groups.len());

        let results = join_all(
            groups
                .into_iter()
                .map(|(_, file, group)| self.run_file(file, group)),
        )
        .await;

        let mut report = BatchReport::default();
        for (written, reports) in results {
            report.files_written.extend(written);
            report.jobs.extend(reports);
        }
        report.jobs.sort_by_key(|job| job.index);
        report
    }

    async fn run_file(&self, file: PathBuf, group: Vec<(usize, Job)>) -> (Option<PathBuf>, Vec<JobReport>) {
        let mut reports: Vec<JobReport> = group
            .iter()
            .map(|(index, job)| JobReport {
                index: *index,
                file: job.file.clone(),
                target: job.target.to_string(),
                result: Ok(Outcome::Unchanged),
            })
            .collect();

        let written = match self.process_file(&file, &group, &mut reports).await {
            Ok(written) => written.then(|| file.clone()),
            Err(error) => {
                tracing::warn!("{}", error);
                for report in &mut reports {
                    if report.result.is_ok() {
                        report.result = Err(error.clone());
                    }
                }
                None
            }
        };

        for report in &reports {
            match &report.result {
                Ok(outcome) => tracing::info!("{} {}: {:?}", report.file.display(), report.target, outcome),
                Err(error) if error.coder_error().is_some() => tracing::warn!("{}", error),
                Err(_) => {}
            }
        }
        (written, reports)
    }

    /// Parse, apply and write one file; `Ok(true)` if it was written
    async fn process_file(
        &self,
        file: &Path,
        group: &[(usize, Job)],
        reports: &mut [JobReport],
    ) -> Result<bool, RunError> {
        let source = tokio::fs::read_to_string(file)
            .await
            .map_err(|e| RunError::io(file, e))?;
        let mut unit = parse_source(&source).map_err(|e| RunError::parse(file, e))?;

        for ((_, job), report) in group.iter().zip(reports.iter_mut()) {
            report.result = apply_job(&mut unit, job).map_err(|e| RunError::apply(file, e));
        }

        let rendered = render(&unit).map_err(|e| RunError::serialize(file, e))?;
        if rendered == source || self.dry_run {
            return Ok(false);
        }
        tokio::fs::write(file, rendered)
            .await
            .map_err(|e| RunError::io(file, e))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_display() {
        assert_eq!(JobTarget::Property("rules".into()).to_string(), "property '$rules'");
        assert_eq!(
            JobTarget::Return(MethodQuery::new("rules")).to_string(),
            format!("return of {}", MethodQuery::new("rules"))
        );
    }

    #[test]
    fn apply_job_to_unit() {
        let mut unit = parse_source("<?php class A { public $items = [1]; }").unwrap();
        let job = Job::property("a.php", "items", ArrayPath::root(), Value::Int(2));
        assert_eq!(apply_job(&mut unit, &job), Ok(Outcome::Modified));
        assert_eq!(apply_job(&mut unit, &job), Ok(Outcome::Unchanged));
    }

    #[test]
    fn failed_job_leaves_unit_unchanged() {
        let source = "<?php class A { public $rules = ['name' => ['max' => 5]]; }";
        let mut unit = parse_source(source).unwrap();

        let deep = Job::property(
            "a.php",
            "rules",
            "name.max.inner".parse().unwrap(),
            Value::from("x"),
        );
        assert!(matches!(
            apply_job(&mut unit, &deep),
            Err(coder_order::CoderError::ShapeMismatch { .. })
        ));
        let missing = Job::method_return("a.php", MethodQuery::new("rules"), ArrayPath::root(), Value::Null);
        assert!(apply_job(&mut unit, &missing).is_err());

        assert_eq!(render(&unit).unwrap(), source);
    }
}
