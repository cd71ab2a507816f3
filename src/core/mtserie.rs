//! MTSerie: the multivariate time series container.
//!
//! Bundles several named numeric sequences describing one logical subject
//! (a patient, a sensor rig), optional shared or per-variable date axes,
//! static side features, and metadata. Structural invariants (evenness,
//! dating, alignment) are recomputed at the end of every structural
//! mutation and never trusted from the caller.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::{MtsError, Result};
use crate::granularity::{allowed_downsample_rules, ResampleRule};

/// How date axes are supplied at construction.
#[derive(Debug, Clone, Default)]
pub enum DateSpec {
    /// The data is not dated.
    #[default]
    None,
    /// One ordered axis shared by every variable.
    Shared(Vec<DateTime<Utc>>),
    /// One axis per variable, ordered like the variables.
    PerVariable(Vec<Vec<DateTime<Utc>>>),
}

/// Time length of a container: a scalar when the data is even, otherwise
/// one length per variable in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeLength {
    Even(usize),
    Uneven(Vec<usize>),
}

/// First/last timestamp pair(s) of a dated container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatesRange {
    /// Range of the shared axis.
    Shared(DateTime<Utc>, DateTime<Utc>),
    /// Range per variable, in canonical order.
    PerVariable(Vec<(String, (DateTime<Utc>, DateTime<Utc>))>),
}

/// A multivariate time series.
///
/// `variable_names` is the single canonical ordering source; the value and
/// date maps are only ever traversed through it.
#[derive(Debug, Clone)]
pub struct MTSerie {
    variable_names: Vec<String>,
    variables: HashMap<String, Vec<f64>>,
    dates: Vec<DateTime<Utc>>,
    variables_dates: HashMap<String, Vec<DateTime<Utc>>>,
    numerical_features: Vec<f64>,
    numerical_labels: Vec<String>,
    categorical_features: Vec<String>,
    categorical_labels: Vec<String>,
    metadata: HashMap<String, String>,
    is_data_dated: bool,
    is_data_dated_per_variable: bool,
    is_data_even: bool,
    is_data_aligned: bool,
    is_any_variable_named: bool,
    time_length: TimeLength,
}

/// Builder for constructing [`MTSerie`].
#[derive(Debug, Clone, Default)]
pub struct MTSerieBuilder {
    values: Vec<Vec<f64>>,
    names: Option<Vec<String>>,
    dates: DateSpec,
    numerical_features: Vec<f64>,
    numerical_labels: Vec<String>,
    categorical_features: Vec<String>,
    categorical_labels: Vec<String>,
    metadata: HashMap<String, String>,
}

impl MTSerieBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-variable value sequences, in canonical order.
    pub fn values(mut self, values: Vec<Vec<f64>>) -> Self {
        self.values = values;
        self
    }

    /// Name the variables. When omitted, stringified positional indices are
    /// used and the container reports `is_any_variable_named() == false`.
    pub fn names(mut self, names: Vec<String>) -> Self {
        self.names = Some(names);
        self
    }

    /// Set the date specification.
    pub fn dates(mut self, dates: DateSpec) -> Self {
        self.dates = dates;
        self
    }

    /// Set the static numerical side features and their labels.
    pub fn numerical_features(mut self, features: Vec<f64>, labels: Vec<String>) -> Self {
        self.numerical_features = features;
        self.numerical_labels = labels;
        self
    }

    /// Set the static categorical side features and their labels.
    pub fn categorical_features(mut self, features: Vec<String>, labels: Vec<String>) -> Self {
        self.categorical_features = features;
        self.categorical_labels = labels;
        self
    }

    /// Attach an opaque metadata entry.
    pub fn metadata(mut self, key: String, value: String) -> Self {
        self.metadata.insert(key, value);
        self
    }

    pub fn build(self) -> Result<MTSerie> {
        let is_any_variable_named = self.names.is_some();

        let names = match self.names {
            Some(names) => {
                if names.len() != self.values.len() {
                    return Err(MtsError::DimensionMismatch {
                        expected: self.values.len(),
                        got: names.len(),
                    });
                }
                names
            }
            None => (0..self.values.len()).map(|i| i.to_string()).collect(),
        };

        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(MtsError::InvalidParameter(format!(
                    "duplicate variable name '{name}'"
                )));
            }
        }

        let mut variables = HashMap::with_capacity(names.len());
        for (name, serie) in names.iter().zip(self.values.iter()) {
            variables.insert(name.clone(), serie.clone());
        }

        let mut dates = Vec::new();
        let mut variables_dates = HashMap::new();
        let (is_data_dated, is_data_dated_per_variable) = match self.dates {
            DateSpec::None => (false, false),
            DateSpec::Shared(axis) => {
                // A shared axis must match the common length when one exists.
                if let Some(first) = self.values.first() {
                    if self.values.iter().all(|v| v.len() == first.len())
                        && axis.len() != first.len()
                    {
                        return Err(MtsError::DimensionMismatch {
                            expected: first.len(),
                            got: axis.len(),
                        });
                    }
                }
                dates = axis;
                (true, false)
            }
            DateSpec::PerVariable(axes) => {
                if axes.len() != self.values.len() {
                    return Err(MtsError::DimensionMismatch {
                        expected: self.values.len(),
                        got: axes.len(),
                    });
                }
                for (serie, axis) in self.values.iter().zip(axes.iter()) {
                    if axis.len() != serie.len() {
                        return Err(MtsError::DimensionMismatch {
                            expected: serie.len(),
                            got: axis.len(),
                        });
                    }
                }
                for (name, axis) in names.iter().zip(axes.into_iter()) {
                    variables_dates.insert(name.clone(), axis);
                }
                (true, true)
            }
        };

        if !self.numerical_labels.is_empty()
            && self.numerical_labels.len() != self.numerical_features.len()
        {
            return Err(MtsError::DimensionMismatch {
                expected: self.numerical_features.len(),
                got: self.numerical_labels.len(),
            });
        }
        if !self.categorical_labels.is_empty()
            && self.categorical_labels.len() != self.categorical_features.len()
        {
            return Err(MtsError::DimensionMismatch {
                expected: self.categorical_features.len(),
                got: self.categorical_labels.len(),
            });
        }

        let mut mtserie = MTSerie {
            variable_names: names,
            variables,
            dates,
            variables_dates,
            numerical_features: self.numerical_features,
            numerical_labels: self.numerical_labels,
            categorical_features: self.categorical_features,
            categorical_labels: self.categorical_labels,
            metadata: self.metadata,
            is_data_dated,
            is_data_dated_per_variable,
            is_data_even: false,
            is_data_aligned: false,
            is_any_variable_named,
            time_length: TimeLength::Even(0),
        };
        mtserie.recompute_invariants();
        Ok(mtserie)
    }
}

impl MTSerie {
    /// Build from an ordered array-of-arrays with positional names.
    pub fn from_values(values: Vec<Vec<f64>>) -> Result<Self> {
        MTSerieBuilder::new().values(values).build()
    }

    /// Build from ordered name/sequence pairs.
    pub fn from_pairs(pairs: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let (names, values) = pairs.into_iter().unzip();
        MTSerieBuilder::new().values(values).names(names).build()
    }

    // ==================== invariants ====================

    /// Recompute the derived invariant snapshot. Runs at the end of every
    /// structural mutation, so stale flags are never observable.
    fn recompute_invariants(&mut self) {
        self.is_data_even = self.compute_uniformity();
        self.time_length = self.compute_time_length();
        self.is_data_aligned = self.compute_alignment();
    }

    /// True iff all variable sequences have identical length.
    pub fn compute_uniformity(&self) -> bool {
        let mut lengths = self
            .variable_names
            .iter()
            .map(|name| self.variables[name].len());
        match lengths.next() {
            Some(first) => lengths.all(|len| len == first),
            None => true,
        }
    }

    /// True iff the container is aligned: not dated, dated on one shared
    /// axis, or dated per variable with pointwise-identical axes.
    pub fn compute_alignment(&self) -> bool {
        if !self.is_data_dated {
            return true;
        }
        if !self.is_data_dated_per_variable {
            return true;
        }
        if !self.compute_uniformity() {
            return false;
        }

        let mut axes = self
            .variable_names
            .iter()
            .map(|name| &self.variables_dates[name]);
        match axes.next() {
            // Pointwise scan against the first axis, short-circuiting.
            Some(first) => axes.all(|axis| axis == first),
            None => true,
        }
    }

    fn compute_time_length(&self) -> TimeLength {
        if self.is_data_even {
            let len = self
                .variable_names
                .first()
                .map(|name| self.variables[name].len())
                .unwrap_or(0);
            TimeLength::Even(len)
        } else {
            TimeLength::Uneven(
                self.variable_names
                    .iter()
                    .map(|name| self.variables[name].len())
                    .collect(),
            )
        }
    }

    // ==================== accessors ====================

    /// Canonical, insertion-ordered variable names.
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    /// Number of variables.
    pub fn variables_length(&self) -> usize {
        self.variable_names.len()
    }

    pub fn time_length(&self) -> &TimeLength {
        &self.time_length
    }

    pub fn is_data_even(&self) -> bool {
        self.is_data_even
    }

    pub fn is_data_dated(&self) -> bool {
        self.is_data_dated
    }

    pub fn is_data_dated_per_variable(&self) -> bool {
        self.is_data_dated_per_variable
    }

    pub fn is_data_aligned(&self) -> bool {
        self.is_data_aligned
    }

    pub fn is_any_variable_named(&self) -> bool {
        self.is_any_variable_named
    }

    /// Shared date axis (empty unless dated on a shared axis).
    pub fn dates(&self) -> &[DateTime<Utc>] {
        &self.dates
    }

    /// Date axis of one variable (per-variable dated containers only).
    pub fn variable_dates(&self, name: &str) -> Result<&[DateTime<Utc>]> {
        self.variables_dates
            .get(name)
            .map(|axis| axis.as_slice())
            .ok_or_else(|| MtsError::UnknownVariable(name.to_string()))
    }

    pub fn numerical_features(&self) -> &[f64] {
        &self.numerical_features
    }

    pub fn numerical_labels(&self) -> &[String] {
        &self.numerical_labels
    }

    pub fn categorical_features(&self) -> &[String] {
        &self.categorical_features
    }

    pub fn categorical_labels(&self) -> &[String] {
        &self.categorical_labels
    }

    pub fn has_numerical_features(&self) -> bool {
        !self.numerical_features.is_empty()
    }

    pub fn has_categorical_features(&self) -> bool {
        !self.categorical_features.is_empty()
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    pub fn has_metadata(&self) -> bool {
        !self.metadata.is_empty()
    }

    // ==================== queries ====================

    /// Raw value sequence of one variable.
    pub fn get_serie(&self, name: &str) -> Result<&[f64]> {
        self.variables
            .get(name)
            .map(|serie| serie.as_slice())
            .ok_or_else(|| MtsError::UnknownVariable(name.to_string()))
    }

    /// Like [`get_serie`](Self::get_serie), but accepts anything with a
    /// string form, so positionally named containers can be indexed by
    /// number (`at(0)` finds the variable named `"0"`).
    pub fn at(&self, key: impl ToString) -> Result<&[f64]> {
        self.get_serie(&key.to_string())
    }

    /// Per-variable half-open slices `[begin, end)`, in canonical order.
    ///
    /// Requires even data.
    pub fn query_by_index(&self, begin: usize, end: usize) -> Result<Vec<(String, Vec<f64>)>> {
        let len = match self.time_length {
            TimeLength::Even(len) => len,
            TimeLength::Uneven(_) => {
                return Err(MtsError::PreconditionViolation(
                    "query_by_index requires even data".to_string(),
                ))
            }
        };
        if begin > end {
            return Err(MtsError::InvalidParameter(format!(
                "begin index {begin} exceeds end index {end}"
            )));
        }
        if end > len {
            return Err(MtsError::IndexOutOfBounds {
                index: end,
                size: len,
            });
        }

        Ok(self
            .variable_names
            .iter()
            .map(|name| (name.clone(), self.variables[name][begin..end].to_vec()))
            .collect())
    }

    /// First/last timestamp pair of the shared axis, or one pair per
    /// variable when dated per variable.
    pub fn get_dates_range(&self) -> Result<DatesRange> {
        if !self.is_data_dated {
            return Err(MtsError::PreconditionViolation(
                "get_dates_range requires dated data".to_string(),
            ));
        }

        if self.is_data_dated_per_variable {
            let mut ranges = Vec::with_capacity(self.variable_names.len());
            for name in &self.variable_names {
                let axis = &self.variables_dates[name];
                let (first, last) = match (axis.first(), axis.last()) {
                    (Some(first), Some(last)) => (*first, *last),
                    _ => return Err(MtsError::EmptyData),
                };
                ranges.push((name.clone(), (first, last)));
            }
            Ok(DatesRange::PerVariable(ranges))
        } else {
            match (self.dates.first(), self.dates.last()) {
                (Some(first), Some(last)) => Ok(DatesRange::Shared(*first, *last)),
                _ => Err(MtsError::EmptyData),
            }
        }
    }

    /// Resampling rules the shared date axis supports; see
    /// [`allowed_downsample_rules`].
    pub fn downsample_rules(&self) -> Result<Vec<ResampleRule>> {
        if !self.is_data_dated || self.is_data_dated_per_variable {
            return Err(MtsError::PreconditionViolation(
                "downsample_rules requires one shared date axis".to_string(),
            ));
        }
        allowed_downsample_rules(&self.dates)
    }

    // ==================== mutators ====================

    /// Remove a variable, its per-variable date axis if present, and its
    /// name from the canonical order, then recompute the invariant
    /// snapshot in the same atomic step.
    pub fn remove_time_serie(&mut self, name: &str) -> Result<()> {
        let position = self
            .variable_names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| MtsError::UnknownVariable(name.to_string()))?;

        self.variable_names.remove(position);
        self.variables.remove(name);
        if self.is_data_dated && self.is_data_dated_per_variable {
            self.variables_dates.remove(name);
        }
        self.recompute_invariants();
        Ok(())
    }

    /// Rescale every variable into `[0, 1]` in place via min-max scaling.
    ///
    /// A constant variable has zero range and would divide by zero, so the
    /// whole operation fails with [`MtsError::DegenerateRange`] before any
    /// variable is mutated.
    pub fn normalize_data(&mut self) -> Result<()> {
        let mut ranges = Vec::with_capacity(self.variable_names.len());
        for name in &self.variable_names {
            let serie = &self.variables[name];
            if serie.is_empty() {
                return Err(MtsError::EmptyData);
            }
            let min = serie.iter().copied().fold(f64::INFINITY, f64::min);
            let max = serie.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if max == min {
                return Err(MtsError::DegenerateRange(name.clone()));
            }
            ranges.push((min, max));
        }

        for (name, (min, max)) in self.variable_names.iter().zip(ranges) {
            if let Some(serie) = self.variables.get_mut(name) {
                for value in serie.iter_mut() {
                    *value = (*value - min) / (max - min);
                }
            }
        }
        Ok(())
    }

    /// Truncate every variable (and its date axis) to its last `n` samples,
    /// then recompute the invariant snapshot.
    pub fn set_same_range(&mut self, n: usize) {
        for name in &self.variable_names {
            if let Some(serie) = self.variables.get_mut(name) {
                let start = serie.len().saturating_sub(n);
                serie.drain(..start);
            }
            if let Some(axis) = self.variables_dates.get_mut(name) {
                let start = axis.len().saturating_sub(n);
                axis.drain(..start);
            }
        }
        let start = self.dates.len().saturating_sub(n);
        self.dates.drain(..start);
        self.recompute_invariants();
    }

    // ==================== transforms ====================

    /// Downsample onto the calendar buckets implied by `rule`, replacing
    /// each variable with its per-bucket arithmetic mean and the shared
    /// axis with the occupied bucket starts. Returns a new container; the
    /// receiver is untouched.
    ///
    /// Requires even, aligned data dated on one shared axis.
    pub fn resample(&self, rule: ResampleRule) -> Result<MTSerie> {
        if !self.is_data_even || !self.is_data_aligned {
            return Err(MtsError::PreconditionViolation(
                "resample requires even and aligned data".to_string(),
            ));
        }
        if !self.is_data_dated || self.is_data_dated_per_variable {
            return Err(MtsError::PreconditionViolation(
                "resample requires one shared date axis".to_string(),
            ));
        }

        // Occupied buckets in first-seen order; empty buckets are skipped
        // so the result axis is never longer than the original.
        let mut bucket_starts: Vec<DateTime<Utc>> = Vec::new();
        let mut bucket_members: Vec<Vec<usize>> = Vec::new();
        let mut bucket_index: HashMap<DateTime<Utc>, usize> = HashMap::new();
        for (i, date) in self.dates.iter().enumerate() {
            let start = rule.bucket_start(*date);
            let slot = *bucket_index.entry(start).or_insert_with(|| {
                bucket_starts.push(start);
                bucket_members.push(Vec::new());
                bucket_starts.len() - 1
            });
            bucket_members[slot].push(i);
        }

        let mut resampled = self.clone();
        for name in &self.variable_names {
            let serie = &self.variables[name];
            let means = bucket_members
                .iter()
                .map(|members| {
                    members.iter().map(|&i| serie[i]).sum::<f64>() / members.len() as f64
                })
                .collect();
            resampled.variables.insert(name.clone(), means);
        }
        resampled.dates = bucket_starts;
        resampled.recompute_invariants();
        Ok(resampled)
    }
}
