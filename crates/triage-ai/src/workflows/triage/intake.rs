use std::ops::RangeInclusive;

use super::domain::{ObservationSubmission, PatientObservation, PrimarySymptom, UnknownSymptom};

/// Validation errors raised before an observation reaches the scorer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max} (found {found})")]
    OutOfRange {
        field: ObservationField,
        min: f64,
        max: f64,
        found: f64,
    },
    #[error("{field} must be a finite number")]
    NotFinite { field: ObservationField },
    #[error(transparent)]
    UnknownSymptom(#[from] UnknownSymptom),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationField {
    Age,
    HeartRate,
    SystolicBp,
    DiastolicBp,
    Temperature,
}

impl std::fmt::Display for ObservationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ObservationField::Age => "age",
            ObservationField::HeartRate => "heart_rate",
            ObservationField::SystolicBp => "systolic_bp",
            ObservationField::DiastolicBp => "diastolic_bp",
            ObservationField::Temperature => "temperature",
        };
        f.write_str(name)
    }
}

/// Accepted ranges for each observation field, inclusive on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationBounds {
    pub age: RangeInclusive<u8>,
    pub heart_rate: RangeInclusive<u16>,
    pub systolic_bp: RangeInclusive<u16>,
    pub diastolic_bp: RangeInclusive<u16>,
    pub temperature: RangeInclusive<f64>,
}

impl Default for ObservationBounds {
    fn default() -> Self {
        Self {
            age: 0..=120,
            heart_rate: 30..=200,
            systolic_bp: 70..=250,
            diastolic_bp: 40..=150,
            temperature: 30.0..=43.0,
        }
    }
}

/// Guard responsible for producing `PatientObservation` instances.
#[derive(Debug, Clone, Default)]
pub struct ObservationGuard {
    bounds: ObservationBounds,
}

impl ObservationGuard {
    pub fn with_bounds(bounds: ObservationBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &ObservationBounds {
        &self.bounds
    }

    /// Convert an inbound submission into a validated observation.
    pub fn observation_from_submission(
        &self,
        submission: ObservationSubmission,
    ) -> Result<PatientObservation, ValidationError> {
        let age = integer_within(ObservationField::Age, submission.age, &self.bounds.age)?;
        let heart_rate = integer_within(
            ObservationField::HeartRate,
            submission.heart_rate,
            &self.bounds.heart_rate,
        )?;
        let systolic_bp = integer_within(
            ObservationField::SystolicBp,
            submission.systolic_bp,
            &self.bounds.systolic_bp,
        )?;
        let diastolic_bp = integer_within(
            ObservationField::DiastolicBp,
            submission.diastolic_bp,
            &self.bounds.diastolic_bp,
        )?;

        if !submission.temperature.is_finite() {
            return Err(ValidationError::NotFinite {
                field: ObservationField::Temperature,
            });
        }
        let temperature = submission.temperature;
        self.check_temperature(temperature)?;

        let primary_symptom = submission.primary_symptom.parse::<PrimarySymptom>()?;

        Ok(PatientObservation {
            age,
            heart_rate,
            systolic_bp,
            diastolic_bp,
            temperature,
            primary_symptom,
        })
    }

    /// Re-check an observation that was built directly rather than from a submission.
    pub fn validate(&self, observation: &PatientObservation) -> Result<(), ValidationError> {
        integer_within(
            ObservationField::Age,
            i64::from(observation.age),
            &self.bounds.age,
        )?;
        integer_within(
            ObservationField::HeartRate,
            i64::from(observation.heart_rate),
            &self.bounds.heart_rate,
        )?;
        integer_within(
            ObservationField::SystolicBp,
            i64::from(observation.systolic_bp),
            &self.bounds.systolic_bp,
        )?;
        integer_within(
            ObservationField::DiastolicBp,
            i64::from(observation.diastolic_bp),
            &self.bounds.diastolic_bp,
        )?;
        if !observation.temperature.is_finite() {
            return Err(ValidationError::NotFinite {
                field: ObservationField::Temperature,
            });
        }
        self.check_temperature(observation.temperature)
    }

    fn check_temperature(&self, temperature: f64) -> Result<(), ValidationError> {
        if self.bounds.temperature.contains(&temperature) {
            return Ok(());
        }
        Err(ValidationError::OutOfRange {
            field: ObservationField::Temperature,
            min: *self.bounds.temperature.start(),
            max: *self.bounds.temperature.end(),
            found: temperature,
        })
    }
}

fn integer_within<T>(
    field: ObservationField,
    value: i64,
    range: &RangeInclusive<T>,
) -> Result<T, ValidationError>
where
    T: Copy + Into<i64> + TryFrom<i64>,
{
    let min: i64 = (*range.start()).into();
    let max: i64 = (*range.end()).into();
    let out_of_range = ValidationError::OutOfRange {
        field,
        min: min as f64,
        max: max as f64,
        found: value as f64,
    };

    if value < min || value > max {
        return Err(out_of_range);
    }
    T::try_from(value).map_err(|_| out_of_range)
}
