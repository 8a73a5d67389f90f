use super::super::domain::{PatientObservation, ScoreComponent, ScoringFactor, SymptomTier};
use super::config::{AgePolicy, ScoringPolicy, SymptomPolicy, TemperaturePolicy, VitalBandPolicy};

/// Evaluate every factor against the policy. Within a factor the most severe
/// matching band wins; factors add up.
pub(crate) fn score_observation(
    observation: &PatientObservation,
    policy: &ScoringPolicy,
) -> (Vec<ScoreComponent>, u16) {
    let components = vec![
        age_component(observation.age, &policy.age),
        vital_component(
            ScoringFactor::HeartRate,
            "heart rate",
            "bpm",
            observation.heart_rate,
            &policy.heart_rate,
        ),
        vital_component(
            ScoringFactor::SystolicBp,
            "systolic BP",
            "mmHg",
            observation.systolic_bp,
            &policy.systolic_bp,
        ),
        vital_component(
            ScoringFactor::DiastolicBp,
            "diastolic BP",
            "mmHg",
            observation.diastolic_bp,
            &policy.diastolic_bp,
        ),
        temperature_component(observation.temperature, &policy.temperature),
        symptom_component(observation, &policy.symptom),
    ];

    let total_score = components
        .iter()
        .fold(0u16, |total, component| total.saturating_add(component.points));

    (components, total_score)
}

fn age_component(age: u8, policy: &AgePolicy) -> ScoreComponent {
    let (points, notes) = if age >= policy.senior_from {
        (
            policy.senior_points,
            format!("age {age} at or above {}", policy.senior_from),
        )
    } else if age >= policy.middle_from {
        (
            policy.middle_points,
            format!(
                "age {age} between {} and {}",
                policy.middle_from,
                policy.senior_from - 1
            ),
        )
    } else {
        (0, format!("age {age} below {}", policy.middle_from))
    };

    ScoreComponent {
        factor: ScoringFactor::Age,
        points,
        notes,
    }
}

fn vital_component(
    factor: ScoringFactor,
    name: &str,
    unit: &str,
    value: u16,
    band: &VitalBandPolicy,
) -> ScoreComponent {
    let elevated_low = band.elevated_below.is_some_and(|below| value < below);

    let (points, notes) = if value < band.critical_below || value > band.critical_above {
        (
            band.critical_points,
            format!(
                "{name} {value} {unit} outside critical range {}-{}",
                band.critical_below, band.critical_above
            ),
        )
    } else if value > band.elevated_above || elevated_low {
        let lower = band
            .elevated_below
            .map(|below| below.to_string())
            .unwrap_or_else(|| band.critical_below.to_string());
        (
            band.elevated_points,
            format!(
                "{name} {value} {unit} outside normal range {lower}-{}",
                band.elevated_above
            ),
        )
    } else {
        (0, format!("{name} {value} {unit} within normal range"))
    };

    ScoreComponent {
        factor,
        points,
        notes,
    }
}

fn temperature_component(temperature: f64, policy: &TemperaturePolicy) -> ScoreComponent {
    let (points, notes) = if temperature >= policy.critical_fever {
        (
            policy.critical_points,
            format!(
                "temperature {temperature:.1}°C at or above {:.1}°C",
                policy.critical_fever
            ),
        )
    } else if temperature <= policy.critical_hypothermia {
        (
            policy.critical_points,
            format!(
                "temperature {temperature:.1}°C at or below {:.1}°C",
                policy.critical_hypothermia
            ),
        )
    } else if temperature >= policy.fever {
        (
            policy.fever_points,
            format!("temperature {temperature:.1}°C at or above {:.1}°C", policy.fever),
        )
    } else if temperature <= policy.hypothermia {
        (
            policy.fever_points,
            format!(
                "temperature {temperature:.1}°C at or below {:.1}°C",
                policy.hypothermia
            ),
        )
    } else if temperature >= policy.low_grade_fever {
        (
            policy.low_grade_points,
            format!(
                "low-grade fever {temperature:.1}°C at or above {:.1}°C",
                policy.low_grade_fever
            ),
        )
    } else {
        (0, format!("temperature {temperature:.1}°C within normal range"))
    };

    ScoreComponent {
        factor: ScoringFactor::Temperature,
        points,
        notes,
    }
}

fn symptom_component(observation: &PatientObservation, policy: &SymptomPolicy) -> ScoreComponent {
    let symptom = observation.primary_symptom;
    let (points, notes) = match symptom.tier() {
        SymptomTier::Critical => (
            policy.critical_points,
            format!("critical symptom: {}", symptom.display_name()),
        ),
        SymptomTier::Severe => (
            policy.severe_points,
            format!("severe symptom: {}", symptom.display_name()),
        ),
        SymptomTier::Minor => (
            policy.minor_points,
            format!("other symptom: {}", symptom.display_name()),
        ),
        SymptomTier::Absent => (0, "no primary symptom reported".to_string()),
    };

    ScoreComponent {
        factor: ScoringFactor::PrimarySymptom,
        points,
        notes,
    }
}
