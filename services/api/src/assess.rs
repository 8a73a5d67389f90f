use chrono::Utc;
use clap::Args;
use std::path::PathBuf;
use triage_ai::config::AppConfig;
use triage_ai::error::AppError;
use triage_ai::telemetry;
use triage_ai::workflows::triage::{
    symptom_catalogue, AssessmentView, ObservationSubmission, TriageService,
};

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Patient age in years (0-120)
    #[arg(long, default_value_t = 30)]
    pub(crate) age: i64,
    /// Heart rate in beats per minute (30-200)
    #[arg(long, default_value_t = 80)]
    pub(crate) heart_rate: i64,
    /// Systolic blood pressure in mmHg (70-250)
    #[arg(long, default_value_t = 120)]
    pub(crate) systolic_bp: i64,
    /// Diastolic blood pressure in mmHg (40-150)
    #[arg(long, default_value_t = 80)]
    pub(crate) diastolic_bp: i64,
    /// Body temperature in degrees Celsius (30.0-43.0)
    #[arg(long, default_value_t = 36.5)]
    pub(crate) temperature: f64,
    /// Primary symptom code, see `symptoms` for the catalogue
    #[arg(long, default_value = "none")]
    pub(crate) symptom: String,
    /// Model artifact to consult; loading failures abort the command
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Scoring policy override (JSON)
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
    /// Print the assessment as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

impl AssessArgs {
    fn submission(&self) -> ObservationSubmission {
        ObservationSubmission {
            age: self.age,
            heart_rate: self.heart_rate,
            systolic_bp: self.systolic_bp,
            diastolic_bp: self.diastolic_bp,
            temperature: self.temperature,
            primary_symptom: self.symptom.clone(),
        }
    }
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = args.model.clone() {
        config.triage.model.path = Some(path);
        config.triage.model.required = true;
    }
    if let Some(path) = args.policy.clone() {
        config.triage.policy_path = Some(path);
    }

    config.telemetry.log_level = "warn".to_string();
    telemetry::init(&config.telemetry)?;

    let service = TriageService::from_config(&config.triage)?;
    let observation = service.intake(args.submission())?;
    let outcome = service.assess_detailed(&observation);
    let view = AssessmentView::from_outcome(&outcome, Utc::now());

    if args.json {
        println!("{}", render_json(&view)?);
    } else {
        for line in render_report(&view) {
            println!("{line}");
        }
    }

    Ok(())
}

pub(crate) fn run_symptoms() {
    println!("Primary symptoms");
    for entry in symptom_catalogue() {
        println!(
            "  {:<20} {:<20} {:?}",
            entry.code, entry.display_name, entry.tier
        );
    }
}

pub(crate) fn render_json(view: &AssessmentView) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(view)?)
}

pub(crate) fn render_report(view: &AssessmentView) -> Vec<String> {
    let mut lines = vec![
        format!("Triage urgency: {}", view.label),
        format!("  {}", view.guidance),
        format!("  {}", view.summary),
        String::new(),
        format!("Rule score {} ({})", view.rule_score, view.rule_label),
    ];

    for component in &view.components {
        lines.push(format!(
            "  - {:?}: +{} ({})",
            component.factor, component.points, component.notes
        ));
    }

    if let Some(probabilities) = &view.probabilities {
        lines.push(String::new());
        lines.push("Model probabilities".to_string());
        for (level, probability) in probabilities.iter().rev() {
            lines.push(format!("  - {level}: {:.1}%", probability * 100.0));
        }
    }

    lines.push(String::new());
    lines.push("Explanation".to_string());
    lines.extend(view.explanation.iter().map(|line| format!("  {line}")));

    if let Some(notice) = &view.model_notice {
        lines.push(String::new());
        lines.push(format!("Note: {notice}"));
    }

    lines
}
