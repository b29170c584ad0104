use crate::infra::build_service;
use careerpath::assessment::{
    AssessmentDefinition, AssessmentId, AssessmentResults, Rating, ResponseImporter, ResponseSet,
    ResultInsights, ScoreCard, SectionOutcome, SpectrumPosition, StudentId, CAREER_DISCOVERY,
};
use careerpath::config::{AppConfig, ScoringConfig};
use careerpath::error::AppError;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// Print the catalog as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Catalog assessment id to score against
    #[arg(long)]
    pub(crate) assessment: String,
    /// Response export: `question_id,rating` CSV or a JSON object (by `.json` extension)
    #[arg(long)]
    pub(crate) responses: PathBuf,
    /// Print the score card and insights as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Catalog assessment id to walk through
    #[arg(long, default_value = CAREER_DISCOVERY)]
    pub(crate) assessment: String,
    /// Student identifier used for the demo attempt
    #[arg(long, default_value = "demo-student")]
    pub(crate) student: String,
    /// Number of sittings the responses are spread across
    #[arg(long, default_value_t = 3)]
    pub(crate) sittings: usize,
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let (service, _, _) = build_service(&ScoringConfig::default());
    let summaries = service.catalog().summaries();

    if args.json {
        println!("{}", json!({ "assessments": summaries }));
        return Ok(());
    }

    println!("Assessment catalog");
    for summary in summaries {
        println!(
            "- {} ({}) | {} questions | sections: {}",
            summary.id,
            summary.variant.label(),
            summary.question_count,
            summary.sections.join(", ")
        );
        println!("  {}", summary.title);
    }
    Ok(())
}

/// Scoring dials for CLI commands, read from the same environment as the server.
fn scoring_config() -> Result<ScoringConfig, AppError> {
    Ok(AppConfig::load()?.scoring)
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        assessment,
        responses,
        json,
    } = args;

    let (service, _, _) = build_service(&scoring_config()?);
    let definition = service.definition(&AssessmentId(assessment))?;
    let responses = ResponseImporter::from_path(&responses)?;

    let report = careerpath::assessment::validate(&responses, definition);
    if !report.unexpected_questions.is_empty() {
        tracing::warn!(
            ignored = report.unexpected_questions.len(),
            "responses reference questions outside the assessment"
        );
    }

    let scores = service.score(definition, &responses)?;
    let insights = service.insights(&scores);

    if json {
        println!("{}", json!({ "scores": scores, "insights": insights }));
    } else {
        render_score_card(definition, &scores, &insights);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = scoring_config()?;
    let (definition, results) = demo_attempt(args, &config)?;
    render_score_card(&definition, &results.scores, &results.insights);
    Ok(())
}

fn demo_attempt(
    args: DemoArgs,
    config: &ScoringConfig,
) -> Result<(AssessmentDefinition, AssessmentResults), AppError> {
    let DemoArgs {
        assessment,
        student,
        sittings,
    } = args;

    let (service, repository, notifier) = build_service(config);
    let assessment_id = AssessmentId(assessment);
    let student_id = StudentId(student);
    let definition = service.definition(&assessment_id)?.clone();

    println!("Career assessment demo");
    let (record, _) = service.start(student_id.clone(), assessment_id.clone())?;
    println!(
        "- Started attempt {} for {} on {} ({} questions)",
        record.attempt_id.0,
        student_id,
        definition.title,
        definition.questions.len()
    );

    let responses = synthetic_responses(&definition);
    for (sitting, batch) in split_into_sittings(&responses, sittings).iter().enumerate() {
        let progress = service.save_progress(student_id.clone(), assessment_id.clone(), batch)?;
        println!(
            "  Sitting {}: {} of {} answered ({}%)",
            sitting + 1,
            progress.answered,
            progress.total,
            progress.percentage
        );
    }

    let report = service.validation(student_id.clone(), assessment_id.clone())?;
    println!(
        "- Validation: complete={} missing={} invalid={}",
        report.is_complete,
        report.missing_questions.len(),
        report.invalid_ratings.len()
    );

    service.complete(student_id.clone(), assessment_id.clone(), None)?;
    let results = service.results(student_id, assessment_id)?;
    println!(
        "- Completed attempt {} with status {}",
        results.attempt.attempt_id.0, results.attempt.status
    );
    println!(
        "- Stored attempts: {} | completion events: {}",
        repository.len(),
        notifier.events().len()
    );
    Ok((definition, results))
}

/// Deterministic spread of ratings so every section shows some contrast.
fn synthetic_responses(definition: &AssessmentDefinition) -> ResponseSet {
    let span = definition.rating.max - definition.rating.min + 1;
    definition
        .questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let offset = ((index * 7 + question.domain.len()) % usize::from(span)) as Rating;
            (question.id.clone(), definition.rating.min + offset)
        })
        .collect()
}

fn split_into_sittings(responses: &ResponseSet, sittings: usize) -> Vec<ResponseSet> {
    let sittings = sittings.max(1);
    let per_sitting = responses.len().div_ceil(sittings).max(1);
    let entries: Vec<_> = responses
        .iter()
        .map(|(question, rating)| (question.clone(), rating))
        .collect();
    entries
        .chunks(per_sitting)
        .map(|chunk| chunk.iter().cloned().collect())
        .collect()
}

fn render_score_card(
    definition: &AssessmentDefinition,
    scores: &ScoreCard,
    insights: &ResultInsights,
) {
    println!("\n{} ({})", definition.title, scores.variant.label());
    if let Some(code) = &scores.holland_code {
        println!("Holland code: {code}");
    }

    for section in &scores.sections {
        println!("\n{}", section.title);
        for domain in section.outcome.domains() {
            println!(
                "  - {:<24} {:>3}/{:<3} {:>5.1}%  {}",
                domain.name, domain.score, domain.max_score, domain.percentage, domain.band.label
            );
        }
        if let SectionOutcome::Spectrum { placements, .. } = &section.outcome {
            for placement in placements {
                let leaning = match placement.position {
                    SpectrumPosition::First => format!("leans {}", placement.domain_id),
                    SpectrumPosition::Opposite => format!("leans {}", placement.opposite),
                    SpectrumPosition::Balanced => "balanced".to_string(),
                };
                println!(
                    "    {} vs {}: {:.1}% ({leaning})",
                    placement.domain_id, placement.opposite, placement.percentage
                );
            }
        }
    }

    println!("\nStrengths:");
    for area in &insights.strengths {
        println!("  - {} ({}) {:.1}%", area.name, area.domain_id, area.percentage);
    }
    println!("Growth areas:");
    for area in &insights.growth_areas {
        println!("  - {} ({}) {:.1}%", area.name, area.domain_id, area.percentage);
    }
}
