//! Interactive session

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use predict_studio_core::{ModelKind, WorkflowPhase};
use predict_studio_workflow::{SelectedFile, SessionContext, StatusRegion, Tab};
use std::path::PathBuf;

use super::{finish, open_session, settle};
use crate::context::Context;
use crate::output::status_badge;

#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Dataset to upload when the session starts
    pub file: Option<PathBuf>,

    /// Directory for downloaded predictions
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Upload,
    Analyze,
    Summary,
    Train,
    Predict,
    BatchPredict,
    Status,
    Quit,
}

impl Action {
    const ALL: [Action; 8] = [
        Action::Upload,
        Action::Analyze,
        Action::Summary,
        Action::Train,
        Action::Predict,
        Action::BatchPredict,
        Action::Status,
        Action::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            Action::Upload => "Upload data",
            Action::Analyze => "Analyze data",
            Action::Summary => "Data summary",
            Action::Train => "Train model",
            Action::Predict => "Predict one record",
            Action::BatchPredict => "Batch predict",
            Action::Status => "Show status",
            Action::Quit => "Quit",
        }
    }

    fn tab(&self) -> Option<Tab> {
        match self {
            Action::Upload => Some(Tab::Upload),
            Action::Analyze | Action::Summary => Some(Tab::Analysis),
            Action::Train => Some(Tab::Training),
            Action::Predict | Action::BatchPredict => Some(Tab::Prediction),
            Action::Status | Action::Quit => None,
        }
    }
}

pub async fn execute(ctx: &Context, args: SessionArgs) -> Result<()> {
    let mut session = open_session(ctx)?;
    match &ctx.profile_name {
        Some(profile) => ctx.output.info(&format!("Connected to {} (profile {})", ctx.api_url(), profile)),
        None => ctx.output.info(&format!("Connected to {}", ctx.api_url())),
    }

    if let Some(path) = &args.file {
        if let Err(e) = upload(ctx, &mut session, path.clone()).await {
            ctx.output.error(&e.to_string());
        }
    }

    loop {
        let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
        let choice = Select::new()
            .with_prompt(format!("[{}] What next?", session.active_tab()))
            .items(&labels)
            .default(default_action(session.phase()))
            .interact()
            .context("Failed to read selection")?;

        let action = Action::ALL[choice];
        if let Some(tab) = action.tab() {
            session.switch_tab(tab);
        }

        let outcome = match action {
            Action::Upload => prompt_upload(ctx, &mut session).await,
            Action::Analyze => analyze(ctx, &mut session).await,
            Action::Summary => summary(ctx, &mut session).await,
            Action::Train => train(ctx, &mut session).await,
            Action::Predict => predict(ctx, &mut session).await,
            Action::BatchPredict => batch(ctx, &mut session, args.out_dir.clone()).await,
            Action::Status => {
                show_status(&session);
                Ok(())
            }
            Action::Quit => break,
        };

        if let Err(e) = outcome {
            ctx.output.error(&e.to_string());
        }
    }

    Ok(())
}

/// Suggest the next step the workflow is ready for
fn default_action(phase: WorkflowPhase) -> usize {
    let next = match phase {
        WorkflowPhase::NoData => Action::Upload,
        WorkflowPhase::DataLoaded => Action::Train,
        WorkflowPhase::ModelTrained => Action::Predict,
    };
    Action::ALL.iter().position(|a| *a == next).unwrap_or(0)
}

async fn prompt_upload(ctx: &Context, session: &mut SessionContext) -> Result<()> {
    let path: String = Input::new()
        .with_prompt("Dataset file (CSV)")
        .interact_text()
        .context("Failed to read file path")?;
    upload(ctx, session, PathBuf::from(path.trim())).await
}

async fn upload(ctx: &Context, session: &mut SessionContext, path: PathBuf) -> Result<()> {
    let spinner = ctx.output.spinner("Uploading file...");
    let result = session.uploads().upload_path(&path).await;
    finish(spinner);
    let preview = settle(ctx, session, StatusRegion::Upload, result)?;
    ctx.output.write(&preview)
}

async fn analyze(ctx: &Context, session: &mut SessionContext) -> Result<()> {
    let spinner = ctx.output.spinner("Analyzing data...");
    let result = session.analysis().analyze().await;
    finish(spinner);
    let report = settle(ctx, session, StatusRegion::Analysis, result)?;
    ctx.output.write(&report)
}

async fn summary(ctx: &Context, session: &mut SessionContext) -> Result<()> {
    let spinner = ctx.output.spinner("Loading summary...");
    let result = session.analysis().summary().await;
    finish(spinner);
    let summary = settle(ctx, session, StatusRegion::Analysis, result)?;
    ctx.output.write(&summary)
}

async fn train(ctx: &Context, session: &mut SessionContext) -> Result<()> {
    if session.phase() != WorkflowPhase::NoData {
        choose_columns(session)?;

        let kinds = [ModelKind::Regression, ModelKind::Classification];
        let current = session.training_form().kind;
        let labels: Vec<String> = kinds.iter().map(|k| k.to_string()).collect();
        let kind = Select::new()
            .with_prompt("Model type")
            .items(&labels)
            .default(kinds.iter().position(|k| *k == current).unwrap_or(0))
            .interact()
            .context("Failed to read model type")?;
        session.set_model_kind(kinds[kind]);

        let test_size: f64 = Input::new()
            .with_prompt("Test size")
            .default(session.training_form().test_size)
            .interact_text()
            .context("Failed to read test size")?;
        session.set_test_size(test_size);
    }

    // Charts print during training; a spinner would draw over them.
    ctx.output.info("Training model...");
    let result = session.training().train().await;
    let results = settle(ctx, session, StatusRegion::Training, result)?;
    ctx.output.write(&results)
}

fn choose_columns(session: &mut SessionContext) -> Result<()> {
    let selector = session.schema().target_selector().clone();
    let current = selector
        .selected
        .as_ref()
        .and_then(|s| selector.options.iter().position(|o| o == s))
        .unwrap_or(0);
    let target = Select::new()
        .with_prompt("Target column")
        .items(&selector.options)
        .default(current)
        .interact()
        .context("Failed to read target column")?;
    session.select_target(&selector.options[target])?;

    let entries: Vec<_> = session
        .schema()
        .feature_checklist()
        .entries
        .iter()
        .filter(|e| !e.disabled)
        .cloned()
        .collect();
    let names: Vec<&str> = entries.iter().map(|e| e.column.as_str()).collect();
    let checked: Vec<bool> = entries.iter().map(|e| e.checked).collect();
    let chosen = MultiSelect::new()
        .with_prompt("Feature columns (space to toggle)")
        .items(&names)
        .defaults(&checked)
        .interact()
        .context("Failed to read feature columns")?;

    for (i, entry) in entries.iter().enumerate() {
        session.set_feature_checked(&entry.column, chosen.contains(&i))?;
    }
    Ok(())
}

async fn predict(ctx: &Context, session: &mut SessionContext) -> Result<()> {
    let fields: Vec<String> = session
        .schema()
        .prediction_form()
        .map(|form| form.field_names().map(String::from).collect())
        .unwrap_or_default();

    let mut inputs = Vec::with_capacity(fields.len());
    if session.phase() == WorkflowPhase::ModelTrained {
        for name in fields {
            let value: String = Input::new()
                .with_prompt(format!("Enter {}", name))
                .allow_empty(true)
                .interact_text()
                .with_context(|| format!("Failed to read {}", name))?;
            inputs.push((name, value));
        }
    }

    let spinner = ctx.output.spinner("Predicting...");
    let result = session.predictions().predict_single(&inputs).await;
    finish(spinner);
    let view = settle(ctx, session, StatusRegion::SinglePrediction, result)?;
    ctx.output.write(&view)
}

async fn batch(ctx: &Context, session: &mut SessionContext, out_dir: Option<PathBuf>) -> Result<()> {
    if session.phase() == WorkflowPhase::ModelTrained {
        let path: String = Input::new()
            .with_prompt("File to predict (leave empty to reuse the last one)")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read file path")?;
        if !path.trim().is_empty() {
            let file = SelectedFile::from_path(path.trim()).await?;
            session.predictions().select_batch_file(vec![file]);
        }
    }

    let spinner = ctx.output.spinner("Predicting...");
    let result = session.predictions().predict_batch().await;
    finish(spinner);
    let view = settle(ctx, session, StatusRegion::BatchPrediction, result)?;
    ctx.output.write(&view)?;

    let save = Confirm::new()
        .with_prompt(format!("Save {}?", view.offer.filename))
        .default(true)
        .interact()
        .context("Failed to get confirmation")?;
    if save {
        let mut sink = ctx.download_sink(out_dir)?;
        let result = session.predictions().download(&mut sink).await;
        let path = settle(ctx, session, StatusRegion::BatchPrediction, result)?;
        ctx.output.success(&format!("Saved predictions to {}", path.display()));
    }
    Ok(())
}

fn show_status(session: &SessionContext) {
    println!("\n{}", "Session".bold().underline());
    println!("  {}: {:?}", "Phase".cyan(), session.phase());
    println!("  {}: {}", "Tab".cyan(), session.active_tab());
    if let Some(dataset) = session.schema().dataset() {
        println!("  {}: {} ({})", "Dataset".cyan(), dataset.filename, dataset.shape_label());
    }
    if let Some(model) = session.model() {
        println!(
            "  {}: {} on {} ({})",
            "Model".cyan(),
            model.kind,
            model.target_column,
            crate::output::format_timestamp(&model.trained_at)
        );
    }

    let regions = [
        StatusRegion::Upload,
        StatusRegion::Analysis,
        StatusRegion::Training,
        StatusRegion::SinglePrediction,
        StatusRegion::BatchPrediction,
    ];
    for region in regions {
        if let Some(message) = session.status().get(region) {
            println!("  {:?}: [{}] {}", region, status_badge(message.level), message.text);
        }
    }
}
