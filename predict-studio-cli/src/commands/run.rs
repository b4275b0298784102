//! One-shot workflow: upload, optionally analyze, train, then predict.

use anyhow::Result;
use clap::Args;
use predict_studio_core::ModelKind;
use predict_studio_workflow::{SelectedFile, StatusRegion, Tab, DEFAULT_TEST_SIZE};
use std::path::PathBuf;
use tracing::info;

use super::{finish, open_session, parse_inputs, settle};
use crate::context::Context;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Dataset to upload (CSV)
    pub file: PathBuf,

    /// Target column; defaults to the first column
    #[arg(short, long)]
    pub target: Option<String>,

    /// Feature columns, comma separated; defaults to every other column
    #[arg(short, long, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Model kind: regression or classification
    #[arg(short, long, default_value_t = ModelKind::Regression)]
    pub kind: ModelKind,

    /// Fraction of rows held out for testing
    #[arg(long, default_value_t = DEFAULT_TEST_SIZE)]
    pub test_size: f64,

    /// Show the dataset analysis before training
    #[arg(long)]
    pub analyze: bool,

    /// Predict one record, given as COLUMN=VALUE (repeatable)
    #[arg(short, long = "predict", value_name = "COLUMN=VALUE")]
    pub predict: Vec<String>,

    /// Predict every row of this file and save the results
    #[arg(long)]
    pub batch: Option<PathBuf>,

    /// Directory for downloaded predictions
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

pub async fn execute(ctx: &Context, args: RunArgs) -> Result<()> {
    let inputs = parse_inputs(&args.predict)?;
    let mut session = open_session(ctx)?;

    let spinner = ctx.output.spinner("Uploading file...");
    let result = session.uploads().upload_path(&args.file).await;
    finish(spinner);
    let preview = settle(ctx, &mut session, StatusRegion::Upload, result)?;
    ctx.output.write(&preview)?;

    if args.analyze {
        session.switch_tab(Tab::Analysis);
        let spinner = ctx.output.spinner("Analyzing data...");
        let result = session.analysis().analyze().await;
        finish(spinner);
        let report = settle(ctx, &mut session, StatusRegion::Analysis, result)?;
        ctx.output.write(&report)?;
    }

    session.switch_tab(Tab::Training);
    if let Some(target) = &args.target {
        session.select_target(target)?;
    }
    if !args.features.is_empty() {
        session.set_all_features_checked(false);
        for feature in &args.features {
            session.set_feature_checked(feature, true)?;
        }
    }
    session.set_model_kind(args.kind);
    session.set_test_size(args.test_size);

    // Charts print during training; a spinner would draw over them.
    ctx.output.info("Training model...");
    let result = session.training().train().await;
    let results = settle(ctx, &mut session, StatusRegion::Training, result)?;
    ctx.output.write(&results)?;

    session.switch_tab(Tab::Prediction);
    if !inputs.is_empty() {
        let result = session.predictions().predict_single(&inputs).await;
        let view = settle(ctx, &mut session, StatusRegion::SinglePrediction, result)?;
        ctx.output.write(&view)?;
    }

    if let Some(path) = &args.batch {
        let file = SelectedFile::from_path(path).await?;
        session.predictions().select_batch_file(vec![file]);

        let spinner = ctx.output.spinner("Predicting...");
        let result = session.predictions().predict_batch().await;
        finish(spinner);
        let batch = settle(ctx, &mut session, StatusRegion::BatchPrediction, result)?;
        ctx.output.write(&batch)?;

        let mut sink = ctx.download_sink(args.out_dir.clone())?;
        let result = session.predictions().download(&mut sink).await;
        let saved = settle(ctx, &mut session, StatusRegion::BatchPrediction, result)?;
        info!(path = %saved.display(), "batch predictions saved");
        ctx.output.success(&format!("Saved predictions to {}", saved.display()));
    }

    Ok(())
}
