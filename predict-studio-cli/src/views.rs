//! Terminal rendering of the workflow views.

use colored::Colorize;
use predict_studio_sdk::DataSummary;
use predict_studio_workflow::{
    AnalysisReport, BatchResultView, DatasetPreview, PredictionView, TrainingResults,
};

use crate::chart::BAR_WIDTH;
use crate::output::{print_block, print_field, print_list_field, print_section, table, TableDisplay};

impl TableDisplay for DatasetPreview {
    fn display_single(&self) {
        print_section(&format!("Dataset: {}", self.filename));
        print_field("Shape", &self.shape);
        print_field("Rows", &self.rows.to_string());
        print_field("Columns", &self.column_count.to_string());
        print_list_field("Data Types", &self.dtypes);
        if self.missing.is_empty() {
            print_field("Missing Values", "None");
        } else {
            print_list_field("Missing Values", &self.missing);
        }
        if !self.head.is_empty() {
            print_section("First Rows");
            print_block(&self.head);
        }
        if !self.statistics.is_empty() {
            print_section("Statistics");
            print_block(&self.statistics);
        }
    }

    fn display_compact(&self) {
        println!(
            "{} shape={} missing={}",
            self.filename,
            self.shape,
            self.missing.len()
        );
    }
}

impl TableDisplay for AnalysisReport {
    fn display_single(&self) {
        print_section("Data Analysis");
        print_field("Shape", &self.shape_label());
        print_list_field("Numeric Columns", &self.numeric_cols);
        print_list_field("Categorical Columns", &self.categorical_cols);
        let missing = self.missing_lines();
        if missing.is_empty() {
            print_field("Missing Values", "No missing values");
        } else {
            print_list_field("Missing Values", &missing);
        }
    }

    fn display_compact(&self) {
        println!(
            "{} numeric={} categorical={} missing={}",
            self.shape_label(),
            self.numeric_cols.len(),
            self.categorical_cols.len(),
            self.missing.len()
        );
    }
}

impl TableDisplay for DataSummary {
    fn display_single(&self) {
        print_section("Data Summary");
        print_field("Shape", &format!("{} × {}", self.shape.0, self.shape.1));
        print_list_field("Numeric Columns", &self.numeric_cols);
        print_list_field("Categorical Columns", &self.categorical_cols);
    }

    fn display_compact(&self) {
        println!(
            "{} × {} numeric={} categorical={}",
            self.shape.0,
            self.shape.1,
            self.numeric_cols.len(),
            self.categorical_cols.len()
        );
    }
}

impl TableDisplay for TrainingResults {
    fn display_single(&self) {
        print_section(&format!("Model Performance ({})", self.kind));
        let metrics = table(
            &["Metric", "Value"],
            self.metrics
                .iter()
                .map(|m| vec![m.label.clone(), m.value.clone()]),
        );
        println!("{metrics}");

        print_section("Sample Predictions");
        let rows = table(
            &["Actual", "Predicted"],
            self.predictions
                .rows
                .iter()
                .map(|r| vec![r.actual.clone(), r.predicted.clone()]),
        );
        println!("{rows}");
    }

    fn display_compact(&self) {
        let metrics: Vec<String> = self
            .metrics
            .iter()
            .map(|m| format!("{}={}", m.label, m.value))
            .collect();
        println!("{} {}", self.kind, metrics.join(" "));
    }
}

impl TableDisplay for PredictionView {
    fn display_single(&self) {
        print_section("Prediction Result");
        match self {
            PredictionView::Regression { value } => print_field("Predicted Value", &value.green().to_string()),
            PredictionView::Classification { label, bars } => {
                print_field("Predicted Class", &label.green().to_string());
                if !bars.is_empty() {
                    println!("  {}:", "Class Probabilities".cyan());
                    for bar in bars {
                        let filled = ((bar.width_percent / 100.0) * BAR_WIDTH as f64).round() as usize;
                        println!("    {:<24} {}", bar.label, "█".repeat(filled.min(BAR_WIDTH)));
                    }
                }
            }
        }
    }

    fn display_compact(&self) {
        match self {
            PredictionView::Regression { value } => println!("{}", value),
            PredictionView::Classification { label, bars } => {
                let probabilities: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
                println!("{} [{}]", label, probabilities.join(", "));
            }
        }
    }
}

impl TableDisplay for BatchResultView {
    fn display_single(&self) {
        print_section("Batch Predictions");
        print_field("Predictions", &self.count.to_string());
        print_field("Download", &self.offer.filename);
    }

    fn display_compact(&self) {
        println!("{} {}", self.count, self.offer.filename);
    }
}
