// Colored terminal output for verdicts, reports, and model summaries.
//
// main.rs delegates all human-facing formatting here.

use colored::Colorize;

use crate::corpus::ReadFailure;
use crate::model::classifier::Prediction;
use crate::model::sentiment::Sentiment;
use crate::model::TrainedModel;
use crate::pipeline::classify::ClassificationReport;
use crate::pipeline::evaluate::Evaluation;

/// Display the verdict for a single phrase.
pub fn display_prediction(text: &str, prediction: &Prediction) {
    let preview = super::truncate_chars(&super::single_line(text), 100);
    println!("  \"{}\"", preview.dimmed());

    let verdict = match prediction.sentiment {
        Sentiment::Positive => "It's a positive statement!".green().bold(),
        Sentiment::Negative => "It's a negative statement!".red().bold(),
    };
    println!("\n  {verdict}");
    println!(
        "  P(positive) = {:.3}   log-odds = {:+.2}",
        prediction.positive_probability(),
        prediction.margin()
    );
}

/// Display per-file verdicts (when `verbose`) and the positive/negative split.
pub fn display_classification(report: &ClassificationReport, verbose: bool) {
    if report.total() == 0 {
        println!("No files to classify.");
        return;
    }

    if verbose {
        println!();
        for item in &report.results {
            println!(
                "  {:<40} {}  {:.3}",
                item.name,
                colorize_sentiment(item.prediction.sentiment),
                item.prediction.confidence()
            );
        }
    }

    println!(
        "\n{}",
        format!("=== Classified {} reviews ===", report.total()).bold()
    );
    let share = |n: usize| n as f64 / report.total() as f64 * 100.0;
    println!(
        "  {} {:>6}  ({:.1}%)",
        "positive".green(),
        report.positive,
        share(report.positive)
    );
    println!(
        "  {} {:>6}  ({:.1}%)",
        "negative".red(),
        report.negative,
        share(report.negative)
    );
}

/// Display an accuracy report with the confusion matrix.
pub fn display_evaluation(evaluation: &Evaluation) {
    println!("\n{}", "=== Evaluation ===".bold());

    if evaluation.total() == 0 {
        println!("  No labeled reviews were found.");
        return;
    }

    let accuracy = evaluation.accuracy() * 100.0;
    let accuracy_str = format!("{accuracy:.2}%");
    let accuracy_colored = if accuracy >= 80.0 {
        accuracy_str.green().bold()
    } else if accuracy >= 60.0 {
        accuracy_str.yellow().bold()
    } else {
        accuracy_str.red().bold()
    };

    println!(
        "  Success rate: {}  ({} of {} correctly labeled)",
        accuracy_colored,
        evaluation.correct(),
        evaluation.total()
    );
    println!();
    println!(
        "  {:<16} {:>10} {:>10}",
        "".dimmed(),
        "pred pos".dimmed(),
        "pred neg".dimmed()
    );
    println!(
        "  {:<16} {:>10} {:>10}",
        "actual positive", evaluation.true_positive, evaluation.false_negative
    );
    println!(
        "  {:<16} {:>10} {:>10}",
        "actual negative", evaluation.false_positive, evaluation.true_negative
    );
    println!();
    println!(
        "  Precision: {:.3}  Recall: {:.3}  F1: {:.3}",
        evaluation.precision(),
        evaluation.recall(),
        evaluation.f1()
    );
}

/// Display what a freshly trained (or loaded) model looks like.
pub fn display_model_summary(model: &TrainedModel, top: usize) {
    let vocabulary = model.vocabulary();
    let params = model.parameters();
    let counts = params.class_counts();
    let settings = vocabulary.settings();

    println!("\n{}", "=== Model ===".bold());
    println!("  Trained at:        {}", model.trained_at().format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "  Training reviews:  {} ({} positive, {} negative)",
        vocabulary.document_count(),
        counts[Sentiment::Positive.index()],
        counts[Sentiment::Negative.index()]
    );
    println!(
        "  Vocabulary:        {} stems (min document frequency {})",
        vocabulary.len(),
        vocabulary.min_doc_frequency()
    );
    println!(
        "  Priors:            P(positive) = {:.3}  P(negative) = {:.3}",
        params.prior(Sentiment::Positive),
        params.prior(Sentiment::Negative)
    );
    println!("  Smoothing alpha:   {}", params.alpha());
    println!(
        "  Tokenizer:         min length {}, markup {}, stop words {}",
        settings.min_token_len,
        if settings.strip_markup { "stripped" } else { "kept" },
        if settings.remove_stop_words { "removed" } else { "kept" }
    );

    if top == 0 || vocabulary.is_empty() {
        return;
    }

    println!(
        "\n{}",
        format!("=== Most informative stems (top {top}) ===").bold()
    );
    for (rank, (index, log_odds)) in params.most_informative(top).into_iter().enumerate() {
        let stem = vocabulary.stem_at(index).unwrap_or("?");
        let leaning = if log_odds >= 0.0 {
            "positive".green()
        } else {
            "negative".red()
        };
        println!(
            "  {:>3}. {:<24} {}  {:>5.1} : 1",
            rank + 1,
            stem,
            leaning,
            log_odds.abs().exp()
        );
    }
}

/// List files that couldn't be read during a directory scan.
pub fn display_read_failures(failures: &[ReadFailure]) {
    if failures.is_empty() {
        return;
    }
    println!(
        "\n  {} {} file(s) could not be read:",
        "Warning:".yellow(),
        failures.len()
    );
    for failure in failures.iter().take(10) {
        println!(
            "    {} ({})",
            failure.path.display(),
            failure.error.to_string().dimmed()
        );
    }
    if failures.len() > 10 {
        println!("    ... and {} more", failures.len() - 10);
    }
}

fn colorize_sentiment(sentiment: Sentiment) -> colored::ColoredString {
    match sentiment {
        Sentiment::Positive => "positive".green(),
        Sentiment::Negative => "negative".red(),
    }
}
