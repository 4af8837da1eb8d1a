// Colored terminal output for analytics reports and insights.
//
// This module handles all terminal-specific formatting. The main.rs command
// handlers delegate here after writing their files.

use colored::Colorize;

use crate::analytics::insights::InsightsReport;
use crate::analytics::report::Report;

/// Display the headline numbers, the coverage heatmap, and global terms.
pub fn display_report(report: &Report) {
    let stats = &report.statistics;
    if stats.total_posts == 0 {
        println!("No posts analyzed. Run `edlens scrape` or `edlens merge` first.");
        return;
    }

    println!("\n{}", "=== Participation Analytics ===".bold());
    println!(
        "  {} posts  |  {} homeworks  |  {} models  |  {} combinations",
        stats.total_posts, stats.total_homeworks, stats.total_models, stats.total_combinations
    );

    display_heatmap(report);

    if !stats.global_top_terms.is_empty() {
        println!("\n{}", "Top terms overall".bold());
        let line = stats
            .global_top_terms
            .iter()
            .take(10)
            .map(|t| format!("{} ({:.3})", t.term, t.frequency))
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {}", line.dimmed());
    }

    display_groups(report);
}

fn display_heatmap(report: &Report) {
    let heatmap = &report.heatmap;
    if heatmap.models.is_empty() {
        return;
    }

    let label_width = heatmap
        .homeworks
        .iter()
        .map(|hw| hw.chars().count())
        .max()
        .unwrap_or(0)
        .max(8);

    println!("\n{}", "Coverage (posts per homework x model)".bold());
    let header: String = heatmap
        .models
        .iter()
        .map(|m| format!(" {:>6}", short_label(m, 6)))
        .collect();
    println!("  {:<label_width$}{}", "", header.dimmed());

    for homework in &heatmap.homeworks {
        let cells: String = heatmap
            .models
            .iter()
            .map(|model| colorize_count(heatmap.count(homework, model)))
            .collect();
        println!("  {homework:<label_width$}{cells}");
    }
}

fn display_groups(report: &Report) {
    for (homework, models) in &report.hw_model_analysis {
        for (model, group) in models {
            println!(
                "\n{} {} {}",
                homework.bold(),
                model.cyan(),
                format!("({} posts)", group.post_count).dimmed()
            );
            if !group.top_terms.is_empty() {
                let terms = group
                    .top_terms
                    .iter()
                    .take(5)
                    .map(|t| t.term.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("  Terms: {terms}");
            }
            for s in &group.strengths {
                println!("  {} {}", "+".green(), super::truncate_chars(s, 120));
            }
            for w in &group.weaknesses {
                println!("  {} {}", "-".red(), super::truncate_chars(w, 120));
            }
        }
    }
}

/// Display narrative findings and per-model summaries.
pub fn display_insights(report: &InsightsReport) {
    println!("\n{}", "=== Key Findings ===".bold());
    for finding in &report.insights.key_findings {
        println!("  {} {}", "*".yellow(), finding);
    }
    if !report.insights.coverage_summary.is_empty() {
        println!("  {}", report.insights.coverage_summary.dimmed());
    }

    if report.insights.model_comparison.is_empty() {
        return;
    }
    println!("\n{}", "=== Models ===".bold());
    for (model, insight) in &report.insights.model_comparison {
        println!("  {:<20} {}", model.cyan(), insight.summary);
        if !insight.distinctive_terms.is_empty() {
            println!(
                "  {:<20} {}",
                "",
                insight.distinctive_terms.join(", ").dimmed()
            );
        }
    }
}

fn short_label(label: &str, width: usize) -> String {
    label.chars().take(width).collect()
}

/// Colorize a heatmap cell by how well the pair is covered.
fn colorize_count(count: usize) -> String {
    let cell = format!(" {count:>6}");
    match count {
        0 => cell.dimmed().to_string(),
        1 => cell.yellow().to_string(),
        _ => cell.green().to_string(),
    }
}
