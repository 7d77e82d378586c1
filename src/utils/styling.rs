//! Terminal styling utilities

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

use crate::report::ReportConfig;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static GLASS: Emoji<'_, '_> = Emoji("🍷 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static TREE: Emoji<'_, '_> = Emoji("🌲 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
    █   █ █ █▄ █ █▀▀ █▀▀ █ █▀▀ █ █ ▀█▀
    ▀▄▀▄▀ █ █ ▀█ ██▄ ▄▄█ █ █▄█ █▀█  █
    "#;

    println!();
    println!("{}", style(banner).magenta().bold());
    println!(
        "    {} {}",
        GLASS,
        style("Exploratory analysis of wine quality").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(config: &ReportConfig) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);
    let models = if config.skip_models {
        "skipped".to_string()
    } else {
        format!(
            "{} folds, {} trees, seed {}",
            config.model.folds, config.model.trees, config.model.seed
        )
    };
    let charts = if config.charts {
        format!("{}x{} px", config.width, config.height)
    } else {
        "disabled".to_string()
    };

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙  Configuration").cyan().bold(),
        " ".repeat(box_width - 19)
    );
    println!("    ├{}┤", line);
    println!("    │  {}Input:   {:<40}│", FOLDER, truncate_path(&config.input, 40));
    println!("    │  {}Output:  {:<40}│", SAVE, truncate_path(&config.output_dir, 40));
    println!("    ├{}┤", line);
    println!(
        "    │  {}Models:  {:<40}│",
        TREE,
        style(truncate_string(&models, 40)).yellow()
    );
    println!(
        "    │  {}Charts:  {:<40}│",
        CHART,
        style(truncate_string(&charts, 40)).yellow()
    );
    println!(
        "    │     Log mode: {:<15} Heatmap: {:<12}│",
        style(config.log_mode).yellow(),
        style(config.heatmap_order).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {}{}", INFO, message);
}

/// Print a warning for a skipped section or chart
pub fn print_warning(message: &str) {
    println!("    {}{}", WARN, style(message).yellow());
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "    {}",
        style(format!("⏱  {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion(report_path: &Path) {
    println!();
    println!(
        "    {}{} {}",
        GLASS,
        style("Report written to").green().bold(),
        style(report_path.display()).underlined()
    );
    println!();
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("abcdefghij", 8), "...fghij");
        // Multi-byte characters are never split
        assert_eq!(truncate_string("ééééé", 4), "...é");
    }
}
