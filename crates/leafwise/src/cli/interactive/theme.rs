//! Dialoguer theme and banner for interactive mode.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// A `ColorfulTheme` in LeafWise greens.
///
/// - Prompt prefix: green `?`
/// - Active item indicator: green `▸`
/// - Success prefix: green `✓`
/// - Error prefix: red `✗`
pub fn leafwise_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().green(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        active_item_prefix: style("▸".to_string()).for_stderr().green(),
        active_item_style: Style::new().for_stderr().green(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        ..ColorfulTheme::default()
    }
}

/// Print the version banner to stderr.
pub fn print_banner() {
    for line in banner_lines() {
        eprintln!("{}", Style::new().for_stderr().green().apply_to(line));
    }
    eprintln!();
}

fn banner_lines() -> Vec<String> {
    let version_line = format!("LeafWise v{}", leafwise_core::VERSION);
    let tagline = "Plant identification and care tips";

    // Two columns of padding on each side of the tagline
    let inner_width = tagline.chars().count().max(version_line.len()) + 4;

    vec![
        String::new(),
        format!("  ╔{:═<width$}╗", "", width = inner_width),
        format!("  ║{:^width$}║", version_line, width = inner_width),
        format!("  ║{:^width$}║", tagline, width = inner_width),
        format!("  ╚{:═<width$}╝", "", width = inner_width),
    ]
}
