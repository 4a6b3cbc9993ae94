//! Human-readable rendering: the plant card and progress notices.

use console::Style;
use leafwise_core::{Notice, Outcome, PlantReport, Severity};

/// Notice shown when a run fails with an error.
pub fn failure_notice() -> Notice {
    Notice::error(
        "Error",
        "An error occurred while fetching plant details. Please try again.",
    )
}

/// Print a notice to stderr (stdout carries results).
pub fn print_notice(notice: &Notice) {
    let (icon, style) = match notice.severity {
        Severity::Info => ("•", Style::new().for_stderr().cyan()),
        Severity::Warning => ("!", Style::new().for_stderr().yellow()),
        Severity::Error => ("✗", Style::new().for_stderr().red()),
    };
    let dim = Style::new().for_stderr().dim();
    eprintln!(
        "  {} {} {}",
        style.apply_to(icon),
        style.apply_to(&notice.title).bold(),
        dim.apply_to(&notice.description)
    );
}

/// Render one outcome as text.
pub fn render_outcome(outcome: &Outcome, styled: bool) -> String {
    match outcome {
        Outcome::Report(report) => render_report(report, styled),
        Outcome::NotAPlant { source: Some(path) } => {
            format!("No plant found in {}\n", path.display())
        }
        Outcome::NotAPlant { source: None } => "No plant found in the image\n".to_string(),
    }
}

/// Render a report as a card: title, names, description, care tips.
///
/// Sections the model left empty are omitted.
pub fn render_report(report: &PlantReport, styled: bool) -> String {
    let styles = Styles::new(styled);
    let mut out = String::new();

    out.push_str(&format!("{}\n", styles.title.apply_to(&report.plant_name)));

    let mut names = Vec::new();
    if !report.scientific_name.is_empty() {
        names.push(format!(
            "Scientific Name: {}",
            styles.italic.apply_to(&report.scientific_name)
        ));
    }
    if !report.family.is_empty() {
        names.push(format!("Family: {}", report.family));
    }
    if !names.is_empty() {
        out.push_str(&format!("{}\n", names.join(" | ")));
    }
    if let Some(ref source) = report.source {
        out.push_str(&format!("{}\n", styles.dim.apply_to(source.display())));
    }

    if let Some(description) = report.description_text() {
        out.push('\n');
        out.push_str(&format!("{}\n", styles.heading.apply_to("Description")));
        push_indented(&mut out, description, 2);
    }

    if let Some(ref tips) = report.care_tips {
        let sections = [
            ("Watering Frequency:", &tips.watering_frequency),
            ("Sunlight Requirements:", &tips.sunlight_requirements),
            ("Additional Care Tips:", &tips.additional_care_tips),
        ];
        out.push('\n');
        out.push_str(&format!("{}\n", styles.heading.apply_to("Care Tips")));
        for (label, text) in sections {
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            out.push_str(&format!("  {}\n", styles.label.apply_to(label)));
            push_indented(&mut out, text, 4);
        }
    }

    out
}

fn push_indented(out: &mut String, text: &str, indent: usize) {
    let pad = " ".repeat(indent);
    for line in text.lines() {
        if line.trim().is_empty() {
            out.push('\n');
        } else {
            out.push_str(&format!("{pad}{}\n", line.trim_end()));
        }
    }
}

struct Styles {
    title: Style,
    heading: Style,
    label: Style,
    italic: Style,
    dim: Style,
}

impl Styles {
    fn new(styled: bool) -> Self {
        let base = Style::new().force_styling(styled);
        Self {
            title: base.clone().green().bold(),
            heading: base.clone().bold(),
            label: base.clone().cyan(),
            italic: base.clone().italic(),
            dim: base.dim(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafwise_core::{CareTipsOutput, DescriptionOutput};
    use std::path::PathBuf;

    fn report() -> PlantReport {
        PlantReport {
            plant_name: "Swiss cheese plant".to_string(),
            scientific_name: "Monstera deliciosa".to_string(),
            family: "Araceae".to_string(),
            description: Some(DescriptionOutput {
                description: "A climbing aroid.\nNative to Central America.".to_string(),
            }),
            care_tips: Some(CareTipsOutput {
                watering_frequency: "Weekly".to_string(),
                sunlight_requirements: String::new(),
                additional_care_tips: "Provide a moss pole".to_string(),
            }),
            image_url: None,
            source: None,
        }
    }

    #[test]
    fn renders_full_card() {
        let text = render_report(&report(), false);
        assert_eq!(
            text,
            "Swiss cheese plant\n\
             Scientific Name: Monstera deliciosa | Family: Araceae\n\
             \n\
             Description\n\
             \x20 A climbing aroid.\n\
             \x20 Native to Central America.\n\
             \n\
             Care Tips\n\
             \x20 Watering Frequency:\n\
             \x20   Weekly\n\
             \x20 Additional Care Tips:\n\
             \x20   Provide a moss pole\n"
        );
    }

    #[test]
    fn omits_missing_sections() {
        let mut report = report();
        report.description = Some(DescriptionOutput::default());
        report.care_tips = None;
        let text = render_report(&report, false);
        assert!(!text.contains("Description"));
        assert!(!text.contains("Care Tips"));
    }

    #[test]
    fn shows_not_available_names() {
        let mut report = report();
        report.scientific_name = "N/A".to_string();
        report.family = "N/A".to_string();
        let text = render_report(&report, false);
        assert!(text.contains("Scientific Name: N/A | Family: N/A"));
    }

    #[test]
    fn not_a_plant_names_source() {
        let outcome = Outcome::NotAPlant {
            source: Some(PathBuf::from("rock.jpg")),
        };
        assert_eq!(render_outcome(&outcome, false), "No plant found in rock.jpg\n");
    }
}
