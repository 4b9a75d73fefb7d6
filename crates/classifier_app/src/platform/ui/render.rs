use classifier_core::{ConfidenceBand, ImageView, Phase, SessionView};

pub fn render(view: &SessionView) -> Vec<String> {
    let mut lines = vec![format!("Status: {}", phase_label(view.phase))];

    if view.drag_active {
        lines.push("Drop your image here".to_string());
    }

    if let Some(image) = &view.image {
        lines.push(format_image(image));
    }

    if view.is_loading() {
        lines.push("Analyzing image...".to_string());
    }

    if let (Some(result), Some(band)) = (&view.result, view.confidence_band()) {
        lines.push(format!(
            "Result: {} ({:.1}% confidence, {})",
            result.label,
            result.confidence_percent,
            band_label(band)
        ));
        if let Some(source) = &result.source_label {
            lines.push(format!("Dataset label: {source}"));
        }
        lines.push(format!(
            "Analyzed on {}",
            result.observed_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    if let Some(error) = &view.error {
        lines.push(format!("Error: {}", error.message));
    }

    lines.push(hint(view).to_string());
    lines
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "Idle",
        Phase::ImageSelected => "Image selected",
        Phase::Classifying => "Classifying",
        Phase::Resulted => "Done",
        Phase::Failed => "Failed",
    }
}

fn band_label(band: ConfidenceBand) -> &'static str {
    match band {
        ConfidenceBand::High => "high",
        ConfidenceBand::Medium => "medium",
        ConfidenceBand::Low => "low",
    }
}

fn hint(view: &SessionView) -> &'static str {
    match view.phase {
        Phase::Idle => "Type 'pick <path>' or 'drop <path>' to classify an image.",
        Phase::ImageSelected | Phase::Classifying => "Type 'reset' to cancel.",
        Phase::Resulted => "Pick another image, 'retry' or 'reset'.",
        Phase::Failed => "Type 'retry' to try again or 'reset' to start over.",
    }
}

fn format_image(image: &ImageView) -> String {
    format!(
        "Image: {} ({}, {})",
        image.file_name,
        image.mime_type,
        format_bytes(image.byte_len)
    )
}

fn format_bytes(len: usize) -> String {
    const KIB: f64 = 1024.0;
    let len_f = len as f64;
    if len_f < KIB {
        format!("{len} B")
    } else if len_f < KIB * KIB {
        format!("{:.1} KiB", len_f / KIB)
    } else {
        format!("{:.1} MiB", len_f / (KIB * KIB))
    }
}
