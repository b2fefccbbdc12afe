use dashboard_core::{
    render_embed_markup, AppViewModel, ColumnReport, EmbedDelivery, EmbedReference, RefreshSignal,
};

/// Console lines for the current view.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(match &view.selected_file {
        Some(name) => format!("File: {name}"),
        None => "File: (none selected)".to_string(),
    });
    if let Some(status) = &view.status_line {
        lines.push(status.clone());
    }
    if !view.insights.is_empty() {
        lines.push("Smart recommendations:".to_string());
        lines.extend(view.insights.iter().map(|insight| format!("  - {insight}")));
    }
    if let Some(columns) = &view.columns {
        lines.extend(format_columns(columns));
    }
    lines.push(format!(
        "Dashboard ({}): {}",
        refresh_label(view.refresh),
        view.embed
    ));
    if view.can_submit {
        lines.push("Ready: type 'upload' to process the file.".to_string());
    }

    lines
}

/// Markup the host page needs after the embed reference changed.
pub fn render_embed(reference: &EmbedReference, delivery: EmbedDelivery) -> String {
    format!("Dashboard reloaded: {}", render_embed_markup(reference, delivery))
}

fn refresh_label(signal: RefreshSignal) -> String {
    match signal.stamp() {
        Some(stamp) => format!("refresh {stamp}"),
        None => "initial".to_string(),
    }
}

fn format_columns(columns: &ColumnReport) -> Vec<String> {
    let mut lines = Vec::new();
    if !columns.mapped.is_empty() {
        let mapped = columns
            .mapped
            .iter()
            .map(|(from, to)| format!("{from} -> {to}"))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Mapped columns: {mapped}"));
    }
    if !columns.final_columns.is_empty() {
        lines.push(format!("Final columns: {}", columns.final_columns.join(", ")));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{update, AppState, EmbedTarget, Msg, SelectedFile, UploadResponse};
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://viz.example.com/views/Sales?:embed=y";

    fn state() -> AppState {
        AppState::new(EmbedTarget::parse(BASE).unwrap())
    }

    #[test]
    fn initial_view_shows_base_embed() {
        assert_eq!(
            render(&state().view()),
            vec![
                "File: (none selected)".to_string(),
                format!("Dashboard (initial): {BASE}"),
            ]
        );
    }

    #[test]
    fn success_lists_insights_and_columns() {
        let file = SelectedFile::new("q1.csv", "text/csv", b"a\n".to_vec());
        let (state, _) = update(state(), Msg::FileSelected(file));
        let (state, _) = update(state, Msg::UploadClicked);
        let mut response = UploadResponse::new(
            "File processed",
            vec!["Top category: Laptops".to_string(), "AOV is 120.00".to_string()],
        );
        response.columns = ColumnReport {
            mapped: vec![("qty".to_string(), "Quantity".to_string())],
            final_columns: vec!["Quantity".to_string()],
        };
        let (state, _) = update(
            state,
            Msg::UploadFinished {
                upload_id: 1,
                result: Ok(response),
                completed_at_ms: 77,
            },
        );

        assert_eq!(
            render(&state.view()),
            vec![
                "File: (none selected)".to_string(),
                "Success: File processed".to_string(),
                "Smart recommendations:".to_string(),
                "  - Top category: Laptops".to_string(),
                "  - AOV is 120.00".to_string(),
                "Mapped columns: qty -> Quantity".to_string(),
                "Final columns: Quantity".to_string(),
                format!("Dashboard (refresh 77): {BASE}&:refresh_key=77"),
            ]
        );
    }

    #[test]
    fn selected_file_prompts_upload() {
        let file = SelectedFile::new("q1.csv", "text/csv", b"a\n".to_vec());
        let (state, _) = update(state(), Msg::FileSelected(file));
        let lines = render(&state.view());
        assert_eq!(lines[0], "File: q1.csv");
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Ready: type 'upload' to process the file.")
        );
    }
}
