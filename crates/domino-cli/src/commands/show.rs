use super::Context;
use anyhow::Result;
use domino_application::GameView;
use domino_core::HistoryEntry;

pub async fn standings(context: &mut Context, json: bool) -> Result<()> {
    context.resume().await?;
    let view = context.controller.view_model();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_standings(&view);
    }
    Ok(())
}

pub async fn history(context: &Context, json: bool) -> Result<()> {
    let entries = context.controller.history().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No completed games yet.");
    }
    for entry in &entries {
        println!("{}", history_line(entry));
    }
    Ok(())
}

pub async fn clear_history(context: &Context) -> Result<()> {
    context.controller.clear_history().await?;
    println!("History cleared.");
    Ok(())
}

pub fn print_standings(view: &GameView) {
    println!("{}", render_standings(view));
}

fn render_standings(view: &GameView) -> String {
    let mut lines = Vec::new();
    if let (Some(mode), Some(target)) = (view.mode, view.target_score) {
        lines.push(format!("{} game to {} ({})", mode, target, view.phase));
    }

    let width = view
        .participants
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(0);
    for participant in &view.participants {
        let scores: Vec<String> = participant.scores.iter().map(u32::to_string).collect();
        let marker = if participant.is_leader { " *" } else { "" };
        lines.push(format!(
            "  [{}] {:<width$} {:>5}{}  ({})",
            participant.index,
            participant.name,
            participant.total,
            marker,
            scores.join(", "),
            width = width
        ));
    }

    match (&view.winner, view.leader_name()) {
        (Some(winner), _) => lines.push(format!("Winner: {}", winner)),
        (None, Some(leader)) => lines.push(format!("Leader: {}", leader)),
        (None, None) => {}
    }
    lines.join("\n")
}

fn history_line(entry: &HistoryEntry) -> String {
    let totals: Vec<String> = entry
        .configuration
        .participants
        .iter()
        .zip(entry.final_totals())
        .map(|(p, total)| format!("{} {}", p.name, total))
        .collect();
    format!(
        "{}  {} to {}  winner: {}  [{}]",
        entry.timestamp,
        entry.configuration.mode,
        entry.configuration.target_score,
        entry.winner.as_deref().unwrap_or("-"),
        totals.join(", ")
    )
}
