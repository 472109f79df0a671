use super::Context;
use super::show::print_standings;
use anyhow::Result;

pub async fn add(context: &mut Context, participant: usize, amount: &str) -> Result<()> {
    context.resume().await?;
    let outcome = context.controller.submit_score_input(participant, amount)?;

    match &outcome.winner {
        Some(winner) => println!("{} wins with {}!", winner.name, outcome.total),
        None => println!("Total: {}", outcome.total),
    }
    print_standings(&context.controller.view_model());
    Ok(())
}

pub async fn delete(context: &mut Context, participant: usize, score_index: usize) -> Result<()> {
    context.resume().await?;
    let outcome = context.controller.delete_score(participant, score_index)?;

    println!("Removed {}. Total: {}", outcome.removed, outcome.total);
    print_standings(&context.controller.view_model());
    Ok(())
}
