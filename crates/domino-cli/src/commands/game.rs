use super::Context;
use super::show::print_standings;
use anyhow::{Result, bail};
use domino_application::SessionStart;
use domino_core::GameMode;
use domino_core::participant::TEAM_COUNT;

pub async fn new_game(
    context: &mut Context,
    mode: GameMode,
    target: Option<u32>,
    names: Vec<String>,
    count: Option<usize>,
    fresh: bool,
) -> Result<()> {
    let names = participant_names(mode, names, count)?;
    let target = target.unwrap_or(context.config.default_target_score);
    let configuration = context.controller.configure(mode, target, &names)?;

    match context.controller.start_session(configuration).await {
        SessionStart::Fresh => println!("New {} game to {}.", mode, target),
        SessionStart::Resumed if fresh => {
            context.controller.reset_session()?;
            context.controller.checkpoint();
            println!("Discarded the unfinished game. New {} game to {}.", mode, target);
        }
        SessionStart::Resumed => {
            println!("Resumed the unfinished {} game to {}.", mode, target);
        }
        SessionStart::RecoveredFinished { winner } => {
            println!("Archived the previous game won by {}.", winner);
            println!("New {} game to {}.", mode, target);
        }
    }

    print_standings(&context.controller.view_model());
    Ok(())
}

/// Zeroes the saved game. After a win the slot is empty, so the last
/// completed game's setup is started again instead.
pub async fn reset(context: &mut Context) -> Result<()> {
    if context.controller.saved_configuration().await.is_some() {
        context.resume().await?;
        context.controller.reset_session()?;
        context.controller.checkpoint();
        println!("Scores reset.");
    } else {
        let Some(last) = context.controller.history().await.into_iter().next() else {
            bail!("No game to reset. Start one with `domino new`.");
        };
        let configuration = last.configuration;
        let (mode, target) = (configuration.mode, configuration.target_score);
        context.controller.start_session(configuration).await;
        println!("Restarted the last {} game to {}.", mode, target);
    }
    print_standings(&context.controller.view_model());
    Ok(())
}

/// Blank names are filled in by the registry, so only the count matters here.
fn participant_names(mode: GameMode, names: Vec<String>, count: Option<usize>) -> Result<Vec<String>> {
    if !names.is_empty() {
        if count.is_some_and(|c| c != names.len()) {
            bail!("--count does not match the number of --name values");
        }
        return Ok(names);
    }
    let count = match (mode, count) {
        (GameMode::Teams, None) => TEAM_COUNT,
        (GameMode::Players, None) => bail!("Player games need --count or one --name per player"),
        (_, Some(count)) => count,
    };
    Ok(vec![String::new(); count])
}

#[cfg(test)]
mod tests {
    use super::*;
    use domino_core::{AppConfig, GamePhase};
    use tempfile::TempDir;

    fn context(temp_dir: &TempDir) -> Context {
        Context::with_config(AppConfig::default(), temp_dir.path().to_path_buf())
    }

    #[tokio::test]
    async fn test_reset_after_win_restarts_last_setup() {
        let temp_dir = TempDir::new().unwrap();
        let mut first = context(&temp_dir);
        new_game(&mut first, GameMode::Teams, Some(50), Vec::new(), None, false)
            .await
            .unwrap();
        let outcome = first.controller.submit_score(1, 60).unwrap();
        assert!(outcome.is_game_over());
        first.controller.flush().await;

        let mut second = context(&temp_dir);
        assert!(second.controller.saved_configuration().await.is_none());
        reset(&mut second).await.unwrap();
        second.controller.flush().await;

        assert_eq!(second.controller.phase(), GamePhase::InProgress);
        let view = second.controller.view_model();
        assert_eq!(view.target_score, Some(50));
        assert_eq!(view.total(1), Some(0));
        let saved = second.controller.saved_configuration().await.unwrap();
        assert_eq!(saved.target_score, 50);
        assert_eq!(second.controller.history().await.len(), 1);
    }

    #[tokio::test]
    async fn test_reset_in_progress_zeroes_scores() {
        let temp_dir = TempDir::new().unwrap();
        let mut first = context(&temp_dir);
        new_game(&mut first, GameMode::Teams, Some(200), Vec::new(), None, false)
            .await
            .unwrap();
        first.controller.submit_score(0, 40).unwrap();
        first.controller.flush().await;

        let mut second = context(&temp_dir);
        reset(&mut second).await.unwrap();
        second.controller.flush().await;

        assert_eq!(second.controller.view_model().total(0), Some(0));
        assert!(second.controller.saved_configuration().await.is_some());
    }

    #[tokio::test]
    async fn test_reset_without_any_game_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut context = context(&temp_dir);

        let err = reset(&mut context).await.unwrap_err();
        assert!(err.to_string().contains("domino new"));
    }

    #[test]
    fn test_teams_default_to_two_blank_names() {
        let names = participant_names(GameMode::Teams, Vec::new(), None).unwrap();
        assert_eq!(names, vec![String::new(), String::new()]);
    }

    #[test]
    fn test_players_need_a_count() {
        assert!(participant_names(GameMode::Players, Vec::new(), None).is_err());
        assert_eq!(
            participant_names(GameMode::Players, Vec::new(), Some(4))
                .unwrap()
                .len(),
            4
        );
    }

    #[test]
    fn test_count_must_agree_with_names() {
        let names = vec!["Ana".to_string(), "Luis".to_string(), "Marta".to_string()];
        assert!(participant_names(GameMode::Players, names.clone(), Some(4)).is_err());
        assert_eq!(
            participant_names(GameMode::Players, names, Some(3)).unwrap().len(),
            3
        );
    }
}
