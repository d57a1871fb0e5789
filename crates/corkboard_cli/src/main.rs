//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `corkboard_core` linkage without a host renderer.
//! - Replay one scripted board session and print its events as JSON lines.

use corkboard_core::{
    Board, BoardBounds, BoardEvent, EditEntry, FormatCommand, NoteDraft, Point, PointerTarget,
    TextSelection,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::process::ExitCode;
use std::time::Duration;

const BOUNDS: BoardBounds = BoardBounds::new(800.0, 600.0);

fn main() -> ExitCode {
    println!("corkboard_core ping={}", corkboard_core::ping());
    println!("corkboard_core version={}", corkboard_core::core_version());

    match replay() {
        Ok(count) => {
            println!("replay status=ok events={count}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("replay status=error reason={message}");
            ExitCode::FAILURE
        }
    }
}

fn replay() -> Result<usize, String> {
    let mut board = Board::default();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut printed = 0;

    let lunch = board
        .add_note(&NoteDraft::new("Lunch"), BOUNDS, &mut rng)
        .map_err(|err| err.to_string())?;
    let errands = board
        .add_note(&NoteDraft::new("Errands"), BOUNDS, &mut rng)
        .map_err(|err| err.to_string())?;
    printed += flush(&mut board)?;

    board.pointer_down(errands, Point::new(60.0, 60.0), PointerTarget::Body);
    board.pointer_move(Point::new(400.0, 300.0), Some(BOUNDS));
    board.pointer_up();
    printed += flush(&mut board)?;

    board.pointer_enter(lunch, Point::new(90.0, 90.0), Duration::ZERO);
    board.advance(Duration::from_secs(5));
    board.pointer_leave(lunch);
    printed += flush(&mut board)?;

    if board.enter_edit(lunch, Duration::from_secs(6)) != EditEntry::Started {
        return Err("edit session refused".to_string());
    }
    board.advance(Duration::from_secs(6));
    board.input_text(lunch, "soup and bread");
    board.select_text(lunch, TextSelection::new(0, 4));
    board.edit_blur(lunch);
    board.apply_format(lunch, FormatCommand::Bold);
    board.commit_edit(lunch, None);
    printed += flush(&mut board)?;

    board.delete_note(errands);
    printed += flush(&mut board)?;

    Ok(printed)
}

fn flush(board: &mut Board) -> Result<usize, String> {
    let events: Vec<BoardEvent> = board.take_events();
    for event in &events {
        let line = serde_json::to_string(event).map_err(|err| err.to_string())?;
        println!("{line}");
    }
    Ok(events.len())
}
