use crate::types::{Move, MoveFamily};

/// What a key press means to the duel, before any competitor routing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputAction {
    Move(Move),
    TurnEnd(char),
}

/// Keyboard emulation of the move sensor, using the cubing debug-keyboard
/// layout: each face has a clockwise and a counter-clockwise key.
pub fn key_to_move(key: char) -> Option<Move> {
    let mv = match key.to_ascii_lowercase() {
        'i' => Move::cw(MoveFamily::R),
        'k' => Move::ccw(MoveFamily::R),
        'j' => Move::cw(MoveFamily::U),
        'f' => Move::ccw(MoveFamily::U),
        'h' => Move::cw(MoveFamily::F),
        'g' => Move::ccw(MoveFamily::F),
        'd' => Move::cw(MoveFamily::L),
        'e' => Move::ccw(MoveFamily::L),
        's' => Move::cw(MoveFamily::D),
        'l' => Move::ccw(MoveFamily::D),
        'w' => Move::cw(MoveFamily::B),
        'o' => Move::ccw(MoveFamily::B),
        _ => return None,
    };
    Some(mv)
}

/// Classifies a raw key press: move keys first, everything else is offered
/// as a potential turn-end trigger.
pub fn classify(key: char) -> InputAction {
    match key_to_move(key) {
        Some(mv) => InputAction::Move(mv),
        None => InputAction::TurnEnd(key),
    }
}
