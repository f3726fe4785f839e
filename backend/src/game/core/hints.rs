use super::player::PlayerRecord;

/// All hints available for a player, in the fixed order they are revealed.
/// Empty fields are skipped rather than shown blank.
pub fn available_hints(player: &PlayerRecord) -> Vec<String> {
    let mut hints = Vec::with_capacity(3);
    if !player.position.is_empty() {
        hints.push(format!("Position: {}", player.position));
    }
    if !player.nationality.is_empty() {
        hints.push(format!("Nationality: {}", player.nationality));
    }
    if let Some(year) = player.birth_year {
        hints.push(format!("Born in: {year}"));
    }
    hints
}

/// The `hint_number`-th hint (1-based), or `None` once hints run out
pub fn hint_for(player: &PlayerRecord, hint_number: u32) -> Option<String> {
    let index = usize::try_from(hint_number.checked_sub(1)?).ok()?;
    available_hints(player).into_iter().nth(index)
}
