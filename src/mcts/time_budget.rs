//! Per-move thinking time under a total time limit.
//!
//! Time spend is modelled as a geometric series: moves are played at
//! `seconds_per_move` for as long as the remaining budget allows, then each
//! further move gets `decay_factor` times the previous allocation. Playing
//! forever at the base rate with decay sums to
//! `seconds_per_move / (1 - decay_factor)` (the "endgame time"), which is held
//! back from the main budget.

/// Seconds to spend on move `move_num` (counted over both players).
pub fn time_recommendation(
    move_num: usize,
    seconds_per_move: f64,
    time_limit: f64,
    decay_factor: f64,
) -> f64 {
    // Only one side's moves count against our clock.
    let player_move_num = (move_num / 2) as i64;

    let endgame_time = seconds_per_move / (1.0 - decay_factor);

    let (base_time, core_moves) = if endgame_time > time_limit {
        // So little main time that we are already in endgame mode.
        (time_limit * (1.0 - decay_factor), 0i64)
    } else {
        (
            seconds_per_move,
            // The nudge absorbs rounding in `1 - decay_factor`.
            ((time_limit - endgame_time) / seconds_per_move + 1e-9).floor() as i64,
        )
    };

    let decay_moves = (player_move_num - core_moves).max(0);
    base_time * decay_factor.powi(decay_moves as i32)
}
