//! Contest brackets: single elimination and king of the hill.
//!
//! Builders never shuffle. The caller decides the order (see
//! [`shuffle_participants`](crate::logic::shuffle_participants)), and the same order always
//! yields the same shape. Match ids are fresh UUIDs on every build.

use crate::models::{Bracket, BracketError, ContestFormat, Match, MatchSlot, Participant, Round};

/// Build a bracket in the given format from participants in seeding order.
pub fn build_bracket(
    participants: &[Participant],
    format: ContestFormat,
) -> Result<Bracket, BracketError> {
    let bracket = match format {
        ContestFormat::SingleElimination => single_elimination(participants)?,
        ContestFormat::KingOfTheHill => king_of_the_hill(participants)?,
        ContestFormat::DoubleElimination | ContestFormat::SwissSystem => {
            return Err(BracketError::UnsupportedFormat(format));
        }
    };
    log::debug!(
        "Built {} bracket: {} participants, {} rounds",
        format,
        participants.len(),
        bracket.rounds.len()
    );
    Ok(bracket)
}

/// Rounds a single-elimination bracket needs for `n` participants: `ceil(log2(n))`.
pub fn round_count(n: usize) -> usize {
    if n < 2 {
        return 0;
    }
    (usize::BITS - (n - 1).leading_zeros()) as usize
}

/// Single elimination (<https://en.wikipedia.org/wiki/Single-elimination_tournament>).
///
/// 1. `rounds = ceil(log2(n))`, `slots = 2^(rounds - 1)`.
/// 2. Round 1 pairs the first `2 * (n - slots)` participants.
/// 3. Round 2 pairs the round-1 winners followed by the remaining participants (byes), in order.
/// 4. Every later round pairs consecutive winners of the round before, down to the final.
///
/// When `n` is a power of two everybody plays in round 1. No round is ever empty.
pub fn single_elimination(participants: &[Participant]) -> Result<Bracket, BracketError> {
    let n = check_participant_count(participants)?;
    let slots = 1usize << (round_count(n) - 1);
    let entrants: Vec<MatchSlot> = participants.iter().cloned().map(MatchSlot::from).collect();
    let (preliminary, byes) = entrants.split_at((n - slots) * 2);

    let mut rounds: Vec<Round> = Vec::with_capacity(round_count(n));
    let mut matches = pair_up(preliminary);
    loop {
        let winners = matches.iter().map(Match::winner_slot);
        let next_pool: Vec<MatchSlot> = if rounds.is_empty() {
            winners.chain(byes.iter().cloned()).collect()
        } else {
            winners.collect()
        };
        push_round(&mut rounds, matches);
        if next_pool.len() < 2 {
            break;
        }
        matches = pair_up(&next_pool);
    }

    Ok(Bracket {
        count_matches: n - 1,
        rounds,
    })
}

/// King of the hill: the first two participants meet, then the winner of each match faces the
/// next participant in order until everyone has played. One match per round, `n - 1` rounds.
pub fn king_of_the_hill(participants: &[Participant]) -> Result<Bracket, BracketError> {
    let n = check_participant_count(participants)?;
    let mut rounds: Vec<Round> = Vec::with_capacity(n - 1);

    let mut current = Match::new(
        participants[0].clone().into(),
        participants[1].clone().into(),
    );
    for challenger in &participants[2..] {
        let next = Match::new(current.winner_slot(), challenger.clone().into());
        push_round(&mut rounds, vec![std::mem::replace(&mut current, next)]);
    }
    push_round(&mut rounds, vec![current]);

    Ok(Bracket {
        count_matches: n - 1,
        rounds,
    })
}

fn check_participant_count(participants: &[Participant]) -> Result<usize, BracketError> {
    match participants.len() {
        n if n < 2 => Err(BracketError::InvalidParticipantCount { count: n }),
        n => Ok(n),
    }
}

/// Pair consecutive slots (0 with 1, 2 with 3, ...). `slots` has even length.
fn pair_up(slots: &[MatchSlot]) -> Vec<Match> {
    slots
        .chunks_exact(2)
        .map(|pair| Match::new(pair[0].clone(), pair[1].clone()))
        .collect()
}

/// Append a round numbered after the last one; empty rounds are dropped.
fn push_round(rounds: &mut Vec<Round>, matches: Vec<Match>) {
    if matches.is_empty() {
        return;
    }
    rounds.push(Round {
        round: rounds.len() + 1,
        matches,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_count_is_ceil_log2() {
        let expected = [(0, 0), (1, 0), (2, 1), (3, 2), (4, 2), (5, 3), (8, 3), (9, 4), (64, 6)];
        for (n, rounds) in expected {
            assert_eq!(round_count(n), rounds, "n = {n}");
        }
    }

    #[test]
    fn push_round_skips_empty() {
        let mut rounds = Vec::new();
        push_round(&mut rounds, Vec::new());
        assert!(rounds.is_empty());
    }
}
