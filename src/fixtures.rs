use anyhow::Context;
use bracket_engine::{Match, MatchStatus, Segment, Team, TeamSlot, Topology, Tournament};
use chrono::{DateTime, Duration, TimeZone, Utc};

// ---------------------------------------------------------------------------
// Built-in demo tournaments — one per topology, so the whole engine can be
// exercised offline. Bracket generation itself is upstream logic; these are
// hand-rolled match lists, not a generator.
// ---------------------------------------------------------------------------

const CLUBS: [&str; 8] = [
    "Falcons", "Harriers", "Kestrels", "Condors", "Ospreys", "Merlins", "Shrikes", "Goshawks",
];

fn team(idx: usize) -> Team {
    Team {
        id: format!("t{}", idx + 1),
        name: format!("{} FC", CLUBS[idx % CLUBS.len()]),
        short_name: CLUBS[idx % CLUBS.len()].to_string(),
    }
}

fn seeded(seed: u16) -> TeamSlot {
    TeamSlot {
        seed,
        team: Some(team(seed as usize - 1)),
        placeholder: None,
    }
}

fn pending(label: &str) -> TeamSlot {
    TeamSlot {
        seed: 0,
        team: None,
        placeholder: Some(label.to_string()),
    }
}

fn kickoff(hours: i64) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2026, 8, 1, 18, 0, 0)
        .single()
        .map(|t| t + Duration::hours(hours))
}

#[allow(clippy::too_many_arguments)]
fn make(
    id: &str,
    round: u32,
    segment: Segment,
    slots: [TeamSlot; 2],
    status: MatchStatus,
    score: Option<(u16, u16)>,
    winner_id: Option<&str>,
    hours: i64,
) -> Match {
    Match {
        id: id.to_string(),
        round,
        segment,
        slots,
        status,
        score,
        winner_id: winner_id.map(str::to_string),
        placement: false,
        court: Some(format!("Court {}", 1 + hours % 3)),
        scheduled_at: kickoff(hours),
    }
}

fn single_elimination() -> Tournament {
    let matches = vec![
        make(
            "se-r1m0",
            1,
            Segment::Main,
            [seeded(1), seeded(8)],
            MatchStatus::Completed,
            Some((3, 0)),
            Some("t1"),
            0,
        ),
        make(
            "se-r1m1",
            1,
            Segment::Main,
            [seeded(4), seeded(5)],
            MatchStatus::Completed,
            Some((1, 2)),
            Some("t5"),
            0,
        ),
        make(
            "se-r1m2",
            1,
            Segment::Main,
            [seeded(3), seeded(6)],
            MatchStatus::Active,
            Some((1, 1)),
            None,
            1,
        ),
        make(
            "se-r1m3",
            1,
            Segment::Main,
            [seeded(2), seeded(7)],
            MatchStatus::Scheduled,
            None,
            None,
            2,
        ),
        make(
            "se-r2m0",
            2,
            Segment::Main,
            [seeded(1), seeded(5)],
            MatchStatus::Scheduled,
            None,
            None,
            24,
        ),
        make(
            "se-r2m1",
            2,
            Segment::Main,
            [pending("Winner of QF3"), pending("Winner of QF4")],
            MatchStatus::Scheduled,
            None,
            None,
            25,
        ),
        make(
            "se-final",
            3,
            Segment::Main,
            [pending("Winner of SF1"), pending("Winner of SF2")],
            MatchStatus::Scheduled,
            None,
            None,
            48,
        ),
    ];
    Tournament {
        id: "demo-single".into(),
        name: "City Open".into(),
        topology: Topology::SingleElimination,
        matches,
    }
}

fn double_elimination() -> Tournament {
    let mut matches = Vec::new();
    let pairings = [(1u16, 8u16), (4, 5), (3, 6), (2, 7)];
    for (i, (a, b)) in pairings.iter().enumerate() {
        matches.push(make(
            &format!("de-wb1m{i}"),
            1,
            Segment::Winner,
            [seeded(*a), seeded(*b)],
            if i == 0 {
                MatchStatus::Completed
            } else {
                MatchStatus::Scheduled
            },
            (i == 0).then_some((2, 1)),
            (i == 0).then_some("t1"),
            i as i64,
        ));
    }
    for i in 0..2 {
        matches.push(make(
            &format!("de-wb2m{i}"),
            2,
            Segment::Winner,
            [
                pending(&format!("Winner of WB1.{}", 2 * i + 1)),
                pending(&format!("Winner of WB1.{}", 2 * i + 2)),
            ],
            MatchStatus::Scheduled,
            None,
            None,
            24 + i as i64,
        ));
    }
    matches.push(make(
        "de-wb3m0",
        3,
        Segment::Winner,
        [pending("Winner of WB2.1"), pending("Winner of WB2.2")],
        MatchStatus::Scheduled,
        None,
        None,
        48,
    ));
    for i in 0..2 {
        matches.push(make(
            &format!("de-lb1m{i}"),
            1,
            Segment::Loser,
            [
                pending(&format!("Loser of WB1.{}", 2 * i + 1)),
                pending(&format!("Loser of WB1.{}", 2 * i + 2)),
            ],
            MatchStatus::Scheduled,
            None,
            None,
            12 + i as i64,
        ));
    }
    for i in 0..2 {
        matches.push(make(
            &format!("de-lb2m{i}"),
            2,
            Segment::Loser,
            [
                pending(&format!("Winner of LB1.{}", i + 1)),
                pending("Loser of WB2"),
            ],
            MatchStatus::Scheduled,
            None,
            None,
            36 + i as i64,
        ));
    }
    matches.push(make(
        "de-lb3m0",
        3,
        Segment::Loser,
        [pending("Winner of LB2.1"), pending("Winner of LB2.2")],
        MatchStatus::Scheduled,
        None,
        None,
        60,
    ));
    matches.push(make(
        "de-lb4m0",
        4,
        Segment::Loser,
        [pending("Winner of LB3"), pending("Loser of WB Final")],
        MatchStatus::Scheduled,
        None,
        None,
        72,
    ));
    matches.push(make(
        "de-gf",
        1,
        Segment::GrandFinal,
        [pending("WB Champion"), pending("LB Champion")],
        MatchStatus::Scheduled,
        None,
        None,
        96,
    ));
    Tournament {
        id: "demo-double".into(),
        name: "Harbor Cup".into(),
        topology: Topology::DoubleElimination,
        matches,
    }
}

fn swiss() -> Tournament {
    // 6 teams, 3 of 5 rounds generated so far. Pairings are supplied by the
    // upstream generator in standings order.
    let rounds: [[(u16, u16); 3]; 3] = [
        [(1, 6), (2, 5), (3, 4)],
        [(1, 5), (6, 4), (2, 3)],
        [(1, 4), (5, 3), (6, 2)],
    ];
    let mut matches = Vec::new();
    for (r, pairs) in rounds.iter().enumerate() {
        for (i, (a, b)) in pairs.iter().enumerate() {
            let status = match r {
                0 => MatchStatus::Completed,
                1 => MatchStatus::Active,
                _ => MatchStatus::Scheduled,
            };
            matches.push(make(
                &format!("sw-r{}m{i}", r + 1),
                r as u32 + 1,
                Segment::Main,
                [seeded(*a), seeded(*b)],
                status,
                match status {
                    MatchStatus::Completed => Some((2, 0)),
                    MatchStatus::Active => Some((0, 0)),
                    _ => None,
                },
                (status == MatchStatus::Completed).then(|| format!("t{a}")).as_deref(),
                (r * 24 + i) as i64,
            ));
        }
    }
    Tournament {
        id: "demo-swiss".into(),
        name: "Spring Swiss".into(),
        topology: Topology::Swiss,
        matches,
    }
}

fn round_robin() -> Tournament {
    // 4 teams, circle method: each round rotates all but the anchor.
    let rounds: [[(u16, u16); 2]; 3] = [[(1, 4), (2, 3)], [(1, 3), (4, 2)], [(1, 2), (3, 4)]];
    let mut matches = Vec::new();
    for (r, pairs) in rounds.iter().enumerate() {
        for (i, (a, b)) in pairs.iter().enumerate() {
            matches.push(make(
                &format!("rr-r{}m{i}", r + 1),
                r as u32 + 1,
                Segment::Main,
                [seeded(*a), seeded(*b)],
                MatchStatus::Scheduled,
                None,
                None,
                (r * 24 + i) as i64,
            ));
        }
    }
    Tournament {
        id: "demo-rr".into(),
        name: "League Group A".into(),
        topology: Topology::RoundRobin,
        matches,
    }
}

fn barrage() -> Tournament {
    // Placement playoff for ranks 5-8 after the pool stage. The unflagged
    // tiebreaker belongs to the pools and stays out of the sub-bracket.
    let mut matches = vec![
        make(
            "ba-sf1",
            1,
            Segment::Main,
            [seeded(5), seeded(8)],
            MatchStatus::Scheduled,
            None,
            None,
            0,
        ),
        make(
            "ba-sf2",
            1,
            Segment::Main,
            [seeded(6), seeded(7)],
            MatchStatus::Scheduled,
            None,
            None,
            1,
        ),
        make(
            "ba-final",
            2,
            Segment::Main,
            [pending("Winner of P1"), pending("Winner of P2")],
            MatchStatus::Scheduled,
            None,
            None,
            24,
        ),
    ];
    for m in &mut matches {
        m.placement = true;
    }
    matches.push(make(
        "ba-pool-tiebreak",
        1,
        Segment::Main,
        [seeded(3), seeded(4)],
        MatchStatus::Completed,
        Some((1, 0)),
        Some("t3"),
        -24,
    ));
    Tournament {
        id: "demo-barrage".into(),
        name: "Placement Barrage".into(),
        topology: Topology::Barrage,
        matches,
    }
}

pub fn demo_tournaments() -> Vec<Tournament> {
    vec![
        single_elimination(),
        double_elimination(),
        swiss(),
        round_robin(),
        barrage(),
    ]
}

/// Load a tournament snapshot from a JSON file (`BRKT_TOURNAMENT_JSON`).
pub fn load_snapshot(path: &str) -> anyhow::Result<Tournament> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read snapshot {path}"))?;
    serde_json::from_str(&content).with_context(|| format!("invalid tournament json at {path}"))
}

/// Advance the demo simulation one step: active matches gain score until
/// they finish, then the next scheduled match kicks off. Every change goes
/// through the legal status lifecycle.
pub fn advance_demo(tournament: &mut Tournament) {
    if let Some(m) = tournament
        .matches
        .iter_mut()
        .find(|m| m.status == MatchStatus::Active)
    {
        let (a, b) = m.score.unwrap_or((0, 0));
        if a + b < 4 {
            m.score = Some(if (a + b) % 2 == 0 { (a + 1, b) } else { (a, b + 1) });
        } else if m.status.can_transition(MatchStatus::Completed) {
            m.status = MatchStatus::Completed;
            let slot = if b > a { 1 } else { 0 };
            m.winner_id = m.slots[slot].team.as_ref().map(|t| t.id.clone());
        }
        return;
    }

    if let Some(m) = tournament
        .matches
        .iter_mut()
        .find(|m| m.status == MatchStatus::Scheduled)
        && m.status.can_transition(MatchStatus::Active)
    {
        m.status = MatchStatus::Active;
        m.score = Some((0, 0));
    }
}
