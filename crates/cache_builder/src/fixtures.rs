//! Small two-team data directory in the 2024 CSV layout.

use crate::tables::*;
use anyhow::Result;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const SLOTS: [&str; 11] = ["QB", "RB1", "RB2", "WR1", "WR2", "WR3", "WR4", "TE1", "TE2", "K", "P"];

struct Team {
    abbr: &'static str,
    coach: &'static str,
    /// Names in [`SLOTS`] order; empty for an unfilled slot.
    names: [&'static str; 11],
}

const TEAMS: [Team; 2] = [
    Team {
        abbr: "PHI",
        coach: "Nick Sirianni",
        names: [
            "Jalen Hurts",
            "Saquon Barkley",
            "Kenneth Gainwell",
            "A.J. Brown",
            "DeVonta Smith",
            "Jahan Dotson",
            "Johnny Wilson",
            "Dallas Goedert",
            "",
            "Jake Elliott",
            "Braden Mann",
        ],
    },
    Team {
        abbr: "DAL",
        coach: "Brian Schottenheimer",
        names: [
            "Dak Prescott",
            "Javonte Williams",
            "Miles Sanders",
            "CeeDee Lamb",
            "George Pickens",
            "Jalen Tolbert",
            "KaVontae Turpin",
            "Jake Ferguson",
            "",
            "Brandon Aubrey",
            "Bryan Anger",
        ],
    },
];

fn id(team: &Team, slot: usize) -> String {
    format!("00-{}-{}", team.abbr, SLOTS[slot])
}

fn opponent(index: usize) -> &'static str {
    TEAMS[1 - index].abbr
}

pub fn write_data_dir(dir: &Path) -> Result<()> {
    let mut player_ids = String::from(",full_name,gsis_id\n");
    let mut teams = String::from(
        "team,coach,qb,rb_1,rb_2,wr_1,wr_2,wr_3,wr_4,te_1,te_2,kicker,punter\n",
    );
    let mut carries = String::from("team,qb,rb_1,rb_2\n");
    let mut targets = String::from("team,rb_1,rb_2,wr_1,wr_2,wr_3,wr_4,te_1,te_2\n");
    let mut rushes = String::from("rusher_player_id,defteam,yards_gained_rush\n");
    let mut passes = String::from(
        "passer_player_id,receiver_player_id,defteam,complete_pass,interception,\
         air_yards,yards_after_catch,yards_gained_pass\n",
    );
    let mut punts = String::from("punter_player_id,kick_distance\n");
    let mut field_goals = String::from("kicker_player_id,yardline_100,result\n");
    let mut playcalls = String::from(
        "coach,down,distance,red_zone,pass_prob,run_prob,fg_prob,punt_prob\n",
    );

    let mut row = 0;
    for (index, team) in TEAMS.iter().enumerate() {
        for (slot, name) in team.names.iter().enumerate().filter(|(_, name)| !name.is_empty()) {
            writeln!(player_ids, "{row},{name},{}", id(team, slot))?;
            row += 1;
        }
        writeln!(teams, "{},{},{}", team.abbr, team.coach, team.names.join(","))?;
        writeln!(carries, "{},0.12,0.63,0.25", team.abbr)?;
        writeln!(targets, "{},0.09,0.03,0.26,0.21,0.1,0.05,0.18,0.08", team.abbr)?;

        let defense = opponent(index);
        for (slot, attempts) in [(0, 15), (1, 40), (2, 10)] {
            for i in 0..attempts {
                let yards = ((i * 7 + slot * 3) % 17) as f64 - 3.0;
                writeln!(rushes, "{},{defense},{yards}", id(team, slot))?;
            }
        }

        let receivers = [1, 2, 3, 4, 5, 6, 7];
        for i in 0..120_usize {
            let receiver = id(team, receivers[i % receivers.len()]);
            let complete = i % 8 < 5;
            let interception = !complete && i % 40 == 7;
            let flags = (u8::from(complete), u8::from(interception));
            if complete {
                let air = ((i * 5) % 19) as f64 - 2.0;
                let after_catch = ((i * 3) % 11) as f64;
                writeln!(
                    passes,
                    "{},{receiver},{defense},{}.0,{}.0,{air},{after_catch},{}",
                    id(team, 0),
                    flags.0,
                    flags.1,
                    air + after_catch
                )?;
            } else {
                writeln!(passes, "{},{receiver},{defense},{}.0,{}.0,,,", id(team, 0), flags.0, flags.1)?;
            }
        }

        for i in 0..20 {
            writeln!(punts, "{},{}", id(team, 10), 38 + (i * 7) % 15)?;
        }
        for i in 0..30 {
            let distance = 3 + (i * 13) % 40;
            let result = if distance < 30 || i % 3 == 0 { "made" } else { "missed" };
            writeln!(field_goals, "{},{distance},{result}", id(team, 9))?;
        }

        for down in 1..=4 {
            for bucket in ["All", "Short", "Mid", "Long"] {
                for red_zone in ["False", "True"] {
                    let probabilities = match (down, red_zone) {
                        (4, "True") => "0.1,0.05,0.85,0.0",
                        (4, _) => "0.1,0.05,0.0,0.85",
                        _ => "0.56,0.44,0.0,0.0",
                    };
                    writeln!(playcalls, "{},{down},{bucket},{red_zone},{probabilities}", team.coach)?;
                }
            }
        }
    }
    // one rush without a yardage value
    writeln!(rushes, "{},DAL,", id(&TEAMS[0], 1))?;

    for (file, content) in [
        (PLAYER_IDS_CSV, player_ids),
        (TEAMS_CSV, teams),
        (CARRIES_CSV, carries),
        (TARGETS_CSV, targets),
        (RUSHES_CSV, rushes),
        (PASSES_CSV, passes),
        (PUNTS_CSV, punts),
        (FIELD_GOALS_CSV, field_goals),
        (PLAYCALLS_CSV, playcalls),
    ] {
        fs::write(dir.join(file), content)?;
    }
    Ok(())
}
