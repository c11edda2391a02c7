use crate::theme::Theme;
use combo_core::{
    sort_for_display, Character, ChainStep, SearchStats, Sequence, StepRole, Team, TeamResult,
    MAX_REACTIONS,
};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

/// Pad to a terminal column width; CJK glyphs take two columns
fn pad(text: &str, width: usize) -> String {
    let len = text.width();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

fn member_label(theme: &Theme, member: &Character) -> String {
    if member.is_commander() {
        format!("{} {}", theme.paint("名将", theme.commander), member.name)
    } else {
        member.name.clone()
    }
}

fn team_label(theme: &Theme, team: &Team) -> String {
    team.members()
        .iter()
        .map(|m| member_label(theme, m))
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Column width of a team label, ignoring styling
fn team_width(team: &Team) -> usize {
    team.members()
        .iter()
        .map(|m| m.display_label().width())
        .sum::<usize>()
        + 3 * (team.members().len() - 1)
}

fn step_label(step: &ChainStep) -> String {
    match step.role {
        StepRole::Activation(slot) => format!("{} ({}: {})", step.actor, slot, step.effect),
        StepRole::Reaction => format!("{} ({})", step.actor, step.effect),
    }
}

pub fn render_roster(out: &mut impl Write, theme: &Theme, roster: &[Character]) -> io::Result<()> {
    let mut sorted = roster.to_vec();
    sort_for_display(&mut sorted);

    let mut current = None;
    for c in &sorted {
        if current != Some(c.faction) {
            current = Some(c.faction);
            writeln!(
                out,
                "{}",
                theme.bold(format!("■ {} ({})", c.faction.symbol(), c.faction), theme.header)
            )?;
        }
        let reaction = match c.reaction.output.chainable() {
            Some(output) => format!("{} → {}", c.reaction.trigger, output),
            None if c.reaction.trigger.is_empty() => "-".to_string(),
            None => format!("{} ✕", c.reaction.trigger),
        };
        writeln!(
            out,
            "  {}  {} / {}  {}",
            member_label(theme, c),
            c.ability(combo_core::AbilitySlot::Primary).unwrap_or("-"),
            c.ability(combo_core::AbilitySlot::Secondary).unwrap_or("-"),
            theme.paint(reaction, theme.state)
        )?;
    }
    Ok(())
}

fn stats_cells(theme: &Theme, stats: &SearchStats) -> String {
    let mut cells = theme.count(stats.total, 7, theme.active);
    for k in 1..=MAX_REACTIONS {
        let color = if k == MAX_REACTIONS {
            theme.highlight
        } else {
            theme.active
        };
        cells.push_str(&theme.count(stats.bucket(k), 9, color));
    }
    cells
}

pub fn render_summary(out: &mut impl Write, theme: &Theme, stats: &SearchStats) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        theme.bold(
            format!("{:>7}{:>9}{:>9}{:>9}{:>9}", "Total", "Combo 1", "Combo 2", "Combo 3", "Combo 4"),
            theme.header
        )
    )?;
    writeln!(out, "{}", stats_cells(theme, stats))
}

pub fn render_leaderboard(
    out: &mut impl Write,
    theme: &Theme,
    title: &str,
    results: &[TeamResult],
) -> io::Result<()> {
    writeln!(out, "{}", theme.bold(title, theme.header))?;
    if results.is_empty() {
        return writeln!(out, "  {}", theme.paint("no team produced a combo", theme.dim));
    }

    let width = results
        .iter()
        .map(|r| team_width(&r.team))
        .max()
        .unwrap_or(0)
        .max("Team".len());

    writeln!(
        out,
        "{}",
        theme.bold(
            format!(
                "{:>5}  {}{:>7}{:>9}{:>9}{:>9}{:>9}",
                "No.",
                pad("Team", width),
                "Total",
                "Combo 1",
                "Combo 2",
                "Combo 3",
                "Combo 4"
            ),
            theme.header
        )
    )?;
    for r in results {
        let label = team_label(theme, &r.team);
        let gap = " ".repeat(width - team_width(&r.team));
        writeln!(
            out,
            "{:>5}  {}{}{}",
            r.team_no,
            label,
            gap,
            stats_cells(theme, &r.stats)
        )?;
    }
    Ok(())
}

/// Numbered chain table; numbers are assigned here, after the list is final.
pub fn render_sequences(
    out: &mut impl Write,
    theme: &Theme,
    sequences: &[Sequence],
) -> io::Result<()> {
    let columns = 1 + MAX_REACTIONS;
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(sequences.len());
    for seq in sequences {
        let mut row: Vec<String> = seq.steps().iter().map(step_label).collect();
        row.resize(columns, String::new());
        rows.push(row);
    }

    let mut widths = vec![0usize; columns];
    let headers: Vec<String> = std::iter::once("Attack".to_string())
        .chain((1..=MAX_REACTIONS).map(|k| format!("Combo {}", k)))
        .collect();
    for (i, h) in headers.iter().enumerate() {
        widths[i] = h.width();
    }
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let header: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| pad(h, w))
        .collect();
    writeln!(out, "{}", theme.bold(format!("{:>5}  {}", "#", header.join("  ")), theme.header))?;

    for (no, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &w))| {
                let padded = pad(cell, w);
                if i == 0 {
                    padded
                } else {
                    theme.paint(padded, theme.state)
                }
            })
            .collect();
        writeln!(out, "{:>5}  {}", no + 1, cells.join("  ").trim_end())?;
    }
    Ok(())
}

/// Team heading plus its chain table
pub fn render_detail(out: &mut impl Write, theme: &Theme, result: &TeamResult) -> io::Result<()> {
    writeln!(
        out,
        "{} {}",
        theme.bold(format!("Team {}:", result.team_no), theme.header),
        team_label(theme, &result.team)
    )?;
    render_sequences(out, theme, &result.sequences)?;
    render_summary(out, theme, &result.stats)
}
