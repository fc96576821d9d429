use std::io::Read;

use anyhow::Context;
use stadtland_core::preprocess::block_index;
use stadtland_core::{Round, RoundEngine, ScoreRow};

use crate::cli::args::{EvaluateArgs, OutputFormat};
use crate::exit_codes::SUCCESS;

pub async fn run(args: EvaluateArgs) -> anyhow::Result<i32> {
    let text = if args.round.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read round from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.round)
            .with_context(|| format!("failed to read round file {}", args.round.display()))?
    };

    let round = Round::from_json(&text)?;
    let categories: Vec<String> = match block_index(&round.categories) {
        Some(block) => round
            .categories
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != block)
            .map(|(_, c)| c.clone())
            .collect(),
        None => round.categories.clone(),
    };

    let engine = RoundEngine::new(args.judge.to_config()?.build_oracle()?);
    let table = engine.evaluate(round).await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&table)?),
        OutputFormat::Text => print!("{}", render_text(&categories, &table)),
    }
    Ok(SUCCESS)
}

/// Plain table: one line per player, "answer (points)" per category.
fn render_text(categories: &[String], table: &[ScoreRow]) -> String {
    let mut header = vec!["Player".to_string()];
    header.extend(categories.iter().cloned());
    header.push("Block".to_string());
    header.push("Total".to_string());

    let mut lines = vec![header];
    for row in table {
        let mut line = vec![row.player.clone()];
        for (answer, points) in row.answers.iter().zip(&row.scores) {
            let answer = if answer.trim().is_empty() { "-" } else { answer.trim() };
            line.push(format!("{} ({})", answer, points));
        }
        line.push(if row.block_word.trim().is_empty() {
            "-".to_string()
        } else {
            row.block_word.trim().to_string()
        });
        line.push(row.scores.iter().sum::<u32>().to_string());
        lines.push(line);
    }

    let widths: Vec<usize> = (0..lines[0].len())
        .map(|col| {
            lines
                .iter()
                .map(|l| l.get(col).map_or(0, |c| c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for line in &lines {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_table_lists_points_and_totals() {
        let table = vec![
            ScoreRow {
                player: "Anna".into(),
                answers: vec!["Bonn".into(), String::new()],
                scores: vec![20, 0],
                block_word: "Berlin".into(),
            },
            ScoreRow {
                player: "Ben".into(),
                answers: vec!["Bremen".into(), "Bode".into()],
                scores: vec![20, 20],
                block_word: String::new(),
            },
        ];
        let text = render_text(&["Stadt".into(), "Fluss".into()], &table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Player"));
        assert!(lines[1].contains("Bonn (20)"));
        assert!(lines[1].contains("- (0)"));
        assert!(lines[1].contains("Berlin"));
        assert!(lines[1].ends_with("20"));
        assert!(lines[2].ends_with("40"));
    }
}
