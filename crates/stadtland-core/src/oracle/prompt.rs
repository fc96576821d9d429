use serde_json::{Map, Value};

use crate::types::SanitizedRound;

/// The six arbitration rules, in the order the judge sees them.
pub const RULES: [&str; 6] = [
    "Korrekte Schreibweise: Keine Tippfehler.",
    "Exakter Anfangsbuchstabe: Die Antwort muss mit \"{letter}\" beginnen.",
    "Gültigkeit der Kategorie: Die Antwort muss eindeutig in die Kategorie passen.",
    "Singular und Plural: Beide Formen sind gültig (z.B. \"Lachs\" und \"Lachse\").",
    "Allgemeinwissen: Gebräuchliche Namen sind gültig (z.B. \"Irland\"). Sei nicht pedantisch.",
    "Leere Antworten: Sind immer ungültig.",
];

/// Answers as a JSON object keyed by player, in round order.
pub fn answers_json(round: &SanitizedRound) -> Value {
    let mut players = Map::new();
    for row in &round.rows {
        players.insert(
            row.player.clone(),
            Value::Array(row.answers.iter().cloned().map(Value::String).collect()),
        );
    }
    Value::Object(players)
}

/// Reply shape shown to the judge, built from the round's own names.
fn reply_example(round: &SanitizedRound) -> Value {
    let mut players = Map::new();
    for row in &round.rows {
        let cells = round
            .categories
            .iter()
            .map(|c| (c.clone(), Value::Bool(true)))
            .collect();
        players.insert(row.player.clone(), Value::Object(cells));
    }
    Value::Object(players)
}

pub fn build_instruction(round: &SanitizedRound) -> String {
    let letter = &round.letter;
    let rules = RULES
        .iter()
        .enumerate()
        .map(|(i, rule)| format!("{}. {}", i + 1, rule.replace("{letter}", letter)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Du bist ein fairer, konsistenter und strenger \"Stadt, Land, Fluss\"-Schiedsrichter. \
         Wende die Regeln genau an und verhindere Schummeln, akzeptiere aber gebräuchliches \
         Allgemeinwissen.\n\n\
         Bewerte die folgenden Antworten für den Buchstaben \"{letter}\".\n\n\
         Regeln:\n{rules}\n\n\
         Die Kategorien sind: {categories}\n\
         Die Antworten der Spieler (je Spieler in der Reihenfolge der Kategorien) sind:\n{answers}\n\n\
         Gib deine Antwort AUSSCHLIESSLICH als JSON in genau dieser Form zurück, mit \
         true für gültig und false für ungültig, und verwende die Spieler- und \
         Kategorienamen unverändert:\n{example}",
        letter = letter,
        rules = rules,
        categories = round.categories.join(", "),
        answers = answers_json(round),
        example = reply_example(round),
    )
}
