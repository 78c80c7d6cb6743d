use crate::core::format::FormatRule;
use crate::domain::model::GenerationRequest;

/// Mana-curve guidance keyed by archetype. Unknown archetypes get the
/// midrange description.
fn curve_for_archetype(archetype: &str) -> &'static str {
    match archetype.to_lowercase().as_str() {
        "aggro" => "a low curve peaking at 1-2 mana, almost nothing above 4",
        "tempo" => "a low curve peaking at 2 mana with cheap interaction",
        "midrange" => "a balanced curve peaking at 3 mana",
        "control" => "a flat curve with heavy 2-4 mana interaction and a few finishers",
        "combo" => "a curve built around the combo pieces, with cheap card selection",
        "ramp" => "mana acceleration at 1-3 and large threats at 5+",
        _ => "a balanced curve peaking at 3 mana",
    }
}

fn budget_guidance(budget: Option<f64>) -> Option<String> {
    let budget = budget?;
    let tier = if budget < 50.0 {
        "strictly budget cards, avoid anything over $2"
    } else if budget < 200.0 {
        "mostly affordable cards, a few key cards up to $10 are fine"
    } else {
        "price is not a constraint, pick the strongest cards"
    };
    Some(format!(
        "Total budget is roughly ${:.0}: {}.",
        budget, tier
    ))
}

/// Builds the structured generation request sent to the text model.
/// Pure function: the same request always compiles to the same prompt.
pub fn compile_prompt(request: &GenerationRequest) -> String {
    let rule = FormatRule::for_format(&request.format);
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Build a {} {} deck of exactly {} cards.\n",
        request.archetype,
        rule.name,
        rule.target_size()
    ));

    if rule.singleton {
        prompt.push_str("This is a singleton format: at most one copy of any card except basic lands.\n");
    } else {
        prompt.push_str(&format!(
            "Include at most {} copies of any card except basic lands.\n",
            rule.max_copies
        ));
    }

    if !request.colors.is_empty() {
        let names: Vec<&str> = request.colors.iter().map(|c| c.display_name()).collect();
        prompt.push_str(&format!("Use only these colors: {}.\n", names.join(", ")));
    }

    if rule.has_commander {
        match &request.commander {
            Some(name) => prompt.push_str(&format!(
                "The commander is {}; every card must fit its color identity.\n",
                name
            )),
            None => prompt.push_str(
                "Choose a legendary creature as the commander and list it under a Commander header.\n",
            ),
        }
    }

    prompt.push_str(&format!(
        "Aim for {} and about {} lands.\n",
        curve_for_archetype(&request.archetype),
        rule.recommended_lands
    ));

    if let Some(guidance) = budget_guidance(request.budget) {
        prompt.push_str(&guidance);
        prompt.push('\n');
    }

    if let Some(notes) = &request.strategy_notes {
        if !notes.trim().is_empty() {
            prompt.push_str(&format!("Strategy notes: {}\n", notes.trim()));
        }
    }

    prompt.push_str(
        "\nOutput format: one card per line as \"<quantity> <card name>\", \
         grouped under type headers (Creatures, Instants, Sorceries, Enchantments, \
         Artifacts, Planeswalkers, Lands).",
    );
    if rule.has_commander {
        prompt.push_str(" Put the commander on its own line under a \"Commander\" header.");
    }
    if rule.has_sideboard {
        prompt.push_str(&format!(
            " Add a \"Sideboard\" header followed by {} sideboard cards.",
            rule.sideboard_size
        ));
    }
    prompt.push_str(" Do not add commentary.\n");

    prompt
}
