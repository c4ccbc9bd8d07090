use std::collections::BTreeSet;

use crate::CatalogEntry;

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(ToString::to_string).collect()
}

fn entry(
    id: &str,
    name: &str,
    aliases: &[&str],
    muscles: &[&str],
    equipment: &[&str],
) -> CatalogEntry {
    CatalogEntry {
        id: id.into(),
        name: name.to_string(),
        aliases: set(aliases),
        muscles: set(muscles),
        equipment: set(equipment),
        asset: format!("exercises/{id}.gif").into(),
        instructions: vec![format!("Perform the {}.", name.to_lowercase())],
    }
}

pub fn back_squat() -> CatalogEntry {
    CatalogEntry {
        instructions: vec![
            "Rest the bar on your upper back.".to_string(),
            "Sit back and down until your thighs are parallel to the floor.".to_string(),
            "Drive up through your heels.".to_string(),
        ],
        ..entry(
            "barbell-back-squat",
            "Barbell Back Squat",
            &["back squat", "squat"],
            &["quads", "glutes", "legs"],
            &["barbell"],
        )
    }
}

pub fn bench_press() -> CatalogEntry {
    entry(
        "barbell-bench-press",
        "Barbell Bench Press",
        &["bench press", "flat bench"],
        &["chest", "triceps", "shoulders"],
        &["barbell", "bench"],
    )
}

pub fn dumbbell_curl() -> CatalogEntry {
    entry(
        "dumbbell-curl",
        "Dumbbell Curl",
        &["bicep curl"],
        &["biceps", "arms"],
        &["dumbbell"],
    )
}

pub fn farmer_carry() -> CatalogEntry {
    entry(
        "farmer-carry",
        "Farmer Carry",
        &["farmers walk"],
        &["forearms", "traps", "grip"],
        &["dumbbell"],
    )
}

pub fn plank() -> CatalogEntry {
    entry("plank", "Plank", &["front plank"], &["abs", "core"], &[])
}

pub fn pull_up() -> CatalogEntry {
    entry(
        "pull-up",
        "Pull-Up",
        &["pullup", "pull up"],
        &["lats", "back", "biceps"],
        &["pull-up bar"],
    )
}

pub fn romanian_deadlift() -> CatalogEntry {
    entry(
        "romanian-deadlift",
        "Romanian Deadlift",
        &["rdl"],
        &["hamstrings", "glutes", "legs"],
        &["barbell"],
    )
}

pub fn catalog() -> Vec<CatalogEntry> {
    vec![
        back_squat(),
        bench_press(),
        dumbbell_curl(),
        farmer_carry(),
        plank(),
        pull_up(),
        romanian_deadlift(),
    ]
}
