use std::sync::LazyLock;

use formcue_domain as domain;
use strum::Display;

/// Catalog compiled into the binary, usable without any external data.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinCatalog;

impl domain::CatalogRepository for BuiltinCatalog {
    async fn read_catalog(&self) -> Result<Vec<domain::CatalogEntry>, domain::CatalogLoadError> {
        Ok(EXERCISES.clone())
    }
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
enum Muscle {
    Abs,
    Adductors,
    Biceps,
    Calves,
    Chest,
    #[strum(serialize = "lower back")]
    ErectorSpinae,
    Forearms,
    #[strum(serialize = "front delts")]
    FrontDelts,
    Glutes,
    Hamstrings,
    Lats,
    Obliques,
    Quads,
    #[strum(serialize = "rear delts")]
    RearDelts,
    #[strum(serialize = "side delts")]
    SideDelts,
    Traps,
    Triceps,
}

impl Muscle {
    fn group(self) -> &'static str {
        match self {
            Muscle::Abs | Muscle::Obliques => "core",
            Muscle::Biceps | Muscle::Triceps | Muscle::Forearms => "arms",
            Muscle::FrontDelts | Muscle::SideDelts | Muscle::RearDelts => "shoulders",
            Muscle::Chest => "chest",
            Muscle::Lats | Muscle::Traps | Muscle::ErectorSpinae => "back",
            Muscle::Adductors
            | Muscle::Calves
            | Muscle::Glutes
            | Muscle::Hamstrings
            | Muscle::Quads => "legs",
        }
    }
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
enum Equipment {
    Barbell,
    Bench,
    Box,
    Cable,
    Dumbbell,
    Kettlebell,
    Machine,
    #[strum(serialize = "parallel bars")]
    ParallelBars,
    #[strum(serialize = "pull-up bar")]
    PullUpBar,
    #[strum(serialize = "resistance band")]
    ResistanceBand,
    #[strum(serialize = "trap bar")]
    TrapBar,
}

struct BaseExercise {
    name: &'static str,
    aliases: &'static [&'static str],
    muscles: &'static [Muscle],
    equipment: &'static [Equipment],
    instructions: &'static [&'static str],
    variants: &'static [ExerciseVariant],
}

/// Variation of a base exercise; unset properties are inherited.
struct ExerciseVariant {
    name: &'static str,
    aliases: &'static [&'static str],
    muscles: Option<&'static [Muscle]>,
    equipment: Option<&'static [Equipment]>,
}

impl ExerciseVariant {
    const fn default() -> Self {
        Self {
            name: "",
            aliases: &[],
            muscles: None,
            equipment: None,
        }
    }
}

fn entry(
    name: &str,
    aliases: &[&str],
    muscles: &[Muscle],
    equipment: &[Equipment],
    instructions: &[&str],
) -> domain::CatalogEntry {
    let id = slug(name);
    domain::CatalogEntry {
        asset: format!("exercises/{id}.gif").into(),
        id: id.into(),
        name: name.to_string(),
        aliases: aliases.iter().map(ToString::to_string).collect(),
        muscles: muscles
            .iter()
            .flat_map(|m| [m.to_string(), m.group().to_string()])
            .collect(),
        equipment: equipment.iter().map(ToString::to_string).collect(),
        instructions: instructions.iter().map(ToString::to_string).collect(),
    }
}

fn slug(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

static EXERCISES: LazyLock<Vec<domain::CatalogEntry>> = LazyLock::new(|| {
    let mut exercises = BASE_EXERCISES
        .iter()
        .map(|e| entry(e.name, e.aliases, e.muscles, e.equipment, e.instructions))
        .chain(BASE_EXERCISES.iter().flat_map(|e| {
            e.variants.iter().map(|v| {
                entry(
                    v.name,
                    v.aliases,
                    v.muscles.unwrap_or(e.muscles),
                    v.equipment.unwrap_or(e.equipment),
                    e.instructions,
                )
            })
        }))
        .collect::<Vec<_>>();
    exercises.sort_by(|a, b| a.id.cmp(&b.id));
    exercises
});

const BASE_EXERCISES: [BaseExercise; 26] = [
    BaseExercise {
        name: "Back Extension",
        aliases: &["hyperextension"],
        muscles: &[Muscle::ErectorSpinae, Muscle::Glutes, Muscle::Hamstrings],
        equipment: &[Equipment::Machine],
        instructions: &[
            "Lock your legs under the pads with the hips just over the edge.",
            "Lower your torso with a neutral spine.",
            "Raise until your body forms a straight line.",
        ],
        variants: &[],
    },
    BaseExercise {
        name: "Band Pull Apart",
        aliases: &[],
        muscles: &[Muscle::RearDelts, Muscle::Traps],
        equipment: &[Equipment::ResistanceBand],
        instructions: &[
            "Hold the band at shoulder height with straight arms.",
            "Pull the band apart until it touches your chest.",
        ],
        variants: &[],
    },
    BaseExercise {
        name: "Barbell Back Squat",
        aliases: &["back squat", "squat"],
        muscles: &[Muscle::Quads, Muscle::Glutes, Muscle::Adductors],
        equipment: &[Equipment::Barbell],
        instructions: &[
            "Rest the bar on your upper back.",
            "Sit back and down until your thighs are parallel to the floor.",
            "Drive up through your heels.",
        ],
        variants: &[
            ExerciseVariant {
                name: "Barbell Front Squat",
                aliases: &["front squat"],
                ..ExerciseVariant::default()
            },
            ExerciseVariant {
                name: "Goblet Squat",
                equipment: Some(&[Equipment::Kettlebell, Equipment::Dumbbell]),
                ..ExerciseVariant::default()
            },
            ExerciseVariant {
                name: "Bodyweight Squat",
                aliases: &["air squat"],
                equipment: Some(&[]),
                ..ExerciseVariant::default()
            },
        ],
    },
    BaseExercise {
        name: "Barbell Bench Press",
        aliases: &["bench press", "flat bench"],
        muscles: &[Muscle::Chest, Muscle::FrontDelts, Muscle::Triceps],
        equipment: &[Equipment::Barbell, Equipment::Bench],
        instructions: &[
            "Lie on the bench with your eyes under the bar.",
            "Lower the bar to your mid chest.",
            "Press the bar back up until your arms are straight.",
        ],
        variants: &[
            ExerciseVariant {
                name: "Barbell Incline Bench Press",
                aliases: &["incline bench press"],
                ..ExerciseVariant::default()
            },
            ExerciseVariant {
                name: "Dumbbell Bench Press",
                equipment: Some(&[Equipment::Dumbbell, Equipment::Bench]),
                ..ExerciseVariant::default()
            },
            ExerciseVariant {
                name: "Machine Chest Press",
                equipment: Some(&[Equipment::Machine]),
                ..ExerciseVariant::default()
            },
        ],
    },
    BaseExercise {
        name: "Barbell Curl",
        aliases: &["bicep curl"],
        muscles: &[Muscle::Biceps, Muscle::Forearms],
        equipment: &[Equipment::Barbell],
        instructions: &[
            "Hold the bar with an underhand grip.",
            "Curl the bar up while keeping your elbows at your sides.",
            "Lower under control.",
        ],
        variants: &[
            ExerciseVariant {
                name: "Cable Curl",
                equipment: Some(&[Equipment::Cable]),
                ..ExerciseVariant::default()
            },
            ExerciseVariant {
                name: "Dumbbell Curl",
                aliases: &["dumbbell bicep curl"],
                equipment: Some(&[Equipment::Dumbbell]),
                ..ExerciseVariant::default()
            },
            ExerciseVariant {
                name: "Dumbbell Hammer Curl",
                aliases: &["hammer curl"],
                equipment: Some(&[Equipment::Dumbbell]),
                ..ExerciseVariant::default()
            },
        ],
    },
    BaseExercise {
        name: "Barbell Deadlift",
        aliases: &["deadlift", "conventional deadlift"],
        muscles: &[
            Muscle::ErectorSpinae,
            Muscle::Glutes,
            Muscle::Hamstrings,
            Muscle::Quads,
            Muscle::Traps,
        ],
        equipment: &[Equipment::Barbell],
        instructions: &[
            "Stand with the bar over your mid foot.",
            "Grip the bar and brace your back.",
            "Push the floor away until you stand tall.",
        ],
        variants: &[
            ExerciseVariant {
                name: "Barbell Romanian Deadlift",
                aliases: &["romanian deadlift", "rdl"],
                muscles: Some(&[Muscle::Hamstrings, Muscle::Glutes, Muscle::ErectorSpinae]),
                ..ExerciseVariant::default()
            },
            ExerciseVariant {
                name: "Dumbbell Romanian Deadlift",
                aliases: &["dumbbell rdl"],
                muscles: Some(&[Muscle::Hamstrings, Muscle::Glutes, Muscle::ErectorSpinae]),
                equipment: Some(&[Equipment::Dumbbell]),
            },
            ExerciseVariant {
                name: "Trap Bar Deadlift",
                aliases: &["hex bar deadlift"],
                equipment: Some(&[Equipment::TrapBar]),
                ..ExerciseVariant::default()
            },
        ],
    },
    BaseExercise {
        name: "Barbell Hip Thrust",
        aliases: &["hip thrust"],
        muscles: &[Muscle::Glutes, Muscle::Hamstrings],
        equipment: &[Equipment::Barbell, Equipment::Bench],
        instructions: &[
            "Rest your upper back on the bench with the bar over your hips.",
            "Drive your hips up until your thighs are horizontal.",
        ],
        variants: &[ExerciseVariant {
            name: "Glute Bridge",
            equipment: Some(&[]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Barbell Row",
        aliases: &["bent over row", "bent-over row"],
        muscles: &[Muscle::Lats, Muscle::Traps, Muscle::RearDelts, Muscle::Biceps],
        equipment: &[Equipment::Barbell],
        instructions: &[
            "Hinge forward with a flat back.",
            "Pull the bar to your lower chest.",
            "Lower under control.",
        ],
        variants: &[
            ExerciseVariant {
                name: "Dumbbell Row",
                aliases: &["one arm dumbbell row"],
                equipment: Some(&[Equipment::Dumbbell, Equipment::Bench]),
                ..ExerciseVariant::default()
            },
            ExerciseVariant {
                name: "Cable Row",
                aliases: &["seated cable row"],
                equipment: Some(&[Equipment::Cable]),
                ..ExerciseVariant::default()
            },
        ],
    },
    BaseExercise {
        name: "Barbell Shoulder Press",
        aliases: &["overhead press", "military press", "ohp"],
        muscles: &[Muscle::FrontDelts, Muscle::SideDelts, Muscle::Triceps],
        equipment: &[Equipment::Barbell],
        instructions: &[
            "Start with the bar on your front delts.",
            "Press the bar overhead until your arms lock out.",
        ],
        variants: &[
            ExerciseVariant {
                name: "Dumbbell Shoulder Press",
                equipment: Some(&[Equipment::Dumbbell]),
                ..ExerciseVariant::default()
            },
            ExerciseVariant {
                name: "Arnold Press",
                equipment: Some(&[Equipment::Dumbbell]),
                ..ExerciseVariant::default()
            },
        ],
    },
    BaseExercise {
        name: "Barbell Shrug",
        aliases: &["shrug"],
        muscles: &[Muscle::Traps],
        equipment: &[Equipment::Barbell],
        instructions: &["Elevate your shoulders towards your ears.", "Lower slowly."],
        variants: &[ExerciseVariant {
            name: "Dumbbell Shrug",
            equipment: Some(&[Equipment::Dumbbell]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Box Jump",
        aliases: &[],
        muscles: &[Muscle::Quads, Muscle::Glutes, Muscle::Calves],
        equipment: &[Equipment::Box],
        instructions: &[
            "Swing your arms and jump onto the box.",
            "Land softly and step down.",
        ],
        variants: &[],
    },
    BaseExercise {
        name: "Cable Rope Face Pull",
        aliases: &["face pull"],
        muscles: &[Muscle::RearDelts, Muscle::Traps],
        equipment: &[Equipment::Cable],
        instructions: &[
            "Set the rope at face height.",
            "Pull the rope towards your face with elbows high.",
        ],
        variants: &[],
    },
    BaseExercise {
        name: "Crunch",
        aliases: &["sit up"],
        muscles: &[Muscle::Abs],
        equipment: &[],
        instructions: &[
            "Lie on your back with bent knees.",
            "Curl your shoulders off the floor.",
        ],
        variants: &[ExerciseVariant {
            name: "Cable Crunch",
            equipment: Some(&[Equipment::Cable]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Dip",
        aliases: &["parallel bar dip"],
        muscles: &[Muscle::Chest, Muscle::Triceps, Muscle::FrontDelts],
        equipment: &[Equipment::ParallelBars],
        instructions: &[
            "Support yourself on the bars with straight arms.",
            "Lower until your shoulders are below your elbows.",
            "Press back up.",
        ],
        variants: &[ExerciseVariant {
            name: "Bench Dip",
            muscles: Some(&[Muscle::Triceps]),
            equipment: Some(&[Equipment::Bench]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Dumbbell Fly",
        aliases: &["chest fly"],
        muscles: &[Muscle::Chest, Muscle::FrontDelts],
        equipment: &[Equipment::Dumbbell, Equipment::Bench],
        instructions: &[
            "Lie on the bench with the dumbbells above your chest.",
            "Open your arms in a wide arc.",
            "Bring the dumbbells back together.",
        ],
        variants: &[ExerciseVariant {
            name: "Cable Fly",
            aliases: &["cable crossover"],
            equipment: Some(&[Equipment::Cable]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Dumbbell Lateral Raise",
        aliases: &["lateral raise", "side raise"],
        muscles: &[Muscle::SideDelts],
        equipment: &[Equipment::Dumbbell],
        instructions: &[
            "Raise the dumbbells out to the sides until shoulder height.",
            "Lower under control.",
        ],
        variants: &[ExerciseVariant {
            name: "Cable Lateral Raise",
            equipment: Some(&[Equipment::Cable]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Farmer Carry",
        aliases: &["farmers walk"],
        muscles: &[Muscle::Forearms, Muscle::Traps, Muscle::Abs],
        equipment: &[Equipment::Dumbbell],
        instructions: &[
            "Pick up a heavy weight in each hand.",
            "Walk with short steps while standing tall.",
        ],
        variants: &[
            ExerciseVariant {
                name: "Kettlebell Farmer Carry",
                equipment: Some(&[Equipment::Kettlebell]),
                ..ExerciseVariant::default()
            },
            ExerciseVariant {
                name: "Suitcase Carry",
                muscles: Some(&[Muscle::Obliques, Muscle::Forearms]),
                ..ExerciseVariant::default()
            },
        ],
    },
    BaseExercise {
        name: "Hanging Leg Raise",
        aliases: &[],
        muscles: &[Muscle::Abs, Muscle::Obliques],
        equipment: &[Equipment::PullUpBar],
        instructions: &[
            "Hang from the bar with straight arms.",
            "Raise your legs until they are parallel to the floor.",
        ],
        variants: &[ExerciseVariant {
            name: "Hanging Knee Raise",
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Kettlebell Swing",
        aliases: &["russian kettlebell swing"],
        muscles: &[Muscle::Glutes, Muscle::Hamstrings, Muscle::ErectorSpinae],
        equipment: &[Equipment::Kettlebell],
        instructions: &[
            "Hinge and hike the kettlebell between your legs.",
            "Snap your hips forward to swing it to chest height.",
        ],
        variants: &[],
    },
    BaseExercise {
        name: "Lat Pulldown",
        aliases: &["pulldown", "lat pull down"],
        muscles: &[Muscle::Lats, Muscle::Biceps],
        equipment: &[Equipment::Cable],
        instructions: &[
            "Grip the bar wider than shoulder width.",
            "Pull the bar to your upper chest.",
        ],
        variants: &[],
    },
    BaseExercise {
        name: "Leg Press",
        aliases: &[],
        muscles: &[Muscle::Quads, Muscle::Glutes],
        equipment: &[Equipment::Machine],
        instructions: &[
            "Place your feet shoulder width on the platform.",
            "Lower the sled until your knees are at ninety degrees.",
            "Press back up without locking your knees.",
        ],
        variants: &[],
    },
    BaseExercise {
        name: "Lunge",
        aliases: &["forward lunge"],
        muscles: &[Muscle::Quads, Muscle::Glutes, Muscle::Adductors],
        equipment: &[],
        instructions: &[
            "Step forward and lower your back knee towards the floor.",
            "Push back to the start.",
        ],
        variants: &[
            ExerciseVariant {
                name: "Dumbbell Walking Lunge",
                aliases: &["walking lunge"],
                equipment: Some(&[Equipment::Dumbbell]),
                ..ExerciseVariant::default()
            },
            ExerciseVariant {
                name: "Bulgarian Split Squat",
                aliases: &["split squat"],
                equipment: Some(&[Equipment::Dumbbell, Equipment::Bench]),
                ..ExerciseVariant::default()
            },
        ],
    },
    BaseExercise {
        name: "Plank",
        aliases: &["front plank", "forearm plank"],
        muscles: &[Muscle::Abs, Muscle::Obliques],
        equipment: &[],
        instructions: &[
            "Support yourself on your forearms and toes.",
            "Keep your body in a straight line.",
            "Breathe steadily while holding the position.",
        ],
        variants: &[ExerciseVariant {
            name: "Side Plank",
            muscles: Some(&[Muscle::Obliques]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Pull-Up",
        aliases: &["pullup", "pull up"],
        muscles: &[Muscle::Lats, Muscle::Biceps, Muscle::Traps],
        equipment: &[Equipment::PullUpBar],
        instructions: &[
            "Hang from the bar with an overhand grip.",
            "Pull until your chin is over the bar.",
            "Lower to a full hang.",
        ],
        variants: &[ExerciseVariant {
            name: "Chin-Up",
            aliases: &["chinup", "chin up"],
            muscles: Some(&[Muscle::Biceps, Muscle::Lats]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Push-Up",
        aliases: &["pushup", "push up", "press up"],
        muscles: &[Muscle::Chest, Muscle::Triceps, Muscle::FrontDelts],
        equipment: &[],
        instructions: &[
            "Place your hands slightly wider than shoulder width.",
            "Lower your chest to the floor.",
            "Press back up with a rigid body.",
        ],
        variants: &[ExerciseVariant {
            name: "Incline Push-Up",
            equipment: Some(&[Equipment::Bench]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Standing Calf Raise",
        aliases: &["calf raise"],
        muscles: &[Muscle::Calves],
        equipment: &[Equipment::Machine],
        instructions: &["Rise onto your toes.", "Lower your heels below the platform."],
        variants: &[],
    },
];
