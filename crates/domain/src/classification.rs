use std::sync::LazyLock;

use strum::{AsRefStr, Display, EnumIter};

use crate::{NormalizedQuery, normalize};

/// Coarse movement pattern used as a last catalog-backed fallback.
#[derive(AsRefStr, Clone, Copy, Debug, Display, EnumIter, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[strum(serialize_all = "lowercase")]
pub enum MovementCategory {
    Push,
    Pull,
    Squat,
    Hinge,
    Carry,
    Core,
}

impl MovementCategory {
    // Evaluation order matters: "leg raise" is core before "raise" is push, "leg press" is squat
    // before "press" is push, "back extension" is hinge before "extension" is push.
    const PRECEDENCE: [MovementCategory; 6] = [
        MovementCategory::Carry,
        MovementCategory::Core,
        MovementCategory::Hinge,
        MovementCategory::Squat,
        MovementCategory::Pull,
        MovementCategory::Push,
    ];

    fn keywords(self) -> &'static [&'static str] {
        match self {
            MovementCategory::Push => &[
                "press",
                "push-up",
                "pushup",
                "push up",
                "dip",
                "fly",
                "raise",
                "extension",
                "skullcrusher",
                "kickback",
                "bench",
                "push",
            ],
            MovementCategory::Pull => &[
                "row",
                "pull-up",
                "pullup",
                "pull up",
                "chin-up",
                "chinup",
                "chin up",
                "pulldown",
                "pull-down",
                "curl",
                "face pull",
                "shrug",
                "pull",
            ],
            MovementCategory::Squat => &[
                "squat",
                "lunge",
                "leg press",
                "step-up",
                "step up",
                "split",
                "pistol",
                "wall sit",
                "leg extension",
            ],
            MovementCategory::Hinge => &[
                "deadlift",
                "rdl",
                "good morning",
                "swing",
                "hip thrust",
                "bridge",
                "back extension",
                "hyperextension",
                "hinge",
                "clean",
                "snatch",
            ],
            MovementCategory::Carry => &[
                "carry",
                "farmer walk",
                "farmer",
                "suitcase",
                "yoke",
                "overhead walk",
            ],
            MovementCategory::Core => &[
                "plank",
                "crunch",
                "sit-up",
                "situp",
                "sit up",
                "ab",
                "abs",
                "rollout",
                "twist",
                "leg raise",
                "knee raise",
                "hollow",
                "dead bug",
                "mountain climber",
                "v-up",
                "woodchop",
            ],
        }
    }

    fn muscle_groups(self) -> &'static [&'static str] {
        match self {
            MovementCategory::Push => &["chest", "pecs", "shoulders", "delts", "triceps", "push"],
            MovementCategory::Pull => &["back", "lats", "biceps", "traps", "upper back", "pull"],
            MovementCategory::Squat => &["legs", "quads", "glutes", "lower body", "squat"],
            MovementCategory::Hinge => &["hamstrings", "lower back", "posterior chain", "hinge"],
            MovementCategory::Carry => &["grip", "forearms", "full body", "carry"],
            MovementCategory::Core => &["core", "abs", "obliques", "midsection"],
        }
    }
}

struct Vocabulary {
    keywords: Vec<(MovementCategory, Vec<NormalizedQuery>)>,
    muscle_groups: Vec<(MovementCategory, Vec<NormalizedQuery>)>,
}

static VOCABULARY: LazyLock<Vocabulary> = LazyLock::new(|| {
    let normalize_all =
        |words: &[&str]| words.iter().map(|w| normalize(w)).collect::<Vec<_>>();
    Vocabulary {
        keywords: MovementCategory::PRECEDENCE
            .iter()
            .map(|c| (*c, normalize_all(c.keywords())))
            .collect(),
        muscle_groups: MovementCategory::PRECEDENCE
            .iter()
            .map(|c| (*c, normalize_all(c.muscle_groups())))
            .collect(),
    }
});

/// Buckets a query into a movement category by keyword.
#[must_use]
pub fn classify(query: &NormalizedQuery) -> Option<MovementCategory> {
    VOCABULARY
        .keywords
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| query.contains_phrase(k)))
        .map(|(category, _)| *category)
}

/// Buckets a muscle-group hint into the movement category that mostly trains it.
#[must_use]
pub fn classify_muscle_group(muscle_group: &NormalizedQuery) -> Option<MovementCategory> {
    if muscle_group.is_empty() {
        return None;
    }
    VOCABULARY
        .muscle_groups
        .iter()
        .find(|(_, groups)| groups.contains(muscle_group))
        .map(|(category, _)| *category)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::*;

    #[rstest]
    #[case("Barbell Bench Press", Some(MovementCategory::Push))]
    #[case("Push-Ups", Some(MovementCategory::Push))]
    #[case("Lateral Raise", Some(MovementCategory::Push))]
    #[case("Bent Over Row", Some(MovementCategory::Pull))]
    #[case("Hammer Curls", Some(MovementCategory::Pull))]
    #[case("Cossack Squat", Some(MovementCategory::Squat))]
    #[case("Leg Press", Some(MovementCategory::Squat))]
    #[case("Reverse Lunges", Some(MovementCategory::Squat))]
    #[case("Single Leg Romanian Deadlift", Some(MovementCategory::Hinge))]
    #[case("Kettlebell Swings", Some(MovementCategory::Hinge))]
    #[case("Back Extension", Some(MovementCategory::Hinge))]
    #[case("Farmers Walk", Some(MovementCategory::Carry))]
    #[case("Suitcase Carry", Some(MovementCategory::Carry))]
    #[case("Hanging Leg Raises", Some(MovementCategory::Core))]
    #[case("Side Plank", Some(MovementCategory::Core))]
    #[case("Russian Twist", Some(MovementCategory::Core))]
    #[case("asdkjasdkj", None)]
    #[case("", None)]
    #[case("Jumping Jacks", None)]
    fn test_classify(#[case] raw: &str, #[case] expected: Option<MovementCategory>) {
        assert_eq!(classify(&normalize(raw)), expected);
    }

    #[rstest]
    #[case("Legs", Some(MovementCategory::Squat))]
    #[case("leg", Some(MovementCategory::Squat))]
    #[case("Chest", Some(MovementCategory::Push))]
    #[case("back", Some(MovementCategory::Pull))]
    #[case("Hamstrings", Some(MovementCategory::Hinge))]
    #[case("abs", Some(MovementCategory::Core))]
    #[case("Forearms", Some(MovementCategory::Carry))]
    #[case("cardio", None)]
    #[case("", None)]
    fn test_classify_muscle_group(
        #[case] muscle_group: &str,
        #[case] expected: Option<MovementCategory>,
    ) {
        assert_eq!(classify_muscle_group(&normalize(muscle_group)), expected);
    }

    #[test]
    fn test_categories() {
        assert_eq!(MovementCategory::iter().count(), MovementCategory::PRECEDENCE.len());
        for category in MovementCategory::iter() {
            assert!(MovementCategory::PRECEDENCE.contains(&category));
            assert!(!category.keywords().is_empty());
            assert!(!category.muscle_groups().is_empty());
        }
    }

    #[test]
    fn test_category_display() {
        assert_eq!(MovementCategory::Hinge.to_string(), "hinge");
        assert_eq!(MovementCategory::Core.as_ref(), "core");
    }
}
