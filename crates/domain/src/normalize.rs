use derive_more::{AsRef, Display};

/// Canonical, comparable form of a free-text exercise name.
///
/// Lowercase tokens separated by single spaces. Hyphens survive only inside compound words.
#[derive(AsRef, Debug, Display, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NormalizedQuery(String);

impl NormalizedQuery {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ').filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn token_count(&self) -> usize {
        self.tokens().count()
    }

    /// Whether `phrase` occurs as a contiguous run of whole tokens.
    #[must_use]
    pub fn contains_phrase(&self, phrase: &NormalizedQuery) -> bool {
        if phrase.is_empty() {
            return false;
        }
        let tokens = self.tokens().collect::<Vec<_>>();
        let needle = phrase.tokens().collect::<Vec<_>>();
        tokens.windows(needle.len()).any(|w| w == needle.as_slice())
    }
}

const LEVEL_QUALIFIERS: [&str; 6] = [
    "beginner",
    "intermediate",
    "advanced",
    "easy",
    "modified",
    "variation",
];

// Words that only qualify a trailing segment, on top of the level qualifiers.
const SUFFIX_QUALIFIERS: [&str; 17] = [
    "hard",
    "optional",
    "each",
    "per",
    "side",
    "leg",
    "arm",
    "alternating",
    "rep",
    "reps",
    "set",
    "sets",
    "sec",
    "secs",
    "second",
    "seconds",
    "min",
];

const UNCOUNTABLE: [&str; 5] = ["abs", "bus", "gas", "plus", "yes"];

/// Normalizes a raw exercise name. Total: every input yields a query, possibly empty.
#[must_use]
pub fn normalize(raw: &str) -> NormalizedQuery {
    let lowercase = raw.trim().to_lowercase();
    let without_brackets = strip_bracketed(&lowercase);
    let without_suffix = strip_qualifier_suffix(&without_brackets);
    let cleaned = strip_punctuation(&without_suffix);

    let tokens = cleaned
        .split_whitespace()
        .filter(|t| !LEVEL_QUALIFIERS.contains(t))
        .map(singularize)
        .collect::<Vec<_>>();

    NormalizedQuery(tokens.join(" "))
}

fn strip_bracketed(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut depth = 0usize;

    for c in value.chars() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                if depth > 0 {
                    depth -= 1;
                    result.push(' ');
                }
            }
            _ if depth == 0 => result.push(c),
            _ => {}
        }
    }

    result
}

// "squat - beginner", "lunge – each leg"
fn strip_qualifier_suffix(value: &str) -> String {
    let mut parts = value
        .split(|c: char| c == '–' || c == '—' || c == ':')
        .flat_map(|p| p.split(" - "))
        .collect::<Vec<_>>();

    while parts.len() > 1 {
        let Some(last) = parts.last() else {
            break;
        };
        let is_qualifier = last
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .all(|t| {
                LEVEL_QUALIFIERS.contains(&t)
                    || SUFFIX_QUALIFIERS.contains(&t)
                    || t.chars().all(|c| c.is_numeric() || c == 'x')
            });
        if !is_qualifier {
            break;
        }
        parts.pop();
    }

    parts.join(" ")
}

// "farmer's walk" joins into "farmers walk"
fn strip_punctuation(value: &str) -> String {
    let chars = value
        .chars()
        .filter(|c| !matches!(c, '\'' | '’'))
        .collect::<Vec<_>>();

    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if c.is_alphanumeric() {
                c
            } else if c == '-'
                && i > 0
                && chars[i - 1].is_alphanumeric()
                && chars.get(i + 1).is_some_and(|n| n.is_alphanumeric())
            {
                '-'
            } else {
                ' '
            }
        })
        .collect()
}

fn singularize(token: &str) -> String {
    if token.len() < 3 || !token.is_ascii() || UNCOUNTABLE.contains(&token) {
        return token.to_string();
    }

    if let Some(stem) = token.strip_suffix("ies") {
        return format!("{stem}y");
    }

    for suffix in ["sses", "ches", "shes", "xes"] {
        if token.ends_with(suffix) {
            return token[..token.len() - 2].to_string();
        }
    }

    if token.ends_with("ss") || token.ends_with("us") || token.ends_with("is") {
        return token.to_string();
    }

    token
        .strip_suffix('s')
        .map_or_else(|| token.to_string(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Squat", "squat")]
    #[case("  Barbell   Back  Squat ", "barbell back squat")]
    #[case("Squats", "squat")]
    #[case("Push-Ups", "push-up")]
    #[case("Bench Presses", "bench press")]
    #[case("Bicycle Crunches", "bicycle crunch")]
    #[case("Dumbbell Flies", "dumbbell fly")]
    #[case("Box Jumps!", "box jump")]
    #[case("Lateral Raises (Dumbbell)", "lateral raise")]
    #[case("Goblet Squat - Beginner", "goblet squat")]
    #[case("Walking Lunges – each leg", "walking lunge")]
    #[case("Beginner Push-Up", "push-up")]
    #[case("Plank (30 sec)", "plank")]
    #[case("Pull - Up", "pull up")]
    #[case("abs", "abs")]
    #[case("Ab Rollouts", "ab rollout")]
    #[case("Sit Ups - Easy", "sit up")]
    #[case("Plank - 3 sets", "plank")]
    #[case("Glute Bridge - 3x12", "glute bridge")]
    #[case("T-Bar Row", "t-bar row")]
    #[case("", "")]
    #[case("   ", "")]
    #[case("!!!", "")]
    fn test_normalize(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize(raw).as_str(), expected);
    }

    #[rstest]
    #[case("Barbell Squat", "barbell squats")]
    #[case("BARBELL SQUAT", "  barbell\tsquat")]
    #[case("Romanian Deadlift", "romanian deadlifts")]
    #[case("Lunge", "LUNGES")]
    #[case("Dumbbell Curl (Dumbbell)", "dumbbell curls")]
    #[case("Push Ups", "Push Up")]
    #[case("Sit Ups", "sit up")]
    #[case("Chin Ups", "chin up")]
    #[case("Farmer's Walk", "Farmers Walk")]
    #[case("Farmer’s Walk", "farmer walk")]
    fn test_normalize_equivalent(#[case] a: &str, #[case] b: &str) {
        assert_eq!(normalize(a), normalize(b));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["Incline Dumbbell Presses", "Push-Ups (Knees)", "Cable Face Pulls"] {
            let once = normalize(raw);
            assert_eq!(normalize(once.as_str()), once);
        }
    }

    #[test]
    fn test_normalize_keeps_meaningful_suffix() {
        assert_eq!(normalize("Squat - Bulgarian").as_str(), "squat bulgarian");
    }

    #[test]
    fn test_contains_phrase() {
        let query = normalize("Single Leg Romanian Deadlift");
        assert!(query.contains_phrase(&normalize("romanian deadlift")));
        assert!(query.contains_phrase(&normalize("leg")));
        assert!(!query.contains_phrase(&normalize("deadlift romanian")));
        assert!(!query.contains_phrase(&normalize("")));
    }

    #[test]
    fn test_tokens() {
        let query = normalize("Barbell Back Squat");
        assert_eq!(query.tokens().collect::<Vec<_>>(), vec!["barbell", "back", "squat"]);
        assert_eq!(query.token_count(), 3);
        assert_eq!(NormalizedQuery::default().token_count(), 0);
    }
}
