//! Slugs and generated titles.

use rand::seq::IndexedRandom;

const ADJECTIVES: &[&str] = &[
    "Agile", "Bold", "Bright", "Calm", "Clever", "Curious", "Daring", "Eager", "Gentle",
    "Grand", "Happy", "Keen", "Lively", "Lucky", "Mellow", "Nimble", "Proud", "Quiet",
    "Rapid", "Sharp", "Steady", "Swift", "Tidy", "Vivid", "Witty",
];

const COLOURS: &[&str] = &[
    "Amber", "Azure", "Beige", "Coral", "Crimson", "Cyan", "Emerald", "Gold", "Indigo",
    "Ivory", "Jade", "Lavender", "Lime", "Magenta", "Olive", "Orange", "Pink", "Plum",
    "Purple", "Ruby", "Salmon", "Silver", "Teal", "Turquoise", "Violet",
];

const ANIMALS: &[&str] = &[
    "Albatross", "Badger", "Bison", "Cheetah", "Crane", "Dolphin", "Falcon", "Fox",
    "Gazelle", "Heron", "Ibex", "Jaguar", "Koala", "Lynx", "Marten", "Narwhal", "Otter",
    "Panda", "Puffin", "Raven", "Salamander", "Tapir", "Walrus", "Wolf", "Yak",
];

/// Lowercase words joined by hyphens.
///
/// Words split on any non-alphanumeric character and on case boundaries, so
/// "Engineer Resume", "engineer_resume" and "EngineerResume" all become
/// `engineer-resume`.
pub fn kebab_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            // fooBar → foo|Bar, XMLHttp → XML|Http
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }

        current.extend(c.to_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }

    words.join("-")
}

/// A random "Adjective Colour Animal" title for documents imported without one.
pub fn random_title() -> String {
    let mut rng = rand::rng();
    [ADJECTIVES, COLOURS, ANIMALS]
        .iter()
        .map(|list| *list.choose(&mut rng).unwrap_or(&"Untitled"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case_spaces() {
        assert_eq!(kebab_case("Engineer Resume"), "engineer-resume");
    }

    #[test]
    fn test_kebab_case_separators_and_edges() {
        assert_eq!(kebab_case("  __Senior--Engineer__Resume!  "), "senior-engineer-resume");
    }

    #[test]
    fn test_kebab_case_camel_and_acronyms() {
        assert_eq!(kebab_case("EngineerResume"), "engineer-resume");
        assert_eq!(kebab_case("myXMLResume"), "my-xml-resume");
        assert_eq!(kebab_case("v2Draft"), "v2-draft");
    }

    #[test]
    fn test_kebab_case_is_idempotent() {
        let once = kebab_case("Staff Engineer (AI)");
        assert_eq!(once, "staff-engineer-ai");
        assert_eq!(kebab_case(&once), once);
    }

    #[test]
    fn test_kebab_case_of_symbols_is_empty() {
        assert_eq!(kebab_case("!!! ---"), "");
    }

    #[test]
    fn test_random_title_has_three_capitalised_words() {
        let title = random_title();
        let words: Vec<&str> = title.split(' ').collect();
        assert_eq!(words.len(), 3);
        assert!(words
            .iter()
            .all(|w| w.chars().next().is_some_and(char::is_uppercase)));
        assert!(!kebab_case(&title).is_empty());
    }
}
